use std::path::Path;

use arrakis_rs::prelude::*;
use log::{error, info, warn};
use walkdir::WalkDir;

fn extension(path: &Path) -> String {
	path.extension().map(|e| e.to_string_lossy().to_ascii_uppercase()).unwrap_or_default()
}

/// Decodes every HSQ, HNM and VOC file under `ARRAKIS_ASSETS`. Decoding
/// errors are logged; only a panic fails the test.
///
/// Sprite sheets cannot be told apart from other packed files by name, so
/// `.HSQ` files are only unpacked.
#[test_log::test]
fn decode_real_assets() {
	let Ok(root) = std::env::var("ARRAKIS_ASSETS") else {
		info!("ARRAKIS_ASSETS not set, skipping");
		return;
	};
	let config = AssetConfig::default();

	let mut decoded = 0;
	let mut failed = 0;
	for entry in WalkDir::new(&root).into_iter().filter_map(Result::ok) {
		let path = entry.path();
		if !entry.file_type().is_file() {
			continue;
		}

		let result = match extension(path).as_str() {
			"HSQ" => HsqContainer::open_with(path, config.load_mode(path)).map(|c| c.data().len()),
			"HNM" => HnmFile::open(path).map(|v| v.frame_count()),
			"VOC" => VocFile::open(path).map(|s| s.blocks().len()),
			_ => continue,
		};
		match result {
			Ok(items) => {
				info!("{}: {items}", path.display());
				decoded += 1;
			}
			Err(err) if err.is_recoverable() => warn!("{}: {err}", path.display()),
			Err(err) => {
				error!("{}: {err}", path.display());
				failed += 1;
			}
		}
	}
	info!("{decoded} assets decoded, {failed} failed");
}
