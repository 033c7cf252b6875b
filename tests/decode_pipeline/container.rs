use arrakis_rs::prelude::*;
use log::info;

use crate::{pack_literals, scratch_dir};

#[test_log::test]
fn packed_and_raw_payloads_agree() {
	let payload: Vec<u8> = (0..200u16).map(|i| (i * 3) as u8).collect();
	let packed = pack_literals(&payload);

	let container = HsqContainer::load(&packed).unwrap();
	assert!(container.is_compressed());
	assert_eq!(container.header().unwrap().uncompressed_size(), 200);
	assert_eq!(container.data(), &payload[..]);

	let raw = HsqContainer::load_with(&packed, LoadMode::Raw).unwrap();
	assert!(!raw.is_compressed());
	assert_eq!(raw.data(), &packed[..]);
	info!("{}", container.header().unwrap());
}

#[test_log::test]
fn size_mismatch_is_fatal() {
	let mut packed = pack_literals(&[1, 2, 3, 4]);
	packed.push(0);
	match HsqContainer::load(&packed) {
		Err(ArFileError::FileSizeMismatch {
			file_type: FileType::Hsq,
			expected,
			actual,
		}) => assert_eq!(actual, expected + 1),
		other => panic!("unexpected result: {other:?}"),
	}
}

#[test_log::test]
fn raw_files_from_config_skip_the_header() {
	let dir = scratch_dir("raw");
	let packed = pack_literals(b"payload");
	std::fs::write(dir.join("INTRO.BIN"), &packed).unwrap();
	std::fs::write(dir.join("OTHER.BIN"), &packed).unwrap();

	let config = AssetConfig {
		raw_files: vec!["intro.bin".to_string()],
		..AssetConfig::default()
	};
	for (name, compressed) in [("INTRO.BIN", false), ("OTHER.BIN", true)] {
		let path = dir.join(name);
		let container = HsqContainer::open_with(&path, config.load_mode(&path)).unwrap();
		assert_eq!(container.is_compressed(), compressed, "{name}");
	}

	std::fs::remove_dir_all(dir).unwrap();
}
