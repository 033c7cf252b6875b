//! End-to-end decoding tests for `arrakis-rs`
//!
//! Assets are synthesized in memory. Set `ARRAKIS_ASSETS` to a directory of
//! real game files to also run the asset sweep in [`assets`].

mod asset_config;
mod assets;
mod container;
mod media;

use arrakis_rs::prelude::*;

/// Stores `data` in an HSQ container made of literals only.
pub(crate) fn pack_literals(data: &[u8]) -> Vec<u8> {
	let mut body = Vec::new();
	for chunk in data.chunks(16) {
		body.extend_from_slice(&0xFFFFu16.to_le_bytes());
		body.extend_from_slice(chunk);
	}
	let mut packed =
		HsqHeader::new(data.len() as u16, (HsqHeader::SIZE + body.len()) as u16).to_bytes().to_vec();
	packed.extend(body);
	packed
}

/// A two-frame sprite sheet with a one-color palette and an animation section
/// whose definition table is written as swap records.
pub(crate) fn sprite_sheet() -> Vec<u8> {
	let palette = [16, 1, 0x3F, 0x00, 0x00, 0xFF, 0xFF];
	let frame_0 = [0x04, 0x00, 0x02, 0x10, 0x21, 0x43, 0x65, 0x87];
	let frame_1 = [0x04, 0x80, 0x01, 0x00, 0xFE, 0x33];
	let table_offset = (2 + palette.len()) as u16;

	let mut data = table_offset.to_le_bytes().to_vec();
	data.extend_from_slice(&palette);
	data.extend_from_slice(&4u16.to_le_bytes());
	data.extend_from_slice(&((4 + frame_0.len()) as u16).to_le_bytes());
	data.extend_from_slice(&frame_0);
	data.extend_from_slice(&frame_1);

	let groups = [1, 0, 0, 0, 2, 1, 1, 0];
	let mut definitions = Vec::new();
	for record in [[1u16, 0, 0, 0], [2, 0, 0, 0]] {
		for value in record {
			definitions.extend_from_slice(&value.to_le_bytes());
		}
	}
	definitions.extend_from_slice(&0xFFFFu16.to_le_bytes());

	data.extend_from_slice(&[0x00, 0x00]);
	for value in [0u16, 0, 320, 200, 14, 14 + groups.len() as u16, 0] {
		data.extend_from_slice(&value.to_le_bytes());
	}
	data.extend_from_slice(&groups);
	data.extend(definitions);
	data
}

/// Scratch directory unique to this test process.
pub(crate) fn scratch_dir(name: &str) -> std::path::PathBuf {
	let dir = std::env::temp_dir().join(format!("arrakis-{}-{name}", std::process::id()));
	std::fs::create_dir_all(&dir).unwrap();
	dir
}
