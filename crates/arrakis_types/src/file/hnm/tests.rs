//! Unit tests for HNM decoding

use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::*;
use crate::file::{hsq::Header, palette::pack_vga};

/// Header with a one-entry palette run, padding and a two-entry offset table.
fn header() -> Vec<u8> {
	let mut data = vec![0x00, 0x00];
	data.extend_from_slice(&[0x00, 0x01, 0xAA, 0xBB, 0xCC]);
	data.extend_from_slice(&[0x05, 0x01, 0x3F, 0x3F, 0x3F]);
	data.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);
	data.extend_from_slice(&0u32.to_le_bytes());
	data.extend_from_slice(&0x20u32.to_le_bytes());
	let size = data.len() as u16;
	data[0..2].copy_from_slice(&size.to_le_bytes());
	data
}

fn sub_block(tag: &[u8; 2], payload: &[u8]) -> Vec<u8> {
	let mut data = tag.to_vec();
	data.extend_from_slice(&((4 + payload.len()) as u16).to_le_bytes());
	data.extend_from_slice(payload);
	data
}

fn video_block(header: [u8; 4], unpacked: &[u8]) -> Vec<u8> {
	let mut body = Vec::new();
	for chunk in unpacked.chunks(16) {
		body.extend_from_slice(&0xFFFFu16.to_le_bytes());
		body.extend_from_slice(chunk);
	}
	let mut data = header.to_vec();
	data.extend(Header::new(unpacked.len() as u16, (6 + body.len()) as u16).to_bytes());
	data.extend(body);
	data
}

fn superchunk(items: &[Vec<u8>]) -> Vec<u8> {
	let payload = items.concat();
	let mut data = ((2 + payload.len()) as u16).to_le_bytes().to_vec();
	data.extend(payload);
	data
}

#[test]
fn test_header() {
	let mut data = header();
	data.extend(superchunk(&[]));
	let video = File::from_unpacked(&data).unwrap();

	let header = video.header();
	assert_eq!(header.header_size(), 24);
	assert_eq!(header.palette().len(), 1);
	assert_eq!(header.palette()[0].start_index(), 5);
	assert_eq!(header.palette()[0].colors(), &[pack_vga(0x3F, 0x3F, 0x3F)]);
	assert_eq!(header.toc(), &[0, 0x20]);

	assert_eq!(video.frame_count(), 1);
	assert!(video.frame(0).unwrap().repeats_previous());
}

#[test]
fn test_superchunks() {
	let mut data = header();
	data.extend(superchunk(&[
		sub_block(b"pl", &[0x10, 0x01, 0x01, 0x02, 0x03, 0xFF, 0xFF]),
		sub_block(b"sd", &[0x80, 0x81, 0x82]),
		sub_block(b"mm", &[0xDE, 0xAD]),
		video_block([0x02, 0x04, 0x02, 0x00], &[1, 2, 3, 4]),
	]));
	data.extend(superchunk(&[
		sub_block(b"kl", &[]),
		video_block([0x01, 0x02, 0x01, 0x07], &[3, 0, 4, 0, 9]),
		vec![0xEE, 0xEE],
	]));
	data.extend(superchunk(&[video_block([0x00, 0x00, 0x00, 0x00], &[])]));

	let video = File::from_unpacked(&data).unwrap();
	assert_eq!(video.frame_count(), 3);

	let frame = video.frame(0).unwrap();
	let palette = frame.palette.as_ref().unwrap();
	assert_eq!(palette[0].start_index(), 0x10);
	assert_eq!(frame.sound.as_deref(), Some(&[0x80, 0x81, 0x82][..]));
	let block = frame.video.as_ref().unwrap();
	assert!(block.is_full_frame());
	assert_eq!(block.pixels, vec![1, 2, 3, 4]);

	let frame = video.frame(1).unwrap();
	assert!(frame.palette.is_none());
	assert!(frame.sound.is_none());
	let block = frame.video.as_ref().unwrap();
	assert_eq!((block.x, block.y, block.mode), (3, 4, 7));
	assert_eq!(block.pixels, vec![9]);

	assert!(video.frame(2).unwrap().repeats_previous());
}

#[test]
fn test_superchunk_past_end() {
	let mut data = header();
	data.extend_from_slice(&0x40u16.to_le_bytes());
	data.extend_from_slice(&[0; 4]);
	assert!(matches!(
		File::from_unpacked(&data),
		Err(ArFileError::InvalidChunk {
			file_type: FileType::Hnm,
			..
		})
	));

	let mut data = header();
	data.extend_from_slice(&1u16.to_le_bytes());
	assert!(matches!(File::from_unpacked(&data), Err(ArFileError::InvalidChunk { .. })));
}

#[test]
fn test_sub_block_past_superchunk() {
	let mut block = sub_block(b"sd", &[0; 4]);
	block[2] = 0x40;
	let mut data = header();
	data.extend(superchunk(&[block]));
	assert!(matches!(File::from_unpacked(&data), Err(ArFileError::InvalidChunk { .. })));
}

#[test]
fn test_header_size_inside_palette() {
	let mut data = header();
	data[0..2].copy_from_slice(&4u16.to_le_bytes());
	assert!(matches!(File::from_unpacked(&data), Err(ArFileError::InvalidChunk { .. })));
}

#[test]
fn test_random_input_never_panics() {
	let mut rng = SmallRng::seed_from_u64(0x484E_4D);
	let mut base = header();
	base.extend(superchunk(&[
		sub_block(b"pl", &[0x10, 0x01, 0x01, 0x02, 0x03, 0xFF, 0xFF]),
		video_block([0x02, 0x04, 0x02, 0x00], &[1, 2, 3, 4]),
	]));

	for _ in 0..300 {
		let mut data = base.clone();
		for _ in 0..rng.random_range(1..6) {
			let index = rng.random_range(0..data.len());
			data[index] = rng.random();
		}
		let _ = File::from_unpacked(&data);
		let _ = File::from_bytes(&data);
	}
}
