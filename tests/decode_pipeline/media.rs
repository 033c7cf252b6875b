use std::io::Cursor;

use arrakis_rs::prelude::*;

use crate::{pack_literals, scratch_dir, sprite_sheet};

#[test_log::test]
fn sprite_dialect_follows_file_name() {
	let dir = scratch_dir("spr");
	let packed = pack_literals(&sprite_sheet());
	std::fs::write(dir.join("SHAI2.HSQ"), &packed).unwrap();
	std::fs::write(dir.join("ORNY.HSQ"), &packed).unwrap();

	let swap = SprFile::open(dir.join("SHAI2.HSQ")).unwrap();
	assert_eq!(swap.frame_count(), 2);
	let animation = swap.animation(0).unwrap();
	assert_eq!(animation.frames.len(), 1);
	assert_eq!(animation.frames[0].groups.len(), 2);
	assert_eq!(animation.frames[0].max_frame_index(), Some(1));

	// the same bytes read as a generic byte list close many small frames
	let generic = SprFile::open(dir.join("ORNY.HSQ")).unwrap();
	assert_eq!(generic.frames(), swap.frames());
	assert_ne!(generic.animations(), swap.animations());

	std::fs::remove_dir_all(dir).unwrap();
}

#[test_log::test]
fn sprite_frames_render_with_palette() {
	let sprite = SprFile::from_unpacked(&sprite_sheet(), &AnimationDialect::Generic).unwrap();

	let mut palette = Palette::grayscale();
	sprite.apply_palette(&mut palette);
	assert_eq!(palette[16], Color::rgb(0xFC, 0x00, 0x00));

	let frame = sprite.frame(0).unwrap();
	let rgba = frame.to_rgba(&palette);
	assert_eq!(rgba.len(), frame.pixels().len() * 4);
	// pixel 0 is index 0x11, which is gray
	assert_eq!(&rgba[..3], &[0x11, 0x11, 0x11]);
}

#[test_log::test]
fn video_superchunks_through_container() {
	let mut data = vec![0x00, 0x00];
	data.extend_from_slice(&[0x05, 0x01, 0x3F, 0x00, 0x00, 0xFF, 0xFF]);
	data.extend_from_slice(&0u32.to_le_bytes());
	let header_size = data.len() as u16;
	data[0..2].copy_from_slice(&header_size.to_le_bytes());

	let mut pixels = Vec::new();
	for chunk in [1u8, 2, 3, 4].chunks(16) {
		pixels.extend_from_slice(&0xFFFFu16.to_le_bytes());
		pixels.extend_from_slice(chunk);
	}
	let mut video = vec![0x02, 0x04, 0x02, 0x00];
	video.extend(HsqHeader::new(4, (6 + pixels.len()) as u16).to_bytes());
	video.extend(pixels);

	let mut sound = b"sd".to_vec();
	sound.extend_from_slice(&7u16.to_le_bytes());
	sound.extend_from_slice(&[0x80, 0x7F, 0x81]);

	let body = [sound, video].concat();
	data.extend_from_slice(&((2 + body.len()) as u16).to_le_bytes());
	data.extend(body);
	data.extend_from_slice(&2u16.to_le_bytes());

	let hnm = HnmFile::from_reader(&mut Cursor::new(pack_literals(&data))).unwrap();
	assert_eq!(hnm.header().palette()[0].start_index(), 5);
	assert_eq!(hnm.frame_count(), 2);

	let frame = hnm.frame(0).unwrap();
	assert_eq!(frame.sound.as_deref(), Some(&[0x80, 0x7F, 0x81][..]));
	let block = frame.video.as_ref().unwrap();
	assert_eq!((block.width, block.height), (2, 2));
	assert_eq!(block.pixels, vec![1, 2, 3, 4]);
	assert!(hnm.frame(1).unwrap().repeats_previous());
}

#[test_log::test]
fn sound_blocks_export_to_wav() {
	let mut data = b"Creative Voice File\x1A".to_vec();
	data.extend_from_slice(&26u16.to_le_bytes());
	data.extend_from_slice(&0x010Au16.to_le_bytes());
	data.extend_from_slice(&0x1129u16.to_le_bytes());
	// repeat twice: two samples at 10 kHz
	data.extend_from_slice(&[0x06, 0x02, 0x00, 0x00, 0x02, 0x00]);
	data.extend_from_slice(&[0x01, 0x04, 0x00, 0x00, 0x9C, 0x00, 0x10, 0xF0]);
	data.extend_from_slice(&[0x07, 0x00, 0x00, 0x00]);
	data.push(0x00);

	let voc = VocFile::from_bytes(&pack_literals(&data)).unwrap();
	assert_eq!(voc.blocks().len(), 4);

	let chunks: Vec<PcmChunk> = voc.to_pcm().unwrap().into_iter().map(Result::unwrap).collect();
	assert_eq!(chunks.len(), 2);
	assert_eq!(chunks[0].sample_rate, 10_000);

	let dir = scratch_dir("voc");
	let path = dir.join("voice.wav");
	chunks[0].save_wav(&path).unwrap();
	let mut reader = hound::WavReader::open(&path).unwrap();
	assert_eq!(reader.spec().channels, 1);
	let samples: Vec<i8> = reader.samples::<i8>().map(Result::unwrap).collect();
	assert_eq!(samples, vec![-112, 112]);

	std::fs::remove_dir_all(dir).unwrap();
}
