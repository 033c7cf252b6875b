//! Benchmark helper utilities for arrakis-rs
//!
//! The game files cannot be redistributed, so the benchmarks run on synthetic
//! data built here: a small greedy HSQ encoder and a sprite sheet generator.

use std::collections::HashMap;

use arrakis_types::file::hsq::Header;

/// Writes an HSQ bitstream.
///
/// Flag bits are stored in 16-bit words placed in the stream right before
/// the bytes that follow the first flag of the word.
#[derive(Debug)]
pub struct HsqWriter {
	body: Vec<u8>,
	flags_at: usize,
	flag_count: u32,
}

impl HsqWriter {
	/// Longest distance reachable by a short match
	pub const SHORT_DISTANCE: usize = 256;

	/// Longest distance reachable by a long match
	pub const LONG_DISTANCE: usize = 0x2000;

	/// Longest match length
	pub const MAX_COUNT: usize = 257;

	/// Creates an empty writer.
	pub fn new() -> Self {
		Self {
			body: Vec::new(),
			flags_at: 0,
			flag_count: 16,
		}
	}

	fn bit(&mut self, set: bool) {
		if self.flag_count == 16 {
			self.flags_at = self.body.len();
			self.body.extend_from_slice(&[0, 0]);
			self.flag_count = 0;
		}
		if set {
			let at = self.flags_at;
			let word = u16::from_le_bytes([self.body[at], self.body[at + 1]]) | (1 << self.flag_count);
			self.body[at..at + 2].copy_from_slice(&word.to_le_bytes());
		}
		self.flag_count += 1;
	}

	/// Emits one literal byte.
	pub fn literal(&mut self, byte: u8) {
		self.bit(true);
		self.body.push(byte);
	}

	/// Emits a match of 2..=5 bytes at most 256 bytes back.
	pub fn short_match(&mut self, distance: usize, count: usize) {
		assert!((1..=Self::SHORT_DISTANCE).contains(&distance));
		assert!((2..=5).contains(&count));
		let n = count - 2;
		self.bit(false);
		self.bit(false);
		self.bit(n & 2 != 0);
		self.bit(n & 1 != 0);
		self.body.push((Self::SHORT_DISTANCE - distance) as u8);
	}

	/// Emits a match of 3..=257 bytes at most 8192 bytes back.
	pub fn long_match(&mut self, distance: usize, count: usize) {
		assert!((1..=Self::LONG_DISTANCE).contains(&distance));
		assert!((3..=Self::MAX_COUNT).contains(&count));
		let raw = Self::LONG_DISTANCE - distance;
		let inline = if count <= 9 {
			count - 2
		} else {
			0
		};
		self.bit(false);
		self.bit(true);
		self.body.push((((raw & 0x1F) << 3) | inline) as u8);
		self.body.push((raw >> 5) as u8);
		if inline == 0 {
			self.body.push((count - 2) as u8);
		}
	}

	/// Emits the end marker and returns the bitstream.
	pub fn finish(mut self) -> Vec<u8> {
		self.bit(false);
		self.bit(true);
		self.body.extend_from_slice(&[0, 0, 0]);
		self.body
	}
}

impl Default for HsqWriter {
	fn default() -> Self {
		Self::new()
	}
}

/// Compresses `data` into an HSQ container with a greedy matcher keyed on
/// three-byte prefixes.
///
/// # Panics
///
/// Panics if the data or the compressed result do not fit a 16-bit size.
pub fn compress(data: &[u8]) -> Vec<u8> {
	let mut writer = HsqWriter::new();
	let mut last_seen: HashMap<[u8; 3], usize> = HashMap::new();
	let mut pos = 0;

	while pos < data.len() {
		let candidate = data
			.get(pos..pos + 3)
			.and_then(|key| last_seen.get(&[key[0], key[1], key[2]]).copied())
			.filter(|&start| pos - start <= HsqWriter::LONG_DISTANCE);

		let matched = candidate.map_or(0, |start| {
			data[pos..]
				.iter()
				.zip(&data[start..])
				.take(HsqWriter::MAX_COUNT)
				.take_while(|(a, b)| a == b)
				.count()
		});

		let step = match candidate {
			Some(start) if matched >= 3 => {
				let distance = pos - start;
				if distance <= HsqWriter::SHORT_DISTANCE && matched <= 5 {
					writer.short_match(distance, matched);
				} else {
					writer.long_match(distance, matched);
				}
				matched
			}
			_ => {
				writer.literal(data[pos]);
				1
			}
		};

		for at in pos..pos + step {
			if let Some(key) = data.get(at..at + 3) {
				last_seen.insert([key[0], key[1], key[2]], at);
			}
		}
		pos += step;
	}

	let body = writer.finish();
	let uncompressed = u16::try_from(data.len()).expect("data too large for HSQ");
	let compressed = u16::try_from(Header::SIZE + body.len()).expect("stream too large for HSQ");

	let mut packed = Header::new(uncompressed, compressed).to_bytes().to_vec();
	packed.extend(body);
	packed
}

/// Generates `size` bytes that look like indexed graphics: runs, gradients
/// and repeated rows.
pub fn generate_image_like(size: usize) -> Vec<u8> {
	let mut data = Vec::with_capacity(size);
	let mut state = 0x1234_5678u32;

	while data.len() < size {
		state ^= state << 13;
		state ^= state >> 17;
		state ^= state << 5;
		let len = (state as usize >> 8) % 48 + 1;
		match state % 4 {
			0 => data.extend(std::iter::repeat_n(state as u8, len)),
			1 => data.extend((0..len).map(|i| (i as u8).wrapping_add(state as u8))),
			2 if data.len() >= 320 => {
				let start = data.len() - 320;
				for i in 0..len {
					data.push(data[start + i]);
				}
			}
			_ => data.extend((0..len).map(|i| (state >> (i % 24)) as u8)),
		}
	}

	data.truncate(size);
	data
}

/// Generates an unpacked sprite sheet of `frame_count` frames.
///
/// Even frames are stored packed, odd frames run-length encoded. `width` is
/// rounded up to a multiple of eight.
pub fn generate_sprite_sheet(frame_count: usize, width: u16, height: u8) -> Vec<u8> {
	let width = (width + 7) & !7;
	let row_bytes = usize::from(width / 2);
	let frame_bytes = row_bytes * usize::from(height);

	let frames: Vec<Vec<u8>> = (0..frame_count)
		.map(|index| {
			let mut frame = Vec::new();
			let flag = if index % 2 == 1 {
				0x8000
			} else {
				0
			};
			frame.extend_from_slice(&(width | flag).to_le_bytes());
			frame.push(height);
			frame.push((index % 16) as u8 * 16);

			if flag == 0 {
				frame.extend((0..frame_bytes).map(|i| (i * 7 + index) as u8));
			} else {
				let mut written = 0;
				while written < frame_bytes {
					// 16 literal bytes, then a run of 32
					frame.push(15);
					frame.extend((0..16).map(|i| (i + index) as u8));
					frame.push(-31i8 as u8);
					frame.push(index as u8);
					written += 48;
				}
			}
			frame
		})
		.collect();

	let table_len = frame_count * 2;
	let mut data = 2u16.to_le_bytes().to_vec();
	let mut offset = table_len;
	for frame in &frames {
		data.extend_from_slice(&(offset as u16).to_le_bytes());
		offset += frame.len();
	}
	for frame in frames {
		data.extend(frame);
	}
	data
}

/// Common payload sizes for benchmarks
pub mod sizes {
	/// A small file such as a font or a short sound effect
	pub const SMALL: usize = 4 * 1024;
	/// A typical sprite sheet
	pub const MEDIUM: usize = 16 * 1024;
	/// A full-screen background
	pub const LARGE: usize = 64_000;
}

#[cfg(test)]
mod tests {
	use arrakis_types::file::{
		hsq::{Container, decompress},
		spr::{AnimationDialect, File as SprFile},
	};

	use super::*;

	#[test]
	fn test_compress_matches_decoder() {
		for size in [1, 17, sizes::SMALL, sizes::LARGE] {
			let data = generate_image_like(size);
			let packed = compress(&data);
			assert!(packed.len() < data.len() + data.len() / 8 + 16);

			let container = Container::load(&packed).unwrap();
			assert!(container.is_compressed());
			assert_eq!(container.data(), &data[..]);
		}
	}

	#[test]
	fn test_writer_match_kinds() {
		let mut writer = HsqWriter::new();
		for byte in b"ABCD" {
			writer.literal(*byte);
		}
		writer.short_match(4, 5);
		writer.long_match(2, 9);
		writer.long_match(4, 100);
		let body = writer.finish();

		let output = decompress(&body).unwrap();
		assert_eq!(output.len(), 4 + 5 + 9 + 100);
		assert_eq!(&output[..9], b"ABCDABCDA");
		assert_eq!(&output[9..11], b"DA");
	}

	#[test]
	fn test_sprite_sheet() {
		let data = generate_sprite_sheet(6, 30, 20);
		let sprite = SprFile::from_unpacked(&data, &AnimationDialect::Generic).unwrap();

		assert_eq!(sprite.frame_count(), 6);
		for frame in sprite.frames() {
			assert_eq!(frame.width(), 32);
			assert_eq!(frame.pixels().len(), 32 * 20);
		}
		assert!(sprite.frame(1).unwrap().is_compressed());
	}
}
