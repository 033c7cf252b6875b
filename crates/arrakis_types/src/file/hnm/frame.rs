//! HNM frame and video block types.

use std::fmt;

use log::{trace, warn};

use crate::file::{
	ArFileError, FileType,
	cursor::ByteCursor,
	hsq::{constants::HEADER_CHECKSUM, decompress_with_hint},
	palette::PaletteChunk,
};

/// Size of the video block header
pub const BLOCK_HEADER_SIZE: usize = 4;

/// Size of the compression header following the block header
pub const COMPRESSION_HEADER_SIZE: usize = 6;

/// The 4-byte header opening a video block.
///
/// ```text
/// b0: width bits 0-7
/// b1: width bit 8 in bit 0, flags in bits 1-7
/// b2: height
/// b3: mode
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoBlockHeader {
	width: u16,
	flags: u8,
	height: u8,
	mode: u8,
}

impl VideoBlockHeader {
	/// Decodes the four header bytes.
	pub fn from_bytes(bytes: [u8; BLOCK_HEADER_SIZE]) -> Self {
		let [b0, b1, b2, b3] = bytes;
		Self {
			width: (u16::from(b1 & 0x01) << 8) | u16::from(b0),
			flags: b1 & 0xFE,
			height: b2,
			mode: b3,
		}
	}

	/// Width in pixels, 9 bits.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Flag bits.
	pub fn flags(&self) -> u8 {
		self.flags
	}

	/// Height in pixels.
	pub fn height(&self) -> u8 {
		self.height
	}

	/// Drawing mode.
	pub fn mode(&self) -> u8 {
		self.mode
	}

	/// Returns `true` if the block has no pixels.
	pub fn is_empty(&self) -> bool {
		self.width == 0 || self.height == 0
	}
}

/// A decoded video block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoBlock {
	/// Destination X
	pub x: u16,
	/// Destination Y
	pub y: u16,
	/// Width in pixels
	pub width: u16,
	/// Height in pixels
	pub height: u8,
	/// Flag bits from the block header
	pub flags: u8,
	/// Drawing mode
	pub mode: u8,
	/// Palette indices, `width * height` entries
	pub pixels: Vec<u8>,
}

impl VideoBlock {
	/// Flag bit set on compressed blocks.
	pub const FLAG_COMPRESSED: u8 = 0x02;

	/// Flag bit set when the block covers the whole screen and carries no
	/// position.
	pub const FLAG_FULL_FRAME: u8 = 0x04;

	/// Decodes a video block at the cursor position.
	///
	/// Returns `None` for a zero-sized block, meaning the previous picture is
	/// kept.
	///
	/// The payload always goes through the HSQ decompressor.
	/// [`Self::FLAG_COMPRESSED`] is kept on the block but not used to pick a
	/// raw pixel path.
	pub(crate) fn read(cursor: &mut ByteCursor<'_>) -> Result<Option<Self>, ArFileError> {
		let offset = cursor.position();
		let header = VideoBlockHeader::from_bytes(cursor.read_array()?);
		if header.is_empty() {
			trace!("HNM: empty video block at {offset:#X}");
			return Ok(None);
		}

		let uncompressed_size = cursor.read_u16_le()?;
		let _zero = cursor.read_byte()?;
		let compressed_size = cursor.read_u16_le()?;
		let salt = cursor.read_byte()?;

		let [u0, u1] = uncompressed_size.to_le_bytes();
		let [c0, c1] = compressed_size.to_le_bytes();
		let checksum = [u0, u1, c0, c1, salt].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
		if checksum != HEADER_CHECKSUM {
			warn!("HNM: video block at {offset:#X} has checksum {checksum:#04X}");
		}

		let Some(payload_size) = usize::from(compressed_size).checked_sub(COMPRESSION_HEADER_SIZE)
		else {
			return Err(ArFileError::invalid_chunk(
				FileType::Hnm,
				offset,
				format!("compressed size {compressed_size} is smaller than its header"),
			));
		};
		let payload = cursor.read_bytes(payload_size)?;
		let unpacked = decompress_with_hint(payload, usize::from(uncompressed_size))?;

		let mut pixels_cursor = ByteCursor::new(&unpacked);
		let (x, y) = if header.flags() & Self::FLAG_FULL_FRAME == 0 {
			(pixels_cursor.read_u16_le()?, pixels_cursor.read_u16_le()?)
		} else {
			(0, 0)
		};
		let pixel_count = usize::from(header.width()) * usize::from(header.height());
		let pixels = pixels_cursor.read_bytes(pixel_count)?.to_vec();

		Ok(Some(Self {
			x,
			y,
			width: header.width(),
			height: header.height(),
			flags: header.flags(),
			mode: header.mode(),
			pixels,
		}))
	}

	/// Returns `true` if the compressed flag is set.
	pub fn is_compressed(&self) -> bool {
		self.flags & Self::FLAG_COMPRESSED != 0
	}

	/// Returns `true` if the block carries no position.
	pub fn is_full_frame(&self) -> bool {
		self.flags & Self::FLAG_FULL_FRAME != 0
	}
}

impl fmt::Display for VideoBlock {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}x{} at ({}, {}), flags {:#04X}, mode {:#04X}",
			self.width, self.height, self.x, self.y, self.flags, self.mode
		)
	}
}

/// Everything a superchunk carries for one displayed frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoFrame {
	/// Palette update to apply before drawing
	pub palette: Option<Vec<PaletteChunk>>,

	/// New picture, `None` repeats the previous one
	pub video: Option<VideoBlock>,

	/// Raw `sd` sub-block payload, for the audio layer
	pub sound: Option<Vec<u8>>,
}

impl VideoFrame {
	/// Returns `true` if the previous picture should be shown again.
	pub fn repeats_previous(&self) -> bool {
		self.video.is_none()
	}
}
