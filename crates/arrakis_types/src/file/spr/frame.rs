//! Sprite frame structures and pixel codecs.
//!
//! Every frame starts with a 4-byte header:
//!
//! | Offset | Size | Description                                     |
//! |--------|------|-------------------------------------------------|
//! | 0x00   | 2    | Real width in bits 0-14, bit 15 set if RLE      |
//! | 0x02   | 1    | Height                                          |
//! | 0x03   | 1    | Palette offset added to every 4-bit pixel value |
//!
//! Pixels are 4-bit indices, two per byte, low nibble first. Rows are padded to
//! a multiple of four pixels.

use std::fmt;

use crate::file::{
	ArFileError,
	cursor::ByteCursor,
	palette::{Color, Palette},
};

/// Size of the per-frame header
pub const FRAME_HEADER_SIZE: usize = 4;

const COMPRESSED_FLAG: u16 = 0x8000;

/// Decoded sprite frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
	start_offset: usize,
	compressed: bool,
	real_width: u16,
	width: u16,
	height: u8,
	bytes_per_row: u16,
	palette_offset: u8,
	pixels: Vec<u8>,
}

impl Frame {
	/// Decodes the frame whose header starts at the cursor position.
	///
	/// On return the cursor sits right after the frame's pixel payload.
	pub(crate) fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, ArFileError> {
		let start_offset = cursor.position();
		let width_and_flag = cursor.read_u16_le()?;
		let height = cursor.read_byte()?;
		let palette_offset = cursor.read_byte()?;

		let compressed = width_and_flag & COMPRESSED_FLAG != 0;
		let real_width = width_and_flag & !COMPRESSED_FLAG;
		let width = (real_width + 3) & !3;
		let bytes_per_row = (width.div_ceil(2) + 1) & !1;

		let mut frame = Self {
			start_offset,
			compressed,
			real_width,
			width,
			height,
			bytes_per_row,
			palette_offset,
			pixels: Vec::new(),
		};
		frame.pixels = if compressed {
			frame.decode_rle(cursor)?
		} else {
			frame.decode_packed(cursor)?
		};
		Ok(frame)
	}

	fn pixel_count(&self) -> usize {
		usize::from(self.width) * usize::from(self.height)
	}

	fn push_pair(&self, pixels: &mut Vec<u8>, byte: u8) {
		pixels.push((byte & 0x0F).wrapping_add(self.palette_offset));
		pixels.push((byte >> 4).wrapping_add(self.palette_offset));
	}

	fn decode_packed(&self, cursor: &mut ByteCursor<'_>) -> Result<Vec<u8>, ArFileError> {
		let width = usize::from(self.width);
		let mut pixels = Vec::with_capacity(self.pixel_count());

		for _ in 0..self.height {
			let row = cursor.read_bytes(usize::from(self.bytes_per_row))?;
			let row_start = pixels.len();
			for byte in row {
				self.push_pair(&mut pixels, *byte);
			}
			pixels.truncate(row_start + width);
		}

		Ok(pixels)
	}

	/// Runs span the whole frame: a run longer than the rest of a row carries
	/// into the next row. Only the last run of the frame is clipped.
	fn decode_rle(&self, cursor: &mut ByteCursor<'_>) -> Result<Vec<u8>, ArFileError> {
		let total = self.pixel_count();
		let mut pixels = Vec::with_capacity(total + 2 * 129);

		while pixels.len() < total {
			let run = cursor.read_signed_byte()?;
			if run < 0 {
				let byte = cursor.read_byte()?;
				for _ in 0..=run.unsigned_abs() {
					self.push_pair(&mut pixels, byte);
				}
			} else {
				for byte in cursor.read_bytes(run as usize + 1)? {
					self.push_pair(&mut pixels, *byte);
				}
			}
		}

		pixels.truncate(total);
		Ok(pixels)
	}

	/// Offset of the frame header inside the unpacked sprite data.
	pub fn start_offset(&self) -> usize {
		self.start_offset
	}

	/// Returns `true` if the pixels were run-length encoded.
	pub fn is_compressed(&self) -> bool {
		self.compressed
	}

	/// Width as stored in the header.
	pub fn real_width(&self) -> u16 {
		self.real_width
	}

	/// Width padded to a multiple of four, the row stride of [`Frame::pixels`].
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> u8 {
		self.height
	}

	/// Bytes per packed row.
	pub fn bytes_per_row(&self) -> u16 {
		self.bytes_per_row
	}

	/// Palette offset added to each 4-bit value.
	pub fn palette_offset(&self) -> u8 {
		self.palette_offset
	}

	/// Palette indices, row-major, `width * height` entries.
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Palette index at `(x, y)`.
	pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
		if x >= usize::from(self.width) {
			return None;
		}
		self.pixels.get(y * usize::from(self.width) + x).copied()
	}

	/// Returns `true` if a pixel value must be skipped when drawing.
	#[inline]
	pub fn is_transparent(&self, value: u8) -> bool {
		value == 0 || value <= self.palette_offset
	}

	/// Iterates the rows of the frame.
	pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
		self.pixels.chunks(usize::from(self.width).max(1))
	}

	/// Converts the frame to RGBA8, transparent pixels get a zero alpha.
	pub fn to_rgba(&self, palette: &Palette) -> Vec<u8> {
		self.pixels
			.iter()
			.flat_map(|&value| {
				if self.is_transparent(value) {
					Color::transparent().to_rgba()
				} else {
					let color = palette.get(value);
					Color::rgb(color.r, color.g, color.b).to_rgba()
				}
			})
			.collect()
	}
}

impl fmt::Display for Frame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}x{} (stored width {}, palette offset {}, {})",
			self.width,
			self.height,
			self.real_width,
			self.palette_offset,
			if self.compressed {
				"rle"
			} else {
				"packed"
			}
		)
	}
}
