//! Palette chunk support.
//!
//! Sprites and videos do not carry a full palette. They carry runs of
//! *palette chunks*, each overwriting `count` consecutive entries of the
//! 256-colour VGA palette starting at `start`.
//!
//! # Chunk Layout
//!
//! ```text
//! start: u8, count: u8, count * (r: u8, g: u8, b: u8)
//! ```
//!
//! A run ends with the pair `(0xFF, 0xFF)`. Channels are 6-bit VGA DAC values
//! and are widened with `<< 2`. Entries whose index would reach 256 are read and
//! discarded.
//!
//! Video files use a slightly different variant: `count == 0` means 256 and the
//! pair `(0x00, 0x01)` is followed by three padding bytes and carries no data.

use std::fmt;

use log::trace;

use crate::file::{ArFileError, cursor::ByteCursor};

/// Number of entries in a VGA palette
pub const PALETTE_SIZE: usize = 256;

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a transparent black color.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Unpacks a `0xAABBGGRR` value as produced by the chunk decoder.
	pub const fn from_packed(value: u32) -> Self {
		Self {
			r: (value & 0xFF) as u8,
			g: ((value >> 8) & 0xFF) as u8,
			b: ((value >> 16) & 0xFF) as u8,
			a: ((value >> 24) & 0xFF) as u8,
		}
	}

	/// Packs the color as `0xAABBGGRR`.
	pub const fn to_packed(&self) -> u32 {
		((self.a as u32) << 24) | ((self.b as u32) << 16) | ((self.g as u32) << 8) | (self.r as u32)
	}

	/// Returns the color as `[r, g, b, a]`.
	pub const fn to_rgba(&self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a]
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::transparent()
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Packs a 6-bit VGA triple into `0xFF000000 | B << 16 | G << 8 | R`.
pub fn pack_vga(r: u8, g: u8, b: u8) -> u32 {
	let widen = |c: u8| u32::from(c << 2);
	0xFF00_0000 | (widen(b) << 16) | (widen(g) << 8) | widen(r)
}

/// Which palette chunk dialect is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkVariant {
	/// Chunks embedded in sprite sheets
	Sprite,

	/// Chunks of HNM headers and `pl` sub-blocks
	Video,
}

/// A run of consecutive palette entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteChunk {
	start_index: u16,
	colors: Vec<u32>,
}

impl PaletteChunk {
	/// Creates a chunk from packed colors.
	pub fn new(start_index: u16, colors: Vec<u32>) -> Self {
		Self {
			start_index,
			colors,
		}
	}

	/// First palette index written by this chunk.
	pub fn start_index(&self) -> u16 {
		self.start_index
	}

	/// Number of entries actually written (entries past index 255 are dropped).
	pub fn count(&self) -> u16 {
		self.colors.len() as u16
	}

	/// Packed `0xAABBGGRR` colors.
	pub fn colors(&self) -> &[u32] {
		&self.colors
	}

	/// Iterates `(palette index, color)` pairs.
	pub fn iter(&self) -> impl Iterator<Item = (usize, Color)> + '_ {
		let start = usize::from(self.start_index);
		self.colors.iter().enumerate().map(move |(i, c)| (start + i, Color::from_packed(*c)))
	}
}

/// Reads palette chunks until the `(0xFF, 0xFF)` terminator.
///
/// The cursor is left right after the terminator.
pub fn read_chunks(
	cursor: &mut ByteCursor<'_>,
	variant: ChunkVariant,
) -> Result<Vec<PaletteChunk>, ArFileError> {
	let mut chunks = Vec::new();

	loop {
		let start = cursor.read_byte()?;
		let count = cursor.read_byte()?;
		if start == 0xFF && count == 0xFF {
			break;
		}
		if variant == ChunkVariant::Video && start == 0x00 && count == 0x01 {
			cursor.skip(3)?;
			continue;
		}

		let count = match (variant, count) {
			(ChunkVariant::Video, 0) => PALETTE_SIZE,
			(_, n) => usize::from(n),
		};
		let start = usize::from(start);
		let kept = count.min(PALETTE_SIZE.saturating_sub(start));

		let mut colors = Vec::with_capacity(kept);
		for i in 0..count {
			let [r, g, b] = cursor.read_array()?;
			if i < kept {
				colors.push(pack_vga(r, g, b));
			}
		}
		trace!("palette chunk: start {start}, {count} entries, {kept} kept");

		chunks.push(PaletteChunk::new(start as u16, colors));
	}

	Ok(chunks)
}

/// A full 256-colour palette owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	colors: [Color; PALETTE_SIZE],
}

impl Palette {
	/// Creates a new palette with all colors set to transparent black.
	pub fn new() -> Self {
		Self {
			colors: [Color::transparent(); PALETTE_SIZE],
		}
	}

	/// Creates a grayscale palette, useful to preview sprites without their
	/// scene palette.
	pub fn grayscale() -> Self {
		let mut palette = Self::new();
		for (i, color) in palette.colors.iter_mut().enumerate() {
			let v = i as u8;
			*color = Color::rgb(v, v, v);
		}
		palette
	}

	/// Gets a color by index.
	#[inline]
	pub fn get(&self, index: u8) -> Color {
		self.colors[usize::from(index)]
	}

	/// Sets a color at the specified index.
	#[inline]
	pub fn set(&mut self, index: u8, color: Color) {
		self.colors[usize::from(index)] = color;
	}

	/// Returns a reference to the color array.
	#[inline]
	pub fn colors(&self) -> &[Color; PALETTE_SIZE] {
		&self.colors
	}

	/// Writes one chunk into the palette.
	pub fn apply_chunk(&mut self, chunk: &PaletteChunk) {
		for (index, color) in chunk.iter() {
			if let Some(slot) = self.colors.get_mut(index) {
				*slot = color;
			}
		}
	}

	/// Writes every chunk in order.
	pub fn apply_chunks<'a>(&mut self, chunks: impl IntoIterator<Item = &'a PaletteChunk>) {
		for chunk in chunks {
			self.apply_chunk(chunk);
		}
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::new()
	}
}

impl std::ops::Index<u8> for Palette {
	type Output = Color;

	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[usize::from(index)]
	}
}

impl std::ops::IndexMut<u8> for Palette {
	fn index_mut(&mut self, index: u8) -> &mut Self::Output {
		&mut self.colors[usize::from(index)]
	}
}
