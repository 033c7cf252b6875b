//! Sprite sheet support.
//!
//! A sprite sheet is usually stored inside an HSQ container. Once unpacked it
//! is laid out as follows:
//!
//! ```text
//! +0x00  u16    offset of the frame table
//! +0x02  ...    palette chunk run, up to the frame table
//! table  u16[]  frame offsets relative to the table, table[0] / 2 = count
//! ...           frames: 4-byte header then 4-bit pixels
//! ...           u16 0x0000 then an optional animation section
//! ```
//!
//! # Usage Examples
//!
//! ```no_run
//! use arrakis_types::file::spr::File;
//! use arrakis_types::file::palette::Palette;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sprite = File::open("ORNY.HSQ")?;
//!
//! let mut palette = Palette::grayscale();
//! sprite.apply_palette(&mut palette);
//!
//! for (index, frame) in sprite.frames().iter().enumerate() {
//!     println!("Frame #{index}: {frame}");
//! }
//! # Ok(())
//! # }
//! ```

use std::{fmt, path::Path};

use log::{debug, warn};

use crate::{
	config::AssetConfig,
	file::{
		ArFileError,
		cursor::ByteCursor,
		hsq::Container,
		palette::{ChunkVariant, Palette, PaletteChunk, read_chunks},
	},
};

pub mod animation;
pub mod frame;

pub use animation::{
	AnimationDialect, AnimationFrame, ImageGroup, ImagePlacement, SpriteAnimation,
};
pub use frame::Frame;

/// Offset of the embedded palette run
const PALETTE_OFFSET: usize = 2;

/// Decoded sprite sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	palette: Vec<PaletteChunk>,
	frames: Vec<Frame>,
	animations: Vec<SpriteAnimation>,
}

impl File {
	/// Opens a sprite sheet, picking the animation dialect from the built-in
	/// [`AssetConfig`].
	pub fn open(path: impl AsRef<Path>) -> Result<Self, ArFileError> {
		Self::open_with_config(path, &AssetConfig::default())
	}

	/// Opens a sprite sheet using the load mode and animation dialect that
	/// `config` assigns to its file name.
	pub fn open_with_config(
		path: impl AsRef<Path>,
		config: &AssetConfig,
	) -> Result<Self, ArFileError> {
		let path = path.as_ref();
		let container = Container::open_with(path, config.load_mode(path))?;
		Self::from_unpacked(container.data(), &config.dialect(path))
	}

	/// Decodes a sprite sheet, unpacking the HSQ container first.
	pub fn from_bytes(data: &[u8], dialect: &AnimationDialect) -> Result<Self, ArFileError> {
		let container = Container::load(data)?;
		Self::from_unpacked(container.data(), dialect)
	}

	/// Decodes an already unpacked sprite sheet.
	pub fn from_unpacked(data: &[u8], dialect: &AnimationDialect) -> Result<Self, ArFileError> {
		let mut cursor = ByteCursor::new(data);
		let table_offset = usize::from(cursor.read_u16_le()?);

		let palette = if table_offset > PALETTE_OFFSET {
			let mut palette_cursor = cursor.sub_cursor(PALETTE_OFFSET, table_offset)?;
			read_chunks(&mut palette_cursor, ChunkVariant::Sprite)?
		} else {
			Vec::new()
		};

		cursor.seek(table_offset)?;
		let declared = usize::from(cursor.peek_u16_le()? / 2);

		let mut frames = Vec::with_capacity(declared);
		let mut payload_end = None;
		for index in 0..declared {
			cursor.seek(table_offset + index * 2)?;
			let frame_offset = table_offset + usize::from(cursor.read_u16_le()?);

			cursor.seek(frame_offset)?;
			if cursor.peek_u16_le()? == 0 {
				debug!("SPR: frame table ends early at entry {index}");
				break;
			}
			frames.push(Frame::read(&mut cursor)?);
			payload_end = Some(cursor.position());
		}

		let animations = match payload_end {
			Some(end) => Self::read_animations(data, end, frames.len(), dialect),
			None => Vec::new(),
		};
		debug!(
			"SPR: {} palette chunks, {} frames, {} animations",
			palette.len(),
			frames.len(),
			animations.len()
		);

		Ok(Self {
			palette,
			frames,
			animations,
		})
	}

	/// Reads the animation section following the last frame. Never fails: any
	/// problem is logged and yields no animations.
	fn read_animations(
		data: &[u8],
		payload_end: usize,
		frame_count: usize,
		dialect: &AnimationDialect,
	) -> Vec<SpriteAnimation> {
		let mut cursor = ByteCursor::new(data);
		if cursor.seek(payload_end).is_err() || cursor.read_u16_le().ok() != Some(0) {
			return Vec::new();
		}
		if cursor.is_eof() {
			return Vec::new();
		}

		match animation::parse(data, cursor.position(), frame_count, dialect) {
			Ok(animations) => animations,
			Err(err) => {
				let err = match err {
					ArFileError::MalformedAnimationHeader {
						..
					} => err,
					other => ArFileError::malformed_animation(other.to_string()),
				};
				warn!("SPR: {err}, ignoring animations");
				Vec::new()
			}
		}
	}

	/// Number of decoded frames.
	pub fn frame_count(&self) -> usize {
		self.frames.len()
	}

	/// Returns a frame by index.
	pub fn frame(&self, index: usize) -> Option<&Frame> {
		self.frames.get(index)
	}

	/// All decoded frames.
	pub fn frames(&self) -> &[Frame] {
		&self.frames
	}

	/// Returns an animation by index.
	pub fn animation(&self, index: usize) -> Option<&SpriteAnimation> {
		self.animations.get(index)
	}

	/// All decoded animations.
	pub fn animations(&self) -> &[SpriteAnimation] {
		&self.animations
	}

	/// The embedded palette chunks.
	pub fn palette_chunks(&self) -> &[PaletteChunk] {
		&self.palette
	}

	/// Writes the embedded palette chunks into `palette`.
	pub fn apply_palette(&self, palette: &mut Palette) {
		palette.apply_chunks(&self.palette);
	}
}

impl fmt::Display for File {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"SPR File: {} frames, {} palette chunks, {} animations",
			self.frames.len(),
			self.palette.len(),
			self.animations.len()
		)
	}
}
