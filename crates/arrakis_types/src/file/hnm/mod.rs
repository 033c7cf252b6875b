//! `.HNM` video support.
//!
//! # File Structure
//!
//! ```text
//! +0x00        u16     header size
//! +0x02        ...     palette chunk run (video variant), 0xFF padding
//! ...          u32[]   superchunk offsets relative to the header size
//! header size  ...     superchunks until the end of the file
//! ```
//!
//! Each superchunk starts with a `u16` size that counts its own two bytes and
//! holds tagged sub-blocks:
//!
//! | Tag          | Content                                         |
//! |--------------|-------------------------------------------------|
//! | `pl`         | Palette chunk run                               |
//! | `sd`         | Sound samples                                   |
//! | `mm` `kl` `pt` | Skipped                                      |
//! | other        | Video block, always the last item               |
//!
//! Tagged sub-blocks are `tag: [u8; 2], size: u16` followed by the payload,
//! `size` counting the 4-byte header.
//!
//! # Usage Examples
//!
//! ```no_run
//! use arrakis_types::file::hnm::File;
//! use arrakis_types::file::palette::Palette;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let video = File::open("CRYO.HNM")?;
//! let mut palette = Palette::new();
//! palette.apply_chunks(video.header().palette());
//!
//! for frame in video.frames() {
//!     if let Some(chunks) = &frame.palette {
//!         palette.apply_chunks(chunks);
//!     }
//!     if let Some(block) = &frame.video {
//!         println!("{block}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::{fmt, io::Read, path::Path};

use log::{debug, trace};

use crate::file::{
	ArFileError, FileType,
	cursor::ByteCursor,
	hsq::Container,
	palette::{ChunkVariant, PaletteChunk, read_chunks},
};

pub mod frame;

pub use frame::{VideoBlock, VideoBlockHeader, VideoFrame};

/// Known sub-block tags.
pub mod tags {
	/// Palette update
	pub const PALETTE: [u8; 2] = *b"pl";
	/// Sound samples
	pub const SOUND: [u8; 2] = *b"sd";
	/// Skipped sub-blocks
	pub const SKIPPED: [[u8; 2]; 3] = [*b"mm", *b"kl", *b"pt"];
}

/// Size of a tagged sub-block header
const SUB_BLOCK_HEADER_SIZE: usize = 4;

/// HNM header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoHeader {
	header_size: u16,
	palette: Vec<PaletteChunk>,
	toc: Vec<u32>,
}

impl VideoHeader {
	fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, ArFileError> {
		let header_size = cursor.read_u16_le()?;
		let palette = read_chunks(cursor, ChunkVariant::Video)?;

		while cursor.peek_byte().is_ok_and(|b| b == 0xFF) {
			cursor.skip(1)?;
		}

		let end = usize::from(header_size);
		if end < cursor.position() {
			return Err(ArFileError::invalid_chunk(
				FileType::Hnm,
				0,
				format!("header size {end} ends inside the palette, which runs to {}", cursor.position()),
			));
		}

		let mut toc = Vec::new();
		while cursor.position() + 4 <= end {
			toc.push(cursor.read_u32_le()?);
		}
		cursor.seek(end)?;

		Ok(Self {
			header_size,
			palette,
			toc,
		})
	}

	/// Offset of the first superchunk.
	pub fn header_size(&self) -> u16 {
		self.header_size
	}

	/// Initial palette chunks.
	pub fn palette(&self) -> &[PaletteChunk] {
		&self.palette
	}

	/// Superchunk offsets, relative to [`VideoHeader::header_size`].
	pub fn toc(&self) -> &[u32] {
		&self.toc
	}
}

/// Decoded HNM video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	header: VideoHeader,
	frames: Vec<VideoFrame>,
}

impl File {
	/// Opens and decodes a video.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, ArFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Decodes a video from any reader.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, ArFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Decodes a video, unpacking the HSQ container first if there is one.
	pub fn from_bytes(data: &[u8]) -> Result<Self, ArFileError> {
		let container = Container::load(data)?;
		Self::from_unpacked(container.data())
	}

	/// Decodes an unpacked video.
	pub fn from_unpacked(data: &[u8]) -> Result<Self, ArFileError> {
		let mut cursor = ByteCursor::new(data);
		let header = VideoHeader::read(&mut cursor)?;

		let mut frames = Vec::new();
		while !cursor.is_eof() {
			frames.push(Self::read_superchunk(&mut cursor)?);
		}
		debug!(
			"HNM: {} initial palette chunks, {} toc entries, {} frames",
			header.palette.len(),
			header.toc.len(),
			frames.len()
		);

		Ok(Self {
			header,
			frames,
		})
	}

	fn read_superchunk(cursor: &mut ByteCursor<'_>) -> Result<VideoFrame, ArFileError> {
		let start = cursor.position();
		let size = usize::from(cursor.read_u16_le()?);
		let end = start + size;
		if size < 2 || end > cursor.size() {
			return Err(ArFileError::invalid_chunk(
				FileType::Hnm,
				start,
				format!("superchunk of {size} bytes, {} bytes left", cursor.size() - start),
			));
		}

		let mut chunk = cursor.sub_cursor(start + 2, end)?;
		let mut frame = VideoFrame::default();

		while !chunk.is_eof() {
			let tag = chunk.peek_bytes(2).ok().and_then(|t| <[u8; 2]>::try_from(t).ok());
			let is_tagged = tag.is_some_and(|t| {
				t == tags::PALETTE || t == tags::SOUND || tags::SKIPPED.contains(&t)
			});
			if !is_tagged {
				frame.video = VideoBlock::read(&mut chunk)?;
				break;
			}

			let block_start = chunk.position();
			let tag = chunk.read_array::<2>()?;
			let block_size = usize::from(chunk.read_u16_le()?);
			let block_end = block_start + block_size;
			if block_size < SUB_BLOCK_HEADER_SIZE || block_end > end {
				return Err(ArFileError::invalid_chunk(
					FileType::Hnm,
					block_start,
					format!("sub-block {} of {block_size} bytes", String::from_utf8_lossy(&tag)),
				));
			}
			trace!("HNM: {} sub-block, {block_size} bytes", String::from_utf8_lossy(&tag));

			match tag {
				tags::PALETTE => {
					let mut palette_cursor = chunk.sub_cursor(chunk.position(), block_end)?;
					let chunks = read_chunks(&mut palette_cursor, ChunkVariant::Video)?;
					frame.palette.get_or_insert_with(Vec::new).extend(chunks);
				}
				tags::SOUND => {
					let samples = chunk.peek_bytes(block_size - SUB_BLOCK_HEADER_SIZE)?;
					frame.sound.get_or_insert_with(Vec::new).extend_from_slice(samples);
				}
				_ => {}
			}
			chunk.seek(block_end)?;
		}

		cursor.seek(end)?;
		Ok(frame)
	}

	/// The file header.
	pub fn header(&self) -> &VideoHeader {
		&self.header
	}

	/// Number of frames.
	pub fn frame_count(&self) -> usize {
		self.frames.len()
	}

	/// Returns a frame by index.
	pub fn frame(&self, index: usize) -> Option<&VideoFrame> {
		self.frames.get(index)
	}

	/// All frames, in display order.
	pub fn frames(&self) -> &[VideoFrame] {
		&self.frames
	}
}

impl fmt::Display for File {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"HNM File: header size {}, {} frames",
			self.header.header_size,
			self.frames.len()
		)
	}
}

#[cfg(test)]
mod tests;
