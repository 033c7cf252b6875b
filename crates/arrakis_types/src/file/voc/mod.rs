//! Creative Voice (`.VOC`) sound support.
//!
//! The game stores its digitized speech and sound effects as Creative Voice
//! files, most of them packed in HSQ containers.
//!
//! # File Structure
//!
//! | Offset | Size | Description                               |
//! |--------|------|-------------------------------------------|
//! | 0x00   | 20   | `"Creative Voice File\x1A"`               |
//! | 0x14   | 2    | Header size, always 26                    |
//! | 0x16   | 2    | Version, `0x010A` or `0x0114`             |
//! | 0x18   | 2    | Checksum, `(!version + 0x1234) & 0xFFFF`  |
//!
//! The header is followed by a stream of blocks, each starting with a type byte
//! and, except for the terminator, a 24-bit little-endian payload size.
//!
//! # Examples
//!
//! ```no_run
//! use arrakis_types::file::voc::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let voc = File::open("VOICE.HSQ")?;
//!
//! for (index, chunk) in voc.to_pcm()?.into_iter().enumerate() {
//!     match chunk {
//!         Ok(chunk) => chunk.save_wav(format!("voice_{index:02}.wav"))?,
//!         Err(err) => eprintln!("chunk {index}: {err}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod constants;
mod pcm;
mod types;


use std::{fmt, io::Read, path::Path};

use log::{debug, trace, warn};

use crate::file::{ArFileError, FileType, cursor::ByteCursor, hsq::Container};

pub use constants::{
	CHECKSUM_SALT, HEADER_SIZE, MAX_EXPANDED_BYTES, SIGNATURE, VERSIONS, block_type,
};
pub use pcm::to_pcm;
pub use types::{Codec, PcmChunk, SoundBlock, sample_rate};

/// Computes the header checksum expected for `version`.
pub fn header_checksum(version: u16) -> u16 {
	(!version).wrapping_add(CHECKSUM_SALT)
}

/// Decoded VOC file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	version: u16,
	blocks: Vec<SoundBlock>,
}

impl File {
	/// Opens and decodes a sound file.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, ArFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Decodes a sound file from any reader.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, ArFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Decodes a sound file, unpacking the HSQ container first if there is one.
	pub fn from_bytes(data: &[u8]) -> Result<Self, ArFileError> {
		let container = Container::load(data)?;
		Self::from_unpacked(container.data())
	}

	/// Decodes an unpacked sound file.
	pub fn from_unpacked(data: &[u8]) -> Result<Self, ArFileError> {
		let mut cursor = ByteCursor::new(data);
		let version = Self::read_header(&mut cursor)?;

		let mut blocks = Vec::new();
		loop {
			if cursor.is_eof() {
				warn!("VOC: block stream ends without a terminator");
				break;
			}
			let block = Self::read_block(&mut cursor)?;
			let done = block == SoundBlock::Terminate;
			trace!("VOC: {block}");
			blocks.push(block);
			if done {
				break;
			}
		}
		debug!("VOC: version {version:#06X}, {} blocks", blocks.len());

		Ok(Self {
			version,
			blocks,
		})
	}

	fn read_header(cursor: &mut ByteCursor<'_>) -> Result<u16, ArFileError> {
		let signature = cursor.peek_bytes(SIGNATURE.len()).unwrap_or(cursor.rest());
		if signature != SIGNATURE {
			return Err(ArFileError::InvalidSignature {
				file_type: FileType::Voc,
				actual: signature.to_vec(),
			});
		}
		cursor.skip(SIGNATURE.len())?;

		let header_size = cursor.read_u16_le()?;
		if header_size != HEADER_SIZE {
			return Err(ArFileError::InvalidHeaderSize {
				file_type: FileType::Voc,
				expected: HEADER_SIZE,
				actual: header_size,
			});
		}

		let version = cursor.read_u16_le()?;
		if !VERSIONS.contains(&version) {
			return Err(ArFileError::UnsupportedVersion {
				file_type: FileType::Voc,
				version,
			});
		}

		let checksum = cursor.read_u16_le()?;
		let expected = header_checksum(version);
		if checksum != expected {
			return Err(ArFileError::InvalidChecksum {
				file_type: FileType::Voc,
				expected,
				actual: checksum,
			});
		}

		cursor.seek(usize::from(header_size))?;
		Ok(version)
	}

	fn read_block(cursor: &mut ByteCursor<'_>) -> Result<SoundBlock, ArFileError> {
		let kind = cursor.read_byte()?;
		if kind == block_type::TERMINATOR {
			return Ok(SoundBlock::Terminate);
		}

		let size = cursor.read_u24_le()? as usize;
		let start = cursor.position();
		let mut payload = ByteCursor::new(cursor.read_bytes(size)?);

		let block = match kind {
			block_type::SOUND_DATA | block_type::SOUND_CONTINUE => {
				let sample_rate = sample_rate(payload.read_byte()?);
				let codec = Codec::from_byte(payload.read_byte()?);
				SoundBlock::SoundData {
					codec,
					sample_rate,
					bytes: payload.rest().to_vec(),
				}
			}
			block_type::SILENCE => {
				let length = payload.read_u16_le()?;
				let sample_rate = sample_rate(payload.read_byte()?);
				SoundBlock::Silence {
					codec: Codec::Pcm8Unsigned,
					sample_rate,
					length,
				}
			}
			block_type::MARKER => SoundBlock::Marker {
				bytes: payload.read_array()?,
			},
			block_type::STRING => {
				let (text, _, had_errors) = encoding_rs::WINDOWS_1252.decode(payload.rest());
				if had_errors {
					warn!("VOC: string block at {start:#X} has invalid characters");
				}
				// one byte past the declared size belongs to the block
				if !cursor.is_eof() {
					cursor.skip(1)?;
				}
				SoundBlock::StringBlock {
					text: text.trim_end_matches('\0').to_string(),
				}
			}
			block_type::REPEAT_START => SoundBlock::RepeatStart {
				count: payload.read_u16_le()?,
			},
			block_type::REPEAT_END => SoundBlock::RepeatEnd,
			kind => {
				debug!("VOC: skipping unknown block {kind:#04X} of {size} bytes at {start:#X}");
				SoundBlock::Unknown {
					kind,
					bytes: payload.rest().to_vec(),
				}
			}
		};

		Ok(block)
	}

	/// Format version.
	pub fn version(&self) -> u16 {
		self.version
	}

	/// Blocks in file order, repeats not expanded.
	pub fn blocks(&self) -> &[SoundBlock] {
		&self.blocks
	}

	/// Expands the block stream into playable chunks.
	///
	/// A data block with an unknown codec yields an error in its slot and does
	/// not stop the conversion. Repeat sections expanding past
	/// [`MAX_EXPANDED_BYTES`] fail the whole conversion.
	pub fn to_pcm(&self) -> Result<Vec<Result<PcmChunk, ArFileError>>, ArFileError> {
		to_pcm(&self.blocks)
	}
}

impl fmt::Display for File {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "VOC File: version {:#06X}, {} blocks", self.version, self.blocks.len())
	}
}
