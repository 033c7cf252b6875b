//! `.HSQ` compressed container support.
//!
//! Almost every resource of the game is stored in an HSQ container: a 6-byte
//! header followed by an LZ77-style bitstream. Whether a file is compressed is
//! not flagged anywhere; the loader decides from the header checksum alone.
//!
//! # Header Layout
//!
//! | Offset | Size | Description                                 |
//! |--------|------|---------------------------------------------|
//! | 0x00   | 2    | Uncompressed size (LE)                      |
//! | 0x02   | 1    | Always zero                                 |
//! | 0x03   | 2    | Compressed size, header included (LE)       |
//! | 0x05   | 1    | Salt, picked so that the byte sum is `0xAB` |
//!
//! A header whose six bytes do not sum to `0xAB` (mod 256) means the file is
//! not compressed at all and its bytes are used as they are.

mod decode;


use std::{fmt::Display, io::Read, path::Path};

use log::{debug, warn};

use crate::file::{ArFileError, FileType, cursor::ByteCursor};

pub use decode::{decompress, decompress_with_hint};

/// Constants of the HSQ container
pub mod constants {
	/// Size of the container header in bytes
	pub const HEADER_SIZE: usize = 6;

	/// Expected byte sum of a compressed file's header
	pub const HEADER_CHECKSUM: u8 = 0xAB;
}

/// How a container should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadMode {
	/// Validate the header checksum and decompress when it matches
	#[default]
	Auto,

	/// Known uncompressed file: skip the header check entirely
	Raw,
}

/// HSQ container header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
	raw: [u8; constants::HEADER_SIZE],
}

impl Header {
	/// Size of the header in bytes
	pub const SIZE: usize = constants::HEADER_SIZE;

	/// Creates a header for a compressed payload, choosing the salt byte so that
	/// the checksum validates.
	///
	/// `compressed_size` counts the header itself.
	pub fn new(uncompressed_size: u16, compressed_size: u16) -> Self {
		let [u0, u1] = uncompressed_size.to_le_bytes();
		let [c0, c1] = compressed_size.to_le_bytes();
		let sum = [u0, u1, c0, c1].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
		let salt = constants::HEADER_CHECKSUM.wrapping_sub(sum);

		Self {
			raw: [u0, u1, 0, c0, c1, salt],
		}
	}

	/// Reads a header from the first six bytes of `data`.
	pub fn from_bytes(data: &[u8]) -> Result<Self, ArFileError> {
		let mut cursor = ByteCursor::new(data);
		Ok(Self {
			raw: cursor.read_array()?,
		})
	}

	/// Reads a header from any reader.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, ArFileError> {
		let mut raw = [0u8; constants::HEADER_SIZE];
		reader.read_exact(&mut raw)?;
		Ok(Self {
			raw,
		})
	}

	/// Returns the raw header bytes.
	pub fn to_bytes(&self) -> [u8; constants::HEADER_SIZE] {
		self.raw
	}

	/// Size of the payload once decompressed.
	pub fn uncompressed_size(&self) -> u16 {
		u16::from_le_bytes([self.raw[0], self.raw[1]])
	}

	/// Size of the whole compressed file, header included.
	pub fn compressed_size(&self) -> u16 {
		u16::from_le_bytes([self.raw[3], self.raw[4]])
	}

	/// The byte between the two sizes, zero in every compressed file.
	pub fn reserved(&self) -> u8 {
		self.raw[2]
	}

	/// Salt byte completing the checksum.
	pub fn salt(&self) -> u8 {
		self.raw[5]
	}

	/// Sum of the six header bytes, modulo 256.
	pub fn checksum(&self) -> u8 {
		self.raw.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
	}

	/// Returns `true` if the checksum marks the file as compressed.
	pub fn is_compressed(&self) -> bool {
		self.checksum() == constants::HEADER_CHECKSUM
	}

	/// Checks the header checksum.
	pub fn validate(&self) -> Result<(), ArFileError> {
		if self.is_compressed() {
			Ok(())
		} else {
			Err(ArFileError::HeaderChecksumMismatch {
				actual: self.checksum(),
			})
		}
	}
}

impl Display for Header {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"HSQ Header:\n\
			- Uncompressed Size: {} bytes\n\
			- Compressed Size: {} bytes\n\
			- Salt: {:#04X}\n\
			- Checksum: {:#04X} ({})",
			self.uncompressed_size(),
			self.compressed_size(),
			self.salt(),
			self.checksum(),
			if self.is_compressed() {
				"compressed"
			} else {
				"raw"
			},
		)
	}
}

/// A loaded container: the header (when there is one) and the usable payload.
#[derive(Debug, Clone)]
pub struct Container {
	header: Option<Header>,
	compressed: bool,
	data: Vec<u8>,
}

impl Container {
	/// Loads a container, decompressing it when the header checksum validates.
	pub fn load(data: &[u8]) -> Result<Self, ArFileError> {
		Self::load_with(data, LoadMode::Auto)
	}

	/// Loads a container with an explicit [`LoadMode`].
	pub fn load_with(data: &[u8], mode: LoadMode) -> Result<Self, ArFileError> {
		if mode == LoadMode::Raw || data.len() < constants::HEADER_SIZE {
			return Ok(Self::raw(data, None));
		}

		let header = Header::from_bytes(data)?;
		if let Err(err) = header.validate() {
			warn!("{err}, using {} bytes as raw data", data.len());
			return Ok(Self::raw(data, Some(header)));
		}

		let expected = usize::from(header.compressed_size());
		if expected != data.len() {
			return Err(ArFileError::FileSizeMismatch {
				file_type: FileType::Hsq,
				expected,
				actual: data.len(),
			});
		}

		let uncompressed = usize::from(header.uncompressed_size());
		let mut output = decompress_with_hint(&data[constants::HEADER_SIZE..], uncompressed)?;
		if output.len() > uncompressed {
			output.truncate(uncompressed);
		} else if output.len() < uncompressed {
			warn!(
				"HSQ payload decompressed to {} bytes, header promises {uncompressed}",
				output.len()
			);
		}
		debug!("HSQ: {} -> {} bytes", data.len(), output.len());

		Ok(Self {
			header: Some(header),
			compressed: true,
			data: output,
		})
	}

	fn raw(data: &[u8], header: Option<Header>) -> Self {
		Self {
			header,
			compressed: false,
			data: data.to_vec(),
		}
	}

	/// Opens and loads a container from a path.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, ArFileError> {
		Self::open_with(path, LoadMode::Auto)
	}

	/// Opens a container from a path with an explicit [`LoadMode`].
	pub fn open_with(path: impl AsRef<Path>, mode: LoadMode) -> Result<Self, ArFileError> {
		let data = std::fs::read(path)?;
		Self::load_with(&data, mode)
	}

	/// Loads a container from any reader.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, ArFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::load(&data)
	}

	/// The header, if the file was long enough to carry one and was not loaded
	/// in [`LoadMode::Raw`].
	pub fn header(&self) -> Option<&Header> {
		self.header.as_ref()
	}

	/// Returns `true` if the payload was decompressed.
	pub fn is_compressed(&self) -> bool {
		self.compressed
	}

	/// The usable payload.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Consumes the container and returns the payload.
	pub fn into_data(self) -> Vec<u8> {
		self.data
	}

	/// A fresh cursor over the payload.
	pub fn cursor(&self) -> ByteCursor<'_> {
		ByteCursor::new(&self.data)
	}
}
