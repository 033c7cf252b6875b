//! Error types for file format parsing.

use std::fmt::Display;

use thiserror::Error;

/// Asset family an error was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// HSQ compressed container
	Hsq,
	/// Palette chunk runs
	Pal,
	/// Sprite sheet
	Spr,
	/// HNM video
	Hnm,
	/// Creative Voice sound
	Voc,
}

impl Display for FileType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Hsq => write!(f, "HSQ"),
			Self::Pal => write!(f, "PAL"),
			Self::Spr => write!(f, "SPR"),
			Self::Hnm => write!(f, "HNM"),
			Self::Voc => write!(f, "VOC"),
		}
	}
}

/// Unified error type for every decoder in this crate.
///
/// Only [`ArFileError::OutOfRange`], [`ArFileError::FileSizeMismatch`],
/// [`ArFileError::ExpansionLimit`] and the VOC header errors abort a whole
/// asset. The remaining variants are reported for a single block or table and
/// the decoders recover from them.
#[derive(Debug, Error)]
pub enum ArFileError {
	/// A read went past the end of the buffer
	#[error("Out of range read at offset {offset}: requested {requested} bytes, size is {size}")]
	OutOfRange {
		/// Offset the read started at
		offset: usize,
		/// Number of bytes requested
		requested: usize,
		/// Total size of the buffer
		size: usize,
	},

	/// The compressed size stored in the HSQ header does not match the file length
	#[error("{file_type} file size mismatch: header says {expected} bytes, file has {actual}")]
	FileSizeMismatch {
		/// File type being decoded
		file_type: FileType,
		/// Size stored in the header
		expected: usize,
		/// Real file length
		actual: usize,
	},

	/// HSQ header checksum is not 171, the payload is treated as raw
	#[error("HSQ header checksum mismatch: sum is {actual:#04X}, expected 0xAB")]
	HeaderChecksumMismatch {
		/// Computed checksum
		actual: u8,
	},

	/// The sprite animation table could not be parsed
	#[error("Malformed animation header: {message}")]
	MalformedAnimationHeader {
		/// Description of the problem
		message: String,
	},

	/// The sound codec cannot be converted to playable PCM
	#[error("Unsupported sound codec: {0:#04X}")]
	UnsupportedCodec(u8),

	/// The VOC signature is missing
	#[error("Invalid {file_type} signature: {actual:02X?}")]
	InvalidSignature {
		/// File type being decoded
		file_type: FileType,
		/// Bytes found where the signature was expected
		actual: Vec<u8>,
	},

	/// The VOC header size field is not 26
	#[error("Invalid {file_type} header size: expected {expected}, got {actual}")]
	InvalidHeaderSize {
		/// File type being decoded
		file_type: FileType,
		/// Expected header size
		expected: u16,
		/// Header size found
		actual: u16,
	},

	/// The VOC version is not one of the known versions
	#[error("Unsupported {file_type} version: {version:#06X}")]
	UnsupportedVersion {
		/// File type being decoded
		file_type: FileType,
		/// Version found in the header
		version: u16,
	},

	/// The VOC header checksum does not match the version field
	#[error("Invalid {file_type} checksum: expected {expected:#06X}, got {actual:#06X}")]
	InvalidChecksum {
		/// File type being decoded
		file_type: FileType,
		/// Checksum derived from the version
		expected: u16,
		/// Checksum stored in the header
		actual: u16,
	},

	/// A sized chunk declares a size that cannot be honoured
	#[error("Invalid {file_type} chunk at offset {offset}: {message}")]
	InvalidChunk {
		/// File type being decoded
		file_type: FileType,
		/// Offset of the chunk
		offset: usize,
		/// Description of the problem
		message: String,
	},

	/// Repeated sections expand past the allowed output size
	#[error("{file_type} repeat sections expand past {limit} bytes")]
	ExpansionLimit {
		/// File type being decoded
		file_type: FileType,
		/// Maximum output size
		limit: usize,
	},

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// WAV export error
	#[error(transparent)]
	Wav(#[from] hound::Error),
}

impl ArFileError {
	/// Creates an [`ArFileError::OutOfRange`] error.
	pub fn out_of_range(offset: usize, requested: usize, size: usize) -> Self {
		Self::OutOfRange {
			offset,
			requested,
			size,
		}
	}

	/// Creates an [`ArFileError::MalformedAnimationHeader`] error.
	pub fn malformed_animation(message: impl Into<String>) -> Self {
		Self::MalformedAnimationHeader {
			message: message.into(),
		}
	}

	/// Creates an [`ArFileError::InvalidChunk`] error.
	pub fn invalid_chunk(file_type: FileType, offset: usize, message: impl Into<String>) -> Self {
		Self::InvalidChunk {
			file_type,
			offset,
			message: message.into(),
		}
	}

	/// Returns `true` if decoding of the asset can continue after this error.
	pub fn is_recoverable(&self) -> bool {
		matches!(
			self,
			Self::HeaderChecksumMismatch { .. }
				| Self::MalformedAnimationHeader { .. }
				| Self::UnsupportedCodec(_)
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_recoverable_errors() {
		assert!(
			ArFileError::HeaderChecksumMismatch {
				actual: 0
			}
			.is_recoverable()
		);
		assert!(ArFileError::malformed_animation("bad").is_recoverable());
		assert!(ArFileError::UnsupportedCodec(5).is_recoverable());
		assert!(!ArFileError::out_of_range(10, 2, 11).is_recoverable());
	}

	#[test]
	fn test_display() {
		let err = ArFileError::InvalidChecksum {
			file_type: FileType::Voc,
			expected: 0x1129,
			actual: 0x0000,
		};
		assert_eq!(err.to_string(), "Invalid VOC checksum: expected 0x1129, got 0x0000");
	}
}
