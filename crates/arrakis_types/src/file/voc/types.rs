//! Data type definitions for VOC files.

use std::{
	fmt::Display,
	io::{Seek, Write},
	path::Path,
};

use crate::file::ArFileError;

/// Sample encoding of a sound block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
	/// Unsigned 8-bit PCM
	Pcm8Unsigned,
	/// 4-bit Creative ADPCM
	Adpcm4,
	/// 3-bit Creative ADPCM
	Adpcm3,
	/// 2-bit Creative ADPCM
	Adpcm2,
	/// Signed 16-bit PCM
	Pcm16Signed,
	/// A-law
	ALaw,
	/// µ-law
	MuLaw,
	/// Any other codec byte
	Unknown(u8),
}

impl Codec {
	/// Maps a codec byte.
	pub fn from_byte(value: u8) -> Self {
		match value {
			0 => Self::Pcm8Unsigned,
			1 => Self::Adpcm4,
			2 => Self::Adpcm3,
			3 => Self::Adpcm2,
			4 => Self::Pcm16Signed,
			6 => Self::ALaw,
			7 => Self::MuLaw,
			other => Self::Unknown(other),
		}
	}

	/// The codec byte.
	pub fn to_byte(self) -> u8 {
		match self {
			Self::Pcm8Unsigned => 0,
			Self::Adpcm4 => 1,
			Self::Adpcm3 => 2,
			Self::Adpcm2 => 3,
			Self::Pcm16Signed => 4,
			Self::ALaw => 6,
			Self::MuLaw => 7,
			Self::Unknown(other) => other,
		}
	}
}

impl Display for Codec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Pcm8Unsigned => write!(f, "8-bit unsigned PCM"),
			Self::Adpcm4 => write!(f, "4-bit ADPCM"),
			Self::Adpcm3 => write!(f, "3-bit ADPCM"),
			Self::Adpcm2 => write!(f, "2-bit ADPCM"),
			Self::Pcm16Signed => write!(f, "16-bit signed PCM"),
			Self::ALaw => write!(f, "A-law"),
			Self::MuLaw => write!(f, "µ-law"),
			Self::Unknown(value) => write!(f, "unknown codec {value:#04X}"),
		}
	}
}

/// Computes the sample rate from a time constant byte.
pub fn sample_rate(divisor: u8) -> u32 {
	1_000_000 / (256 - u32::from(divisor))
}

/// One block of the sound stream, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundBlock {
	/// End of the stream
	Terminate,

	/// Encoded samples
	SoundData {
		/// Sample encoding
		codec: Codec,
		/// Sample rate in Hz
		sample_rate: u32,
		/// Encoded samples
		bytes: Vec<u8>,
	},

	/// A run of silence
	Silence {
		/// Sample encoding of the generated silence
		codec: Codec,
		/// Sample rate in Hz
		sample_rate: u32,
		/// Number of samples
		length: u16,
	},

	/// Synchronisation marker
	Marker {
		/// Marker value
		bytes: [u8; 2],
	},

	/// Text
	StringBlock {
		/// Decoded text
		text: String,
	},

	/// Start of a section played `count` times
	RepeatStart {
		/// Number of plays, `0xFFFF` loops forever
		count: u16,
	},

	/// End of the innermost repeated section
	RepeatEnd,

	/// Block of an unknown type, kept for inspection
	Unknown {
		/// Block type byte
		kind: u8,
		/// Block payload
		bytes: Vec<u8>,
	},
}

impl Display for SoundBlock {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Terminate => write!(f, "Terminate"),
			Self::SoundData {
				codec,
				sample_rate,
				bytes,
			} => write!(f, "Sound data: {} bytes, {codec}, {sample_rate} Hz", bytes.len()),
			Self::Silence {
				sample_rate,
				length,
				..
			} => write!(f, "Silence: {length} samples at {sample_rate} Hz"),
			Self::Marker {
				bytes,
			} => write!(f, "Marker: {:#06X}", u16::from_le_bytes(*bytes)),
			Self::StringBlock {
				text,
			} => write!(f, "String: {text:?}"),
			Self::RepeatStart {
				count,
			} => write!(f, "Repeat start: {count}"),
			Self::RepeatEnd => write!(f, "Repeat end"),
			Self::Unknown {
				kind,
				bytes,
			} => write!(f, "Unknown block {kind:#04X}: {} bytes", bytes.len()),
		}
	}
}

/// A unit of playable sound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PcmChunk {
	/// Sample encoding
	pub codec: Codec,
	/// Sample rate in Hz
	pub sample_rate: u32,
	/// Encoded samples
	pub bytes: Vec<u8>,
}

impl PcmChunk {
	/// Calculates the duration in milliseconds.
	pub fn duration_ms(&self) -> u64 {
		let samples = match self.codec {
			Codec::Pcm16Signed => self.bytes.len() / 2,
			_ => self.bytes.len(),
		};
		if self.sample_rate == 0 {
			return 0;
		}
		samples as u64 * 1000 / u64::from(self.sample_rate)
	}

	/// Writes the chunk as a mono WAV file.
	///
	/// Only 8-bit unsigned and 16-bit signed PCM can be written.
	pub fn write_wav<W: Write + Seek>(&self, writer: W) -> Result<(), ArFileError> {
		let bits_per_sample = match self.codec {
			Codec::Pcm8Unsigned => 8,
			Codec::Pcm16Signed => 16,
			other => return Err(ArFileError::UnsupportedCodec(other.to_byte())),
		};
		let spec = hound::WavSpec {
			channels: 1,
			sample_rate: self.sample_rate,
			bits_per_sample,
			sample_format: hound::SampleFormat::Int,
		};

		let mut wav_writer = hound::WavWriter::new(writer, spec)?;
		if bits_per_sample == 8 {
			for &sample in &self.bytes {
				// hound stores 8-bit samples as signed and flips them back on write
				wav_writer.write_sample((i16::from(sample) - 128) as i8)?;
			}
		} else {
			for pair in self.bytes.chunks_exact(2) {
				wav_writer.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
			}
		}
		wav_writer.finalize()?;

		Ok(())
	}

	/// Saves the chunk as a WAV file.
	pub fn save_wav(&self, path: impl AsRef<Path>) -> Result<(), ArFileError> {
		let file = std::io::BufWriter::new(std::fs::File::create(path)?);
		self.write_wav(file)
	}
}
