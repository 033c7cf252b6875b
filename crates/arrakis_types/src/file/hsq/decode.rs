//! HSQ LZ77 Decompression
//!
//! ## Overview
//!
//! HSQ is the LZ77-style compression used for almost every resource of the game,
//! and for the pixel payload of compressed HNM video blocks. Compressed data is
//! an interleaving of 16-bit flag words and payload bytes, decoded in a single
//! forward pass.
//!
//! ## Bit Queue
//!
//! Flags are consumed LSB first from a 16-bit queue. When the queue runs empty a
//! little-endian word is read from the input, its low bit is returned as the
//! current flag and the queue is re-armed with `0x8000 | (word >> 1)`. The top
//! bit acts as a sentinel: when only the sentinel is left, the queue reads as
//! empty after the next shift.
//!
//! ## Opcodes
//!
//! | Flags | Operation                                                         |
//! |-------|-------------------------------------------------------------------|
//! | `1`   | Copy one literal byte                                             |
//! | `01`  | Long match: 13-bit offset and 3-bit count packed in two bytes     |
//! | `00`  | Short match: 2-bit count from the flags, 8-bit offset from a byte |
//!
//! ### Long match
//!
//! ```text
//! b0 = o4 o3 o2 o1 o0 c2 c1 c0
//! b1 = o12 .. o5
//! count  = b0 & 7            (0 => read count byte, 0 there ends the stream)
//! offset = ((b0 >> 3) | (b1 << 5)) - 0x2000
//! count += 2
//! ```
//!
//! ### Short match
//!
//! ```text
//! count  = 2 * flag + flag
//! offset = byte - 256
//! count += 2
//! ```
//!
//! Matches copy byte by byte from `output.len() + offset`, so a match may read
//! bytes it has just produced. A distance of one repeats the previous byte.

use log::trace;

use crate::file::ArFileError;
use crate::file::cursor::ByteCursor;

/// State of a single decompression pass
#[derive(Debug)]
struct DecompressorState<'a> {
	input: ByteCursor<'a>,
	output: Vec<u8>,
	bit_queue: u16,
}

impl<'a> DecompressorState<'a> {
	fn new(input: &'a [u8], size_hint: usize) -> Self {
		Self {
			input: ByteCursor::new(input),
			output: Vec::with_capacity(size_hint),
			bit_queue: 0,
		}
	}

	/// Pops the next flag bit, refilling the queue from the input when empty.
	fn next_bit(&mut self) -> Result<u16, ArFileError> {
		let mut bit = self.bit_queue & 1;
		self.bit_queue >>= 1;
		if self.bit_queue == 0 {
			let word = self.input.read_u16_le()?;
			bit = word & 1;
			self.bit_queue = 0x8000 | (word >> 1);
		}
		Ok(bit)
	}

	/// Copies `count` bytes starting `offset` bytes behind the write position.
	fn copy_match(&mut self, offset: isize, count: usize) -> Result<(), ArFileError> {
		let length = self.output.len();
		let Some(start) = length.checked_add_signed(offset) else {
			return Err(ArFileError::out_of_range(
				self.input.position(),
				offset.unsigned_abs(),
				length,
			));
		};

		// byte by byte: the source may overlap the bytes being produced
		for i in 0..count {
			let value = self.output[start + i];
			self.output.push(value);
		}
		Ok(())
	}

	fn run(mut self) -> Result<Vec<u8>, ArFileError> {
		while !self.input.is_eof() {
			if self.next_bit()? == 1 {
				let literal = self.input.read_byte()?;
				self.output.push(literal);
				continue;
			}

			let (offset, count) = if self.next_bit()? == 1 {
				let b0 = self.input.read_byte()?;
				let b1 = self.input.read_byte()?;
				let mut count = usize::from(b0 & 0x07);
				let offset = ((usize::from(b0) >> 3) | (usize::from(b1) << 5)) as isize - 0x2000;
				if count == 0 {
					count = usize::from(self.input.read_byte()?);
					if count == 0 {
						trace!("HSQ end marker at input offset {}", self.input.position());
						break;
					}
				}
				(offset, count + 2)
			} else {
				let high = self.next_bit()?;
				let low = self.next_bit()?;
				let count = usize::from(2 * high + low);
				let offset = isize::from(self.input.read_byte()?) - 256;
				(offset, count + 2)
			};

			self.copy_match(offset, count)?;
		}

		Ok(self.output)
	}
}

/// Decompresses an HSQ bitstream (the bytes following the 6-byte header).
///
/// Decoding stops at the explicit end marker or when the input is exhausted.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, ArFileError> {
	decompress_with_hint(input, input.len() * 2)
}

/// Decompresses an HSQ bitstream, preallocating `size_hint` output bytes.
pub fn decompress_with_hint(input: &[u8], size_hint: usize) -> Result<Vec<u8>, ArFileError> {
	DecompressorState::new(input, size_hint).run()
}
