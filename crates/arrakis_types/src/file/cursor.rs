//! Bounds-checked read cursor shared by every decoder.
//!
//! Every read past the end of the buffer is an [`ArFileError::OutOfRange`]
//! error. Nothing is clamped or zero-filled: once a container has passed its
//! checksum the payload is assumed to be well formed, so an overrun means either
//! a corrupt asset or a decoder bug.

use crate::file::ArFileError;

/// Read cursor over an immutable byte buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
	buffer: &'a [u8],
	offset: usize,
}

impl<'a> ByteCursor<'a> {
	/// Creates a cursor positioned at the start of `buffer`.
	pub fn new(buffer: &'a [u8]) -> Self {
		Self {
			buffer,
			offset: 0,
		}
	}

	/// Current absolute position.
	#[inline]
	pub fn position(&self) -> usize {
		self.offset
	}

	/// Total size of the underlying buffer.
	#[inline]
	pub fn size(&self) -> usize {
		self.buffer.len()
	}

	/// Number of unread bytes.
	#[inline]
	pub fn remaining(&self) -> usize {
		self.buffer.len().saturating_sub(self.offset)
	}

	/// Returns `true` once every byte has been consumed.
	#[inline]
	pub fn is_eof(&self) -> bool {
		self.offset >= self.buffer.len()
	}

	/// The whole underlying buffer.
	pub fn buffer(&self) -> &'a [u8] {
		self.buffer
	}

	/// The unread tail of the buffer.
	pub fn rest(&self) -> &'a [u8] {
		&self.buffer[self.offset.min(self.buffer.len())..]
	}

	/// Moves to an absolute position. Seeking exactly to the end is allowed.
	pub fn seek(&mut self, pos: usize) -> Result<(), ArFileError> {
		if pos > self.buffer.len() {
			return Err(ArFileError::out_of_range(pos, 0, self.buffer.len()));
		}
		self.offset = pos;
		Ok(())
	}

	/// Advances the position by `n` bytes.
	pub fn skip(&mut self, n: usize) -> Result<(), ArFileError> {
		self.ensure(n)?;
		self.offset += n;
		Ok(())
	}

	/// Returns a new cursor limited to `start..end` of the same buffer,
	/// positioned at `start`.
	pub fn sub_cursor(&self, start: usize, end: usize) -> Result<Self, ArFileError> {
		if start > end || end > self.buffer.len() {
			return Err(ArFileError::out_of_range(start, end.saturating_sub(start), self.buffer.len()));
		}
		Ok(Self {
			buffer: &self.buffer[..end],
			offset: start,
		})
	}

	/// Reads the next byte without consuming it.
	pub fn peek_byte(&self) -> Result<u8, ArFileError> {
		self.ensure(1)?;
		Ok(self.buffer[self.offset])
	}

	/// Reads one byte.
	pub fn read_byte(&mut self) -> Result<u8, ArFileError> {
		let value = self.peek_byte()?;
		self.offset += 1;
		Ok(value)
	}

	/// Reads one byte as a two's complement signed value.
	pub fn read_signed_byte(&mut self) -> Result<i8, ArFileError> {
		self.read_byte().map(|b| b as i8)
	}

	/// Returns the next `n` bytes without consuming them.
	pub fn peek_bytes(&self, n: usize) -> Result<&'a [u8], ArFileError> {
		self.ensure(n)?;
		Ok(&self.buffer[self.offset..self.offset + n])
	}

	/// Reads `n` bytes.
	pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ArFileError> {
		let bytes = self.peek_bytes(n)?;
		self.offset += n;
		Ok(bytes)
	}

	/// Reads a fixed-size array.
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ArFileError> {
		let mut out = [0u8; N];
		out.copy_from_slice(self.read_bytes(N)?);
		Ok(out)
	}

	/// Peeks a little-endian u16.
	pub fn peek_u16_le(&self) -> Result<u16, ArFileError> {
		let bytes = self.peek_bytes(2)?;
		Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
	}

	/// Reads a little-endian u16.
	pub fn read_u16_le(&mut self) -> Result<u16, ArFileError> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	/// Reads a big-endian u16.
	pub fn read_u16_be(&mut self) -> Result<u16, ArFileError> {
		Ok(u16::from_be_bytes(self.read_array()?))
	}

	/// Reads a little-endian i16.
	pub fn read_i16_le(&mut self) -> Result<i16, ArFileError> {
		Ok(i16::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian 24-bit value.
	pub fn read_u24_le(&mut self) -> Result<u32, ArFileError> {
		let [b0, b1, b2] = self.read_array()?;
		Ok(u32::from_le_bytes([b0, b1, b2, 0]))
	}

	/// Reads a little-endian u32.
	pub fn read_u32_le(&mut self) -> Result<u32, ArFileError> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	/// Reads a big-endian u32.
	pub fn read_u32_be(&mut self) -> Result<u32, ArFileError> {
		Ok(u32::from_be_bytes(self.read_array()?))
	}

	fn ensure(&self, n: usize) -> Result<(), ArFileError> {
		match self.offset.checked_add(n) {
			Some(end) if end <= self.buffer.len() => Ok(()),
			_ => Err(ArFileError::out_of_range(self.offset, n, self.buffer.len())),
		}
	}
}
