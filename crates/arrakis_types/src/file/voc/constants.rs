//! Constants used in `.VOC` files

/// Signature opening every file
pub const SIGNATURE: &[u8; 20] = b"Creative Voice File\x1A";

/// The only supported header size
pub const HEADER_SIZE: u16 = 26;

/// Supported format versions
pub const VERSIONS: [u16; 2] = [0x010A, 0x0114];

/// Value added to the complemented version to form the header checksum
pub const CHECKSUM_SALT: u16 = 0x1234;

/// Unsigned 8-bit silence level
pub const SILENCE_LEVEL: u8 = 0x80;

/// Repeat count meaning "loop forever"
pub const ENDLESS_REPEAT: u16 = 0xFFFF;

/// Block type identifiers.
pub mod block_type {
	/// End of the block stream
	pub const TERMINATOR: u8 = 0x00;
	/// Sound data with a rate header
	pub const SOUND_DATA: u8 = 0x01;
	/// Sound data continuation
	pub const SOUND_CONTINUE: u8 = 0x02;
	/// Silence
	pub const SILENCE: u8 = 0x03;
	/// Marker
	pub const MARKER: u8 = 0x04;
	/// Text
	pub const STRING: u8 = 0x05;
	/// Start of a repeated section
	pub const REPEAT_START: u8 = 0x06;
	/// End of a repeated section
	pub const REPEAT_END: u8 = 0x07;
}

/// Upper bound on the PCM produced by expanding repeat sections. Every chunk
/// counts for at least one byte.
pub const MAX_EXPANDED_BYTES: usize = 64 * 1024 * 1024;
