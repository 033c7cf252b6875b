//! Prelude module for `arrakis_types`.
//!
//! This module provides a convenient way to import commonly used types.
//!
//! # Examples
//!
//! ```no_run
//! use arrakis_types::prelude::*;
//!
//! # fn main() -> Result<(), ArFileError> {
//! let video = HnmFile::open("CRYO.HNM")?;
//! let sound = VocFile::open("VOICE.HSQ")?;
//! # Ok(())
//! # }
//! ```

#[doc(inline)]
pub use crate::config::{AnimationEntry, AssetConfig};

// File module types
#[doc(inline)]
pub use crate::file::{
	// Sprite types
	AnimationDialect,
	// Errors
	ArFileError,
	ChunkVariant,
	// Palette types
	Color,
	FileType,
	// HNM types
	HnmFile,
	// HSQ types
	HsqContainer,
	HsqHeader,
	LoadMode,
	Palette,
	PaletteChunk,
	// VOC types
	PcmChunk,
	SoundBlock,
	SprFile,
	SprFrame,
	SpriteAnimation,
	VideoBlock,
	VideoFrame,
	VocCodec,
	VocFile,
};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
