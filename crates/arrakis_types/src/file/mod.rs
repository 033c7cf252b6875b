//! File format support for the `arrakis-rs` project.

mod error;

pub mod cursor;
pub mod hnm;
pub mod hsq;
pub mod palette;
pub mod spr;
pub mod voc;

// Re-export unified error type
pub use error::{ArFileError, FileType};

// Re-export main file types
pub use cursor::ByteCursor;
pub use hnm::{File as HnmFile, VideoBlock, VideoFrame, VideoHeader};
pub use hsq::{Container as HsqContainer, Header as HsqHeader, LoadMode};
pub use palette::{ChunkVariant, Color, Palette, PaletteChunk};
pub use spr::{
	AnimationDialect, AnimationFrame, File as SprFile, Frame as SprFrame, ImageGroup,
	ImagePlacement, SpriteAnimation,
};
pub use voc::{Codec as VocCodec, File as VocFile, PcmChunk, SoundBlock};
