//! This crate provides the asset decoders of the `arrakis-rs` project.
//!
//! # File Formats
//!
//! - **HSQ**: LZ77-style compressed container wrapping most resources
//! - **Palette chunks**: partial VGA palette updates embedded in sprites and videos
//! - **SPR**: 4-bit sprite sheets with optional animation tables
//! - **HNM**: superchunk based video with palette and sound sub-blocks
//! - **VOC**: Creative Voice sound block streams
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use arrakis_types::prelude::*;
//!
//! # fn main() -> Result<(), ArFileError> {
//! let config = AssetConfig::default();
//! let sprite = SprFile::open_with_config("SHAI2.HSQ", &config)?;
//!
//! let mut palette = Palette::grayscale();
//! sprite.apply_palette(&mut palette);
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use arrakis_types::file::hsq::Container;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let container = Container::open("PHRASE11.HSQ")?;
//! println!("{} bytes, compressed: {}", container.data().len(), container.is_compressed());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod file;

/// `use arrakis_types::prelude::*;` to import commonly used items.
pub mod prelude;
