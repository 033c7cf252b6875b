//! This module is separated into its own crate to enable simple dynamic linking for `arrakis`, and should not be used directly.

/// `use arrakis::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export arrakis_types for convenience
pub use arrakis_types;

// Re-export commonly used types at crate root
pub use arrakis_types::config::AssetConfig;
pub use arrakis_types::file::{ArFileError, FileType, HsqContainer, LoadMode};
