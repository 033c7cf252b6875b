//! Prelude module for `arrakis_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use arrakis_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let config = AssetConfig::default();
//! assert_eq!(config.load_mode("ORNY.HSQ"), LoadMode::Auto);
//!
//! let container = HsqContainer::load(&[0x01, 0x02]).unwrap();
//! assert!(!container.is_compressed());
//! ```

// Re-export everything from arrakis_types::prelude
#[doc(inline)]
pub use arrakis_types::prelude::*;

// Re-export the entire arrakis_types module for advanced usage
#[doc(inline)]
pub use arrakis_types;
