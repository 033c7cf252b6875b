#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `arrakis-rs` decodes the asset formats of a 1992 DOS adventure game:
//! HSQ containers, sprite sheets with their animation tables, HNM videos and
//! Creative Voice sounds.
//!
//! ```no_run
//! use arrakis_rs::prelude::*;
//!
//! # fn main() -> Result<(), ArFileError> {
//! let container = HsqContainer::open("ORNY.HSQ")?;
//! println!("{} bytes", container.data().len());
//! # Ok(())
//! # }
//! ```
pub use arrakis_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use arrakis_dylib;
