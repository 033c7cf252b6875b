//! Per-file decoding configuration.
//!
//! Nothing in the asset files says whether a file skips the HSQ container or
//! which animation table layout a sprite sheet uses. Both are keyed on the file
//! name and kept here, so callers can resolve them once and pass plain values to
//! the decoders.
//!
//! The built-in table only knows the swap dialect sheet. The segmented sheet
//! needs its per-file limits and the raw files depend on the game release, so
//! both come from a user configuration layered with [`AssetConfig::merged`].
//!
//! The configuration deserializes from any serde format. In TOML:
//!
//! ```toml
//! raw_files = ["INTRO.VOC"]
//!
//! [[animations]]
//! file = "SHAI2.HSQ"
//! dialect = "swap"
//!
//! [[animations]]
//! file = "MIRROR.HSQ"
//! dialect = "segmented"
//! limits = [5, 11]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::file::{hsq::LoadMode, spr::AnimationDialect};

/// Animation dialect assigned to one sprite sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationEntry {
	/// File name, matched case-insensitively against the last path component
	pub file: String,

	/// Dialect of the file's definition table
	#[serde(flatten)]
	pub dialect: AnimationDialect,
}

/// File-name keyed decoding options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
	/// Files stored without an HSQ container
	#[serde(default)]
	pub raw_files: Vec<String>,

	/// Sprite sheets that do not use the generic animation dialect
	#[serde(default)]
	pub animations: Vec<AnimationEntry>,
}

/// Built-in table: `SHAI2.HSQ` uses the swap dialect. No raw files and no
/// segmented sheets.
impl Default for AssetConfig {
	fn default() -> Self {
		Self {
			raw_files: Vec::new(),
			animations: vec![AnimationEntry {
				file: "SHAI2.HSQ".to_string(),
				dialect: AnimationDialect::Swap,
			}],
		}
	}
}

/// Upper-cased final path component.
fn file_key(path: &Path) -> String {
	path.file_name().map(|name| name.to_string_lossy().to_ascii_uppercase()).unwrap_or_default()
}

impl AssetConfig {
	/// A configuration without any entry.
	pub fn empty() -> Self {
		Self {
			raw_files: Vec::new(),
			animations: Vec::new(),
		}
	}

	/// How the container of `path` should be loaded.
	pub fn load_mode(&self, path: impl AsRef<Path>) -> LoadMode {
		let key = file_key(path.as_ref());
		if self.raw_files.iter().any(|f| f.eq_ignore_ascii_case(&key)) {
			LoadMode::Raw
		} else {
			LoadMode::Auto
		}
	}

	/// Animation dialect of the sprite sheet at `path`.
	pub fn dialect(&self, path: impl AsRef<Path>) -> AnimationDialect {
		let key = file_key(path.as_ref());
		self.animations
			.iter()
			.rev()
			.find(|entry| entry.file.eq_ignore_ascii_case(&key))
			.map(|entry| entry.dialect.clone())
			.unwrap_or_default()
	}

	/// Layers `overrides` on top of this configuration. Entries of `overrides`
	/// win on conflicting file names.
	pub fn merged(mut self, overrides: AssetConfig) -> Self {
		for file in overrides.raw_files {
			if !self.raw_files.iter().any(|f| f.eq_ignore_ascii_case(&file)) {
				self.raw_files.push(file);
			}
		}
		for entry in overrides.animations {
			self.animations.retain(|e| !e.file.eq_ignore_ascii_case(&entry.file));
			self.animations.push(entry);
		}
		self
	}
}
