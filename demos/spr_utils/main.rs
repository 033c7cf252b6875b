//! Sprite sheet CLI utility
//!
//! A command-line tool for inspecting sprite sheets and exporting their frames.
//!
//! # Features
//!
//! - **info**: Display frames, palette chunks and animations of a sheet
//! - **unpack**: Export every frame to PNG with JSON metadata
//!
//! # Palette
//!
//! Sprite sheets only carry the palette entries they use. Colors are resolved
//! against a grayscale base, optionally overlaid with the palette chunks of
//! another sheet given with `--palette-from`, then with the sheet's own chunks.
//!
//! # Usage
//!
//! ```bash
//! # Show sheet information
//! cargo run --example spr_utils -- info bin/ORNY.HSQ --detailed
//!
//! # Unpack frames, taking the base palette from a background
//! cargo run --example spr_utils -- unpack bin/ORNY.HSQ --palette-from bin/BACK.HSQ
//!
//! # Decode with dialect overrides
//! cargo run --example spr_utils -- --config demos/assets.toml info bin/MIRROR.HSQ
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use arrakis_rs::prelude::*;
use clap::{Parser, Subcommand};
use image::RgbaImage;
use log::{debug, info};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "spr_utils")]
#[command(author = "arrakis-rs project")]
#[command(version)]
#[command(about = "Sprite sheet utility - inspect sheets and export frames", long_about = None)]
struct Cli {
	/// TOML file with per-file overrides (raw files, animation dialects)
	#[arg(short, long, global = true, value_name = "CONFIG", env = "ARRAKIS_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Display information about a sprite sheet
	Info {
		/// Input sprite sheet
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Show per-frame and per-animation details
		#[arg(short, long)]
		detailed: bool,
	},

	/// Export every frame to PNG
	Unpack {
		/// Input sprite sheet
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Output directory (defaults to `<input>_frames/`)
		#[arg(short, long, value_name = "OUTPUT_DIR")]
		output: Option<PathBuf>,

		/// Sprite sheet whose palette chunks are applied first
		#[arg(short, long, value_name = "SHEET")]
		palette_from: Option<PathBuf>,
	},
}

/// Frame metadata for JSON serialization
#[derive(Debug, Serialize)]
struct FrameMetadata {
	index: usize,
	width: u16,
	real_width: u16,
	height: u8,
	compressed: bool,
	palette_offset: u8,
	filename: String,
}

/// One placed image of an animation step
#[derive(Debug, Serialize)]
struct PlacementMetadata {
	frame: usize,
	x: i8,
	y: i8,
}

/// Animation metadata for JSON serialization
#[derive(Debug, Serialize)]
struct AnimationMetadata {
	x: i16,
	y: i16,
	width: u16,
	height: u16,
	steps: Vec<Vec<PlacementMetadata>>,
}

/// Complete sheet metadata
#[derive(Debug, Serialize)]
struct SheetMetadata {
	source: String,
	dialect: AnimationDialect,
	frames: Vec<FrameMetadata>,
	animations: Vec<AnimationMetadata>,
}

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let config = load_config(cli.config.as_deref())?;
	match cli.command {
		Commands::Info {
			input,
			detailed,
		} => handle_info(&input, detailed, &config),
		Commands::Unpack {
			input,
			output,
			palette_from,
		} => handle_unpack(&input, output, palette_from.as_deref(), &config),
	}
}

/// Built-in table with the optional TOML overrides layered on top.
fn load_config(path: Option<&Path>) -> Result<AssetConfig> {
	let Some(path) = path else {
		return Ok(AssetConfig::default());
	};
	let overrides: AssetConfig = config::Config::builder()
		.add_source(config::File::from(path))
		.build()
		.and_then(config::Config::try_deserialize)
		.with_context(|| format!("Failed to load config {}", path.display()))?;
	debug!("Loaded overrides from {}: {overrides:?}", path.display());
	Ok(AssetConfig::default().merged(overrides))
}

fn open_sheet(path: &Path, config: &AssetConfig) -> Result<SprFile> {
	SprFile::open_with_config(path, config)
		.with_context(|| format!("Failed to decode sprite sheet {}", path.display()))
}

fn animation_metadata(animation: &SpriteAnimation) -> AnimationMetadata {
	AnimationMetadata {
		x: animation.x,
		y: animation.y,
		width: animation.width,
		height: animation.height,
		steps: animation
			.frames
			.iter()
			.map(|step| {
				step.groups
					.iter()
					.flat_map(|group| group.images.iter())
					.map(|image| PlacementMetadata {
						frame: image.frame_index,
						x: image.x_offset,
						y: image.y_offset,
					})
					.collect()
			})
			.collect(),
	}
}

fn handle_info(input: &Path, detailed: bool, config: &AssetConfig) -> Result<()> {
	let sheet = open_sheet(input, config)?;

	println!("Sprite sheet: {}", input.display());
	println!("Dialect: {:?}", config.dialect(input));
	println!("{sheet}");

	println!("\nPalette chunks:");
	for chunk in sheet.palette_chunks() {
		println!("  start {:3}, {:3} colors", chunk.start_index(), chunk.count());
	}

	if detailed {
		println!("\nFrames:");
		for (index, frame) in sheet.frames().iter().enumerate() {
			println!("  [{index:3}] {frame}");
		}
	}

	println!("\nAnimations: {}", sheet.animations().len());
	for (index, animation) in sheet.animations().iter().enumerate() {
		println!(
			"  [{index}] {}x{} at ({}, {}), {} steps",
			animation.width,
			animation.height,
			animation.x,
			animation.y,
			animation.frames.len()
		);
		if detailed {
			for (step, placements) in animation_metadata(animation).steps.iter().enumerate() {
				let images: Vec<String> = placements
					.iter()
					.map(|p| format!("{}@({},{})", p.frame, p.x, p.y))
					.collect();
				println!("      step {step:3}: {}", images.join(" "));
			}
		}
	}
	Ok(())
}

fn handle_unpack(
	input: &Path,
	output: Option<PathBuf>,
	palette_from: Option<&Path>,
	config: &AssetConfig,
) -> Result<()> {
	let output_dir = output.unwrap_or_else(|| {
		let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
		input.with_file_name(format!("{stem}_frames"))
	});
	fs::create_dir_all(&output_dir)?;

	let sheet = open_sheet(input, config)?;
	let mut palette = Palette::grayscale();
	if let Some(path) = palette_from {
		open_sheet(path, config)?.apply_palette(&mut palette);
		info!("Base palette from {}", path.display());
	}
	sheet.apply_palette(&mut palette);

	let mut metadata = SheetMetadata {
		source: input.display().to_string(),
		dialect: config.dialect(input),
		frames: Vec::with_capacity(sheet.frame_count()),
		animations: sheet.animations().iter().map(animation_metadata).collect(),
	};

	for (index, frame) in sheet.frames().iter().enumerate() {
		let filename = format!("frame_{index:03}.png");
		let image = RgbaImage::from_raw(
			u32::from(frame.width()),
			u32::from(frame.height()),
			frame.to_rgba(&palette),
		)
		.context("Frame buffer does not match its dimensions")?;
		image.save(output_dir.join(&filename))?;
		debug!("Frame {index}: {frame}");

		metadata.frames.push(FrameMetadata {
			index,
			width: frame.width(),
			real_width: frame.real_width(),
			height: frame.height(),
			compressed: frame.is_compressed(),
			palette_offset: frame.palette_offset(),
			filename,
		});
	}

	let metadata_path = output_dir.join("metadata.json");
	fs::write(&metadata_path, serde_json::to_string_pretty(&metadata)?)?;
	info!(
		"Exported {} frames and {} animations to {}",
		metadata.frames.len(),
		metadata.animations.len(),
		output_dir.display()
	);
	Ok(())
}
