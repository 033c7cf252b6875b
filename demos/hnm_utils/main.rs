//! HNM video utility.
//!
//! Provides two subcommands:
//! - `info`: print the header, offset table and a per-frame summary.
//! - `extract`: composite every frame on a 320x200 screen and save PNGs, and
//!   optionally dump the sound sub-blocks to a WAV file.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example hnm_utils -- info bin/CRYO.HNM
//! cargo run --example hnm_utils -- extract bin/CRYO.HNM -o cryo --every 5
//! cargo run --example hnm_utils -- extract bin/CRYO.HNM --sound cryo.wav
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use arrakis_rs::prelude::*;
use clap::{Args, Parser, Subcommand};
use image::{Rgba, RgbaImage};
use log::{debug, info};

/// Screen size of the game
const SCREEN_WIDTH: u32 = 320;
const SCREEN_HEIGHT: u32 = 200;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Info(args) => run_info(args),
		Command::Extract(args) => run_extract(args),
	}
}

#[derive(Parser)]
#[command(name = "hnm_utils")]
#[command(author = "arrakis-rs project")]
#[command(version)]
#[command(about = "Inspect HNM videos and export their frames", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Show the header and a per-frame summary
	Info(InfoArgs),
	/// Export composited frames and sound
	Extract(ExtractArgs),
}

#[derive(Args)]
struct InfoArgs {
	/// Input video
	#[arg(value_name = "FILE")]
	input: PathBuf,

	/// List every frame
	#[arg(short, long, default_value_t = false)]
	verbose: bool,
}

#[derive(Args)]
struct ExtractArgs {
	/// Input video
	#[arg(value_name = "FILE")]
	input: PathBuf,

	/// Output directory (defaults to `<input>_frames/`)
	#[arg(short, long, value_name = "OUTPUT_DIR")]
	output: Option<PathBuf>,

	/// Only save every n-th frame
	#[arg(long, value_name = "N", default_value_t = 1)]
	every: usize,

	/// Write the concatenated sound sub-blocks to this WAV file
	#[arg(long, value_name = "WAV")]
	sound: Option<PathBuf>,

	/// Sample rate of the sound sub-blocks
	#[arg(long, value_name = "HZ", default_value_t = 11_025)]
	sample_rate: u32,
}

fn run_info(args: InfoArgs) -> Result<()> {
	let video = HnmFile::open(&args.input)
		.with_context(|| format!("Failed to decode {}", args.input.display()))?;
	let header = video.header();

	println!("Video: {}", args.input.display());
	println!("{video}");
	println!("Header: {} bytes, {} palette chunks", header.header_size(), header.palette().len());
	println!("Offset table: {} entries", header.toc().len());

	let with_video = video.frames().iter().filter(|f| f.video.is_some()).count();
	let with_palette = video.frames().iter().filter(|f| f.palette.is_some()).count();
	let sound_bytes: usize =
		video.frames().iter().filter_map(|f| f.sound.as_ref()).map(Vec::len).sum();
	println!(
		"Frames: {} ({with_video} pictures, {with_palette} palette updates, {sound_bytes} sound bytes)",
		video.frame_count()
	);

	if args.verbose {
		for (index, frame) in video.frames().iter().enumerate() {
			let picture = frame.video.as_ref().map_or("repeat".to_string(), ToString::to_string);
			let palette = frame.palette.as_ref().map_or(0, Vec::len);
			let sound = frame.sound.as_ref().map_or(0, Vec::len);
			println!("  [{index:4}] {picture}, {palette} palette chunks, {sound} sound bytes");
		}
	}
	Ok(())
}

/// Copies `block` onto the indexed screen, clipping at the edges.
fn blit(screen: &mut [u8], block: &VideoBlock) {
	let width = usize::from(block.width);
	if width == 0 {
		return;
	}
	for (row, line) in block.pixels.chunks(width).enumerate() {
		let y = usize::from(block.y) + row;
		if y >= SCREEN_HEIGHT as usize {
			break;
		}
		for (column, &value) in line.iter().enumerate() {
			let x = usize::from(block.x) + column;
			if x < SCREEN_WIDTH as usize {
				screen[y * SCREEN_WIDTH as usize + x] = value;
			}
		}
	}
}

fn run_extract(args: ExtractArgs) -> Result<()> {
	if args.every == 0 {
		bail!("--every must be at least 1");
	}
	let output_dir = args.output.clone().unwrap_or_else(|| {
		let stem =
			args.input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
		args.input.with_file_name(format!("{stem}_frames"))
	});
	fs::create_dir_all(&output_dir)?;

	let video = HnmFile::open(&args.input)
		.with_context(|| format!("Failed to decode {}", args.input.display()))?;

	let mut palette = Palette::new();
	palette.apply_chunks(video.header().palette());
	let mut screen = vec![0u8; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize];
	let mut sound = Vec::new();
	let mut saved = 0;

	for (index, frame) in video.frames().iter().enumerate() {
		if let Some(chunks) = &frame.palette {
			palette.apply_chunks(chunks);
		}
		if let Some(block) = &frame.video {
			blit(&mut screen, block);
		}
		if let Some(samples) = &frame.sound {
			sound.extend_from_slice(samples);
		}

		if index % args.every == 0 {
			save_screen(&screen, &palette, &output_dir.join(format!("frame_{index:04}.png")))?;
			saved += 1;
		}
	}
	info!("Saved {saved} of {} frames to {}", video.frame_count(), output_dir.display());

	if let Some(path) = args.sound {
		let chunk = PcmChunk {
			codec: VocCodec::Pcm8Unsigned,
			sample_rate: args.sample_rate,
			bytes: sound,
		};
		chunk.save_wav(&path)?;
		info!("Sound: {} ms written to {}", chunk.duration_ms(), path.display());
	}
	Ok(())
}

fn save_screen(screen: &[u8], palette: &Palette, path: &Path) -> Result<()> {
	let image = RgbaImage::from_fn(SCREEN_WIDTH, SCREEN_HEIGHT, |x, y| {
		let index = screen[(y * SCREEN_WIDTH + x) as usize];
		let [r, g, b, _] = palette[index].to_rgba();
		Rgba([r, g, b, 0xFF])
	});
	image.save(path)?;
	debug!("Saved {}", path.display());
	Ok(())
}
