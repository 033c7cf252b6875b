//! VOC sound utility.
//!
//! Provides three subcommands:
//! - `info`: list the blocks of a sound file.
//! - `export`: write every playable chunk as a WAV file.
//! - `play`: play the chunks through the default output device.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example voc_utils -- info bin/VOICE.HSQ
//! cargo run --example voc_utils -- export bin/VOICE.HSQ -o voice
//! cargo run --example voc_utils -- play bin/VOICE.HSQ
//! ```

use std::{
	fs,
	io::Cursor,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use arrakis_rs::prelude::*;
use clap::{Args, Parser, Subcommand};
use log::{debug, info, warn};
use rodio::{Decoder, OutputStream, Sink};

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let config = load_config(cli.config.as_deref())?;
	match cli.command {
		Command::Info(args) => run_info(args, &config),
		Command::Export(args) => run_export(args, &config),
		Command::Play(args) => run_play(args, &config),
	}
}

#[derive(Parser)]
#[command(name = "voc_utils")]
#[command(author = "arrakis-rs project")]
#[command(version)]
#[command(about = "Inspect, export and play Creative Voice sounds", long_about = None)]
struct Cli {
	/// TOML file with per-file overrides (raw files, animation dialects)
	#[arg(short, long, global = true, value_name = "CONFIG", env = "ARRAKIS_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// List the blocks of a sound file
	Info(InfoArgs),
	/// Write every playable chunk to a WAV file
	Export(ExportArgs),
	/// Play the sound
	Play(InfoArgs),
}

#[derive(Args)]
struct InfoArgs {
	/// Input sound, packed or not
	#[arg(value_name = "FILE")]
	input: PathBuf,
}

#[derive(Args)]
struct ExportArgs {
	/// Input sound, packed or not
	#[arg(value_name = "FILE")]
	input: PathBuf,

	/// Output directory (defaults to `<input>_wav/`)
	#[arg(short, long, value_name = "OUTPUT_DIR")]
	output: Option<PathBuf>,
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

fn open_sound(path: &Path, config: &AssetConfig) -> Result<VocFile> {
	let container = HsqContainer::open_with(path, config.load_mode(path))
		.with_context(|| format!("Failed to load {}", path.display()))?;
	VocFile::from_unpacked(container.data())
		.with_context(|| format!("Failed to decode {}", path.display()))
}

fn run_info(args: InfoArgs, config: &AssetConfig) -> Result<()> {
	let sound = open_sound(&args.input, config)?;
	println!("Sound: {}", args.input.display());
	println!("{sound}");
	for (index, block) in sound.blocks().iter().enumerate() {
		println!("  [{index:3}] {block}");
	}

	let chunks = sound.to_pcm()?;
	let total_ms: u64 =
		chunks.iter().filter_map(|c| c.as_ref().ok()).map(PcmChunk::duration_ms).sum();
	let failed = chunks.iter().filter(|c| c.is_err()).count();
	println!("\n{} playable chunks, {total_ms} ms, {failed} not playable", chunks.len() - failed);
	Ok(())
}

fn run_export(args: ExportArgs, config: &AssetConfig) -> Result<()> {
	let output_dir = args.output.unwrap_or_else(|| {
		let stem =
			args.input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
		args.input.with_file_name(format!("{stem}_wav"))
	});
	fs::create_dir_all(&output_dir)?;

	let sound = open_sound(&args.input, config)?;
	let mut written = 0;
	for (index, chunk) in sound.to_pcm()?.into_iter().enumerate() {
		let path = output_dir.join(format!("chunk_{index:03}.wav"));
		match chunk.and_then(|c| c.save_wav(&path).map(|()| c)) {
			Ok(chunk) => {
				info!("{}: {} Hz, {} ms", path.display(), chunk.sample_rate, chunk.duration_ms());
				written += 1;
			}
			Err(err) => warn!("Chunk {index}: {err}"),
		}
	}
	info!("Wrote {written} WAV files to {}", output_dir.display());
	Ok(())
}

fn run_play(args: InfoArgs, config: &AssetConfig) -> Result<()> {
	let sound = open_sound(&args.input, config)?;

	let (_stream, stream_handle) = OutputStream::try_default()?;
	let sink = Sink::try_new(&stream_handle)?;

	for (index, chunk) in sound.to_pcm()?.into_iter().enumerate() {
		let chunk = match chunk {
			Ok(chunk) => chunk,
			Err(err) => {
				warn!("Skipping chunk {index}: {err}");
				continue;
			}
		};
		let mut wav = Cursor::new(Vec::new());
		if let Err(err) = chunk.write_wav(&mut wav) {
			warn!("Skipping chunk {index}: {err}");
			continue;
		}
		wav.set_position(0);
		sink.append(Decoder::new(wav)?);
		debug!("Queued chunk {index}: {} ms", chunk.duration_ms());
	}

	info!("Playing {}", args.input.display());
	sink.sleep_until_end();
	Ok(())
}
