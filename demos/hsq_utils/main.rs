//! HSQ container utility.
//!
//! Provides three subcommands:
//! - `info`: print the header of one file and whether it validates.
//! - `unpack`: write the decompressed payload of one file.
//! - `scan`: walk a directory and report every container found.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example hsq_utils -- info bin/ORNY.HSQ
//! cargo run --example hsq_utils -- unpack bin/ORNY.HSQ -o ORNY.BIN
//! cargo run --example hsq_utils -- scan bin --recursive --json
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use arrakis_rs::prelude::*;
use clap::{Args, Parser, Subcommand};
use log::{debug, info, warn};
use serde::Serialize;
use walkdir::WalkDir;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let config = load_config(cli.config.as_deref())?;
	match cli.command {
		Command::Info(args) => run_info(args, &config),
		Command::Unpack(args) => run_unpack(args, &config),
		Command::Scan(args) => run_scan(args, &config),
	}
}

#[derive(Parser)]
#[command(name = "hsq_utils")]
#[command(author = "arrakis-rs project")]
#[command(version)]
#[command(about = "Inspect and unpack HSQ compressed containers", long_about = None)]
struct Cli {
	/// TOML file with per-file overrides (raw files, animation dialects)
	#[arg(short, long, global = true, value_name = "CONFIG", env = "ARRAKIS_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Show the header of a container
	Info(InfoArgs),
	/// Decompress a container to a file
	Unpack(UnpackArgs),
	/// Report every container under a directory
	Scan(ScanArgs),
}

#[derive(Args)]
struct InfoArgs {
	/// Input file
	#[arg(value_name = "FILE")]
	input: PathBuf,
}

#[derive(Args)]
struct UnpackArgs {
	/// Input file
	#[arg(value_name = "FILE")]
	input: PathBuf,

	/// Output file (defaults to the input name with a `.BIN` extension)
	#[arg(short, long, value_name = "OUTPUT")]
	output: Option<PathBuf>,
}

#[derive(Args)]
struct ScanArgs {
	/// Directory to scan
	#[arg(value_name = "DIR", default_value = "bin")]
	root: PathBuf,

	/// Recurse into sub-directories
	#[arg(short, long, default_value_t = false)]
	recursive: bool,

	/// Print the report as JSON
	#[arg(long, default_value_t = false)]
	json: bool,
}

/// One line of the scan report
#[derive(Debug, Serialize)]
struct ScanEntry {
	path: String,
	size: usize,
	header: String,
	compressed: bool,
	unpacked_size: Option<usize>,
	error: Option<String>,
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

fn run_info(args: InfoArgs, config: &AssetConfig) -> Result<()> {
	let data = fs::read(&args.input)
		.with_context(|| format!("Failed to read {}", args.input.display()))?;
	println!("File: {} ({} bytes)", args.input.display(), data.len());

	if data.len() < HsqHeader::SIZE {
		println!("Too short for a header, stored raw");
		return Ok(());
	}
	let header = HsqHeader::from_bytes(&data)?;
	println!("Header bytes: {}", hex::encode(header.to_bytes()));
	println!("{header}");
	match header.validate() {
		Ok(()) => println!("Checksum: valid"),
		Err(err) => println!("Checksum: {err}"),
	}

	let mode = config.load_mode(&args.input);
	if mode == LoadMode::Raw {
		println!("Listed as a raw file in the configuration");
	}
	let container = HsqContainer::load_with(&data, mode)?;
	println!(
		"Payload: {} bytes, {}",
		container.data().len(),
		if container.is_compressed() {
			"decompressed"
		} else {
			"raw"
		}
	);
	Ok(())
}

fn run_unpack(args: UnpackArgs, config: &AssetConfig) -> Result<()> {
	let output = args.output.unwrap_or_else(|| args.input.with_extension("BIN"));
	if output == args.input {
		bail!("Output {} would overwrite the input", output.display());
	}

	let container = HsqContainer::open_with(&args.input, config.load_mode(&args.input))
		.with_context(|| format!("Failed to load {}", args.input.display()))?;
	if !container.is_compressed() {
		warn!("{} is not compressed, copying it as is", args.input.display());
	}
	fs::write(&output, container.data())?;
	info!("{} -> {} ({} bytes)", args.input.display(), output.display(), container.data().len());
	Ok(())
}

fn run_scan(args: ScanArgs, config: &AssetConfig) -> Result<()> {
	if !args.root.is_dir() {
		bail!("{} is not a directory", args.root.display());
	}

	let walker = WalkDir::new(&args.root).max_depth(if args.recursive {
		usize::MAX
	} else {
		1
	});
	let mut report = Vec::new();
	for entry in walker.into_iter().filter_map(Result::ok) {
		if entry.file_type().is_file() {
			report.push(scan_file(entry.path(), config));
		}
	}
	report.sort_by(|a, b| a.path.cmp(&b.path));

	if args.json {
		println!("{}", serde_json::to_string_pretty(&report)?);
		return Ok(());
	}

	for entry in &report {
		match (&entry.error, entry.unpacked_size) {
			(Some(err), _) => println!("{:<32} {:>8}  error: {err}", entry.path, entry.size),
			(None, Some(unpacked)) if entry.compressed => {
				println!("{:<32} {:>8} -> {unpacked:>8}  [{}]", entry.path, entry.size, entry.header);
			}
			_ => println!("{:<32} {:>8}  raw", entry.path, entry.size),
		}
	}
	let compressed = report.iter().filter(|e| e.compressed).count();
	let failed = report.iter().filter(|e| e.error.is_some()).count();
	println!("\n{} files, {compressed} compressed, {failed} failed", report.len());
	Ok(())
}

fn scan_file(path: &Path, config: &AssetConfig) -> ScanEntry {
	let mut entry = ScanEntry {
		path: path.display().to_string(),
		size: 0,
		header: String::new(),
		compressed: false,
		unpacked_size: None,
		error: None,
	};

	let data = match fs::read(path) {
		Ok(data) => data,
		Err(err) => {
			entry.error = Some(err.to_string());
			return entry;
		}
	};
	entry.size = data.len();
	entry.header = hex::encode(&data[..data.len().min(HsqHeader::SIZE)]);

	match HsqContainer::load_with(&data, config.load_mode(path)) {
		Ok(container) => {
			entry.compressed = container.is_compressed();
			entry.unpacked_size = Some(container.data().len());
		}
		Err(err) => entry.error = Some(err.to_string()),
	}
	entry
}
