//! rsec - Reed-Solomon erasure coding for files
//!
//! Splits a file into data and parity shard files and rebuilds it from any
//! sufficient subset of them.

use anyhow::{bail, Context, Result};
use log::{debug, info, LevelFilter};
use reed_solomon_ffi::reed_solomon::{CodecConfig, ReedSolomon};
use reed_solomon_ffi::shard_files::{self, ShardMeta};
use std::fs;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let matches = reed_solomon_ffi::build_cli().get_matches();

    let Some((command, sub_matches)) = matches.subcommand() else {
        bail!("No command specified\n\nUse 'rsec --help' for usage information");
    };

    let level = if sub_matches.get_flag("quiet") {
        LevelFilter::Error
    } else if sub_matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let config = CodecConfig::from_args(sub_matches);
    config.configure_thread_pool();

    match command {
        "encode" => handle_encode(sub_matches, config),
        "decode" => handle_decode(sub_matches, config),
        "matrix" => handle_matrix(sub_matches, config),
        other => bail!("Unknown command: {}", other),
    }
}

fn shard_counts(matches: &clap::ArgMatches) -> (Option<usize>, Option<usize>) {
    (
        matches.get_one::<usize>("data-shards").copied(),
        matches.get_one::<usize>("parity-shards").copied(),
    )
}

fn handle_encode(matches: &clap::ArgMatches, config: CodecConfig) -> Result<()> {
    let input = PathBuf::from(
        matches
            .get_one::<String>("input")
            .context("input is required")?,
    );
    let (Some(data_shards), Some(parity_shards)) = shard_counts(matches) else {
        bail!("--data-shards and --parity-shards are required");
    };

    let data = fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Input has no usable file name: {}", input.display()))?;
    let dir = match matches.get_one::<String>("output_dir") {
        Some(dir) => PathBuf::from(dir),
        None => input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let rs = ReedSolomon::with_config(data_shards, parity_shards, config)?;
    let shards = rs.encode(&data)?;
    let paths = shard_files::write_shards(&dir, name, &shards)?;

    let meta = ShardMeta {
        data_shards,
        parity_shards,
        original_len: data.len(),
        shard_len: shards[0].len(),
    };
    meta.write(&shard_files::meta_path(&dir, name))?;

    for path in &paths {
        debug!("Wrote {}", path.display());
    }
    info!(
        "Encoded {} bytes into {} shards of {} bytes in {}",
        data.len(),
        paths.len(),
        meta.shard_len,
        dir.display()
    );
    Ok(())
}

fn handle_decode(matches: &clap::ArgMatches, config: CodecConfig) -> Result<()> {
    let shard_paths: Vec<PathBuf> = matches
        .get_many::<String>("shards")
        .context("at least one shard file is required")?
        .map(PathBuf::from)
        .collect();
    let output = PathBuf::from(
        matches
            .get_one::<String>("output")
            .context("output is required")?,
    );

    // Layout defaults come from the .meta file next to the first shard
    let (name, _) = shard_files::parse_shard_name(&shard_paths[0])?;
    let dir = shard_paths[0]
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let meta_path = shard_files::meta_path(&dir, &name);
    let meta = if meta_path.exists() {
        Some(ShardMeta::read(&meta_path)?)
    } else {
        None
    };

    let (data_shards, parity_shards) = match (shard_counts(matches), meta) {
        ((Some(d), Some(p)), _) => (d, p),
        ((d, p), Some(meta)) => (
            d.unwrap_or(meta.data_shards),
            p.unwrap_or(meta.parity_shards),
        ),
        _ => bail!(
            "No metadata at {}; pass --data-shards and --parity-shards",
            meta_path.display()
        ),
    };

    let mut indices = Vec::with_capacity(shard_paths.len());
    let mut shards = Vec::with_capacity(shard_paths.len());
    for path in &shard_paths {
        let (index, bytes) = shard_files::read_shard(path)?;
        debug!("Read shard {} ({} bytes)", index, bytes.len());
        indices.push(index);
        shards.push(bytes);
    }

    let rs = ReedSolomon::with_config(data_shards, parity_shards, config)?;
    let mut data = rs.decode(&shards, &indices)?;

    let length = matches
        .get_one::<usize>("length")
        .copied()
        .or(meta.map(|m| m.original_len));
    if let Some(length) = length {
        if length > data.len() {
            bail!(
                "Requested length {} exceeds recovered data ({} bytes)",
                length,
                data.len()
            );
        }
        data.truncate(length);
    }

    fs::write(&output, &data)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(
        "Recovered {} bytes from {} shards into {}",
        data.len(),
        shards.len(),
        output.display()
    );
    Ok(())
}

fn handle_matrix(matches: &clap::ArgMatches, config: CodecConfig) -> Result<()> {
    let (Some(data_shards), Some(parity_shards)) = shard_counts(matches) else {
        bail!("--data-shards and --parity-shards are required");
    };
    let rs = ReedSolomon::with_config(data_shards, parity_shards, config)?;
    let generator = rs.generator();
    for row in 0..generator.rows() {
        println!("{}", hex::encode(generator.row_bytes(row)));
    }
    Ok(())
}
