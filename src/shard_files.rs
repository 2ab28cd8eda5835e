//! On-disk layout used by the `rsec` tool
//!
//! Encoding `<name>` produces `<name>.shard.<index>` for every shard and a
//! one-line `<name>.meta` file recording
//! `data_shards parity_shards original_len shard_len`. The codec itself never
//! touches the filesystem.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SHARD_MARKER: &str = ".shard.";
const META_SUFFIX: &str = ".meta";

/// Errors reading or writing shard files
#[derive(Debug, Error)]
pub enum ShardFileError {
    /// File name does not end in `.shard.<index>`
    #[error("Not a shard file name: {0}")]
    BadShardName(PathBuf),

    /// Malformed metadata file
    #[error("Invalid metadata in {path}: {reason}")]
    BadMeta { path: PathBuf, reason: String },

    /// Failed to read a file
    #[error("Failed to read {file}: {source}")]
    Read {
        file: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("Failed to write {file}: {source}")]
    Write {
        file: PathBuf,
        source: std::io::Error,
    },
}

/// Layout recorded next to a set of shard files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardMeta {
    pub data_shards: usize,
    pub parity_shards: usize,
    pub original_len: usize,
    pub shard_len: usize,
}

impl ShardMeta {
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {} {}\n",
            self.data_shards, self.parity_shards, self.original_len, self.shard_len
        )
    }

    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<usize> = line
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;
        match fields[..] {
            [data_shards, parity_shards, original_len, shard_len] => Some(Self {
                data_shards,
                parity_shards,
                original_len,
                shard_len,
            }),
            _ => None,
        }
    }

    pub fn write(&self, path: &Path) -> Result<(), ShardFileError> {
        fs::write(path, self.to_line()).map_err(|source| ShardFileError::Write {
            file: path.to_path_buf(),
            source,
        })
    }

    pub fn read(path: &Path) -> Result<Self, ShardFileError> {
        let contents = fs::read_to_string(path).map_err(|source| ShardFileError::Read {
            file: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).ok_or_else(|| ShardFileError::BadMeta {
            path: path.to_path_buf(),
            reason: format!("expected 4 integers, got {:?}", contents.trim()),
        })
    }
}

/// `<dir>/<name>.shard.<index>`
pub fn shard_path(dir: &Path, name: &str, index: usize) -> PathBuf {
    dir.join(format!("{name}{SHARD_MARKER}{index}"))
}

/// `<dir>/<name>.meta`
pub fn meta_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}{META_SUFFIX}"))
}

/// Split a shard file name into the base name and shard index
pub fn parse_shard_name(path: &Path) -> Result<(String, usize), ShardFileError> {
    let bad = || ShardFileError::BadShardName(path.to_path_buf());
    let file_name = path.file_name().and_then(|n| n.to_str()).ok_or_else(bad)?;
    let (name, index) = file_name.rsplit_once(SHARD_MARKER).ok_or_else(bad)?;
    let index = index.parse().map_err(|_| bad())?;
    Ok((name.to_string(), index))
}

/// Read one shard file and its index
pub fn read_shard(path: &Path) -> Result<(usize, Vec<u8>), ShardFileError> {
    let (_, index) = parse_shard_name(path)?;
    let bytes = fs::read(path).map_err(|source| ShardFileError::Read {
        file: path.to_path_buf(),
        source,
    })?;
    Ok((index, bytes))
}

/// Write every shard of a set, returning the paths written
pub fn write_shards(
    dir: &Path,
    name: &str,
    shards: &[Vec<u8>],
) -> Result<Vec<PathBuf>, ShardFileError> {
    shards
        .iter()
        .enumerate()
        .map(|(index, shard)| {
            let path = shard_path(dir, name, index);
            fs::write(&path, shard).map_err(|source| ShardFileError::Write {
                file: path.clone(),
                source,
            })?;
            Ok(path)
        })
        .collect()
}
