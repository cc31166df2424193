use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use crate::error::IndexerError;

/// Durable record of the highest block already fully processed. Owned by the
/// scheduler: read at cycle start, written once at cycle end.
pub trait CheckpointStore {
    fn load(&self) -> Result<u64, IndexerError>;
    fn save(&mut self, block: u64) -> Result<(), IndexerError>;
}

/// Single human-readable integer in a file, overwritten in place each cycle.
/// Saves go through a temp file plus rename so an interrupted save never
/// leaves a corrupt or half-written checkpoint behind.
pub struct FileCheckpoint {
    path: PathBuf,
    default_block: u64,
}

impl FileCheckpoint {
    pub fn new(path: impl Into<PathBuf>, default_block: u64) -> Self {
        Self {
            path: path.into(),
            default_block,
        }
    }
}

impl CheckpointStore for FileCheckpoint {
    fn load(&self) -> Result<u64, IndexerError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    block = self.default_block,
                    "no checkpoint file, starting from default block"
                );
                return Ok(self.default_block);
            }
            Err(e) => {
                return Err(IndexerError::Checkpoint(
                    anyhow::Error::new(e).context("failed to read checkpoint file"),
                ))
            }
        };

        contents
            .trim()
            .parse::<u64>()
            .context("checkpoint file does not contain a block number")
            .map_err(IndexerError::Checkpoint)
    }

    fn save(&mut self, block: u64) -> Result<(), IndexerError> {
        let write = || -> anyhow::Result<()> {
            let tmp = self.path.with_extension("tmp");
            let mut file = fs::File::create(&tmp).context("failed to create temp checkpoint")?;
            writeln!(file, "{}", block).context("failed to write temp checkpoint")?;
            file.sync_all().context("failed to sync temp checkpoint")?;
            fs::rename(&tmp, &self.path).context("failed to replace checkpoint file")?;
            Ok(())
        };

        write().map_err(IndexerError::Checkpoint)
    }
}
