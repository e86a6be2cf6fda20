// Bountyhub
// Copyright (C) 2026 The Bountyhub developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License version 3 as
// published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Persistence of the last processed block.
use std::io::{Error as IOError, ErrorKind};
use std::path::PathBuf;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use bountyhub_client::BlockNumber;

#[derive(Debug, ThisError)]
pub enum CheckpointError {
    #[error("Failed to access checkpoint file {path}")]
    Io {
        path: PathBuf,
        #[source]
        error: IOError,
    },

    #[error("Invalid checkpoint file {path}")]
    Invalid {
        path: PathBuf,
        #[source]
        error: serde_json::Error,
    },
}

/// Stores the last block whose events were fully processed.
pub trait CheckpointStore: Send + Sync {
    /// Returns `None` if no checkpoint was saved yet.
    fn load(&self) -> Result<Option<BlockNumber>, CheckpointError>;

    fn save(&self, block_number: BlockNumber) -> Result<(), CheckpointError>;
}

/// Checkpoint that is lost when the process exits.
#[derive(Default)]
pub struct MemoryCheckpoint {
    block_number: Mutex<Option<BlockNumber>>,
}

impl MemoryCheckpoint {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointStore for MemoryCheckpoint {
    fn load(&self) -> Result<Option<BlockNumber>, CheckpointError> {
        Ok(*self.block_number.lock())
    }

    fn save(&self, block_number: BlockNumber) -> Result<(), CheckpointError> {
        *self.block_number.lock() = Some(block_number);
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckpointFile {
    last_processed_block: BlockNumber,
}

/// Checkpoint stored as JSON in a file.
pub struct FileCheckpoint {
    path: PathBuf,
}

impl FileCheckpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCheckpoint { path: path.into() }
    }

    fn io_error(&self, error: IOError) -> CheckpointError {
        CheckpointError::Io {
            path: self.path.clone(),
            error,
        }
    }

    fn invalid(&self, error: serde_json::Error) -> CheckpointError {
        CheckpointError::Invalid {
            path: self.path.clone(),
            error,
        }
    }
}

impl CheckpointStore for FileCheckpoint {
    fn load(&self) -> Result<Option<BlockNumber>, CheckpointError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(self.io_error(error)),
        };
        let file: CheckpointFile = serde_json::from_str(&content).map_err(|e| self.invalid(e))?;
        Ok(Some(file.last_processed_block))
    }

    fn save(&self, block_number: BlockNumber) -> Result<(), CheckpointError> {
        let content = serde_json::to_string(&CheckpointFile {
            last_processed_block: block_number,
        })
        .map_err(|e| self.invalid(e))?;
        // Replace the file atomically.
        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, content).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn file_checkpoint() {
        let path = std::env::temp_dir().join(format!(
            "bountyhub-checkpoint-{}.json",
            rand::random::<u64>()
        ));
        let checkpoint = FileCheckpoint::new(&path);
        assert_eq!(checkpoint.load().unwrap(), None);

        checkpoint.save(100).unwrap();
        checkpoint.save(120).unwrap();
        assert_eq!(FileCheckpoint::new(&path).load().unwrap(), Some(120));

        std::fs::write(&path, "not json").unwrap();
        assert!(checkpoint.load().is_err());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn memory_checkpoint() {
        let checkpoint = MemoryCheckpoint::new();
        assert_eq!(checkpoint.load().unwrap(), None);
        checkpoint.save(7).unwrap();
        assert_eq!(checkpoint.load().unwrap(), Some(7));
    }
}
