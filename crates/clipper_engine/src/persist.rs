use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use clipper_core::VaultLayout;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the directory exists and is writable (probed with a temp file).
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let describe = |e: io::Error| PersistError::OutputDir(e.to_string());
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(describe)?;
    } else if !fs::metadata(dir).map_err(describe)?.is_dir() {
        return Err(PersistError::OutputDir("path is not a directory".into()));
    }
    NamedTempFile::new_in(dir).map_err(describe)?;
    Ok(())
}

/// Create the directories one job writes into: vault root, section, and
/// the mirrored assets path.
pub fn ensure_vault_layout(layout: &VaultLayout) -> Result<(), PersistError> {
    ensure_output_dir(layout.root())?;
    ensure_output_dir(&layout.section_dir())?;
    ensure_output_dir(&layout.assets_dir())
}

/// Atomically write notes and assets into one directory: temp file, fsync,
/// rename. An interrupted write never leaves a partial file at the target.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;
        let target = self.dir.join(filename);

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace an existing note or asset deterministically.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }

    pub fn write_str(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        self.write(filename, content.as_bytes())
    }
}
