use crate::cache::{FileStamp, ReadingCache};
use crate::config::Config;
use crate::error::SourceError;
use aag_core::{decode_snapshot, normalize_line_endings, Reading, SourceZone};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const SNAPSHOT_FILE: &str = "aag_json.dat";
pub const DIAGNOSTIC_FILE: &str = "DebugData.txt";

/// The directory the cloud watcher software keeps rewriting.
///
/// Every call does its own file read, nothing is shared between
/// callers except the optional `ReadingCache`.
pub struct SnapshotSource {
    directory: PathBuf,
    zone: SourceZone,
    cache: Option<ReadingCache>,
}

impl SnapshotSource {
    pub fn new(directory: impl Into<PathBuf>, zone: SourceZone) -> Self {
        SnapshotSource {
            directory: directory.into(),
            zone,
            cache: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let source = Self::new(config.aag_directory(), config.source_zone());
        if config.cache_readings() {
            source.with_cache()
        } else {
            source
        }
    }

    pub fn with_cache(mut self) -> Self {
        self.cache = Some(ReadingCache::new());
        self
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.directory.join(SNAPSHOT_FILE)
    }

    pub fn diagnostic_path(&self) -> PathBuf {
        self.directory.join(DIAGNOSTIC_FILE)
    }

    /// Reads and decodes the current snapshot.
    ///
    /// With a cache the file is still opened and stat'ed on every call,
    /// only the decode is skipped while the stamp is unchanged.
    pub fn read_reading(&self) -> Result<Reading, SourceError> {
        let path = self.snapshot_path();
        let mut file = File::open(&path).map_err(|err| io_error(&path, err))?;

        let cache = match &self.cache {
            Some(cache) => cache,
            None => {
                let text = read_text(&mut file, &path)?;
                return Ok(decode_snapshot(&text, self.zone)?);
            }
        };

        let stamp = file
            .metadata()
            .and_then(|metadata| FileStamp::of(&metadata))
            .map_err(|err| io_error(&path, err))?;
        if let Some(reading) = cache.lookup(&stamp) {
            debug!(timestamp = %reading.timestamp, "Serving cached reading");
            return Ok(reading);
        }

        let text = read_text(&mut file, &path)?;
        match decode_snapshot(&text, self.zone) {
            Ok(reading) => {
                cache.store(stamp, reading.clone());
                Ok(reading)
            }
            Err(err) => {
                warn!(error = %err, "Dropping cached reading");
                cache.evict();
                Err(err.into())
            }
        }
    }

    /// Returns the diagnostic dump with normalized line endings
    pub fn read_diagnostic(&self) -> Result<String, SourceError> {
        let path = self.diagnostic_path();
        let bytes = std::fs::read(&path).map_err(|err| io_error(&path, err))?;
        Ok(normalize_line_endings(&String::from_utf8_lossy(&bytes)))
    }
}

fn read_text(file: &mut File, path: &Path) -> Result<String, SourceError> {
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|err| io_error(path, err))?;
    Ok(text)
}

fn io_error(path: &Path, source: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.to_owned(),
        source,
    }
}
