use aag_core::Reading;
use parking_lot::Mutex;
use std::fs::Metadata;
use std::time::SystemTime;

/// Identifies one version of the snapshot file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    modified: SystemTime,
    len: u64,
}

impl FileStamp {
    pub fn of(metadata: &Metadata) -> std::io::Result<Self> {
        Ok(FileStamp {
            modified: metadata.modified()?,
            len: metadata.len(),
        })
    }
}

/// Holds the last decoded reading together with the stamp of the file it came from.
///
/// The entry is only ever replaced whole, a lookup with a different stamp misses.
#[derive(Default)]
pub struct ReadingCache {
    entry: Mutex<Option<(FileStamp, Reading)>>,
}

impl ReadingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, stamp: &FileStamp) -> Option<Reading> {
        match &*self.entry.lock() {
            Some((cached, reading)) if cached == stamp => Some(reading.clone()),
            _ => None,
        }
    }

    pub fn store(&self, stamp: FileStamp, reading: Reading) {
        *self.entry.lock() = Some((stamp, reading));
    }

    pub fn evict(&self) {
        self.entry.lock().take();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;

    fn reading(temperature: f64) -> Reading {
        Reading {
            timestamp: Utc::now(),
            cloud_watcher_info: String::new(),
            sky_light_detector_data: String::new(),
            cloud_temperature: -20.0,
            clouds_safe: true,
            temperature,
            wind: 0.0,
            wind_safe: true,
            gust: 0.0,
            rain: 2900,
            rain_safe: true,
            light: 40,
            light_safe: true,
            switch_closed: false,
            safe: true,
            humidity: 50.0,
            humidity_safe: true,
            dew_point: 1.0,
            absolute_pressure: 1000.0,
            relative_pressure: 1010.0,
            pressure_safe: true,
            raw_infrared: -18.0,
        }
    }

    fn stamp(secs: u64, len: u64) -> FileStamp {
        FileStamp {
            modified: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
            len,
        }
    }

    #[test]
    fn test_lookup_needs_same_stamp() {
        let cache = ReadingCache::new();
        assert!(cache.lookup(&stamp(10, 500)).is_none());

        cache.store(stamp(10, 500), reading(7.5));

        assert_eq!(Some(7.5), cache.lookup(&stamp(10, 500)).map(|r| r.temperature));
        assert!(cache.lookup(&stamp(11, 500)).is_none());
        assert!(cache.lookup(&stamp(10, 501)).is_none());
    }

    #[test]
    fn test_store_replaces_and_evict_clears() {
        let cache = ReadingCache::new();
        cache.store(stamp(10, 500), reading(7.5));
        cache.store(stamp(20, 500), reading(8.0));

        assert!(cache.lookup(&stamp(10, 500)).is_none());
        assert_eq!(Some(8.0), cache.lookup(&stamp(20, 500)).map(|r| r.temperature));

        cache.evict();
        assert!(cache.lookup(&stamp(20, 500)).is_none());
    }
}
