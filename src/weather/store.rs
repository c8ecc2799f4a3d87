/*
 *  weather/store.rs
 *
 *  WxMonS - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	Last good snapshot per location, kept on disk across restarts
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::WeatherSnapshot;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot store I/O: {0}")]
    Io(#[from] io::Error),
    #[error("snapshot store JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One JSON file per location under the cache directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

fn slug(location: &str) -> String {
    location
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

impl SnapshotStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, location: &str) -> PathBuf {
        self.dir.join(format!("weather_{}.json", slug(location)))
    }

    /// `Ok(None)` when nothing has been saved for this location yet.
    pub fn load(&self, location: &str) -> Result<Option<WeatherSnapshot>, StoreError> {
        let text = match fs::read_to_string(self.path_for(location)) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snap: WeatherSnapshot = serde_json::from_str(&text)?;
        Ok(Some(snap))
    }

    /// Written to a temp file, then renamed into place.
    pub fn save(&self, snapshot: &WeatherSnapshot) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&snapshot.location);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(snapshot)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
