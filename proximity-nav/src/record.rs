use proximity_data::SectorDistances;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Append-only CSV log of `unix_timestamp,left,center,right` lines.
///
/// The file and its parent directories are created on the first write.
pub struct DistanceLog {
    path: PathBuf,
    file: Option<File>,
}

impl DistanceLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        DistanceLog {
            path: path.as_ref().to_path_buf(),
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a record stamped with the current time.
    pub fn record(&mut self, distances: &SectorDistances) -> io::Result<()> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.);
        self.append(timestamp, distances)
    }

    pub fn append(&mut self, timestamp: f64, distances: &SectorDistances) -> io::Result<()> {
        let file = match self.file.take() {
            Some(file) => file,
            None => open_append(&self.path)?,
        };
        let file = self.file.insert(file);
        writeln!(
            file,
            "{},{},{},{}",
            timestamp, distances.left, distances.center, distances.right
        )
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}
