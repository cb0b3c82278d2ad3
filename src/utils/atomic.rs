//! Atomic file writes
//!
//! Rendered templates are written to a sibling temp file, synced, and
//! renamed over the destination, so a reader sees either the old file or
//! the complete new one.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Atomically replace `path` with `content`
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let result = (|| {
        let mut file = File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hosts");

        atomic_write(&path, "127.0.0.1 localhost\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "127.0.0.1 localhost\n");
        assert!(!temp_dir.path().join("hosts.tmp").exists());
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.conf");
        fs::write(&path, "old").unwrap();

        atomic_write(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_temp_path_keeps_full_file_name() {
        let temp = temp_path_for(Path::new("/etc/app/config.toml"));
        assert_eq!(temp, PathBuf::from("/etc/app/config.toml.tmp"));
    }
}
