//! File discovery and defensive opening.
//!
//! Scanners recursively walk a folder tree for candidate files by extension
//! and an optional case-insensitive filename substring filter, then open
//! them defensively: any parse failure is logged and surfaced as `None`,
//! never a panic or an error the caller must unwind.
//!
//! Filter contract: when the filter is enabled with non-empty text, only
//! filenames whose uppercase form contains the uppercase filter text match.
//! When the filter is enabled with empty text, nothing matches. Warning
//! about that configuration is up to the caller-facing layer; the scanner
//! just honors it.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{GeoQcError, Result};
use crate::las::{parse_las, LasFile};
use crate::segy::{SegyFile, SegyMode};

/// SEG-Y textual + binary header region, hashed for provenance.
const SEGY_HEADER_REGION: usize = 3600;

/// Provenance record for an opened file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size_bytes: u64,
    /// SHA-256 over the hashed region: full contents for LAS, the header
    /// region only for SEG-Y.
    pub sha256: String,
    /// When the file was scanned.
    pub scanned_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Capture metadata hashing the full file contents.
    pub fn capture(path: impl AsRef<Path>) -> Result<Self> {
        Self::capture_region(path, None)
    }

    /// Capture metadata hashing at most the first `len` bytes.
    pub fn capture_header(path: impl AsRef<Path>, len: usize) -> Result<Self> {
        Self::capture_region(path, Some(len))
    }

    fn capture_region(path: impl AsRef<Path>, limit: Option<usize>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| GeoQcError::io(path, e))?;
        let size_bytes = file
            .metadata()
            .map_err(|e| GeoQcError::io(path, e))?
            .len();

        let mut hasher = Sha256::new();
        match limit {
            Some(len) => {
                let mut buf = vec![0u8; len.min(size_bytes as usize)];
                file.read_exact(&mut buf)
                    .map_err(|e| GeoQcError::io(path, e))?;
                hasher.update(&buf);
            }
            None => {
                let mut contents = Vec::new();
                file.read_to_end(&mut contents)
                    .map_err(|e| GeoQcError::io(path, e))?;
                hasher.update(&contents);
            }
        }

        Ok(Self {
            file: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            size_bytes,
            sha256: format!("sha256:{:x}", hasher.finalize()),
            scanned_at: Utc::now(),
        })
    }
}

/// Shared discovery state for both scanners.
#[derive(Debug, Clone)]
struct ScanFilter {
    root: PathBuf,
    filter_text: String,
    filter_enabled: bool,
}

impl ScanFilter {
    fn matches(&self, filename: &str) -> bool {
        if !self.filter_enabled {
            return true;
        }
        if self.filter_text.is_empty() {
            // Enabled filter with empty text excludes everything.
            return false;
        }
        filename
            .to_uppercase()
            .contains(&self.filter_text.to_uppercase())
    }

    fn discover(&self, extensions: &[&str]) -> Vec<PathBuf> {
        if !self.root.is_dir() {
            return Vec::new();
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let name = entry.file_name().to_string_lossy();
            let lower = name.to_lowercase();
            if extensions.iter().any(|ext| lower.ends_with(ext)) && self.matches(&name) {
                found.push(entry.into_path());
            }
        }
        debug!(root = %self.root.display(), count = found.len(), "discovery complete");
        found
    }
}

/// Finds and opens LAS well-log files.
#[derive(Debug, Clone)]
pub struct LasScanner {
    filter: ScanFilter,
}

impl LasScanner {
    /// Scanner over `root` with the filter disabled.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_filter(root, "", false)
    }

    /// Scanner over `root` with an optional filename substring filter.
    pub fn with_filter(
        root: impl Into<PathBuf>,
        filter_text: impl Into<String>,
        filter_enabled: bool,
    ) -> Self {
        Self {
            filter: ScanFilter {
                root: root.into(),
                filter_text: filter_text.into(),
                filter_enabled,
            },
        }
    }

    /// Recursively find all `.las` files under the root.
    pub fn discover(&self) -> Vec<PathBuf> {
        self.filter.discover(&[".las"])
    }

    /// Safely open a LAS file; failures are logged and returned as `None`.
    pub fn read_las_file(path: impl AsRef<Path>) -> Option<LasFile> {
        let path = path.as_ref();
        match parse_las(path) {
            Ok(las) => Some(las),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read LAS file");
                None
            }
        }
    }

    /// Provenance metadata for a LAS file (full-content hash).
    pub fn metadata(path: impl AsRef<Path>) -> Result<SourceMetadata> {
        SourceMetadata::capture(path)
    }
}

/// Finds and opens SEG-Y seismic files.
#[derive(Debug, Clone)]
pub struct SegyScanner {
    filter: ScanFilter,
}

impl SegyScanner {
    /// Scanner over `root` with the filter disabled.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_filter(root, "", false)
    }

    /// Scanner over `root` with an optional filename substring filter.
    pub fn with_filter(
        root: impl Into<PathBuf>,
        filter_text: impl Into<String>,
        filter_enabled: bool,
    ) -> Self {
        Self {
            filter: ScanFilter {
                root: root.into(),
                filter_text: filter_text.into(),
                filter_enabled,
            },
        }
    }

    /// Recursively find all `.sgy`/`.segy` files under the root.
    pub fn discover(&self) -> Vec<PathBuf> {
        self.filter.discover(&[".sgy", ".segy"])
    }

    /// Safely open a SEG-Y file in the given mode; failures (including a
    /// failed 3D geometry build) are logged and returned as `None`.
    pub fn read_segy_file(path: impl AsRef<Path>, mode: SegyMode) -> Option<SegyFile> {
        let path = path.as_ref();
        let result = match mode {
            SegyMode::TwoD => SegyFile::open_2d(path),
            SegyMode::ThreeD => SegyFile::open_3d(path),
        };
        match result {
            Ok(segy) => Some(segy),
            Err(e) => {
                warn!(path = %path.display(), mode = %mode, error = %e, "failed to read SEG-Y file");
                None
            }
        }
    }

    /// Provenance metadata for a SEG-Y file (header-region hash).
    pub fn metadata(path: impl AsRef<Path>) -> Result<SourceMetadata> {
        SourceMetadata::capture_header(path, SEGY_HEADER_REGION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"stub").unwrap();
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_discover_recursive_by_extension() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.las");
        touch(dir.path(), "b.LAS");
        touch(dir.path(), "c.sgy");
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        touch(&sub, "d.las");
        touch(&sub, "e.segy");
        touch(&sub, "notes.txt");

        let las = LasScanner::new(dir.path()).discover();
        assert_eq!(names(&las), vec!["a.las", "b.LAS", "d.las"]);

        let segy = SegyScanner::new(dir.path()).discover();
        assert_eq!(names(&segy), vec!["c.sgy", "e.segy"]);
    }

    #[test]
    fn test_filter_substring_case_insensitive() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "well_north.las");
        touch(dir.path(), "well_south.las");

        let scanner = LasScanner::with_filter(dir.path(), "NORTH", true);
        assert_eq!(names(&scanner.discover()), vec!["well_north.las"]);
    }

    #[test]
    fn test_filter_enabled_empty_matches_nothing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.las");
        touch(dir.path(), "b.las");

        let scanner = LasScanner::with_filter(dir.path(), "", true);
        assert!(scanner.discover().is_empty());
    }

    #[test]
    fn test_filter_disabled_ignores_text() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.las");
        touch(dir.path(), "b.las");

        let scanner = LasScanner::with_filter(dir.path(), "NOMATCH", false);
        assert_eq!(scanner.discover().len(), 2);
    }

    #[test]
    fn test_missing_root_yields_empty() {
        let scanner = LasScanner::new("/nonexistent/geoqc/test/root");
        assert!(scanner.discover().is_empty());
    }

    #[test]
    fn test_read_invalid_las_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.las");
        fs::write(&path, "not a las file at all").unwrap();
        assert!(LasScanner::read_las_file(&path).is_none());
    }

    #[test]
    fn test_read_invalid_segy_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.sgy");
        fs::write(&path, vec![0u8; 64]).unwrap();
        assert!(SegyScanner::read_segy_file(&path, SegyMode::TwoD).is_none());
        assert!(SegyScanner::read_segy_file(&path, SegyMode::ThreeD).is_none());
    }

    #[test]
    fn test_metadata_capture() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("well.las");
        fs::write(&path, b"~Version\n").unwrap();
        let meta = LasScanner::metadata(&path).unwrap();
        assert_eq!(meta.file, "well.las");
        assert_eq!(meta.size_bytes, 9);
        assert!(meta.sha256.starts_with("sha256:"));
    }
}
