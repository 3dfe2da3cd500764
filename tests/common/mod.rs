//! Shared fixtures for integration tests.

#![allow(dead_code)]

use bulk_media_importer::catalog::SqliteCatalogStore;
use bulk_media_importer::uploader::{MediaUploader, UploadError};
use rusqlite::{params, Connection};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Minimal slice of the media server's catalog schema, just the columns
/// the importer queries.
pub const CATALOG_SCHEMA_SQL: &str = r#"
    CREATE TABLE cc_files (
        id INTEGER PRIMARY KEY,
        md5 TEXT NOT NULL
    );
    CREATE TABLE cc_track_types (
        id INTEGER PRIMARY KEY,
        code TEXT NOT NULL
    );
"#;

/// Create a catalog database at `path` with the given file hashes and
/// track type codes, and open a store over it.
pub fn seed_catalog(path: &Path, md5s: &[&str], track_types: &[&str]) -> SqliteCatalogStore {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(CATALOG_SCHEMA_SQL).unwrap();
    for md5 in md5s {
        conn.execute("INSERT INTO cc_files (md5) VALUES (?1)", params![md5])
            .unwrap();
    }
    for code in track_types {
        conn.execute(
            "INSERT INTO cc_track_types (code) VALUES (?1)",
            params![code],
        )
        .unwrap();
    }
    drop(conn);

    SqliteCatalogStore::open(path).unwrap()
}

/// Uploader fake that records every upload, optionally failing on one
/// file name with an HTTP 500.
pub struct RecordingUploader {
    pub uploads: Mutex<Vec<(PathBuf, Option<String>)>>,
    fail_on: Option<OsString>,
}

impl RecordingUploader {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing_on(file_name: &str) -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            fail_on: Some(OsString::from(file_name)),
        }
    }

    pub fn uploaded_file_names(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| {
                path.file_name()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }
}

impl MediaUploader for RecordingUploader {
    fn upload(&self, path: &Path, track_type: Option<&str>) -> Result<(), UploadError> {
        if let Some(fail_on) = &self.fail_on {
            if path.file_name() == Some(fail_on.as_os_str()) {
                return Err(UploadError::Status {
                    path: path.to_path_buf(),
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                });
            }
        }

        self.uploads
            .lock()
            .unwrap()
            .push((path.to_path_buf(), track_type.map(|s| s.to_string())));
        Ok(())
    }
}

/// Write a file under `dir` and return its path.
pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}
