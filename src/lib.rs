//! Bulk media importer.
//!
//! Walks a directory tree, deduplicates files by content hash against a
//! catalog database, and uploads new files to a media server over HTTP.

pub mod catalog;
pub mod config;
pub mod hashing;
pub mod importer;
pub mod uploader;
