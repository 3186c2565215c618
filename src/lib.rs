//! # runtar
//!
//! A Rust untar utility with streaming input and gzip support.
//!
//! This library reads POSIX/GNU tar archives from any sequential byte
//! source (a file, a pipe, or a decompression stream) and exposes the
//! contents as a lazily-decoded sequence of entries, each readable as an
//! independent bounded stream. A convenience extractor materializes entries
//! onto the filesystem, with path-traversal protection.
//!
//! ## Features
//!
//! - Streaming, single-pass decoding: no seeking required, so archives can
//!   come from stdin or from a gzip decoder
//! - Opportunistic seek-based skipping when the source is a plain file
//! - Bounded per-entry readers: reading an entry can never leak padding or
//!   the next header, and abandoning an entry half-read is safe
//! - Checksum-validated headers with legacy and ustar variants
//! - Safe extraction: `..` traversal in archive paths is rejected
//!
//! ## Example
//!
//! ```no_run
//! use std::fs::File;
//! use runtar::{Archive, Extractor};
//!
//! fn main() -> runtar::Result<()> {
//!     let file = File::open("backup.tar")?;
//!     let mut archive = Archive::new(file);
//!
//!     let summary = Extractor::new("output").unpack(&mut archive)?;
//!     println!("{} files, {} directories", summary.files, summary.dirs);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod tar;

pub use cli::Cli;
pub use error::{Result, TarError};
pub use io::{Input, SkipRead};
pub use tar::{Archive, Entry, EntryInfo, EntryType, Extractor, UnpackSummary, UnsupportedPolicy};
