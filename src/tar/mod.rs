//! Tar archive decoding and extraction.
//!
//! This module reads POSIX/GNU tar archives from any sequential byte source
//! and exposes their contents as a lazy sequence of entries.
//!
//! ## Architecture
//!
//! The module is organized into four components:
//!
//! - [`structures`]: Data structures for tar format elements (entry
//!   metadata, type flags, header field layout)
//! - [`parser`]: Low-level decoding of single 512-byte header blocks
//! - [`archive`]: The streaming cursor that sequences headers, content and
//!   padding, yielding bounded per-entry readers
//! - [`extractor`]: Filesystem materialization of an entry sequence
//!
//! ## Tar Format Overview
//!
//! A tar archive is a flat stream of 512-byte blocks:
//! 1. A header block per entry with fixed-offset ASCII fields (name, mode,
//!    size and mtime in octal, a checksum, a type flag, and on ustar
//!    archives a magic marker and a path prefix for long names)
//! 2. The entry content, zero-padded to the next block boundary
//! 3. One or more all-zero blocks marking the end of the archive
//!
//! There is no central directory and no random-access index: the format is
//! decoded strictly front to back, which is what makes it work over pipes
//! and decompression streams.
//!
//! ## Supported Features
//!
//! - Legacy (pre-POSIX) and ustar header variants
//! - Regular files, directories, and safe skipping of everything else
//!   (GNU long-name records, PAX extended headers, device nodes, FIFOs)
//! - Non-seekable sources, with seek-based skipping when available
//!
//! ## Limitations
//!
//! - No archive writing
//! - No interpretation of PAX attributes or GNU long names (such records
//!   are surfaced as skippable entries, not merged into their successors)
//! - No sparse files or multi-volume archives
//! - No symlink/hardlink materialization

mod archive;
mod extractor;
mod parser;
mod structures;

pub use archive::{Archive, Entry};
pub use extractor::{Extractor, UnpackSummary, UnsupportedPolicy, Written};
pub use parser::parse_header;
pub use structures::*;
