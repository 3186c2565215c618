//! Streaming archive cursor.
//!
//! [`Archive`] owns the underlying byte source and walks it one entry at a
//! time. The walk is lazy, forward-only and single-pass: each call to
//! [`Archive::next_entry`] first steps over whatever the caller left unread
//! of the previous entry (content remainder plus zero padding up to the next
//! block boundary), then decodes the next header block.
//!
//! Entries are yielded as [`Entry`] values implementing [`Read`], bounded to
//! the declared content size. An entry borrows the archive mutably, so
//! reading entry content and advancing the cursor can never interleave.

use std::io::{self, Read};

use crate::error::{Result, TarError};
use crate::io::SkipRead;

use super::parser::parse_header;
use super::structures::{BLOCK_SIZE, EntryInfo, HeaderBlock};

/// Cursor over a tar byte stream.
///
/// ## Example
///
/// ```no_run
/// use std::fs::File;
/// use runtar::Archive;
///
/// fn main() -> runtar::Result<()> {
///     let file = File::open("backup.tar")?;
///     let mut archive = Archive::new(file);
///     while let Some(entry) = archive.next_entry()? {
///         println!("{} ({} bytes)", entry.info().name, entry.size());
///     }
///     Ok(())
/// }
/// ```
pub struct Archive<R: SkipRead> {
    reader: R,
    /// Unread content bytes of the most recently yielded entry
    remaining: u64,
    /// Zero padding between that content and the next block boundary
    pad: u64,
    /// Set once the end marker (or clean EOF) has been seen
    done: bool,
    /// Set once a malformed header or truncation has been seen
    poisoned: bool,
}

impl<R: SkipRead> Archive<R> {
    /// Create a cursor positioned at the start of the stream.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            remaining: 0,
            pad: 0,
            done: false,
            poisoned: false,
        }
    }

    /// Advance to the next entry.
    ///
    /// Returns `Ok(None)` once the end-of-archive marker has been reached,
    /// or when the stream ends cleanly at a block boundary where a header
    /// was expected (archives missing their terminator blocks are common
    /// enough that this is not treated as corruption).
    ///
    /// # Errors
    ///
    /// - [`TarError::MalformedHeader`] for a checksum or field failure
    /// - [`TarError::UnexpectedTruncation`] for a partial header block or a
    ///   stream that ends inside entry content
    /// - [`TarError::Io`] for errors from the underlying source
    ///
    /// All three poison the cursor: once an error has been returned, no
    /// further entries can be produced from this archive.
    pub fn next_entry(&mut self) -> Result<Option<Entry<'_, R>>> {
        if self.done {
            return Ok(None);
        }
        if self.poisoned {
            return Err(TarError::malformed("archive cursor is in a failed state"));
        }

        match self.advance() {
            Ok(Some(info)) => {
                self.remaining = info.content_size();
                self.pad = info.padding();
                Ok(Some(Entry {
                    info,
                    archive: self,
                }))
            }
            Ok(None) => {
                self.done = true;
                Ok(None)
            }
            Err(err) => {
                self.poisoned = true;
                Err(err)
            }
        }
    }

    fn advance(&mut self) -> Result<Option<EntryInfo>> {
        // Step over whatever the caller did not consume
        let leftover = self.remaining + self.pad;
        if leftover > 0 {
            self.reader.skip(leftover).map_err(truncation_or_io)?;
            self.remaining = 0;
            self.pad = 0;
        }

        let mut block = [0u8; BLOCK_SIZE];
        match read_block(&mut self.reader, &mut block)? {
            0 => return Ok(None), // clean EOF at a block boundary
            n if n < BLOCK_SIZE => return Err(TarError::UnexpectedTruncation),
            _ => {}
        }

        match parse_header(&block)? {
            HeaderBlock::Entry(info) => Ok(Some(info)),
            HeaderBlock::EndMarker => Ok(None),
        }
    }

    /// Consume the cursor, returning the underlying source.
    ///
    /// The source is left wherever iteration stopped; there is no rewinding.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Read up to one full block, tolerating short reads from the source
fn read_block<R: Read>(reader: &mut R, block: &mut [u8; BLOCK_SIZE]) -> Result<usize> {
    let mut filled = 0;
    while filled < BLOCK_SIZE {
        let got = reader.read(&mut block[filled..])?;
        if got == 0 {
            break;
        }
        filled += got;
    }
    Ok(filled)
}

fn truncation_or_io(err: io::Error) -> TarError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        TarError::UnexpectedTruncation
    } else {
        TarError::Io(err)
    }
}

/// A single archive entry: its decoded metadata plus a bounded reader over
/// its content.
///
/// Reads return end-of-data exactly at the declared size; padding bytes and
/// the next header are never visible through an entry. Dropping an entry
/// before draining it is safe; the cursor skips the remainder before
/// decoding the next header.
pub struct Entry<'a, R: SkipRead> {
    info: EntryInfo,
    archive: &'a mut Archive<R>,
}

impl<R: SkipRead> std::fmt::Debug for Entry<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl<'a, R: SkipRead> Entry<'a, R> {
    /// Decoded entry metadata
    pub fn info(&self) -> &EntryInfo {
        &self.info
    }

    /// Declared content length in bytes
    pub fn size(&self) -> u64 {
        self.info.size
    }

    /// Give up the content reader, keeping only the metadata.
    pub fn into_info(self) -> EntryInfo {
        self.info
    }
}

impl<'a, R: SkipRead> Read for Entry<'a, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.archive.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let want = (buf.len() as u64).min(self.archive.remaining) as usize;
        let got = self.archive.reader.read(&mut buf[..want])?;
        if got == 0 {
            // Declared size extends past the end of the stream
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "archive ended inside entry content",
            ));
        }
        self.archive.remaining -= got as u64;
        Ok(got)
    }
}
