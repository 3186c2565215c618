mod local;

pub use local::Input;

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// Scratch buffer size used when skipping bytes on non-seekable sources
const SKIP_BUF_LEN: usize = 8 * 1024;

/// Trait for sequential byte sources that can discard data ahead of the
/// current position.
///
/// Every source gets a working read-and-discard implementation for free;
/// seekable sources override [`skip`](SkipRead::skip) to jump without
/// touching the intervening bytes. Seeking is an optimization only: the
/// archive decoder never requires it.
pub trait SkipRead: Read {
    /// Discard exactly `n` bytes.
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] if the source ends before
    /// `n` bytes could be discarded.
    fn skip(&mut self, n: u64) -> io::Result<()> {
        skip_via_read(self, n)
    }
}

/// Read-and-discard fallback for sources without random access
fn skip_via_read<R: Read + ?Sized>(reader: &mut R, mut n: u64) -> io::Result<()> {
    let mut buf = [0u8; SKIP_BUF_LEN];
    while n > 0 {
        let want = n.min(SKIP_BUF_LEN as u64) as usize;
        let got = reader.read(&mut buf[..want])?;
        if got == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "archive ended while skipping entry data",
            ));
        }
        n -= got as u64;
    }
    Ok(())
}

impl SkipRead for File {
    fn skip(&mut self, n: u64) -> io::Result<()> {
        // Seeking past EOF succeeds silently, so bounds-check against the
        // file length to keep truncation detection intact.
        let pos = self.stream_position()?;
        let len = self.metadata()?.len();
        if len.saturating_sub(pos) < n {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "archive ended while skipping entry data",
            ));
        }
        self.seek(SeekFrom::Current(n as i64))?;
        Ok(())
    }
}

impl<T: AsRef<[u8]>> SkipRead for Cursor<T> {
    fn skip(&mut self, n: u64) -> io::Result<()> {
        let len = self.get_ref().as_ref().len() as u64;
        if len.saturating_sub(self.position()) < n {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "archive ended while skipping entry data",
            ));
        }
        self.set_position(self.position() + n);
        Ok(())
    }
}

// Decompressed output has no meaningful seek offset; fall back to draining.
impl<R: Read> SkipRead for flate2::read::GzDecoder<R> {}

impl SkipRead for io::Stdin {}

impl SkipRead for &[u8] {}

impl<T: SkipRead + ?Sized> SkipRead for &mut T {
    fn skip(&mut self, n: u64) -> io::Result<()> {
        (**self).skip(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_skip_moves_position() {
        let mut cur = Cursor::new(vec![0u8; 100]);
        cur.skip(60).unwrap();
        assert_eq!(cur.position(), 60);
        let mut rest = Vec::new();
        cur.read_to_end(&mut rest).unwrap();
        assert_eq!(rest.len(), 40);
    }

    #[test]
    fn cursor_skip_past_end_is_truncation() {
        let mut cur = Cursor::new(vec![0u8; 10]);
        let err = cur.skip(11).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn fallback_skip_drains_exactly() {
        // &[u8] uses the read-and-discard default
        let data = vec![7u8; 20_000];
        let mut src: &[u8] = &data;
        src.skip(9_999).unwrap();
        assert_eq!(src.len(), 10_001);
    }
}
