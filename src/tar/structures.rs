use std::ops::Range;

/// Size of one tar block; every offset in the container is a multiple of this
pub const BLOCK_SIZE: usize = 512;

/// ustar magic at [`MAGIC`]: POSIX writes `ustar\0`, old GNU writes `ustar `
pub const USTAR_MAGIC: &[u8] = b"ustar";

// Fixed field layout of a header block
pub(crate) const NAME: Range<usize> = 0..100;
pub(crate) const MODE: Range<usize> = 100..108;
pub(crate) const UID: Range<usize> = 108..116;
pub(crate) const GID: Range<usize> = 116..124;
pub(crate) const SIZE: Range<usize> = 124..136;
pub(crate) const MTIME: Range<usize> = 136..148;
pub(crate) const CHECKSUM: Range<usize> = 148..156;
pub(crate) const TYPEFLAG: usize = 156;
pub(crate) const LINK_NAME: Range<usize> = 157..257;
pub(crate) const MAGIC: Range<usize> = 257..262;
pub(crate) const PREFIX: Range<usize> = 345..500;

/// Entry type decoded from the header's typeflag byte.
///
/// The set is deliberately closed over the kinds the extractor understands,
/// plus [`Other`](EntryType::Other) carrying the raw flag byte for everything
/// else (FIFOs, device nodes, GNU long-name records, PAX extended headers).
/// `Other` entries are always skippable: their declared size tells the cursor
/// how much content to step over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Regular,
    Directory,
    Symlink,
    HardLink,
    Other(u8),
}

impl EntryType {
    pub fn from_flag(flag: u8) -> Self {
        match flag {
            // '7' (contiguous file) has always been read back as a regular file
            0 | b'0' | b'7' => EntryType::Regular,
            b'5' => EntryType::Directory,
            b'2' => EntryType::Symlink,
            b'1' => EntryType::HardLink,
            other => EntryType::Other(other),
        }
    }

    pub fn as_flag(&self) -> u8 {
        match self {
            EntryType::Regular => b'0',
            EntryType::Directory => b'5',
            EntryType::Symlink => b'2',
            EntryType::HardLink => b'1',
            EntryType::Other(flag) => *flag,
        }
    }
}

/// Decoded header block classification.
///
/// A block is either a real entry header or the all-zero block that
/// terminates the archive. Malformed blocks are reported as errors by the
/// parser rather than modeled here.
#[derive(Debug)]
pub enum HeaderBlock {
    Entry(EntryInfo),
    EndMarker,
}

/// Parsed tar entry metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Effective relative path (ustar prefix already joined, leading
    /// separators stripped)
    pub name: String,
    pub entry_type: EntryType,
    /// Declared content length in bytes
    pub size: u64,
    /// Permission bits
    pub mode: u32,
    pub uid: u64,
    pub gid: u64,
    /// Modification time, seconds since the Unix epoch
    pub mtime: u64,
    /// Link target for symlink/hardlink entries
    pub link_name: Option<String>,
    /// Whether the header carried the ustar magic
    pub ustar: bool,
}

impl EntryInfo {
    pub fn is_regular(&self) -> bool {
        self.entry_type == EntryType::Regular
    }

    pub fn is_directory(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    /// Length of the content region that follows this header in the stream.
    ///
    /// Directories and link entries carry no content regardless of their size
    /// field; unrecognized types keep their declared size so they can be
    /// skipped safely.
    pub fn content_size(&self) -> u64 {
        match self.entry_type {
            EntryType::Directory | EntryType::Symlink | EntryType::HardLink => 0,
            EntryType::Regular | EntryType::Other(_) => self.size,
        }
    }

    /// Zero padding between the end of the content region and the next block
    /// boundary
    pub fn padding(&self) -> u64 {
        let rem = self.content_size() % BLOCK_SIZE as u64;
        if rem == 0 { 0 } else { BLOCK_SIZE as u64 - rem }
    }

    /// Parse modification time to (year, month, day)
    pub fn mod_date(&self) -> (u16, u8, u8) {
        let days = self.mtime / 86_400;
        civil_from_days(days as i64)
    }

    /// Parse modification time to (hour, minute, second)
    pub fn mod_time(&self) -> (u8, u8, u8) {
        let secs = self.mtime % 86_400;
        let hour = (secs / 3600) as u8;
        let minute = (secs % 3600 / 60) as u8;
        let second = (secs % 60) as u8;
        (hour, minute, second)
    }
}

/// Convert days since the Unix epoch to a civil date (proleptic Gregorian)
fn civil_from_days(z: i64) -> (u16, u8, u8) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y as u16, m as u8, d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typeflag_round_trip() {
        assert_eq!(EntryType::from_flag(0), EntryType::Regular);
        assert_eq!(EntryType::from_flag(b'0'), EntryType::Regular);
        assert_eq!(EntryType::from_flag(b'5'), EntryType::Directory);
        assert_eq!(EntryType::from_flag(b'2'), EntryType::Symlink);
        assert_eq!(EntryType::from_flag(b'x'), EntryType::Other(b'x'));
        assert_eq!(EntryType::Other(b'L').as_flag(), b'L');
    }

    #[test]
    fn padding_rounds_to_block_boundary() {
        let mut info = EntryInfo {
            name: "f".into(),
            entry_type: EntryType::Regular,
            size: 10,
            mode: 0o644,
            uid: 0,
            gid: 0,
            mtime: 0,
            link_name: None,
            ustar: true,
        };
        assert_eq!(info.padding(), 502);
        info.size = 512;
        assert_eq!(info.padding(), 0);
        info.size = 0;
        assert_eq!(info.padding(), 0);
        info.size = 513;
        assert_eq!(info.padding(), 511);
    }

    #[test]
    fn link_entries_carry_no_content() {
        let info = EntryInfo {
            name: "l".into(),
            entry_type: EntryType::Symlink,
            size: 9, // some writers record the target length here
            mode: 0o777,
            uid: 0,
            gid: 0,
            mtime: 0,
            link_name: Some("target".into()),
            ustar: true,
        };
        assert_eq!(info.content_size(), 0);
        assert_eq!(info.padding(), 0);
    }

    #[test]
    fn mtime_decodes_to_civil_date() {
        let info = EntryInfo {
            name: "f".into(),
            entry_type: EntryType::Regular,
            size: 0,
            mode: 0o644,
            uid: 0,
            gid: 0,
            mtime: 1_700_000_000, // 2023-11-14 22:13:20 UTC
            link_name: None,
            ustar: true,
        };
        assert_eq!(info.mod_date(), (2023, 11, 14));
        assert_eq!(info.mod_time(), (22, 13, 20));
    }
}
