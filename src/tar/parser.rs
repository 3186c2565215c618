//! Low-level tar header codec.
//!
//! This module decodes single 512-byte header blocks into structured entry
//! metadata, independent of any stream sequencing.
//!
//! ## Parsing Strategy
//!
//! A tar archive is a flat sequence of 512-byte blocks:
//! 1. One header block per entry, with fixed-offset ASCII fields
//! 2. The entry's content, zero-padded up to the next block boundary
//! 3. One or more all-zero blocks terminating the archive
//!
//! The codec here looks at exactly one block at a time and classifies it as
//! a real entry header, the end-of-archive marker, or malformed. Walking the
//! archive and skipping content is the cursor's job
//! (see [`Archive`](super::Archive)).
//!
//! ## Validation
//!
//! The header checksum is the primary corruption detector: it is the
//! unsigned sum of all 512 header bytes with the checksum field itself
//! counted as ASCII spaces. A block that is not all-zero and does not carry
//! a matching checksum is rejected, as is any numeric field containing
//! non-octal, non-padding bytes.

use crate::error::{Result, TarError};

use super::structures::*;

/// Decode one 512-byte header block.
///
/// # Returns
///
/// - [`HeaderBlock::EndMarker`] for an all-zero block
/// - [`HeaderBlock::Entry`] for a header that passes checksum and field
///   validation
///
/// # Errors
///
/// [`TarError::MalformedHeader`] when the checksum does not match or a
/// numeric field is not valid octal.
pub fn parse_header(block: &[u8; BLOCK_SIZE]) -> Result<HeaderBlock> {
    if block.iter().all(|&b| b == 0) {
        return Ok(HeaderBlock::EndMarker);
    }

    let stored = parse_octal(&block[CHECKSUM])?;
    let computed = blank_checksum_sum(block);
    if stored != computed {
        return Err(TarError::malformed(format!(
            "checksum mismatch (stored {stored}, computed {computed})"
        )));
    }

    let ustar = &block[MAGIC] == USTAR_MAGIC;
    let name = effective_name(block, ustar);
    if name.is_empty() {
        return Err(TarError::malformed("entry has an empty name"));
    }

    let flag = block[TYPEFLAG];
    let mut entry_type = EntryType::from_flag(flag);
    // Pre-ustar archives mark directories only with a trailing slash
    if entry_type == EntryType::Regular && name.ends_with('/') {
        entry_type = EntryType::Directory;
    }

    let link_name = match parse_string(&block[LINK_NAME]) {
        s if s.is_empty() => None,
        s => Some(s),
    };

    Ok(HeaderBlock::Entry(EntryInfo {
        name,
        entry_type,
        size: parse_octal(&block[SIZE])?,
        mode: parse_octal(&block[MODE])? as u32,
        uid: parse_octal(&block[UID])?,
        gid: parse_octal(&block[GID])?,
        mtime: parse_octal(&block[MTIME])?,
        link_name,
        ustar,
    }))
}

/// Parse a variable-width ASCII octal field.
///
/// Fields are NUL- or space-padded on either side depending on the writer;
/// both are accepted. An all-padding field reads as zero. Any byte that is
/// neither padding nor an octal digit makes the field malformed.
fn parse_octal(field: &[u8]) -> Result<u64> {
    let mut value: u64 = 0;
    let mut iter = field.iter().copied().peekable();

    // leading padding
    while matches!(iter.peek(), Some(b' ') | Some(0)) {
        iter.next();
    }
    // digits
    while let Some(&b) = iter.peek() {
        if !b.is_ascii_digit() {
            break;
        }
        if b > b'7' {
            return Err(TarError::malformed(format!(
                "non-octal digit {:?} in numeric field",
                b as char
            )));
        }
        value = value
            .checked_mul(8)
            .and_then(|v| v.checked_add((b - b'0') as u64))
            .ok_or_else(|| TarError::malformed("numeric field overflows 64 bits"))?;
        iter.next();
    }
    // trailing padding only
    for b in iter {
        if b != b' ' && b != 0 {
            return Err(TarError::malformed(format!(
                "unexpected byte {b:#04x} in numeric field"
            )));
        }
    }

    Ok(value)
}

/// Read a NUL-terminated string field, lossily decoding non-UTF8 bytes
fn parse_string(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// Sum of all header bytes with the checksum field counted as ASCII spaces
fn blank_checksum_sum(block: &[u8; BLOCK_SIZE]) -> u64 {
    let mut sum: u64 = 0;
    for (i, &b) in block.iter().enumerate() {
        if CHECKSUM.contains(&i) {
            sum += b' ' as u64;
        } else {
            sum += b as u64;
        }
    }
    sum
}

/// Assemble the effective relative path for a header.
///
/// ustar headers may split long paths across the prefix and name fields; the
/// effective path is `prefix/name` when the prefix is populated. Leading
/// separators are stripped so archive paths are always relative.
fn effective_name(block: &[u8; BLOCK_SIZE], ustar: bool) -> String {
    let name = parse_string(&block[NAME]);
    let full = if ustar {
        let prefix = parse_string(&block[PREFIX]);
        if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        }
    } else {
        name
    };
    full.trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header(name: &str, size: u64, typeflag: u8) -> [u8; BLOCK_SIZE] {
        let mut block = [0u8; BLOCK_SIZE];
        block[..name.len()].copy_from_slice(name.as_bytes());
        block[MODE][..7].copy_from_slice(b"0000644");
        block[UID][..7].copy_from_slice(b"0000000");
        block[GID][..7].copy_from_slice(b"0000000");
        let size_field = format!("{size:011o}");
        block[SIZE][..11].copy_from_slice(size_field.as_bytes());
        block[MTIME][..11].copy_from_slice(b"14236173255");
        block[TYPEFLAG] = typeflag;
        block[257..265].copy_from_slice(b"ustar\x0000");
        let sum = blank_checksum_sum(&block);
        let checksum_field = format!("{sum:06o}\0 ");
        block[CHECKSUM].copy_from_slice(checksum_field.as_bytes());
        block
    }

    #[test]
    fn zero_block_is_end_marker() {
        let block = [0u8; BLOCK_SIZE];
        assert!(matches!(parse_header(&block), Ok(HeaderBlock::EndMarker)));
    }

    #[test]
    fn valid_header_decodes() {
        let block = sample_header("dir/file.txt", 1234, b'0');
        let HeaderBlock::Entry(info) = parse_header(&block).unwrap() else {
            panic!("expected an entry");
        };
        assert_eq!(info.name, "dir/file.txt");
        assert_eq!(info.size, 1234);
        assert_eq!(info.mode, 0o644);
        assert_eq!(info.entry_type, EntryType::Regular);
        assert!(info.ustar);
        assert_eq!(info.link_name, None);
    }

    #[test]
    fn checksum_mismatch_is_malformed() {
        let mut block = sample_header("a.txt", 10, b'0');
        block[0] ^= 0xff;
        let err = parse_header(&block).unwrap_err();
        assert!(matches!(err, TarError::MalformedHeader { .. }));
    }

    #[test]
    fn garbage_in_size_field_is_malformed() {
        let mut block = sample_header("a.txt", 10, b'0');
        block[SIZE][3] = b'9';
        // re-stamp the checksum so the octal field is what fails
        let sum = blank_checksum_sum(&block);
        let field = format!("{sum:06o}\0 ");
        block[CHECKSUM].copy_from_slice(field.as_bytes());
        assert!(matches!(
            parse_header(&block),
            Err(TarError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn octal_accepts_space_and_nul_padding() {
        assert_eq!(parse_octal(b"  644 \0\0").unwrap(), 0o644);
        assert_eq!(parse_octal(b"0000644\0").unwrap(), 0o644);
        assert_eq!(parse_octal(b"644     ").unwrap(), 0o644);
        assert_eq!(parse_octal(b"\0\0\0\0\0\0\0\0").unwrap(), 0);
        assert_eq!(parse_octal(b"        ").unwrap(), 0);
    }

    #[test]
    fn octal_rejects_stray_bytes() {
        assert!(parse_octal(b"00x44\0\0\0").is_err());
        assert!(parse_octal(b"0644\0 9\0").is_err());
        assert!(parse_octal(b"0698\0\0\0\0").is_err());
    }

    #[test]
    fn prefix_joins_into_name() {
        let mut block = sample_header("leaf.txt", 0, b'0');
        block[PREFIX][..9].copy_from_slice(b"some/deep");
        let sum = blank_checksum_sum(&block);
        let field = format!("{sum:06o}\0 ");
        block[CHECKSUM].copy_from_slice(field.as_bytes());

        let HeaderBlock::Entry(info) = parse_header(&block).unwrap() else {
            panic!("expected an entry");
        };
        assert_eq!(info.name, "some/deep/leaf.txt");
    }

    #[test]
    fn absolute_names_become_relative() {
        let block = sample_header("/etc/passwd", 0, b'0');
        let HeaderBlock::Entry(info) = parse_header(&block).unwrap() else {
            panic!("expected an entry");
        };
        assert_eq!(info.name, "etc/passwd");
    }

    #[test]
    fn trailing_slash_without_ustar_flag_is_directory() {
        let block = sample_header("b/", 0, 0);
        let HeaderBlock::Entry(info) = parse_header(&block).unwrap() else {
            panic!("expected an entry");
        };
        assert_eq!(info.entry_type, EntryType::Directory);
    }

    #[test]
    fn unknown_typeflag_is_preserved() {
        let block = sample_header("pax-header", 100, b'x');
        let HeaderBlock::Entry(info) = parse_header(&block).unwrap() else {
            panic!("expected an entry");
        };
        assert_eq!(info.entry_type, EntryType::Other(b'x'));
        assert_eq!(info.content_size(), 100);
    }

    #[test]
    fn symlink_records_link_target() {
        let mut block = sample_header("link", 0, b'2');
        block[LINK_NAME][..6].copy_from_slice(b"target");
        let sum = blank_checksum_sum(&block);
        let field = format!("{sum:06o}\0 ");
        block[CHECKSUM].copy_from_slice(field.as_bytes());

        let HeaderBlock::Entry(info) = parse_header(&block).unwrap() else {
            panic!("expected an entry");
        };
        assert_eq!(info.entry_type, EntryType::Symlink);
        assert_eq!(info.link_name.as_deref(), Some("target"));
    }
}
