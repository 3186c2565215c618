//! Main entry point for the runtar CLI application.
//!
//! This binary provides a command-line interface for listing and extracting
//! tar archives from local files, gzipped files, or standard input.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::Path;

use runtar::tar::Written;
use runtar::{Archive, Cli, EntryInfo, EntryType, Extractor, Input, SkipRead, UnsupportedPolicy};

/// Application entry point.
///
/// Parses command-line arguments, opens the archive source (plain or
/// gzip-wrapped, file or stdin) and dispatches to listing or extraction.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let input = Input::open(&cli.file, cli.gzip)
        .with_context(|| format!("cannot open {:?}", cli.file))?;
    let mut archive = Archive::new(input);

    if cli.list || cli.verbose {
        list_files(&mut archive, cli.verbose)
    } else {
        extract(&mut archive, &cli)
    }
}

/// List the entries of the archive.
///
/// Supports two output formats:
/// - Simple format (`-l`): just entry names, one per line
/// - Verbose format (`-v`): mode, size and timestamp columns with a
///   summary line
fn list_files<R: SkipRead>(archive: &mut Archive<R>, verbose: bool) -> Result<()> {
    if verbose {
        println!("{:<10}  {:>10}  {:>10}  {:>5}  Name", "Mode", "Size", "Date", "Time");
        println!("{}", "-".repeat(60));
    }

    let mut total_size = 0u64;
    let mut file_count = 0usize;

    while let Some(entry) = archive.next_entry()? {
        let info = entry.info();
        if verbose {
            let (year, month, day) = info.mod_date();
            let (hour, minute, _second) = info.mod_time();
            println!(
                "{}  {:>10}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
                format_mode(info),
                info.size,
                year,
                month,
                day,
                hour,
                minute,
                info.name
            );
            if info.is_regular() {
                total_size += info.size;
                file_count += 1;
            }
        } else {
            println!("{}", info.name);
        }
        // the entry is dropped unread; the cursor skips its content
    }

    if verbose {
        println!("{}", "-".repeat(60));
        println!("{:<10}  {:>10}  {:>19}  {} files", "", total_size, "", file_count);
    }

    Ok(())
}

/// Extract archive entries based on CLI options.
///
/// Entries stream past exactly once; anything filtered out is skipped
/// without reading its content. Handles:
/// - Pipe mode (`-p`): write file contents to stdout
/// - Custom destination (`-d`): extract into the given directory
/// - Member selection and exclusion (positional args, `-x`)
/// - Unsupported entry types: skip with a warning, or fail under `--strict`
fn extract<R: SkipRead>(archive: &mut Archive<R>, cli: &Cli) -> Result<()> {
    let root = cli.extract_dir.as_deref().unwrap_or(".");
    let policy = if cli.strict {
        UnsupportedPolicy::Fail
    } else {
        UnsupportedPolicy::Skip
    };
    let extractor = Extractor::new(root).unsupported(policy);

    let mut piped_files = 0usize;

    while let Some(mut entry) = archive.next_entry()? {
        let name = entry.info().name.clone();

        if !is_selected(cli, &name, entry.info().entry_type) {
            continue; // dropped unread; the cursor skips the content
        }

        if cli.pipe {
            if entry.info().is_regular() {
                let mut stdout = io::stdout();
                // Separate files with a marker when more than one member
                // ends up on the same pipe
                if piped_files > 0 || cli.members.len() != 1 {
                    stdout.write_all(format!("--- {name} ---\n").as_bytes())?;
                }
                io::copy(&mut entry, &mut stdout)?;
                piped_files += 1;
            }
            continue;
        }

        match extractor.write_entry(&mut entry)? {
            Written::File(_) => {
                if !cli.is_quiet() {
                    println!("  extracting: {name}");
                }
            }
            Written::Dir(_) => {}
            Written::Skipped => {
                if !cli.is_very_quiet() {
                    eprintln!("Skipping: {name} (unsupported entry type)");
                }
            }
        }
    }

    Ok(())
}

/// Decide whether an entry passes the member-selection and exclusion
/// filters.
///
/// Selection follows unzip conventions: a member argument matches on the
/// full path, the basename, or as a glob pattern. When explicit members are
/// requested, directory entries are skipped (parents are created on demand
/// during extraction anyway).
fn is_selected(cli: &Cli, name: &str, entry_type: EntryType) -> bool {
    if !cli.members.is_empty() {
        if entry_type == EntryType::Directory {
            return false;
        }
        let matches = cli.members.iter().any(|m| {
            if has_glob_chars(m) {
                glob_match(m, name)
            } else {
                let basename = Path::new(name)
                    .file_name()
                    .map(|s| s.to_string_lossy())
                    .unwrap_or_default();
                name == *m || basename == *m
            }
        });
        if !matches {
            return false;
        }
    }

    !cli.exclude
        .iter()
        .any(|x| name.contains(x.as_str()) || glob_match(x, name))
}

/// Render an `ls -l` style mode column for an entry
fn format_mode(info: &EntryInfo) -> String {
    let kind = match info.entry_type {
        EntryType::Regular => '-',
        EntryType::Directory => 'd',
        EntryType::Symlink => 'l',
        EntryType::HardLink => 'h',
        EntryType::Other(_) => '?',
    };
    let mut out = String::with_capacity(10);
    out.push(kind);
    for shift in [6u32, 3, 0] {
        let bits = (info.mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

/// Check if a pattern contains glob wildcard characters.
fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
///
/// Iterative two-pointer matcher: on mismatch after a `*`, back up to the
/// star and let it swallow one more character.
fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();

    let (mut pi, mut ti) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut mark = 0usize;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some(pi);
            mark = ti;
            pi += 1;
        } else if let Some(s) = star {
            pi = s + 1;
            mark += 1;
            ti = mark;
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_star_and_question() {
        assert!(glob_match("*.txt", "readme.txt"));
        assert!(glob_match("file?.dat", "file1.dat"));
        assert!(glob_match("a/*/c", "a/b/c"));
        assert!(glob_match("**", "anything/at/all"));
        assert!(!glob_match("*.txt", "readme.md"));
        assert!(!glob_match("file?.dat", "file12.dat"));
    }

    #[test]
    fn glob_literal_match() {
        assert!(glob_match("exact", "exact"));
        assert!(!glob_match("exact", "exactly"));
    }

    #[test]
    fn mode_column_renders_bits() {
        let info = EntryInfo {
            name: "f".into(),
            entry_type: EntryType::Regular,
            size: 0,
            mode: 0o644,
            uid: 0,
            gid: 0,
            mtime: 0,
            link_name: None,
            ustar: true,
        };
        assert_eq!(format_mode(&info), "-rw-r--r--");

        let dir = EntryInfo {
            entry_type: EntryType::Directory,
            mode: 0o755,
            ..info
        };
        assert_eq!(format_mode(&dir), "drwxr-xr-x");
    }
}
