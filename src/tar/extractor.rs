use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use log::{debug, warn};

use crate::error::{Result, TarError};
use crate::io::SkipRead;

use super::archive::{Archive, Entry};
use super::structures::EntryType;

/// What to do with entry types the extractor cannot materialize
/// (symlinks, hardlinks, device nodes, extension records).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedPolicy {
    /// Log a warning, record the entry in the summary, keep going
    #[default]
    Skip,
    /// Abort extraction with [`TarError::UnsupportedEntryType`]
    Fail,
}

/// Counters and skip records accumulated over one extraction run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnpackSummary {
    pub files: usize,
    pub dirs: usize,
    /// Names of entries skipped under [`UnsupportedPolicy::Skip`]
    pub skipped: Vec<String>,
}

/// Materializes archive entries under a destination root.
pub struct Extractor {
    root: PathBuf,
    policy: UnsupportedPolicy,
}

impl Extractor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            policy: UnsupportedPolicy::default(),
        }
    }

    /// Set the policy for unsupported entry types
    pub fn unsupported(mut self, policy: UnsupportedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Extract every remaining entry of `archive` under the destination root.
    pub fn unpack<R: SkipRead>(&self, archive: &mut Archive<R>) -> Result<UnpackSummary> {
        let mut summary = UnpackSummary::default();
        while let Some(mut entry) = archive.next_entry()? {
            match self.write_entry(&mut entry)? {
                Written::File(_) => summary.files += 1,
                Written::Dir(_) => summary.dirs += 1,
                Written::Skipped => summary.skipped.push(entry.info().name.clone()),
            }
        }
        Ok(summary)
    }

    /// Materialize a single entry.
    ///
    /// Directories are created (idempotently, including intermediates);
    /// regular files are written byte-for-byte, overwriting anything already
    /// at the destination. Unsupported types follow the configured policy.
    pub fn write_entry<R: SkipRead>(&self, entry: &mut Entry<'_, R>) -> Result<Written> {
        let name = entry.info().name.clone();
        let dest = self.resolve(&name)?;

        match entry.info().entry_type {
            EntryType::Directory => {
                fs::create_dir_all(&dest)?;
                debug!("created directory {}", dest.display());
                Ok(Written::Dir(dest))
            }
            EntryType::Regular => {
                if let Some(parent) = dest.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                let mut file = File::create(&dest)?;
                io::copy(entry, &mut file).map_err(|err| {
                    if err.kind() == io::ErrorKind::UnexpectedEof {
                        TarError::UnexpectedTruncation
                    } else {
                        TarError::Io(err)
                    }
                })?;
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let mode = entry.info().mode & 0o7777;
                    if mode != 0 {
                        fs::set_permissions(&dest, fs::Permissions::from_mode(mode))?;
                    }
                }
                debug!("wrote {} ({} bytes)", dest.display(), entry.size());
                Ok(Written::File(dest))
            }
            kind => match self.policy {
                UnsupportedPolicy::Skip => {
                    warn!("skipping {:?}: unsupported entry type {:?}", name, kind);
                    Ok(Written::Skipped)
                }
                UnsupportedPolicy::Fail => Err(TarError::UnsupportedEntryType {
                    name,
                    flag: kind.as_flag(),
                }),
            },
        }
    }

    /// Resolve an archive path against the destination root.
    ///
    /// Normalization is component-wise and purely lexical: root and prefix
    /// components are dropped, `.` is ignored, and `..` is rejected outright
    /// rather than resolved, so the result always stays inside the root.
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let mut rel = PathBuf::new();
        for component in Path::new(name).components() {
            match component {
                Component::Normal(part) => rel.push(part),
                Component::CurDir => {}
                Component::RootDir | Component::Prefix(_) => {}
                Component::ParentDir => {
                    return Err(TarError::PathEscape {
                        name: name.to_string(),
                    });
                }
            }
        }

        let dest = self.root.join(rel);
        // Containment restated as a check, in case the lexical rules above
        // ever miss a platform-specific path form
        if !dest.starts_with(&self.root) {
            return Err(TarError::PathEscape {
                name: name.to_string(),
            });
        }
        Ok(dest)
    }
}

/// Outcome of materializing one entry
#[derive(Debug)]
pub enum Written {
    File(PathBuf),
    Dir(PathBuf),
    Skipped,
}
