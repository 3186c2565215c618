use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use super::SkipRead;

/// Concrete archive input source for the CLI: a local file, standard input,
/// or either of those behind a gzip decoder.
pub enum Input {
    File(File),
    Stdin(io::Stdin),
    GzFile(GzDecoder<File>),
    GzStdin(GzDecoder<io::Stdin>),
}

impl Input {
    /// Open the input named on the command line.
    ///
    /// `spec` is a filesystem path, or `-` for standard input. Gzip wrapping
    /// is applied when `force_gzip` is set or the file name looks compressed
    /// (`.tar.gz` / `.tgz`).
    pub fn open(spec: &str, force_gzip: bool) -> io::Result<Self> {
        if spec == "-" {
            let stdin = io::stdin();
            return Ok(if force_gzip {
                Input::GzStdin(GzDecoder::new(stdin))
            } else {
                Input::Stdin(stdin)
            });
        }

        let file = File::open(Path::new(spec))?;
        Ok(if force_gzip || looks_gzipped(spec) {
            Input::GzFile(GzDecoder::new(file))
        } else {
            Input::File(file)
        })
    }
}

fn looks_gzipped(spec: &str) -> bool {
    let lower = spec.to_ascii_lowercase();
    lower.ends_with(".tar.gz") || lower.ends_with(".tgz") || lower.ends_with(".gz")
}

impl Read for Input {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Input::File(f) => f.read(buf),
            Input::Stdin(s) => s.read(buf),
            Input::GzFile(gz) => gz.read(buf),
            Input::GzStdin(gz) => gz.read(buf),
        }
    }
}

impl SkipRead for Input {
    fn skip(&mut self, n: u64) -> io::Result<()> {
        match self {
            // Only the plain file variant can seek past unwanted bytes
            Input::File(f) => f.skip(n),
            Input::Stdin(s) => s.skip(n),
            Input::GzFile(gz) => gz.skip(n),
            Input::GzStdin(gz) => gz.skip(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gzip_detection_by_extension() {
        assert!(looks_gzipped("layer.tar.gz"));
        assert!(looks_gzipped("backup.TGZ"));
        assert!(!looks_gzipped("plain.tar"));
        assert!(!looks_gzipped("-"));
    }
}
