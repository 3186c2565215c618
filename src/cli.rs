use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "runtar")]
#[command(version)]
#[command(about = "A Rust untar utility with streaming input and gzip support", long_about = None)]
#[command(after_help = "Examples:\n  \
  runtar backup.tar -x notes.txt      extract all files except notes.txt\n  \
  runtar -l layer.tar.gz              list files from a gzipped archive\n  \
  cat backup.tar | runtar -           extract an archive arriving on stdin")]
pub struct Cli {
    /// tar file path, or '-' to read from stdin
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Members to extract (default: all)
    #[arg(value_name = "MEMBERS")]
    pub members: Vec<String>,

    /// List files (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract files to pipe, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Extract files into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Exclude files that follow
    #[arg(short = 'x', value_name = "FILE", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Treat the input as gzip-compressed regardless of its name
    #[arg(short = 'z')]
    pub gzip: bool,

    /// Fail on unsupported entry types instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_stdin(&self) -> bool {
        self.file == "-"
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }
}
