use clap::Parser;
use log::{info, warn};
use std::{fmt::Display, fmt::Formatter};

/// Default ceiling on the size of one buffer handed to the codec (50 MiB).
pub const DEFAULT_MAX_SIZE: usize = 50 * 1024 * 1024;

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct HuffOpts {
    /// Vec of names of files to read for input
    pub files: Vec<String>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Largest buffer (input, or decoded output) accepted
    pub max_size: usize,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Log the code table built for each file
    pub show_codes: bool,
}

impl HuffOpts {
    pub fn new() -> Self {
        Self {
            files: vec![],
            force_overwrite: false,
            keep_input_files: false,
            max_size: DEFAULT_MAX_SIZE,
            op_mode: Mode::Zip,
            output: Output::File,
            show_codes: false,
        }
    }
}

impl Default for HuffOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Byte oriented Huffman compressor",
    long_about = "
    Compresses each file with a single Huffman code built from that file's own byte
    frequencies. The code tree is stored in front of the packed data, so every .huf
    file can be decoded on its own."
)]
pub struct Args {
    /// Files to process
    #[clap(required = true)]
    files: Vec<String>,

    /// Compress the input files (default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Decompress the input files
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test")]
    test: bool,

    /// Keep input files
    #[clap(short = 'k', long = "keep")]
    keep: bool,

    /// Force overwriting output files
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Largest input (or decoded output) in bytes
    #[clap(short = 'm', long = "max-size", default_value_t = DEFAULT_MAX_SIZE)]
    max_size: usize,

    /// Log the code table generated for each file
    #[clap(short = 's', long = "show-codes")]
    show_codes: bool,

    /// Sets verbosity. -v0 is silent, -v5 is chatty
    #[clap(short = 'v', default_value_t = 3)]
    v: u8,
}

/// Parse the command line into HuffOpts and set the log level.
pub fn huffopts_init() -> HuffOpts {
    opts_from_args(Args::parse())
}

fn opts_from_args(args: Args) -> HuffOpts {
    let mut opts = HuffOpts::new();

    opts.files = args.files;
    if args.compress {
        opts.op_mode = Mode::Zip
    };
    if args.decompress {
        opts.op_mode = Mode::Unzip
    };
    if args.test {
        opts.op_mode = Mode::Test
    };
    opts.keep_input_files = args.keep;
    opts.force_overwrite = args.force;
    if args.stdout {
        opts.output = Output::Stdout
    };
    opts.max_size = args.max_size;
    opts.show_codes = args.show_codes;

    // Set the log level
    match args.v {
        0 => log::set_max_level(log::LevelFilter::Off),
        1 => log::set_max_level(log::LevelFilter::Error),
        2 => log::set_max_level(log::LevelFilter::Warn),
        3 => log::set_max_level(log::LevelFilter::Info),
        4 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    };

    // Below we report initialization status to the user
    info!("---- Huffzip Initialization Start ----",);
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("{} input file(s)", opts.files.len());
    if opts.output == Output::Stdout {
        warn!("Sending output to stdout")
    }
    info!("Maximum buffer size set to {} bytes", opts.max_size);
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    if opts.keep_input_files {
        info!("Keeping input files")
    };
    info!("---- Huffzip Initialization End ----\n");
    opts
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(line: &[&str]) -> HuffOpts {
        opts_from_args(Args::try_parse_from(line).unwrap())
    }

    #[test]
    fn defaults_test() {
        let opts = parse(&["huffzip", "a.txt"]);
        assert_eq!(opts.files, vec!["a.txt".to_string()]);
        assert_eq!(opts.op_mode, Mode::Zip);
        assert_eq!(opts.output, Output::File);
        assert_eq!(opts.max_size, DEFAULT_MAX_SIZE);
        assert!(!opts.keep_input_files);
        assert!(!opts.force_overwrite);
    }

    #[test]
    fn flags_test() {
        let opts = parse(&[
            "huffzip", "-d", "-k", "-f", "-c", "-m", "1024", "-s", "a.huf", "b.huf",
        ]);
        assert_eq!(opts.op_mode, Mode::Unzip);
        assert!(opts.keep_input_files);
        assert!(opts.force_overwrite);
        assert!(opts.show_codes);
        assert_eq!(opts.output, Output::Stdout);
        assert_eq!(opts.max_size, 1024);
        assert_eq!(opts.files.len(), 2);

        let opts = parse(&["huffzip", "--test", "a.huf"]);
        assert_eq!(opts.op_mode, Mode::Test);
    }

    #[test]
    fn missing_files_test() {
        assert!(Args::try_parse_from(&["huffzip"]).is_err());
    }
}
