use std::io::{self, Write};
use std::path::Path;

use log::error;
use rayon::prelude::*;

use super::compress::compress_file_to;
use super::decompress::{decompress_file_to, test_file};
use crate::error::HuffError;
use crate::tools::cli::{HuffOpts, Mode, Output};

/// Figure out what we need to do with one file and go do it.
fn run<W: Write>(file: &str, opts: &HuffOpts, sink: &mut W) -> Result<(), HuffError> {
    let path = Path::new(file);
    let result = match opts.op_mode {
        Mode::Zip => compress_file_to(path, opts, sink).map(|_| ()),
        Mode::Unzip => decompress_file_to(path, opts, sink).map(|_| ()),
        Mode::Test => test_file(path, opts).map(|_| ()),
    };
    if let Err(e) = &result {
        error!("{}: {}", file, e);
    }
    result
}

/// Process every file in `opts`, returning how many failed.
///
/// Results sent to stdout carry no framing, so they are written to `sink` one file at a
/// time in argument order. Otherwise each file is an independent call with its own tables
/// and the files run in parallel.
pub fn run_files<W: Write>(opts: &HuffOpts, sink: &mut W) -> usize {
    match opts.output {
        Output::Stdout => opts
            .files
            .iter()
            .filter(|file| run(file, opts, sink).is_err())
            .count(),
        Output::File => opts
            .files
            .par_iter()
            .filter(|file| run(file, opts, &mut io::sink()).is_err())
            .count(),
    }
}
