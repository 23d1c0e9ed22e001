use std::fmt::{Display, Formatter};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, error, info, trace, warn};

use super::payload::CompressedPayload;
use crate::bitstream::bitpacker::BitPacker;
use crate::error::HuffError;
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::huffman::{build_tree, TreeNode};
use crate::huffman_coding::tree_codec::{serialize_tree, serialized_len};
use crate::tools::cli::{HuffOpts, Output};
use crate::tools::freq_count::freqs;

/// Suffix added to compressed files.
pub const SUFFIX: &str = ".huf";

/// Size report for one compress call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionStats {
    pub original_size: usize,
    pub compressed_size: usize,
    /// (original - compressed) / original. Negative when the output grew, 0 for empty input.
    pub ratio: f64,
}

impl CompressionStats {
    pub fn new(original_size: usize, compressed_size: usize) -> Self {
        let ratio = if original_size == 0 {
            0.0
        } else {
            (original_size as f64 - compressed_size as f64) / original_size as f64
        };
        Self {
            original_size,
            compressed_size,
            ratio,
        }
    }
}

impl Display for CompressionStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} bytes ({:.2}% saved)",
            self.original_size,
            self.compressed_size,
            self.ratio * 100.0
        )
    }
}

/// Compress a buffer. Never fails; every call builds its own tables and tree.
pub fn compress(data: &[u8]) -> (CompressedPayload, CompressionStats) {
    let payload = encode(data);
    let stats = CompressionStats::new(data.len(), payload.wire_len());
    debug!("Compressed {}", stats);
    (payload, stats)
}

fn encode(data: &[u8]) -> CompressedPayload {
    if data.is_empty() {
        trace!("Empty input, nothing to encode");
        return CompressedPayload::Empty;
    }

    let freqs = freqs(data);
    trace!("FrequencyCounted: {} distinct symbols", freqs.len());

    let root = match build_tree(&freqs) {
        Some(root) => root,
        None => return CompressedPayload::Empty,
    };
    // One repeated value needs no codes at all, just the value and how many.
    if let TreeNode::Leaf(symbol) = root {
        trace!("Single symbol {} repeated {} times", symbol, data.len());
        return CompressedPayload::Degenerate {
            symbol,
            count: data.len(),
        };
    }
    trace!(
        "TreeBuilt: {} leaves, depth {}",
        root.leaf_count(),
        root.depth()
    );

    let table = CodeTable::from_tree(&root);
    trace!("CodesGenerated: {} codes", table.len());

    // Every byte has a code, since the table was built from this data's own counts.
    let mut bp = BitPacker::new(data.len() / 8 + 1);
    for &byte in data {
        match table.get(byte) {
            Some(code) => bp.put_code(code),
            None => {
                error!("No code for byte {} at {}.", byte, bp.loc());
                debug_assert!(false, "byte {} missing from its own code table", byte);
            }
        }
    }
    let padding = bp.flush();
    trace!("Encoded: {} bits, padding {} at {}", bp.bit_len(), padding, bp.loc());

    let mut tree = Vec::with_capacity(serialized_len(&root));
    serialize_tree(&root, &mut tree);

    CompressedPayload::General {
        tree,
        packed: bp.output,
        padding,
        original_length: data.len(),
    }
}

/// Log the code table that `compress` would use for this data.
fn show_codes(path: &Path, data: &[u8]) {
    match build_tree(&freqs(data)) {
        Some(root) => {
            info!("Code table for {}:", path.display());
            for (sym, code) in CodeTable::from_tree(&root).iter() {
                info!("  {:3} {:?}: {}", sym, sym as char, code);
            }
        }
        None => info!("No codes for empty file {}", path.display()),
    }
}

/// Write `bytes` to `path` (or to `sink` when sending to stdout), refusing to clobber an
/// existing file unless forced.
pub(crate) fn write_output<W: Write>(
    path: &Path,
    bytes: &[u8],
    opts: &HuffOpts,
    sink: &mut W,
) -> Result<(), HuffError> {
    match opts.output {
        Output::Stdout => {
            sink.write_all(bytes)?;
            sink.flush()?;
        }
        Output::File => {
            if path.exists() && !opts.force_overwrite {
                return Err(HuffError::OutputExists(path.to_path_buf()));
            }
            let mut f_out = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?;
            f_out.write_all(bytes)?;
        }
    }
    Ok(())
}

/// Remove the input file after a successful run, unless asked to keep it.
pub(crate) fn finish_input(path: &Path, opts: &HuffOpts) -> Result<(), HuffError> {
    if !opts.keep_input_files && opts.output == Output::File {
        fs::remove_file(path)?;
        debug!("Removed {}", path.display());
    }
    Ok(())
}

/// Name of the compressed file for `path`.
pub fn compressed_name(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(SUFFIX);
    PathBuf::from(name)
}

/// Reject a file larger than `max_size` before any of it is read.
pub(crate) fn check_size(path: &Path, opts: &HuffOpts) -> Result<(), HuffError> {
    let size = usize::try_from(fs::metadata(path)?.len()).unwrap_or(usize::MAX);
    if size > opts.max_size {
        return Err(HuffError::TooLarge {
            size,
            max: opts.max_size,
        });
    }
    Ok(())
}

/// Compress the file at `path` into `<path>.huf`.
pub fn compress_file(path: &Path, opts: &HuffOpts) -> Result<CompressionStats, HuffError> {
    compress_file_to(path, opts, &mut io::stdout())
}

/// As `compress_file`, but stdout output goes to `sink`.
pub fn compress_file_to<W: Write>(
    path: &Path,
    opts: &HuffOpts,
    sink: &mut W,
) -> Result<CompressionStats, HuffError> {
    let start = Instant::now();
    if path.extension().map_or(false, |ext| ext == &SUFFIX[1..]) {
        warn!("{} already has a {} suffix", path.display(), SUFFIX);
    }

    check_size(path, opts)?;
    let data = fs::read(path)?;
    if opts.show_codes {
        show_codes(path, &data);
    }

    let (payload, stats) = compress(&data);
    let bytes = payload.to_bytes()?;
    write_output(&compressed_name(path), &bytes, opts, sink)?;
    finish_input(path, opts)?;

    info!(
        "{}: {} in {:.1?}",
        path.display(),
        stats,
        start.elapsed()
    );
    Ok(stats)
}
