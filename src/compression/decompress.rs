use log::{debug, info, trace};

use super::compress::{finish_input, write_output, SUFFIX};
use super::payload::CompressedPayload;
use crate::bitstream::bitreader::BitReader;
use crate::error::{HuffError, TreeFault};
use crate::huffman_coding::huffman::TreeNode;
use crate::huffman_coding::tree_codec::deserialize_tree;
use crate::tools::cli::HuffOpts;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Decode a payload back to the original bytes.
///
/// The output is as long as the payload says, up to 4 GiB for a six byte degenerate
/// payload. Callers decoding untrusted input should check `original_len()` first, or use
/// `decompress_with_limit`.
pub fn decompress(payload: &CompressedPayload) -> Result<Vec<u8>, HuffError> {
    match payload {
        CompressedPayload::Empty => Ok(Vec::new()),
        CompressedPayload::Degenerate { symbol, count } => Ok(vec![*symbol; *count]),
        CompressedPayload::General {
            tree,
            packed,
            padding,
            original_length,
        } => {
            if tree.is_empty() {
                if packed.is_empty() && *original_length == 0 {
                    return Ok(Vec::new());
                }
                return Err(HuffError::EmptyTreeForNonEmptyPayload);
            }
            let root = deserialize_tree(tree)?;
            trace!("TreeRestored: {} leaves", root.leaf_count());
            let data = unpack(&root, packed, *padding, *original_length)?;
            trace!("Decoded: {} bytes", data.len());
            Ok(data)
        }
    }
}

/// Decode a payload, refusing one that claims more than `max` bytes of output.
pub fn decompress_with_limit(
    payload: &CompressedPayload,
    max: usize,
) -> Result<Vec<u8>, HuffError> {
    if payload.original_len() > max {
        return Err(HuffError::TooLarge {
            size: payload.original_len(),
            max,
        });
    }
    decompress(payload)
}

/// Walk the tree one bit at a time, emitting a symbol at each leaf, until either the bits
/// run out or `original_length` symbols have come out.
///
/// A root that is itself a leaf has no branches. It stands for the one-bit code `0`, so
/// each 0 bit emits its symbol.
fn unpack(
    root: &TreeNode,
    packed: &[u8],
    padding: u8,
    original_length: usize,
) -> Result<Vec<u8>, HuffError> {
    let mut br = BitReader::new(packed, padding)?;
    // Each symbol costs at least one bit, which bounds the allocation for hostile lengths.
    let mut out = Vec::with_capacity(original_length.min(br.remaining()));
    let mut node = root;

    while out.len() < original_length {
        let bit = match br.bool_bit() {
            Some(bit) => bit,
            None => break,
        };
        node = match (node, bit) {
            (TreeNode::Kids(left, _), false) => left.as_ref(),
            (TreeNode::Kids(_, right), true) => right.as_ref(),
            (TreeNode::Leaf(_), false) => node,
            (TreeNode::Leaf(_), true) => {
                return Err(HuffError::tree(0, TreeFault::MissingBranch));
            }
        };
        if let TreeNode::Leaf(sym) = node {
            out.push(*sym);
            node = root;
        }
    }

    if out.len() < original_length {
        return Err(HuffError::TruncatedPayload {
            needed: original_length,
            available: out.len(),
        });
    }
    if br.remaining() > 0 {
        debug!(
            "Stopped at {} with {} bits unused",
            br.loc(),
            br.remaining()
        );
    }
    Ok(out)
}

/// Parse and decode a file, refusing payloads that would decode past `max_size`.
fn read_payload(path: &Path, opts: &HuffOpts) -> Result<Vec<u8>, HuffError> {
    let bytes = fs::read(path)?;
    let payload = CompressedPayload::from_bytes(&bytes)?;
    decompress_with_limit(&payload, opts.max_size)
}

/// Name of the decompressed file for `path`: the .huf suffix stripped, or .out added.
pub fn decompressed_name(path: &Path) -> PathBuf {
    match path.to_str().and_then(|s| s.strip_suffix(SUFFIX)) {
        Some(stem) if !stem.is_empty() => PathBuf::from(stem),
        _ => {
            let mut name = path.as_os_str().to_owned();
            name.push(".out");
            PathBuf::from(name)
        }
    }
}

/// Decompress the file at `path`. Returns the decoded size.
pub fn decompress_file(path: &Path, opts: &HuffOpts) -> Result<usize, HuffError> {
    decompress_file_to(path, opts, &mut io::stdout())
}

/// As `decompress_file`, but stdout output goes to `sink`.
pub fn decompress_file_to<W: Write>(
    path: &Path,
    opts: &HuffOpts,
    sink: &mut W,
) -> Result<usize, HuffError> {
    let start = Instant::now();
    let data = read_payload(path, opts)?;
    write_output(&decompressed_name(path), &data, opts, sink)?;
    finish_input(path, opts)?;
    info!(
        "{}: {} bytes restored in {:.1?}",
        path.display(),
        data.len(),
        start.elapsed()
    );
    Ok(data.len())
}

/// Decode the file at `path` in memory without writing anything.
pub fn test_file(path: &Path, opts: &HuffOpts) -> Result<usize, HuffError> {
    let data = read_payload(path, opts)?;
    info!("{}: ok ({} bytes)", path.display(), data.len());
    Ok(data.len())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::compress::{compress, compress_file, compressed_name};
    use crate::tools::cli::Output;

    fn round_trip(data: &[u8]) {
        let (payload, _) = compress(data);
        assert_eq!(decompress(&payload).unwrap(), data);
        // ...and the same through the contiguous wire form
        let bytes = payload.to_bytes().unwrap();
        let parsed = CompressedPayload::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, payload);
        assert_eq!(decompress(&parsed).unwrap(), data);
    }

    #[test]
    fn round_trip_test() {
        round_trip(&[]);
        round_trip(&[0]);
        round_trip(&[255; 1000]);
        round_trip(&[1, 2]);
        round_trip("aaabbc".as_bytes());
        round_trip("Hello, world! This is a sample text for Huffman compression.".as_bytes());
        let all: Vec<u8> = (0..=255).collect();
        round_trip(&all);
        let mut skewed = Vec::new();
        for (i, sym) in (0_u8..24).enumerate() {
            skewed.extend(std::iter::repeat(sym).take(1 << i.min(14)));
        }
        round_trip(&skewed);
        // Pseudo random bytes from a small LCG
        let mut seed = 12345_u32;
        let noise: Vec<u8> = (0..10_000)
            .map(|_| {
                seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
                (seed >> 16) as u8
            })
            .collect();
        round_trip(&noise);
    }

    #[test]
    fn determinism_test() {
        let data = "she sells sea shells by the sea shore".as_bytes();
        let (first, _) = compress(data);
        let (second, _) = compress(data);
        assert_eq!(decompress(&first).unwrap(), decompress(&second).unwrap());
    }

    #[test]
    fn empty_payload_test() {
        assert_eq!(
            decompress(&CompressedPayload::Empty).unwrap(),
            Vec::<u8>::new()
        );
    }

    #[test]
    fn length_bound_test() {
        // a=0: the pad bits of "aaabbc" are all zeros and would decode as seven more 'a's
        // without the length bound.
        let (payload, _) = compress("aaabbc".as_bytes());
        assert_eq!(decompress(&payload).unwrap(), "aaabbc".as_bytes());
        if let CompressedPayload::General {
            tree,
            packed,
            original_length,
            ..
        } = payload
        {
            let unpadded = CompressedPayload::General {
                tree,
                packed,
                padding: 0,
                original_length,
            };
            assert_eq!(decompress(&unpadded).unwrap(), "aaabbc".as_bytes());
        }
    }

    #[test]
    fn truncated_bits_test() {
        let (payload, _) = compress("aaabbc".as_bytes());
        if let CompressedPayload::General { tree, packed, .. } = payload {
            let short = CompressedPayload::General {
                tree,
                packed: packed[..1].to_vec(),
                padding: 0,
                original_length: 6,
            };
            assert!(matches!(
                decompress(&short),
                Err(HuffError::TruncatedPayload {
                    needed: 6,
                    available: 5
                })
            ));
        }
    }

    #[test]
    fn bad_payload_test() {
        let no_tree = CompressedPayload::General {
            tree: vec![],
            packed: vec![0xff],
            padding: 0,
            original_length: 8,
        };
        assert!(matches!(
            decompress(&no_tree),
            Err(HuffError::EmptyTreeForNonEmptyPayload)
        ));

        let bad_padding = CompressedPayload::General {
            tree: vec![0, 1, 1, 1, 2],
            packed: vec![0xff],
            padding: 8,
            original_length: 1,
        };
        assert!(matches!(
            decompress(&bad_padding),
            Err(HuffError::InvalidPadding(8))
        ));

        let bad_tree = CompressedPayload::General {
            tree: vec![3, 1, 1, 1, 2],
            packed: vec![0xff],
            padding: 0,
            original_length: 1,
        };
        assert!(matches!(
            decompress(&bad_tree),
            Err(HuffError::CorruptTree {
                offset: 0,
                fault: TreeFault::BadMarker(3)
            })
        ));
    }

    #[test]
    fn lone_leaf_tree_test() {
        // A general payload whose tree is a single leaf uses the one-bit code 0.
        let lone = CompressedPayload::General {
            tree: vec![1, 42],
            packed: vec![0],
            padding: 5,
            original_length: 3,
        };
        assert_eq!(decompress(&lone).unwrap(), vec![42, 42, 42]);

        let wrong_branch = CompressedPayload::General {
            tree: vec![1, 42],
            packed: vec![0b0100_0000],
            padding: 6,
            original_length: 2,
        };
        assert!(matches!(
            decompress(&wrong_branch),
            Err(HuffError::CorruptTree {
                fault: TreeFault::MissingBranch,
                ..
            })
        ));
    }

    #[test]
    fn hostile_length_test() {
        // Claims four billion bytes but carries one byte of bits
        let bytes = [0, 1, 7, 1, 9, 0xff, 0xff, 0xff, 0xff, 0b1010_1010, 0];
        let payload = CompressedPayload::from_bytes(&bytes).unwrap();
        assert!(matches!(
            decompress(&payload),
            Err(HuffError::TruncatedPayload { available: 8, .. })
        ));
    }

    #[test]
    fn limit_test() {
        // Six bytes that claim four billion copies of 'x'
        let payload = CompressedPayload::from_bytes(&[1, b'x', 0xff, 0xff, 0xff, 0xff]).unwrap();
        assert!(matches!(
            decompress_with_limit(&payload, 1 << 20),
            Err(HuffError::TooLarge {
                size: 0xffff_ffff,
                max: 0x10_0000
            })
        ));

        let (payload, _) = compress("aaabbc".as_bytes());
        assert!(matches!(
            decompress_with_limit(&payload, 5),
            Err(HuffError::TooLarge { size: 6, max: 5 })
        ));
        assert_eq!(
            decompress_with_limit(&payload, 6).unwrap(),
            "aaabbc".as_bytes()
        );
    }

    #[test]
    fn decompressed_name_test() {
        assert_eq!(
            decompressed_name(Path::new("dir/notes.txt.huf")),
            PathBuf::from("dir/notes.txt")
        );
        assert_eq!(
            decompressed_name(Path::new("notes.bin")),
            PathBuf::from("notes.bin.out")
        );
    }

    #[test]
    fn file_round_trip_test() {
        let dir = std::env::temp_dir().join(format!("huffzip-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let original = dir.join("sample.txt");
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        fs::write(&original, &text).unwrap();

        let mut opts = HuffOpts::new();
        let stats = compress_file(&original, &opts).unwrap();
        assert_eq!(stats.original_size, text.len());
        assert!(!original.exists());

        let packed = compressed_name(&original);
        assert_eq!(fs::metadata(&packed).unwrap().len() as usize, stats.compressed_size);
        opts.keep_input_files = true;
        assert_eq!(test_file(&packed, &opts).unwrap(), text.len());
        assert_eq!(decompress_file(&packed, &opts).unwrap(), text.len());
        assert_eq!(fs::read_to_string(&original).unwrap(), text);

        // Refuses to overwrite, then does so when forced
        assert!(matches!(
            decompress_file(&packed, &opts),
            Err(HuffError::OutputExists(_))
        ));
        opts.force_overwrite = true;
        assert_eq!(decompress_file(&packed, &opts).unwrap(), text.len());

        // Size limit applies on both sides
        opts.max_size = 10;
        assert!(matches!(
            compress_file(&original, &opts),
            Err(HuffError::TooLarge { max: 10, .. })
        ));
        assert!(matches!(
            test_file(&packed, &opts),
            Err(HuffError::TooLarge { max: 10, .. })
        ));
        assert_eq!(opts.output, Output::File);

        fs::remove_dir_all(&dir).unwrap();
    }
}
