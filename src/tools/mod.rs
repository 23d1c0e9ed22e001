//! The tools module provides helpers that sit around the codec.
//!
//! The tools are:
//! - cli: Command line interface and the options struct shared by the file drivers.
//! - freq_count: Frequency count of the bytes in a buffer.
//!
pub mod cli;
pub mod freq_count;
