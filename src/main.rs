//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::io;
use std::process::exit;

use huffzip::compression::batch::run_files;
use huffzip::tools::cli::huffopts_init;

use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tikv_jemallocator::Jemalloc;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace. Logs go to stderr so that
    // --stdout output stays clean.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Unable to start logging: {}", e);
    }

    let opts = huffopts_init();

    let failures = run_files(&opts, &mut io::stdout().lock());

    info!("Done.\n");
    if failures > 0 {
        error!("{} of {} file(s) failed", failures, opts.files.len());
        exit(1);
    }
}
