//! Routing traceback output through a custom sink.
//!
//! The registered sink wraps every rendered line in ANSI red before it
//! reaches stderr. Registering `None` afterwards would restore the plain
//! default sink.
//!
//! Run with `cargo run --example colored_sink`.

use std::fmt;

use backtrail::prelude::*;
use owo_colors::OwoColorize;

const ECONNREFUSED: Code = Code::new(111);

fn dial() -> Result<(), Code> {
    fail!(ECONNREFUSED, "upstream refused the handshake");
}

fn sync_state() -> Result<(), Code> {
    propagate!(dial());
    Ok(())
}

fn main() {
    backtrail::register_sink(Some(Box::new(|args: fmt::Arguments<'_>| {
        eprint!("{}", args.red());
    })));

    if let Err(code) = sync_state() {
        backtrail::log_and_clear_error(code);
    }
}
