//! The smallest useful propagation chain.
//!
//! `func1` fails with an out-of-memory code, `func2` and `func3` relay the
//! failure upward, and `main` prints the collected traceback to stderr:
//!
//! ```text
//! Traceback (most recent call first):
//!   File "demos/basic.rs", line 32, in basic::func3
//!   File "demos/basic.rs", line 26, in basic::func2
//!   File "demos/basic.rs", line 22, in basic::func1
//! Error: Cannot allocate memory (os error 12)
//! Error message: SORRY!!
//! ```
//!
//! Run with `cargo run --example basic`.

use backtrail::prelude::*;

const ENOMEM: Code = Code::new(12);

fn func1() -> Result<(), Code> {
    fail!(ENOMEM, "SORRY!!");
}

fn func2() -> Result<(), Code> {
    propagate!(func1());
    println!("should not be printed");
    Ok(())
}

fn func3() -> Result<(), Code> {
    propagate!(func2());
    println!("should not be printed");
    Ok(())
}

fn main() {
    if let Err(code) = func3() {
        backtrail::log_and_clear_error(code);
    }
}
