//! Mapping a typed error enum onto numeric codes.
//!
//! Application layers often want `thiserror`-style enums while the
//! propagation spine stays numeric. A `From` impl at the boundary keeps
//! both: the enum's message becomes the episode's initial message, its
//! variant becomes the code that travels up the chain.
//!
//! Run with `cargo run --example custom_codes`.

use backtrail::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
enum StoreError {
    #[error("no entry under {key:?}")]
    NotFound { key: String },
    #[error("store is out of space")]
    Full,
}

impl From<StoreError> for Code {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Code::new(2),  // ENOENT
            StoreError::Full => Code::new(28),            // ENOSPC
        }
    }
}

fn lookup(key: &str) -> Result<u32, StoreError> {
    Err(StoreError::NotFound {
        key: key.to_string(),
    })
}

fn resolve(key: &str) -> Result<u32, Code> {
    match lookup(key) {
        Ok(value) => Ok(value),
        Err(err) => fail!(err, "{err}"),
    }
}

fn main() {
    if let Err(code) = resolve("session/42") {
        backtrail::log_and_clear_error(code);
    }
}
