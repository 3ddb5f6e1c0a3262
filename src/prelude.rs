//! Commonly used items for convenient importing.
//!
//! Pulls in the code and frame types, the call-site macros and the `Result`
//! and `Option` extension traits with a single use statement:
//!
//! ```
//! use backtrail::prelude::*;
//!
//! const EBUSY: Code = Code::new(16);
//!
//! fn acquire(locked: bool) -> Result<(), Code> {
//!     fail_if!(locked, EBUSY, "device held by another worker");
//!     Ok(())
//! }
//!
//! assert!(acquire(false).is_ok());
//! # backtrail::clear_error();
//! ```

pub use crate::{Code, LogSink, TraceContext, TraceFrame, frame};
#[cfg(feature = "std")]
pub use crate::{OptionExt, ResultExt, StderrSink, fail, fail_if, propagate};
