#![cfg_attr(not(feature = "std"), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A lightweight, allocation-free error traceback library.
//!
//! ## Overview
//!
//! This crate lets a call chain record *where* an error originated and
//! *which functions it passed through* — without allocating, unwinding, or
//! forcing a rich error type on anyone — and lets the top of the chain
//! print a Python-style traceback:
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
//! Errors stay what they are in a lot of systems code: a plain integer
//! [`Code`] with a reserved success value. The diagnostics ride alongside
//! in per-thread state instead of inside the error value, so propagating a
//! failure costs one integer return plus one recorded [`TraceFrame`] per
//! hop — no boxing, no heap, no `Backtrace` capture.
//!
//! ## Quick Example
//!
//! ```
//! use backtrail::prelude::*;
//!
//! const EINVAL: Code = Code::new(22);
//!
//! fn parse_port(input: &str) -> Result<u16, Code> {
//!     match input.parse() {
//!         Ok(port) => Ok(port),
//!         Err(_) => fail!(EINVAL, "not a port number: {input:?}"),
//!     }
//! }
//!
//! fn load_config(raw: &str) -> Result<u16, Code> {
//!     let port = propagate!(parse_port(raw));
//!     Ok(port)
//! }
//!
//! if let Err(code) = load_config("not-a-number") {
//!     // Renders the traceback to the active sink (stderr by default),
//!     // then resets for the next error episode.
//!     backtrail::log_and_clear_error(code);
//! }
//! ```
//!
//! ## Core Concepts
//!
//! An **error episode** is the period between starting an error (the
//! origin) and clearing it (after it has been handled or logged). During
//! an episode:
//!
//! - [`fail!`] (or [`start_error`]) records the origin frame and the
//!   initial error message;
//! - [`propagate!`] (or [`ResultExt::trace`]) records one frame at each
//!   boundary the failure crosses;
//! - [`log_traceback`] renders all of it, newest frame first, through the
//!   active [`LogSink`];
//! - [`clear_error`] wipes the slate for the next episode.
//!
//! All of that state lives in a per-thread [`TraceContext`]. Nothing is
//! shared between threads, so there is no locking anywhere — two threads
//! tracing two failures never observe each other.
//!
//! ## Speculative Traces
//!
//! A caller that *tries* something and handles the failure itself can
//! rewind the trace instead of propagating it:
//!
//! ```
//! use backtrail::prelude::*;
//!
//! fn try_fast_path() -> Result<u32, Code> {
//!     fail!(Code::new(95), "fast path unsupported here");
//! }
//!
//! backtrail::save_traceback_position();
//! let value = match try_fast_path() {
//!     Ok(value) => value,
//!     Err(_) => {
//!         // Fall back; the fast path's frames are no longer interesting.
//!         backtrail::restore_traceback_position();
//!         0
//!     }
//! };
//! assert_eq!(value, 0);
//! assert_eq!(backtrail::with_context(|ctx| ctx.frames().len()), 0);
//! ```
//!
//! ## Degradation, Not Failure
//!
//! The library's own operations never fail and never abort propagation:
//!
//! - a full trace stack ([`MAX_TRACE_DEPTH`] frames) drops further frames
//!   with a warning on stderr;
//! - a message longer than [`MAX_MESSAGE_LEN`] bytes is silently
//!   truncated;
//! - an error code the platform cannot describe still renders, with a
//!   placeholder description.
//!
//! ## `no_std` Support
//!
//! With `default-features = false` the crate is `no_std` (plus `alloc` for
//! the boxed sink). Thread-local storage and the stderr sink are `std`
//! amenities, so in `no_std` builds you own the state explicitly: create a
//! [`TraceContext`] per execution context, call its methods, and register
//! a sink that knows where your output goes.
//!
//! ```
//! use backtrail::{Code, TraceContext, TraceFrame};
//!
//! let mut ctx = TraceContext::new();
//! ctx.start_error(TraceFrame::new("src/flash.rs", "flash::erase_page", 60));
//! ctx.set_error_message(format_args!("page {} locked", 4));
//! assert_eq!(ctx.frames().len(), 1);
//! ```

extern crate alloc;

#[macro_use]
mod macros;

pub mod prelude;

mod code;
mod context;
mod frame;
mod message;
#[cfg(feature = "std")]
mod option_ext;
#[cfg(feature = "std")]
mod result_ext;
mod sink;
mod stack;

pub use self::{
    code::Code,
    context::TraceContext,
    frame::TraceFrame,
    message::{MAX_MESSAGE_LEN, MessageBuf},
    sink::LogSink,
    stack::{MAX_TRACE_DEPTH, TraceStack},
};

#[cfg(feature = "std")]
pub use self::{
    context::{
        add_trace, clear_error, log_and_clear_error, log_and_clear_on_error, log_traceback,
        register_sink, restore_traceback_position, save_traceback_position, set_error_message,
        start_error, with_context,
    },
    option_ext::OptionExt,
    result_ext::ResultExt,
    sink::StderrSink,
};

#[doc(hidden)]
pub mod __private {
    /// Strips the probe function's own `::f` segment from a type name
    /// captured by `frame!`, leaving the path of the enclosing function.
    #[doc(hidden)]
    #[must_use]
    pub fn enclosing_fn(probe: &'static str) -> &'static str {
        probe.strip_suffix("::f").unwrap_or(probe)
    }
}
