use alloc::boxed::Box;
use core::fmt;

use crate::{code::Code, frame::TraceFrame, message::MessageBuf, sink::LogSink, stack::TraceStack};

/// Per-execution-context error state: the trace stack, the initial error
/// message and the active log sink.
///
/// Everything mutable in this crate lives inside a `TraceContext`, and a
/// context is never shared between threads — concurrency safety comes from
/// isolation, not locking. Under the `std` feature one context per thread
/// backs the free functions in the crate root ([`start_error`],
/// [`add_trace`], [`log_traceback`], ...), which is how most callers use
/// this crate. The type itself is public so that explicit-context code (a
/// worker that owns its state, a `no_std` environment without thread-local
/// storage) can drive the same machinery directly.
///
/// An error episode moves through two observable states:
///
/// - **active** — frames and possibly a message recorded, nothing reported
///   yet. Entered through [`start_error`](TraceContext::start_error), grown
///   through [`add_trace`](TraceContext::add_trace).
/// - **cleared** — no frames, no message. Entered through
///   [`clear_error`](TraceContext::clear_error) or
///   [`log_and_clear_error`](TraceContext::log_and_clear_error).
///
/// [`log_traceback`](TraceContext::log_traceback) on its own is read-only
/// and leaves the episode active. The sink is configuration rather than
/// episode state and survives clearing.
///
/// # Examples
///
/// ```
/// use backtrail::{Code, TraceContext, TraceFrame};
///
/// let mut ctx = TraceContext::new();
/// ctx.start_error(TraceFrame::new("src/io.rs", "io::read_block", 88));
/// ctx.set_error_message(format_args!("short read"));
/// ctx.add_trace(TraceFrame::new("src/fs.rs", "fs::load", 31));
///
/// assert_eq!(ctx.frames().len(), 2);
/// assert_eq!(ctx.message(), "short read");
///
/// ctx.clear_error();
/// assert!(ctx.frames().is_empty());
/// assert!(ctx.message().is_empty());
/// ```
pub struct TraceContext {
    stack: TraceStack,
    message: MessageBuf,
    sink: Option<Box<dyn LogSink>>,
}

impl TraceContext {
    /// Creates an empty context using the default sink.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stack: TraceStack::new(),
            message: MessageBuf::new(),
            sink: None,
        }
    }

    /// Records the first frame of a fresh error episode.
    ///
    /// Equivalent to [`add_trace`](TraceContext::add_trace) at the origin.
    /// Prior state is *not* cleared implicitly: a caller beginning an
    /// unrelated unit of work is expected to call
    /// [`clear_error`](TraceContext::clear_error) first.
    pub fn start_error(&mut self, frame: TraceFrame) {
        self.add_trace(frame);
    }

    /// Appends one propagation frame.
    ///
    /// When the stack is full the frame is dropped and a warning goes to
    /// standard error — unconditionally, not through the registered sink.
    /// Propagation itself continues unaffected.
    pub fn add_trace(&mut self, frame: TraceFrame) {
        if !self.stack.push(frame) {
            overflow_warning();
        }
    }

    /// Formats and stores the initial error message, overwriting any
    /// previous one.
    ///
    /// Output beyond [`MAX_MESSAGE_LEN`](crate::MAX_MESSAGE_LEN) bytes is
    /// silently truncated. An empty message is stored as empty and never
    /// rendered.
    pub fn set_error_message(&mut self, args: fmt::Arguments<'_>) {
        self.message.set(args);
    }

    /// The stored initial error message, possibly empty.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// The recorded frames, oldest first (index 0 is the origin).
    #[must_use]
    pub fn frames(&self) -> &[TraceFrame] {
        self.stack.frames()
    }

    /// Remembers the current trace depth. Last save wins.
    pub fn save_traceback_position(&mut self) {
        self.stack.save_position();
    }

    /// Rewinds the trace to the last saved depth, discarding frames
    /// recorded since.
    pub fn restore_traceback_position(&mut self) {
        self.stack.restore_position();
    }

    /// Resets frames, saved mark and message. The sink persists.
    pub fn clear_error(&mut self) {
        self.stack.clear();
        self.message.clear();
    }

    /// Replaces the active sink, or restores the default (standard error)
    /// sink when given `None`.
    pub fn register_sink(&mut self, sink: Option<Box<dyn LogSink>>) {
        self.sink = sink;
    }

    /// Renders the traceback for `code` through the active sink.
    ///
    /// Rendering is read-only: frames and message survive, so the same
    /// episode can be logged again or kept propagating. The output is, in
    /// order:
    ///
    /// 1. a header line,
    /// 2. one line per frame, newest first (innermost propagation point at
    ///    the top, origin at the bottom),
    /// 3. the platform description of `code` with its numeric value,
    /// 4. the stored message, only when one was set.
    pub fn log_traceback(&mut self, code: Code) {
        let frames = self.stack.frames();
        let message = &self.message;
        let sink = &mut self.sink;
        let mut emit = |args: fmt::Arguments<'_>| match sink.as_mut() {
            Some(sink) => sink.emit(args),
            None => default_emit(args),
        };

        emit(format_args!("Traceback (most recent call first):\n"));
        for frame in frames.iter().rev() {
            emit(format_args!("  {frame}\n"));
        }
        emit(format_args!("Error: {}\n", code.description()));
        if !message.is_empty() {
            emit(format_args!("Error message: {message}\n"));
        }
    }

    /// [`log_traceback`](TraceContext::log_traceback) followed by
    /// [`clear_error`](TraceContext::clear_error).
    pub fn log_and_clear_error(&mut self, code: Code) {
        self.log_traceback(code);
        self.clear_error();
    }

    /// Like [`log_and_clear_error`](TraceContext::log_and_clear_error), but
    /// a pure no-op when `code` is [`Code::OK`]: no output, no mutation.
    ///
    /// This is the one conditional operation in the crate. Callers may
    /// invoke it unconditionally after every unit of work and trust it to
    /// stay silent on success.
    pub fn log_and_clear_on_error(&mut self, code: Code) {
        if code.is_err() {
            self.log_and_clear_error(code);
        }
    }
}

impl Default for TraceContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TraceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceContext")
            .field("frames", &self.stack.len())
            .field("message", &self.message.as_str())
            .field("custom_sink", &self.sink.is_some())
            .finish()
    }
}

#[cfg(feature = "std")]
fn default_emit(args: fmt::Arguments<'_>) {
    use crate::sink::StderrSink;

    StderrSink.emit(args);
}

#[cfg(not(feature = "std"))]
fn default_emit(_args: fmt::Arguments<'_>) {}

#[cfg(feature = "std")]
fn overflow_warning() {
    eprintln!("backtrail: trace stack overflow, frame dropped");
}

#[cfg(not(feature = "std"))]
fn overflow_warning() {}

#[cfg(feature = "std")]
std::thread_local! {
    static CONTEXT: core::cell::RefCell<TraceContext> =
        const { core::cell::RefCell::new(TraceContext::new()) };
}

/// Runs `f` with mutable access to the calling thread's [`TraceContext`].
///
/// This is the escape hatch behind every free function in this crate, and
/// the way to *read* the accumulated state (frames and message) at the top
/// of a call chain.
///
/// # Panics
///
/// Panics if called re-entrantly on the same thread — from inside another
/// `with_context` closure, or from a sink while it is being driven by
/// [`log_traceback`].
///
/// # Examples
///
/// ```
/// use backtrail::prelude::*;
///
/// backtrail::clear_error();
/// backtrail::start_error(frame!());
/// let depth = backtrail::with_context(|ctx| ctx.frames().len());
/// assert_eq!(depth, 1);
/// # backtrail::clear_error();
/// ```
#[cfg(feature = "std")]
pub fn with_context<R>(f: impl FnOnce(&mut TraceContext) -> R) -> R {
    CONTEXT.with_borrow_mut(f)
}

/// Records the first frame of a fresh error episode on this thread.
///
/// See [`TraceContext::start_error`]. Usually reached through the
/// [`fail!`](crate::fail!) macro rather than called directly.
///
/// # Examples
///
/// ```
/// use backtrail::prelude::*;
///
/// backtrail::start_error(frame!());
/// backtrail::set_error_message(format_args!("disk {} offline", 3));
/// # backtrail::clear_error();
/// ```
#[cfg(feature = "std")]
pub fn start_error(frame: TraceFrame) {
    with_context(|ctx| ctx.start_error(frame));
}

/// Appends one propagation frame to this thread's trace.
///
/// See [`TraceContext::add_trace`]. Usually reached through
/// [`propagate!`](crate::propagate!) or [`ResultExt::trace`].
///
/// [`ResultExt::trace`]: crate::ResultExt::trace
#[cfg(feature = "std")]
pub fn add_trace(frame: TraceFrame) {
    with_context(|ctx| ctx.add_trace(frame));
}

/// Formats and stores this thread's initial error message.
///
/// See [`TraceContext::set_error_message`].
///
/// # Examples
///
/// ```
/// backtrail::set_error_message(format_args!("checksum mismatch in {}", "chunk 7"));
/// let len = backtrail::with_context(|ctx| ctx.message().len());
/// assert!(len > 0);
/// # backtrail::clear_error();
/// ```
#[cfg(feature = "std")]
pub fn set_error_message(args: fmt::Arguments<'_>) {
    with_context(|ctx| ctx.set_error_message(args));
}

/// Remembers the current trace depth of this thread. Last save wins.
///
/// See [`TraceContext::save_traceback_position`].
#[cfg(feature = "std")]
pub fn save_traceback_position() {
    with_context(TraceContext::save_traceback_position);
}

/// Rewinds this thread's trace to the last saved depth.
///
/// Together with [`save_traceback_position`] this implements speculative
/// execution: attempt an operation, and rewind the trace when its failure
/// was handled locally rather than propagated.
///
/// # Examples
///
/// ```
/// use backtrail::prelude::*;
///
/// fn flaky() -> Result<(), Code> {
///     fail!(Code::new(11));
/// }
///
/// backtrail::save_traceback_position();
/// if flaky().is_err() {
///     // Handled here; the recorded frames are no longer interesting.
///     backtrail::restore_traceback_position();
/// }
/// assert_eq!(backtrail::with_context(|ctx| ctx.frames().len()), 0);
/// ```
#[cfg(feature = "std")]
pub fn restore_traceback_position() {
    with_context(TraceContext::restore_traceback_position);
}

/// Resets this thread's frames, saved mark and message. The sink persists.
///
/// See [`TraceContext::clear_error`]. Call this once an error has been
/// fully handled so the next episode starts from a blank slate.
#[cfg(feature = "std")]
pub fn clear_error() {
    with_context(TraceContext::clear_error);
}

/// Replaces this thread's sink, or restores the default standard-error sink
/// when given `None`.
///
/// See [`TraceContext::register_sink`].
///
/// # Examples
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
///
/// let captured = Rc::new(RefCell::new(String::new()));
/// let buf = captured.clone();
/// backtrail::register_sink(Some(Box::new(move |args: std::fmt::Arguments<'_>| {
///     buf.borrow_mut().push_str(&args.to_string());
/// })));
///
/// backtrail::log_traceback(backtrail::Code::new(5));
/// assert!(captured.borrow().starts_with("Traceback"));
///
/// // Back to stderr.
/// backtrail::register_sink(None);
/// # backtrail::clear_error();
/// ```
#[cfg(feature = "std")]
pub fn register_sink(sink: Option<Box<dyn LogSink>>) {
    with_context(|ctx| ctx.register_sink(sink));
}

/// Renders this thread's traceback for `code` through the active sink.
///
/// Read-only; see [`TraceContext::log_traceback`] for the exact line
/// order.
#[cfg(feature = "std")]
pub fn log_traceback(code: Code) {
    with_context(|ctx| ctx.log_traceback(code));
}

/// Logs this thread's traceback for `code`, then clears the episode.
///
/// See [`TraceContext::log_and_clear_error`].
#[cfg(feature = "std")]
pub fn log_and_clear_error(code: Code) {
    with_context(|ctx| ctx.log_and_clear_error(code));
}

/// Logs and clears only when `code` is not [`Code::OK`]; otherwise does
/// nothing at all.
///
/// See [`TraceContext::log_and_clear_on_error`].
///
/// # Examples
///
/// ```
/// use backtrail::Code;
///
/// // Silent on success: safe to call unconditionally.
/// backtrail::log_and_clear_on_error(Code::OK);
/// ```
#[cfg(feature = "std")]
pub fn log_and_clear_on_error(code: Code) {
    with_context(|ctx| ctx.log_and_clear_on_error(code));
}

#[cfg(test)]
mod tests {
    use alloc::{
        rc::Rc,
        string::{String, ToString},
        vec::Vec,
    };
    use core::cell::RefCell;

    use super::*;

    fn frame(function: &'static str, line: u32) -> TraceFrame {
        TraceFrame::new("src/t.rs", function, line)
    }

    fn capturing_context() -> (TraceContext, Rc<RefCell<String>>) {
        let captured = Rc::new(RefCell::new(String::new()));
        let buf = captured.clone();
        let mut ctx = TraceContext::new();
        ctx.register_sink(Some(Box::new(move |args: fmt::Arguments<'_>| {
            buf.borrow_mut().push_str(&args.to_string());
        })));
        (ctx, captured)
    }

    #[test]
    fn renders_frames_newest_first() {
        let (mut ctx, captured) = capturing_context();
        ctx.start_error(frame("t::origin", 1));
        ctx.add_trace(frame("t::middle", 2));
        ctx.add_trace(frame("t::outer", 3));
        ctx.log_traceback(Code::new(5));

        let out = captured.borrow().clone();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Traceback (most recent call first):");
        assert!(lines[1].contains("t::outer"));
        assert!(lines[2].contains("t::middle"));
        assert!(lines[3].contains("t::origin"));
        assert!(lines[4].starts_with("Error: "));
    }

    #[test]
    fn message_line_only_when_message_set() {
        let (mut ctx, captured) = capturing_context();
        ctx.start_error(frame("t::origin", 1));
        ctx.log_traceback(Code::new(5));
        assert!(!captured.borrow().contains("Error message:"));

        captured.borrow_mut().clear();
        ctx.set_error_message(format_args!("it broke"));
        ctx.log_traceback(Code::new(5));
        assert!(captured.borrow().contains("Error message: it broke"));
    }

    #[test]
    fn log_traceback_is_read_only() {
        let (mut ctx, _captured) = capturing_context();
        ctx.start_error(frame("t::origin", 1));
        ctx.set_error_message(format_args!("still here"));
        ctx.log_traceback(Code::new(5));
        assert_eq!(ctx.frames().len(), 1);
        assert_eq!(ctx.message(), "still here");
    }

    #[test]
    fn log_and_clear_on_error_is_a_noop_on_ok() {
        let (mut ctx, captured) = capturing_context();
        ctx.start_error(frame("t::origin", 1));
        ctx.log_and_clear_on_error(Code::OK);
        assert!(captured.borrow().is_empty());
        assert_eq!(ctx.frames().len(), 1);
    }

    #[test]
    fn log_and_clear_on_error_matches_log_and_clear_error() {
        let (mut ctx, captured) = capturing_context();
        ctx.start_error(frame("t::origin", 1));
        ctx.set_error_message(format_args!("boom"));
        ctx.log_and_clear_error(Code::new(5));
        let unconditional = captured.borrow().clone();

        captured.borrow_mut().clear();
        ctx.start_error(frame("t::origin", 1));
        ctx.set_error_message(format_args!("boom"));
        ctx.log_and_clear_on_error(Code::new(5));
        assert_eq!(*captured.borrow(), unconditional);
        assert!(ctx.frames().is_empty());
        assert!(ctx.message().is_empty());
    }

    #[test]
    fn sink_survives_clear() {
        let (mut ctx, captured) = capturing_context();
        ctx.start_error(frame("t::origin", 1));
        ctx.clear_error();
        ctx.start_error(frame("t::again", 2));
        ctx.log_traceback(Code::new(5));
        assert!(captured.borrow().contains("t::again"));
    }

    #[test]
    fn cleared_episode_leaves_no_leftover_frames() {
        let (mut ctx, captured) = capturing_context();
        ctx.start_error(frame("t::old", 1));
        ctx.add_trace(frame("t::older", 2));
        ctx.clear_error();

        ctx.start_error(frame("t::fresh", 3));
        ctx.log_traceback(Code::new(5));
        let out = captured.borrow().clone();
        assert!(out.contains("t::fresh"));
        assert!(!out.contains("t::old"));
    }
}
