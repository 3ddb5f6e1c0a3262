use crate::{code::Code, frame::TraceFrame};

mod sealed {
    pub trait Sealed {}
    impl<T, E> Sealed for Result<T, E> {}
}

/// Extension methods connecting `Result` to the calling thread's trace.
///
/// These are the combinator form of the call-site macros: [`trace`] is what
/// [`propagate!`] does without the early return, and [`or_start`] turns a
/// failed fallible operation into the origin of an error episode.
///
/// [`trace`]: ResultExt::trace
/// [`or_start`]: ResultExt::or_start
/// [`propagate!`]: crate::propagate!
///
/// # Examples
///
/// ```
/// use backtrail::prelude::*;
///
/// fn read_marker(path: &str) -> Result<Vec<u8>, Code> {
///     // On failure: record this location as the origin and carry the
///     // OS error number onward.
///     std::fs::read(path).or_start(frame!())
/// }
///
/// fn load(path: &str) -> Result<Vec<u8>, Code> {
///     // On failure: add this location to the trace, keep the code.
///     read_marker(path).trace(frame!())
/// }
///
/// let missing = load("/definitely/not/here");
/// assert!(missing.is_err());
/// assert!(backtrail::with_context(|ctx| ctx.frames().len()) >= 2);
/// # backtrail::clear_error();
/// ```
pub trait ResultExt<T, E>: sealed::Sealed {
    /// On `Err`, records `frame` on the calling thread's trace. The value
    /// itself passes through untouched.
    #[must_use]
    fn trace(self, frame: TraceFrame) -> Result<T, E>;

    /// On `Err`, starts an error episode at `frame` and converts the error
    /// into its [`Code`].
    ///
    /// This is the natural way to bring an [`std::io::Error`] (or anything
    /// else with an `Into<Code>` conversion) into a traced call chain at
    /// the point where it first appears.
    #[must_use]
    fn or_start(self, frame: TraceFrame) -> Result<T, Code>
    where
        E: Into<Code>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn trace(self, frame: TraceFrame) -> Result<T, E> {
        if self.is_err() {
            crate::add_trace(frame);
        }
        self
    }

    fn or_start(self, frame: TraceFrame) -> Result<T, Code>
    where
        E: Into<Code>,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                crate::start_error(frame);
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_leaves_ok_untouched() {
        crate::clear_error();
        let ok: Result<u8, Code> = Ok(7);
        assert_eq!(ok.trace(crate::frame!()), Ok(7));
        assert_eq!(crate::with_context(|ctx| ctx.frames().len()), 0);
    }

    #[test]
    fn trace_records_a_frame_on_err() {
        crate::clear_error();
        let err: Result<u8, Code> = Err(Code::new(5));
        assert_eq!(err.trace(crate::frame!()), Err(Code::new(5)));
        assert_eq!(crate::with_context(|ctx| ctx.frames().len()), 1);
        crate::clear_error();
    }

    #[test]
    fn or_start_converts_io_errors() {
        crate::clear_error();
        let err: Result<u8, std::io::Error> = Err(std::io::Error::from_raw_os_error(2));
        assert_eq!(err.or_start(crate::frame!()), Err(Code::new(2)));
        assert_eq!(crate::with_context(|ctx| ctx.frames().len()), 1);
        crate::clear_error();
    }
}
