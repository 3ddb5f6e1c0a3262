use crate::{code::Code, frame::TraceFrame};

mod sealed {
    pub trait Sealed {}
    impl<T> Sealed for Option<T> {}
}

/// Extension methods connecting `Option` to the calling thread's trace.
///
/// An absent value carries no error number of its own, so the caller
/// supplies the [`Code`] that a `None` should propagate as.
///
/// # Examples
///
/// ```
/// use backtrail::prelude::*;
///
/// const ENOENT: Code = Code::new(2);
///
/// fn lookup(table: &[(&str, u32)], key: &str) -> Result<u32, Code> {
///     table
///         .iter()
///         .find(|(k, _)| *k == key)
///         .map(|(_, v)| *v)
///         .ok_or_start(frame!(), ENOENT)
/// }
///
/// assert_eq!(lookup(&[("a", 1)], "a"), Ok(1));
/// assert_eq!(lookup(&[("a", 1)], "b"), Err(ENOENT));
/// # backtrail::clear_error();
/// ```
pub trait OptionExt<T>: sealed::Sealed {
    /// On `None`, starts an error episode at `frame` and returns `code`.
    #[must_use]
    fn ok_or_start(self, frame: TraceFrame, code: Code) -> Result<T, Code>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_start(self, frame: TraceFrame, code: Code) -> Result<T, Code> {
        match self {
            Some(value) => Ok(value),
            None => {
                crate::start_error(frame);
                Err(code)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn some_passes_through() {
        crate::clear_error();
        assert_eq!(Some(3).ok_or_start(crate::frame!(), Code::new(2)), Ok(3));
        assert_eq!(crate::with_context(|ctx| ctx.frames().len()), 0);
    }

    #[test]
    fn none_starts_an_episode() {
        crate::clear_error();
        let missing: Option<u8> = None;
        assert_eq!(
            missing.ok_or_start(crate::frame!(), Code::new(2)),
            Err(Code::new(2))
        );
        assert_eq!(crate::with_context(|ctx| ctx.frames().len()), 1);
        crate::clear_error();
    }
}
