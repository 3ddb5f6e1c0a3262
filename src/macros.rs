/// Captures the current source location as a [`TraceFrame`].
///
/// Expands to a frame holding `file!()`, `line!()` and the path of the
/// enclosing function. Closures show up with a trailing `{{closure}}`
/// segment, which is accurate, if not pretty.
///
/// [`TraceFrame`]: crate::TraceFrame
///
/// # Examples
///
/// ```
/// use backtrail::frame;
///
/// fn connect() -> backtrail::TraceFrame {
///     frame!()
/// }
///
/// let frame = connect();
/// assert!(frame.function().ends_with("::connect"));
/// assert!(frame.file().ends_with(".rs"));
/// ```
#[macro_export]
macro_rules! frame {
    () => {{
        fn f() {}
        $crate::TraceFrame::new(
            ::core::file!(),
            $crate::__private::enclosing_fn(::core::any::type_name_of_val(&f)),
            ::core::line!(),
        )
    }};
}

/// Starts an error episode at the call site and returns the code.
///
/// This records the current location as the origin frame, optionally
/// formats the initial error message, and then does
/// `return Err(code.into())`. The enclosing function must therefore return
/// a `Result` whose error type the code converts into.
///
/// # Examples
///
/// ```
/// use backtrail::prelude::*;
///
/// const EINVAL: Code = Code::new(22);
///
/// fn parse_port(input: &str) -> Result<u16, Code> {
///     match input.parse() {
///         Ok(port) => Ok(port),
///         Err(_) => fail!(EINVAL, "not a port number: {input:?}"),
///     }
/// }
///
/// assert_eq!(parse_port("8080"), Ok(8080));
/// assert_eq!(parse_port("toast"), Err(EINVAL));
/// # backtrail::clear_error();
/// ```
#[cfg(feature = "std")]
#[macro_export]
macro_rules! fail {
    ($code:expr $(,)?) => {{
        $crate::start_error($crate::frame!());
        return ::core::result::Result::Err(::core::convert::Into::into($code));
    }};
    ($code:expr, $($arg:tt)+) => {{
        $crate::start_error($crate::frame!());
        $crate::set_error_message(::core::format_args!($($arg)+));
        return ::core::result::Result::Err(::core::convert::Into::into($code));
    }};
}

/// Like [`fail!`], but only when `cond` is true.
///
/// # Examples
///
/// ```
/// use backtrail::prelude::*;
///
/// const ERANGE: Code = Code::new(34);
///
/// fn check_depth(depth: u32) -> Result<(), Code> {
///     fail_if!(depth > 64, ERANGE, "nesting depth {depth} exceeds 64");
///     Ok(())
/// }
///
/// assert!(check_depth(3).is_ok());
/// assert_eq!(check_depth(65), Err(ERANGE));
/// # backtrail::clear_error();
/// ```
#[cfg(feature = "std")]
#[macro_export]
macro_rules! fail_if {
    ($cond:expr, $code:expr $(,)?) => {{
        if $cond {
            $crate::fail!($code);
        }
    }};
    ($cond:expr, $code:expr, $($arg:tt)+) => {{
        if $cond {
            $crate::fail!($code, $($arg)+);
        }
    }};
}

/// Unwraps a `Result`, adding a trace frame and returning early on `Err`.
///
/// On the error path this records the current location on the trace and
/// returns the error to the caller, converting it with `From` the way the
/// `?` operator does. On success it evaluates to the `Ok` value.
///
/// # Examples
///
/// ```
/// use backtrail::prelude::*;
///
/// const EIO: Code = Code::new(5);
///
/// fn read_sector() -> Result<u8, Code> {
///     fail!(EIO, "sector 9 unreadable");
/// }
///
/// fn read_file() -> Result<u8, Code> {
///     let byte = propagate!(read_sector());
///     Ok(byte)
/// }
///
/// assert_eq!(read_file(), Err(EIO));
/// // Two frames: the origin in read_sector, the relay in read_file.
/// assert_eq!(backtrail::with_context(|ctx| ctx.frames().len()), 2);
/// # backtrail::clear_error();
/// ```
#[cfg(feature = "std")]
#[macro_export]
macro_rules! propagate {
    ($result:expr $(,)?) => {
        match $result {
            ::core::result::Result::Ok(value) => value,
            ::core::result::Result::Err(err) => {
                $crate::add_trace($crate::frame!());
                return ::core::result::Result::Err(::core::convert::From::from(err));
            }
        }
    };
}
