use core::fmt;

/// A numeric error code with a reserved success sentinel.
///
/// Codes are deliberately not a rich error type: they share one integer
/// domain with success, the way OS error numbers do, and [`Code::OK`] (zero)
/// means "no error". Everything a code cannot carry — where it came from and
/// what it passed through — lives in the per-thread trace instead.
///
/// # Examples
///
/// ```
/// use backtrail::Code;
///
/// const ENOENT: Code = Code::new(2);
///
/// assert!(ENOENT.is_err());
/// assert!(Code::OK.is_ok());
/// assert_eq!(ENOENT.raw(), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
#[must_use]
pub struct Code(i32);

impl Code {
    /// The success sentinel. Not an error.
    pub const OK: Code = Code(0);

    /// Wraps a raw numeric code.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw numeric value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Returns `true` for the success sentinel.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        self.0 == Self::OK.0
    }

    /// Returns `true` for anything other than the success sentinel.
    #[must_use]
    pub const fn is_err(self) -> bool {
        !self.is_ok()
    }

    /// A human-readable description of the code, looked up from the
    /// platform's error-string table.
    ///
    /// The rendered text also carries the raw numeric value, e.g.
    /// `Cannot allocate memory (os error 12)` on Linux. The lookup never
    /// aborts traceback rendering: codes the platform does not recognize
    /// still produce a printable placeholder.
    ///
    /// ```
    /// use backtrail::Code;
    ///
    /// let text = Code::new(12).description().to_string();
    /// assert!(text.contains("os error 12"));
    /// ```
    #[cfg(feature = "std")]
    #[must_use]
    pub fn description(self) -> impl fmt::Display {
        std::io::Error::from_raw_os_error(self.0)
    }

    /// A placeholder description. Without `std` there is no platform
    /// error-string table to consult, so every code renders as
    /// `(unknown error)` plus its raw numeric value.
    #[cfg(not(feature = "std"))]
    #[must_use]
    pub fn description(self) -> impl fmt::Display {
        struct Unknown(i32);

        impl fmt::Display for Unknown {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "(unknown error) (os error {})", self.0)
            }
        }

        Unknown(self.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<i32> for Code {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl From<Code> for i32 {
    fn from(code: Code) -> Self {
        code.0
    }
}

/// Extracts the OS error number from an I/O error.
///
/// Synthetic I/O errors with no OS code map to `-1`, which is never
/// [`Code::OK`], so a failed operation cannot masquerade as success.
///
/// ```
/// use backtrail::Code;
///
/// let err = std::io::Error::from_raw_os_error(2);
/// assert_eq!(Code::from(err), Code::new(2));
///
/// let synthetic = std::io::Error::other("no os code");
/// assert_eq!(Code::from(synthetic), Code::new(-1));
/// ```
#[cfg(feature = "std")]
impl From<std::io::Error> for Code {
    fn from(err: std::io::Error) -> Self {
        Self(err.raw_os_error().unwrap_or(-1))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    static_assertions::assert_impl_all!(Code: Copy, Send, Sync);
    static_assertions::assert_eq_size!(Code, i32);

    #[test]
    fn ok_sentinel_is_zero() {
        assert_eq!(Code::OK.raw(), 0);
        assert!(Code::OK.is_ok());
        assert!(!Code::OK.is_err());
        assert!(Code::new(12).is_err());
    }

    #[test]
    fn display_is_the_raw_number() {
        assert_eq!(Code::new(12).to_string(), "12");
        assert_eq!(Code::new(-1).to_string(), "-1");
    }

    #[cfg(feature = "std")]
    #[test]
    fn description_carries_the_numeric_code() {
        let text = Code::new(12).description().to_string();
        assert!(text.contains("os error 12"), "got: {text}");
    }

    #[cfg(feature = "std")]
    #[test]
    fn unrecognized_code_still_renders() {
        let text = Code::new(-9999).description().to_string();
        assert!(!text.is_empty());
    }
}
