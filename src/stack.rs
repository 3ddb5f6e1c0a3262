use crate::frame::TraceFrame;

/// Maximum number of frames a [`TraceStack`] can hold.
pub const MAX_TRACE_DEPTH: usize = 1024;

/// A fixed-capacity stack of [`TraceFrame`]s with a single saved mark.
///
/// Frames are stored oldest-first: index 0 is the origin of the error
/// episode, the highest index is the most recently recorded propagation
/// point. The stack is append-only while an error propagates; the length
/// only ever moves backwards through [`restore_position`] or [`clear`].
///
/// The backing storage is an inline array, so recording a frame never
/// allocates. Once [`MAX_TRACE_DEPTH`] frames have been recorded, further
/// pushes are dropped rather than growing or overwriting anything: losing
/// the tail of a very deep trace is preferable to aborting propagation.
///
/// [`restore_position`]: TraceStack::restore_position
/// [`clear`]: TraceStack::clear
///
/// # Examples
///
/// ```
/// use backtrail::{TraceFrame, TraceStack};
///
/// let mut stack = TraceStack::new();
/// assert!(stack.push(TraceFrame::new("src/a.rs", "a::origin", 10)));
/// assert!(stack.push(TraceFrame::new("src/b.rs", "b::caller", 20)));
/// assert_eq!(stack.len(), 2);
/// assert_eq!(stack.frames()[0].function(), "a::origin");
/// ```
pub struct TraceStack {
    frames: [TraceFrame; MAX_TRACE_DEPTH],
    len: usize,
    mark: usize,
}

impl TraceStack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames: [TraceFrame::EMPTY; MAX_TRACE_DEPTH],
            len: 0,
            mark: 0,
        }
    }

    /// Appends a frame, returning `false` if the stack was already full and
    /// the frame was dropped.
    ///
    /// A full stack is not an error: propagation must keep working no matter
    /// how deep the call chain is. The caller decides whether a dropped
    /// frame deserves a warning.
    pub fn push(&mut self, frame: TraceFrame) -> bool {
        if self.len == MAX_TRACE_DEPTH {
            return false;
        }
        self.frames[self.len] = frame;
        self.len += 1;
        true
    }

    /// The recorded frames, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[TraceFrame] {
        &self.frames[..self.len]
    }

    /// Number of recorded frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no frames are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remembers the current depth. A later [`restore_position`] rewinds to
    /// it.
    ///
    /// There is only one mark: a second save overwrites the first.
    ///
    /// [`restore_position`]: TraceStack::restore_position
    pub fn save_position(&mut self) {
        self.mark = self.len;
    }

    /// Rewinds the stack to the depth remembered by the last
    /// [`save_position`], discarding every frame recorded since.
    ///
    /// This is how a caller attempts an operation speculatively: save,
    /// attempt, and restore if the failure was handled locally instead of
    /// propagated.
    ///
    /// [`save_position`]: TraceStack::save_position
    pub fn restore_position(&mut self) {
        debug_assert!(self.mark <= self.len);
        self.len = self.mark;
    }

    /// Empties the stack and resets the saved mark.
    pub fn clear(&mut self) {
        self.len = 0;
        self.mark = 0;
    }
}

impl Default for TraceStack {
    fn default() -> Self {
        Self::new()
    }
}
