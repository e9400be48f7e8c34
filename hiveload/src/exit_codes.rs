#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,

    /// One or more iterations failed.
    IterationsFailed = 10,

    /// Invalid CLI/config/options (bad flags, invalid durations, malformed URLs, etc.).
    InvalidInput = 30,

    /// Internal/runtime error (task join failures, unexpected invariants).
    RuntimeError = 40,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub fn from_failures(failure_count: u64) -> Self {
        if failure_count == 0 {
            Self::Success
        } else {
            Self::IterationsFailed
        }
    }
}
