use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to fetch page {page}: {reason}")]
    FetchFailed { page: u32, reason: String },

    #[error("Page {page} is out of range (1..={total_pages})")]
    OutOfRange { page: u32, total_pages: u32 },

    #[error("Stale callback for load ticket {ticket}")]
    StaleCallback { ticket: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Errors the list view absorbs locally (log, then ignore or retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::FetchFailed { .. } | Error::OutOfRange { .. } | Error::StaleCallback { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(Error::StaleCallback { ticket: 3 }.is_recoverable());
        assert!(Error::OutOfRange { page: 9, total_pages: 3 }.is_recoverable());
        assert!(!Error::Config("bad".to_string()).is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = Error::OutOfRange { page: 4, total_pages: 3 };
        assert_eq!(err.to_string(), "Page 4 is out of range (1..=3)");

        let err = Error::FetchFailed {
            page: 2,
            reason: "timeout".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to fetch page 2: timeout");
    }
}
