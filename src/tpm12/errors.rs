use crate::device::errors::TransportError;
use crate::tpm12::types::tcg;
use thiserror::Error;

// DeserializationError indicates an error while deserializing a TPM structure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeserializationError {
    #[error("buffer underflow reading {wanted} bytes (remaining: {remaining})")]
    Underflow { wanted: usize, remaining: usize },
}

// SubmissionError is raised when a single command could not be completed.
// It never aborts the session, only the command it belongs to.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("transport submission failed: {0}")]
    Transport(TransportError),
    #[error("reply too short: {written} bytes written, at least {expected} expected")]
    ShortResponse { written: usize, expected: usize },
    #[error("unexpected reply tag {tag:#06x}")]
    UnexpectedTag { tag: tcg::TpmTag },
    #[error("TPM returned result code {code:#x} ({})", result_code_name(.code))]
    TpmResult { code: tcg::TpmResult },
    #[error("reply size mismatch: header declares {declared} bytes, transport wrote {written}, expected {expected}")]
    SizeMismatch {
        declared: u32,
        written: usize,
        expected: usize,
    },
    #[error("transport reports {written} bytes written into a {capacity} byte buffer")]
    Overrun { written: usize, capacity: usize },
    #[error("could not decode reply: {0}")]
    Deserialization(#[from] DeserializationError),
}

fn result_code_name(code: &tcg::TpmResult) -> &'static str {
    tcg::result_code_name(*code).unwrap_or("unknown")
}

impl SubmissionError {
    // code returns the numeric result code behind the failure, if any
    pub fn code(&self) -> Option<u32> {
        match self {
            SubmissionError::Transport(err) => Some(err.code),
            SubmissionError::TpmResult { code } => Some(*code),
            _ => None,
        }
    }
}

// SessionError is fatal: no command can be issued without a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot create TPM context")]
    Open(#[source] TransportError),
}

impl SessionError {
    pub fn code(&self) -> u32 {
        match self {
            SessionError::Open(err) => err.code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tpm_result_names_the_code() {
        let err = SubmissionError::TpmResult {
            code: tcg::TPM_BADINDEX,
        };
        assert_eq!(err.to_string(), "TPM returned result code 0x2 (TPM_BADINDEX)");
        assert_eq!(err.code(), Some(2));
    }

    #[test]
    fn decoding_failures_carry_no_code() {
        let err = SubmissionError::from(DeserializationError::Underflow {
            wanted: 4,
            remaining: 2,
        });
        assert_eq!(err.code(), None);
    }
}
