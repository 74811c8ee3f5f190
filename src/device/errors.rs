use std::io;
use thiserror::Error;

// Transport result codes, numbered after the TPM Base Services codes
pub type TransportResult = u32;

pub const TBS_E_INTERNAL_ERROR: TransportResult = 0x8028_4001;
pub const TBS_E_INVALID_CONTEXT: TransportResult = 0x8028_4004;
pub const TBS_E_INSUFFICIENT_BUFFER: TransportResult = 0x8028_4005;
pub const TBS_E_IOERROR: TransportResult = 0x8028_4006;
pub const TBS_E_SERVICE_NOT_RUNNING: TransportResult = 0x8028_4008;
pub const TBS_E_TPM_NOT_FOUND: TransportResult = 0x8028_400F;

// TransportError is a non-success result reported by the transport
#[derive(Debug, Error)]
#[error("{msg} (error code {code:#010x})")]
pub struct TransportError {
    pub code: TransportResult,
    pub msg: String,
}

impl TransportError {
    pub fn new(code: TransportResult, msg: impl Into<String>) -> Self {
        TransportError {
            code,
            msg: msg.into(),
        }
    }

    // io wraps an I/O failure with a description of the operation
    pub fn io(context: &str, err: io::Error) -> Self {
        Self::new(TBS_E_IOERROR, format!("{}: {}", context, err))
    }
}

impl From<io::Error> for TransportError {
    fn from(e: io::Error) -> Self {
        Self::new(TBS_E_IOERROR, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code() {
        let err = TransportError::new(TBS_E_TPM_NOT_FOUND, "no TPM");
        assert_eq!(err.to_string(), "no TPM (error code 0x8028400f)");
    }

    #[test]
    fn io_errors_map_to_ioerror() {
        let err = TransportError::from(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert_eq!(err.code, TBS_E_IOERROR);
        assert_eq!(err.msg, "gone");
    }
}
