use crate::device::raw::DEFAULT_TPM_DEVICE;
use std::env;
use std::path::PathBuf;
use std::result;
use std::str::FromStr;
use thiserror::Error;

// Environment variable selecting the transport to the TPM
pub const TRANSPORT_ENV: &str = "READPCR_TRANSPORT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{} is not valid unicode", TRANSPORT_ENV)]
    NotUnicode,
    #[error("empty transport specification")]
    Empty,
    #[error("missing {0} target in transport specification")]
    MissingTarget(&'static str),
    #[error("unknown transport {0:?}, expected device:<path> or tcp:<host:port>")]
    UnknownScheme(String),
}

// TransportConfig selects how the TPM is reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    // TPM character device
    Device(PathBuf),
    // Software TPM raw command socket
    Tcp(String),
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig::Device(PathBuf::from(DEFAULT_TPM_DEVICE))
    }
}

impl TransportConfig {
    // from_env reads the transport from READPCR_TRANSPORT, falling back to
    // the default TPM device when unset
    pub fn from_env() -> result::Result<Self, ConfigError> {
        match env::var(TRANSPORT_ENV) {
            Ok(spec) => spec.parse(),
            Err(env::VarError::NotPresent) => Ok(TransportConfig::default()),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode),
        }
    }
}

impl FromStr for TransportConfig {
    type Err = ConfigError;

    fn from_str(spec: &str) -> result::Result<Self, ConfigError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(ConfigError::Empty);
        }
        if let Some(path) = spec.strip_prefix("device:") {
            if path.is_empty() {
                return Err(ConfigError::MissingTarget("device"));
            }
            return Ok(TransportConfig::Device(PathBuf::from(path)));
        }
        if let Some(addr) = spec.strip_prefix("tcp:") {
            if addr.is_empty() {
                return Err(ConfigError::MissingTarget("tcp"));
            }
            return Ok(TransportConfig::Tcp(addr.to_string()));
        }
        // a bare path names a device
        if spec.starts_with('/') || spec.starts_with('.') {
            return Ok(TransportConfig::Device(PathBuf::from(spec)));
        }
        Err(ConfigError::UnknownScheme(spec.to_string()))
    }
}
