use crate::device::errors::{self, TransportError};
use crate::device::{ContextVersion, Locality, Priority, TpmTransport};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::result;
use tracing::{debug, trace};

pub const DEFAULT_TPM_DEVICE: &str = "/dev/tpm0";

// DeviceTransport implements communication with the TPM via /dev/tpm[0-9]
// device file. Every session holds its own open file.
#[derive(Debug)]
pub struct DeviceTransport {
    path: PathBuf,
}

#[derive(Debug)]
pub struct DeviceSession {
    device_file: File,
}

impl DeviceTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DeviceTransport { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for DeviceTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TPM_DEVICE)
    }
}

impl TpmTransport for DeviceTransport {
    type Session = DeviceSession;

    fn open_session(
        &mut self,
        version: ContextVersion,
    ) -> result::Result<DeviceSession, TransportError> {
        debug!(?version, path = %self.path.display(), "opening TPM device");
        match OpenOptions::new().read(true).write(true).open(&self.path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(TransportError::new(
                errors::TBS_E_TPM_NOT_FOUND,
                format!("could not open {}: {}", self.path.display(), err),
            )),
            Err(err) => Err(TransportError::new(
                errors::TBS_E_INTERNAL_ERROR,
                format!("could not open {}: {}", self.path.display(), err),
            )),
            Ok(device_file) => Ok(DeviceSession { device_file }),
        }
    }

    fn close_session(&mut self, session: DeviceSession) -> result::Result<(), TransportError> {
        drop(session.device_file);
        Ok(())
    }

    fn submit(
        &mut self,
        session: &mut DeviceSession,
        locality: Locality,
        priority: Priority,
        command: &[u8],
        response: &mut [u8],
    ) -> result::Result<usize, TransportError> {
        trace!(?locality, ?priority, "submitting {} bytes", command.len());

        session
            .device_file
            .write_all(command)
            .map_err(|err| TransportError::io("could not write buffer to TPM device", err))?;
        // the driver hands back the whole reply in a single read
        let n = session
            .device_file
            .read(response)
            .map_err(|err| TransportError::io("could not read answer from TPM", err))?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_is_not_found() {
        let mut transport = DeviceTransport::new("/nonexistent/tpm0");
        let err = transport.open_session(ContextVersion::One).unwrap_err();
        assert_eq!(err.code, errors::TBS_E_TPM_NOT_FOUND);
    }

    #[test]
    fn default_device_path() {
        assert_eq!(DeviceTransport::default().path(), Path::new("/dev/tpm0"));
    }

    #[test]
    fn submit_writes_command_and_reads_reply() {
        // a regular file stands in for the character device
        let path = std::env::temp_dir().join(format!("tpm12-pcr-raw-{}", std::process::id()));
        std::fs::write(&path, b"").unwrap();
        let mut transport = DeviceTransport::new(&path);
        let mut session = transport.open_session(ContextVersion::One).unwrap();
        let mut response = [0u8; 8];
        let n = transport
            .submit(&mut session, Locality::Zero, Priority::Normal, &[0xC1, 0x00], &mut response)
            .unwrap();
        // the write moved the file cursor to the end, nothing left to read
        assert_eq!(n, 0);
        transport.close_session(session).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xC1, 0x00]);
        std::fs::remove_file(&path).unwrap();
    }
}
