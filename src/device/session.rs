use crate::device::errors::{self, TransportError};
use crate::device::{ContextVersion, Locality, Priority, TpmTransport};
use std::result;
use tracing::{debug, error};

// SessionGuard owns a transport session for the duration of a scope. The
// session is released exactly once, either by close() or when the guard is
// dropped, whichever comes first.
pub struct SessionGuard<'a, T: TpmTransport> {
    transport: &'a mut T,
    session: Option<T::Session>,
}

impl<'a, T: TpmTransport> SessionGuard<'a, T> {
    // open acquires a session from the transport. Nothing is held on failure.
    pub fn open(
        transport: &'a mut T,
        version: ContextVersion,
    ) -> result::Result<Self, TransportError> {
        let session = transport.open_session(version)?;
        debug!(?version, "TPM session opened");
        Ok(SessionGuard {
            transport,
            session: Some(session),
        })
    }

    pub fn submit(
        &mut self,
        locality: Locality,
        priority: Priority,
        command: &[u8],
        response: &mut [u8],
    ) -> result::Result<usize, TransportError> {
        match self.session.as_mut() {
            Some(session) => self
                .transport
                .submit(session, locality, priority, command, response),
            None => Err(TransportError::new(
                errors::TBS_E_INVALID_CONTEXT,
                "session already released",
            )),
        }
    }

    // close releases the session and reports the outcome of the release
    pub fn close(mut self) -> result::Result<(), TransportError> {
        self.release()
    }

    fn release(&mut self) -> result::Result<(), TransportError> {
        match self.session.take() {
            Some(session) => {
                debug!("releasing TPM session");
                self.transport.close_session(session)
            }
            None => Ok(()),
        }
    }
}

impl<T: TpmTransport> Drop for SessionGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            error!(code = err.code, "Cannot close context. {}", err);
        }
    }
}
