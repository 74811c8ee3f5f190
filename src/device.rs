//! Transport to the TPM.
//!
//! A transport hands out sessions and exchanges opaque command and response
//! buffers with the TPM over them. It knows nothing about the commands it
//! carries.

pub mod errors;
pub mod raw;
pub mod session;
pub mod tcp;

use errors::TransportError;
use std::result;

// ContextVersion selects the session protocol version requested from the transport
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContextVersion {
    One = 1,
}

// Locality under which a command is submitted. Neither the device nor the
// socket carry a locality, so zero is the only one offered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locality {
    Zero = 0,
}

// Priority is the scheduling priority of a submitted command
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Priority {
    Normal = 200,
}

// TpmTransport is the session service multiplexing access to the TPM
pub trait TpmTransport {
    type Session;

    // open_session acquires a new session with the requested protocol version
    fn open_session(
        &mut self,
        version: ContextVersion,
    ) -> result::Result<Self::Session, TransportError>;

    // close_session releases a session. The session is consumed even on failure.
    fn close_session(&mut self, session: Self::Session) -> result::Result<(), TransportError>;

    // submit sends a command and fills response with the reply, returning the
    // number of bytes actually written into response
    fn submit(
        &mut self,
        session: &mut Self::Session,
        locality: Locality,
        priority: Priority,
        command: &[u8],
        response: &mut [u8],
    ) -> result::Result<usize, TransportError>;
}
