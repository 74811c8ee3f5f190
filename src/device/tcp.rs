use crate::device::errors::{self, TransportError};
use crate::device::{ContextVersion, Locality, Priority, TpmTransport};
use crate::tpm12::types::endian::BeU32;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::result;
use tracing::{debug, trace};

// Tag (2) + size (4) + result code (4)
const REPLY_HEADER_SIZE: usize = 10;

// TcpTransport implements communication with a software TPM exposing its
// raw command channel over a socket
#[derive(Debug)]
pub struct TcpTransport {
    addr: String,
}

#[derive(Debug)]
pub struct TcpSession {
    stream: TcpStream,
    // set once the reply framing is lost, nothing can be read reliably after that
    broken: bool,
}

impl TcpSession {
    // exchange writes a command and reads the framed reply into response
    fn exchange(&mut self, command: &[u8], response: &mut [u8]) -> result::Result<usize, TransportError> {
        if let Err(err) = self.stream.write_all(command) {
            self.broken = true;
            return Err(TransportError::io("could not write command to TPM stream", err));
        }
        if let Err(err) = self.stream.read_exact(&mut response[..REPLY_HEADER_SIZE]) {
            self.broken = true;
            return Err(TransportError::io("could not read reply header from TPM stream", err));
        }

        let size = BeU32::from_be_bytes([response[2], response[3], response[4], response[5]]).get() as usize;
        if size < REPLY_HEADER_SIZE {
            self.broken = true;
            return Err(TransportError::new(
                errors::TBS_E_IOERROR,
                format!("reply declares an invalid size of {} bytes", size),
            ));
        }
        if size > response.len() {
            // drop the body so the next reply starts on a header
            let body = (size - REPLY_HEADER_SIZE) as u64;
            match io::copy(&mut (&self.stream).take(body), &mut io::sink()) {
                Ok(n) if n == body => (),
                Ok(_) | Err(_) => self.broken = true,
            }
            return Err(TransportError::new(
                errors::TBS_E_INSUFFICIENT_BUFFER,
                format!("reply of {} bytes exceeds buffer of {} bytes", size, response.len()),
            ));
        }
        if let Err(err) = self.stream.read_exact(&mut response[REPLY_HEADER_SIZE..size]) {
            self.broken = true;
            return Err(TransportError::io("could not read reply body from TPM stream", err));
        }
        Ok(size)
    }
}

impl TcpTransport {
    pub fn new(addr: impl Into<String>) -> Self {
        TcpTransport { addr: addr.into() }
    }
}

impl TpmTransport for TcpTransport {
    type Session = TcpSession;

    fn open_session(&mut self, version: ContextVersion) -> result::Result<TcpSession, TransportError> {
        debug!(?version, addr = %self.addr, "connecting to TPM");
        match TcpStream::connect(&self.addr) {
            Err(err) if err.kind() == io::ErrorKind::ConnectionRefused => Err(TransportError::new(
                errors::TBS_E_SERVICE_NOT_RUNNING,
                format!("could not open TPM stream connection to {}: {}", self.addr, err),
            )),
            Err(err) => Err(TransportError::new(
                errors::TBS_E_INTERNAL_ERROR,
                format!("could not open TPM stream connection to {}: {}", self.addr, err),
            )),
            Ok(stream) => Ok(TcpSession {
                stream,
                broken: false,
            }),
        }
    }

    fn close_session(&mut self, session: TcpSession) -> result::Result<(), TransportError> {
        match session.stream.shutdown(Shutdown::Both) {
            // the TPM side may hang up first
            Err(err) if err.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(err) => Err(TransportError::io("could not shut down TPM stream", err)),
            Ok(()) => Ok(()),
        }
    }

    fn submit(
        &mut self,
        session: &mut TcpSession,
        locality: Locality,
        priority: Priority,
        command: &[u8],
        response: &mut [u8],
    ) -> result::Result<usize, TransportError> {
        trace!(?locality, ?priority, "submitting {} bytes", command.len());

        if response.len() < REPLY_HEADER_SIZE {
            return Err(TransportError::new(
                errors::TBS_E_INSUFFICIENT_BUFFER,
                format!("response buffer of {} bytes cannot hold a reply header", response.len()),
            ));
        }

        if session.broken {
            return Err(TransportError::new(
                errors::TBS_E_INVALID_CONTEXT,
                "TPM stream lost reply framing, session must be reopened",
            ));
        }
        session.exchange(command, response)
    }
}
