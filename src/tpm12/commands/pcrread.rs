use crate::device::session::SessionGuard;
use crate::device::{ContextVersion, Locality, Priority, TpmTransport};
use crate::tpm12::commands::header::{
    CommandHeader, ResponseHeader, COMMAND_HEADER_SIZE, RESPONSE_HEADER_SIZE,
};
use crate::tpm12::commands::pcrs::{PcrDigest, PcrValues};
use crate::tpm12::errors::{DeserializationError, SessionError, SubmissionError};
use crate::tpm12::serialization::inout::{self, Tpm12StructIn, Tpm12StructOut};
use crate::tpm12::types::endian::BeUint;
use crate::tpm12::types::tcg;
use bytebuffer::ByteBuffer;
use std::result;
use tracing::{debug, error};

pub const PCR_READ_COMMAND_SIZE: usize = COMMAND_HEADER_SIZE + size_of!(BeUint<tcg::TpmPcrIndex>);
pub const PCR_READ_RESPONSE_SIZE: usize = RESPONSE_HEADER_SIZE + tcg::TPM_SHA1_160_HASH_LEN;

// Every PCR read goes out at locality zero, normal priority
pub const PCR_READ_LOCALITY: Locality = Locality::Zero;
pub const PCR_READ_PRIORITY: Priority = Priority::Normal;

// TPM_PcrRead command. The index is not range checked here.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PcrReadCommand {
    header: CommandHeader,
    pcr_index: BeUint<tcg::TpmPcrIndex>,
}

impl PcrReadCommand {
    // new creates a PcrReadCommand for the given register
    pub fn new(pcr_index: tcg::TpmPcrIndex) -> Self {
        PcrReadCommand {
            header: CommandHeader::new(
                tcg::TPM_TAG_RQU_COMMAND,
                PCR_READ_COMMAND_SIZE as u32,
                tcg::TPM_ORD_PCR_READ,
            ),
            pcr_index: BeUint::new(pcr_index),
        }
    }

    // from_bytes decodes a serialized PcrReadCommand
    pub fn from_bytes(bytes: &[u8]) -> result::Result<Self, DeserializationError> {
        let mut cmd = PcrReadCommand::default();
        cmd.unpack(&mut ByteBuffer::from_bytes(bytes))?;
        Ok(cmd)
    }

    pub fn header(&self) -> &CommandHeader {
        &self.header
    }

    pub fn pcr_index(&self) -> tcg::TpmPcrIndex {
        self.pcr_index.get()
    }
}

impl Tpm12StructOut for PcrReadCommand {
    fn pack(&self, buff: &mut ByteBuffer) {
        self.header.pack(buff);
        self.pcr_index.pack(buff);
    }
}

impl Tpm12StructIn for PcrReadCommand {
    fn unpack(&mut self, buff: &mut ByteBuffer) -> result::Result<(), DeserializationError> {
        self.header.unpack(buff)?;
        self.pcr_index.unpack(buff)?;
        Ok(())
    }
}

// TPM_PcrRead response. The digest is only meaningful when the result code
// is TPM_SUCCESS, which is for the caller to check.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PcrReadResponse {
    header: ResponseHeader,
    pcr_value: PcrDigest,
}

impl PcrReadResponse {
    pub fn new(result_code: tcg::TpmResult, pcr_value: PcrDigest) -> Self {
        PcrReadResponse {
            header: ResponseHeader::new(
                tcg::TPM_TAG_RSP_COMMAND,
                PCR_READ_RESPONSE_SIZE as u32,
                result_code,
            ),
            pcr_value,
        }
    }

    // from_bytes builds a PcrReadResponse from a full size reply buffer
    pub fn from_bytes(bytes: &[u8]) -> result::Result<Self, DeserializationError> {
        let mut resp = PcrReadResponse::default();
        resp.unpack(&mut ByteBuffer::from_bytes(bytes))?;
        Ok(resp)
    }

    pub fn header(&self) -> &ResponseHeader {
        &self.header
    }

    pub fn pcr_value(&self) -> &PcrDigest {
        &self.pcr_value
    }
}

impl Tpm12StructOut for PcrReadResponse {
    fn pack(&self, buff: &mut ByteBuffer) {
        self.header.pack(buff);
        buff.write_bytes(&self.pcr_value);
    }
}

impl Tpm12StructIn for PcrReadResponse {
    fn unpack(&mut self, buff: &mut ByteBuffer) -> result::Result<(), DeserializationError> {
        self.header.unpack(buff)?;
        let digest = inout::read_exact(buff, tcg::TPM_SHA1_160_HASH_LEN)?;
        self.pcr_value.copy_from_slice(&digest);
        Ok(())
    }
}

// check_reply validates the reply the transport wrote for a PCR read and
// extracts the digest from it
fn check_reply(reply: &[u8]) -> result::Result<PcrDigest, SubmissionError> {
    if reply.len() < RESPONSE_HEADER_SIZE {
        return Err(SubmissionError::ShortResponse {
            written: reply.len(),
            expected: RESPONSE_HEADER_SIZE,
        });
    }

    let header = ResponseHeader::from_bytes(reply)?;
    if header.tag.get() != tcg::TPM_TAG_RSP_COMMAND {
        return Err(SubmissionError::UnexpectedTag {
            tag: header.tag.get(),
        });
    }
    if header.result_code.get() != tcg::TPM_SUCCESS {
        return Err(SubmissionError::TpmResult {
            code: header.result_code.get(),
        });
    }
    if reply.len() != PCR_READ_RESPONSE_SIZE || header.size.get() as usize != reply.len() {
        return Err(SubmissionError::SizeMismatch {
            declared: header.size.get(),
            written: reply.len(),
            expected: PCR_READ_RESPONSE_SIZE,
        });
    }

    let resp = PcrReadResponse::from_bytes(reply)?;
    Ok(*resp.pcr_value())
}

// tpm12_pcr_read issues a single TPM_PcrRead over an open session
pub fn tpm12_pcr_read<T: TpmTransport>(
    session: &mut SessionGuard<'_, T>,
    pcr_index: tcg::TpmPcrIndex,
) -> result::Result<PcrDigest, SubmissionError> {
    let cmd_pcr_read = PcrReadCommand::new(pcr_index);
    let command = cmd_pcr_read.to_bytes();
    debug!(
        pcr_index,
        "command serialization for cmd_pcr_read: {}",
        hex::encode(&command)
    );

    let mut reply = [0u8; PCR_READ_RESPONSE_SIZE];
    let written = session
        .submit(PCR_READ_LOCALITY, PCR_READ_PRIORITY, &command, &mut reply)
        .map_err(SubmissionError::Transport)?;
    if written > reply.len() {
        return Err(SubmissionError::Overrun {
            written,
            capacity: reply.len(),
        });
    }
    debug!(pcr_index, "reply: {}", hex::encode(&reply[..written]));

    check_reply(&reply[..written])
}

// read_pcrs reads every PCR of the TPM, in index order, over a single
// session. A failed register is logged and recorded, the remaining
// registers are still read.
pub fn read_pcrs<T: TpmTransport>(transport: &mut T) -> result::Result<PcrValues, SessionError> {
    let mut session =
        SessionGuard::open(transport, ContextVersion::One).map_err(SessionError::Open)?;

    let mut values = PcrValues::new();
    for pcr_index in 0..tcg::TPM_NUM_PCR {
        let outcome = tpm12_pcr_read(&mut session, pcr_index);
        if let Err(err) = &outcome {
            error!(
                pcr_index,
                code = ?err.code(),
                "Error reading PCR register #{}: {}",
                pcr_index,
                err
            );
        }
        values.push(pcr_index, outcome);
    }

    if let Err(err) = session.close() {
        error!(code = err.code, "Cannot close context. {}", err);
    }
    Ok(values)
}
