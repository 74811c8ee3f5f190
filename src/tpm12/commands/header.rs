use crate::tpm12::errors::DeserializationError;
use crate::tpm12::serialization::inout::{Tpm12StructIn, Tpm12StructOut};
use crate::tpm12::types::endian::{BeU32, BeUint};
use crate::tpm12::types::tcg;
use bytebuffer::ByteBuffer;
use std::result;

pub const COMMAND_HEADER_SIZE: usize =
    size_of!(BeUint<tcg::TpmTag>) + size_of!(BeU32) + size_of!(BeUint<tcg::TpmCommandCode>);

pub const RESPONSE_HEADER_SIZE: usize =
    size_of!(BeUint<tcg::TpmTag>) + size_of!(BeU32) + size_of!(BeUint<tcg::TpmResult>);

// Header common to every TPM 1.2 command
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandHeader {
    pub tag: BeUint<tcg::TpmTag>,
    pub size: BeU32,
    pub ordinal: BeUint<tcg::TpmCommandCode>,
}

impl CommandHeader {
    // new creates a header for a command of `size` bytes, header included
    pub fn new(tag: tcg::TpmTag, size: u32, ordinal: tcg::TpmCommandCode) -> Self {
        CommandHeader {
            tag: BeUint::new(tag),
            size: BeU32::new(size),
            ordinal: BeUint::new(ordinal),
        }
    }
}

impl Tpm12StructOut for CommandHeader {
    fn pack(&self, buff: &mut ByteBuffer) {
        self.tag.pack(buff);
        self.size.pack(buff);
        self.ordinal.pack(buff);
    }
}

impl Tpm12StructIn for CommandHeader {
    fn unpack(&mut self, buff: &mut ByteBuffer) -> result::Result<(), DeserializationError> {
        self.tag.unpack(buff)?;
        self.size.unpack(buff)?;
        self.ordinal.unpack(buff)?;
        Ok(())
    }
}

// Header common to every TPM 1.2 response
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseHeader {
    pub tag: BeUint<tcg::TpmTag>,
    pub size: BeU32,
    pub result_code: BeUint<tcg::TpmResult>,
}

impl ResponseHeader {
    pub fn new(tag: tcg::TpmTag, size: u32, result_code: tcg::TpmResult) -> Self {
        ResponseHeader {
            tag: BeUint::new(tag),
            size: BeU32::new(size),
            result_code: BeUint::new(result_code),
        }
    }

    // from_bytes decodes the header found at the start of a reply
    pub fn from_bytes(bytes: &[u8]) -> result::Result<Self, DeserializationError> {
        let mut header = ResponseHeader::default();
        header.unpack(&mut ByteBuffer::from_bytes(bytes))?;
        Ok(header)
    }
}

impl Tpm12StructOut for ResponseHeader {
    fn pack(&self, buff: &mut ByteBuffer) {
        self.tag.pack(buff);
        self.size.pack(buff);
        self.result_code.pack(buff);
    }
}

impl Tpm12StructIn for ResponseHeader {
    fn unpack(&mut self, buff: &mut ByteBuffer) -> result::Result<(), DeserializationError> {
        self.tag.unpack(buff)?;
        self.size.unpack(buff)?;
        self.result_code.unpack(buff)?;
        Ok(())
    }
}
