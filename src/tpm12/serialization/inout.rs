use crate::tpm12::errors::DeserializationError;
use crate::tpm12::types::endian::{BeUint, SwapEndian};
use bytebuffer::ByteBuffer;
use std::result;

// Tpm12StructOut is a trait for TPM objects which can be serialized in
// big endian byte stream for TPM operations
pub trait Tpm12StructOut {
    fn pack(&self, buff: &mut ByteBuffer);

    // to_bytes returns the serialized object in a freshly allocated buffer
    fn to_bytes(&self) -> Vec<u8> {
        let mut buff = ByteBuffer::new();
        self.pack(&mut buff);
        buff.to_bytes()
    }
}

// Tpm12StructIn is a trait for TPM objects which can be deserialized from
// a byte stream
pub trait Tpm12StructIn {
    fn unpack(&mut self, buff: &mut ByteBuffer) -> result::Result<(), DeserializationError>;
}

// read_exact reads size bytes from the buffer, failing instead of reading
// past the end of the written data
pub fn read_exact(
    buff: &mut ByteBuffer,
    size: usize,
) -> result::Result<Vec<u8>, DeserializationError> {
    let remaining = buff.len().saturating_sub(buff.get_rpos());
    if size > remaining {
        return Err(DeserializationError::Underflow {
            wanted: size,
            remaining,
        });
    }
    Ok(buff.read_bytes(size))
}

// A BeUint already holds its wire representation, packing copies the
// stored bytes without a second conversion
impl<T: SwapEndian> Tpm12StructOut for BeUint<T> {
    fn pack(&self, buff: &mut ByteBuffer) {
        buff.write_bytes(self.to_be_bytes().as_ref());
    }
}

impl<T: SwapEndian> Tpm12StructIn for BeUint<T> {
    fn unpack(&mut self, buff: &mut ByteBuffer) -> result::Result<(), DeserializationError> {
        let bytes = read_exact(buff, size_of!(T))?;
        let mut byte_array = T::Bytes::default();
        byte_array.as_mut().copy_from_slice(&bytes);
        *self = BeUint::from_be_bytes(byte_array);
        Ok(())
    }
}

// pack serializes a sequence of fields of the same type, in order
pub fn pack(fields: &[impl Tpm12StructOut], buff: &mut ByteBuffer) {
    for field in fields.iter() {
        field.pack(buff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tpm12::types::endian::{BeU16, BeU32};

    #[test]
    fn fields_are_packed_back_to_back() {
        let mut buff = ByteBuffer::new();
        BeU16::new(0x00C1).pack(&mut buff);
        pack(&[BeU32::new(14), BeU32::new(21)], &mut buff);
        assert_eq!(hex::encode(buff.to_bytes()), "00c10000000e00000015");
    }

    #[test]
    fn unpack_reads_in_order() {
        let mut buff = ByteBuffer::from_bytes(&[0x00, 0xC4, 0x00, 0x00, 0x00, 0x1E]);
        let mut tag = BeU16::default();
        let mut size = BeU32::default();
        tag.unpack(&mut buff).unwrap();
        size.unpack(&mut buff).unwrap();
        assert_eq!(tag.get(), 0xC4);
        assert_eq!(size.get(), 30);
    }

    #[test]
    fn unpack_past_end_is_an_error() {
        let mut buff = ByteBuffer::from_bytes(&[0x00, 0x00, 0x01]);
        let mut value = BeU32::default();
        assert_eq!(
            value.unpack(&mut buff),
            Err(DeserializationError::Underflow {
                wanted: 4,
                remaining: 3
            })
        );
        assert_eq!(value.get(), 0);
    }
}
