use std::fmt;
use std::hash::Hash;

// SwapEndian is implemented by the fixed-width unsigned integers which travel
// on the TPM 1.2 wire. The width is carried by the implementing type, so a
// single generic wrapper covers every field size.
pub trait SwapEndian: Copy + Default + Eq + Hash + fmt::LowerHex {
    // Raw byte representation, exactly as wide as the integer
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Copy + Default;

    // swap_endian reverses the byte order of the value
    fn swap_endian(self) -> Self;
    // to_wire converts a native-order value into its big endian representation
    fn to_wire(self) -> Self;
    // from_wire converts a big endian representation back into native order
    fn from_wire(self) -> Self;
    // raw_bytes returns the in-memory bytes of the value, without conversion
    fn raw_bytes(self) -> Self::Bytes;
    // from_raw_bytes rebuilds a value from its in-memory bytes, without conversion
    fn from_raw_bytes(bytes: Self::Bytes) -> Self;
}

// impl_swap_endian implements SwapEndian and the native conversions of
// BeUint for a primitive unsigned integer.
macro_rules! impl_swap_endian {
    ($T: ident) => {
        impl SwapEndian for $T {
            type Bytes = [u8; size_of!($T)];

            fn swap_endian(self) -> Self {
                self.swap_bytes()
            }

            fn to_wire(self) -> Self {
                $T::to_be(self)
            }

            fn from_wire(self) -> Self {
                $T::from_be(self)
            }

            fn raw_bytes(self) -> Self::Bytes {
                self.to_ne_bytes()
            }

            fn from_raw_bytes(bytes: Self::Bytes) -> Self {
                $T::from_ne_bytes(bytes)
            }
        }

        impl From<BeUint<$T>> for $T {
            fn from(value: BeUint<$T>) -> Self {
                value.get()
            }
        }
    };
}

impl_swap_endian! { u16 }
impl_swap_endian! { u32 }

/// A fixed-width unsigned integer kept in big endian byte order.
///
/// The stored value is always the wire representation: on little endian
/// hosts it is byte-swapped relative to native order, every read and write
/// converts. The wrapper has the exact size of the integer it holds, so a
/// sequence of them describes a TPM structure with no padding.
#[repr(transparent)]
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct BeUint<T: SwapEndian> {
    value: T,
}

pub type BeU16 = BeUint<u16>;
pub type BeU32 = BeUint<u32>;

impl<T: SwapEndian> BeUint<T> {
    // new stores a native-order value in big endian order
    pub fn new(native: T) -> Self {
        BeUint {
            value: native.to_wire(),
        }
    }

    // from_be_value wraps a value which is already in big endian order
    pub fn from_be_value(raw: T) -> Self {
        BeUint { value: raw }
    }

    // from_be_bytes wraps the bytes of a big endian field as read from the wire
    pub fn from_be_bytes(bytes: T::Bytes) -> Self {
        BeUint {
            value: T::from_raw_bytes(bytes),
        }
    }

    // get returns the native-order interpretation of the stored value
    pub fn get(self) -> T {
        self.value.from_wire()
    }

    // set replaces the stored value with a native-order value
    pub fn set(&mut self, native: T) {
        self.value = native.to_wire();
    }

    // be_value returns the stored representation, without conversion
    pub fn be_value(self) -> T {
        self.value
    }

    // to_be_bytes returns the on-wire bytes of the field
    pub fn to_be_bytes(self) -> T::Bytes {
        self.value.raw_bytes()
    }
}

impl<T: SwapEndian> From<T> for BeUint<T> {
    fn from(native: T) -> Self {
        BeUint::new(native)
    }
}

impl<T: SwapEndian> fmt::Debug for BeUint<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BeUint({:#x})", self.get())
    }
}
