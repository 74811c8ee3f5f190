pub mod endian;
pub mod tcg;
