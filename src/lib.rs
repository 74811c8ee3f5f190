//! Reads the Platform Configuration Registers of a TPM 1.2.
//!
//! One `TPM_PcrRead` command is issued per register over a single transport
//! session. Commands and replies are fixed-layout big endian structures,
//! encoded field by field so their layout never depends on how the compiler
//! lays out Rust structs.

#[macro_use]
extern crate mem_macros;

pub mod config;
pub mod device;
pub mod tpm12;

pub use tpm12::commands::pcrread::read_pcrs;
pub use tpm12::commands::pcrs::{PcrDigest, PcrValues};
