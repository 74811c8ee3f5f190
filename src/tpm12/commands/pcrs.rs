use crate::tpm12::errors::SubmissionError;
use crate::tpm12::types::tcg;
use std::fmt;
use std::result;

// PcrDigest is the SHA-1 value held by a TPM 1.2 PCR
pub type PcrDigest = [u8; tcg::TPM_SHA1_160_HASH_LEN];

// PcrReading is the outcome of reading a single PCR register
#[derive(Debug)]
pub struct PcrReading {
    pub index: tcg::TpmPcrIndex,
    pub outcome: result::Result<PcrDigest, SubmissionError>,
}

// PCRValues represents the outcome of reading a set of PCR registers,
// in the order they were read
#[derive(Debug, Default)]
pub struct PcrValues {
    readings: Vec<PcrReading>,
}

impl PcrValues {
    pub fn new() -> Self {
        PcrValues {
            readings: Vec::with_capacity(tcg::TPM_NUM_PCR as usize),
        }
    }

    pub fn push(
        &mut self,
        index: tcg::TpmPcrIndex,
        outcome: result::Result<PcrDigest, SubmissionError>,
    ) {
        self.readings.push(PcrReading { index, outcome });
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn readings(&self) -> &[PcrReading] {
        &self.readings
    }

    // get returns the digest of a register, if it was read successfully
    pub fn get(&self, index: tcg::TpmPcrIndex) -> Option<&PcrDigest> {
        self.readings
            .iter()
            .find(|r| r.index == index)
            .and_then(|r| r.outcome.as_ref().ok())
    }

    // digests iterates over the registers which were read successfully
    pub fn digests(&self) -> impl Iterator<Item = (tcg::TpmPcrIndex, &PcrDigest)> + '_ {
        self.readings
            .iter()
            .filter_map(|r| r.outcome.as_ref().ok().map(|d| (r.index, d)))
    }

    // failures iterates over the registers which could not be read
    pub fn failures(&self) -> impl Iterator<Item = (tcg::TpmPcrIndex, &SubmissionError)> + '_ {
        self.readings
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|e| (r.index, e)))
    }
}

// PcrLine renders a register as `PCRnn` followed by its digest in
// uppercase hex, one space between bytes
pub struct PcrLine<'a> {
    pub index: tcg::TpmPcrIndex,
    pub digest: &'a PcrDigest,
}

impl fmt::Display for PcrLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PCR{:02}", self.index)?;
        for byte in self.digest.iter() {
            write!(f, " {:02X}", byte)?;
        }
        Ok(())
    }
}

// Only the registers which were read successfully are displayed, one per line
impl fmt::Display for PcrValues {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, digest) in self.digests() {
            writeln!(f, "{}", PcrLine { index, digest })?;
        }
        Ok(())
    }
}
