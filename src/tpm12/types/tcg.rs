// TPM 1.2 main specification, part 2 (structures) and part 3 (commands)

// Types
pub type TpmTag = u16;
pub type TpmCommandCode = u32;
pub type TpmResult = u32;
pub type TpmPcrIndex = u32;

// Command and response tags
pub const TPM_TAG_RQU_COMMAND: TpmTag = 0x00C1;
pub const TPM_TAG_RSP_COMMAND: TpmTag = 0x00C4;

// Ordinals
pub const TPM_ORD_PCR_READ: TpmCommandCode = 21;

// Number of PCRs every TPM 1.2 implements
pub const TPM_NUM_PCR: TpmPcrIndex = 24;

// TPM_DIGEST is a SHA-1 value
pub const TPM_SHA1_160_HASH_LEN: usize = 20;

// Result codes
pub const TPM_BASE: TpmResult = 0x0;
pub const TPM_SUCCESS: TpmResult = TPM_BASE;
pub const TPM_AUTHFAIL: TpmResult = TPM_BASE + 1;
pub const TPM_BADINDEX: TpmResult = TPM_BASE + 2;
pub const TPM_BAD_PARAMETER: TpmResult = TPM_BASE + 3;
pub const TPM_DEACTIVATED: TpmResult = TPM_BASE + 6;
pub const TPM_DISABLED: TpmResult = TPM_BASE + 7;
pub const TPM_FAIL: TpmResult = TPM_BASE + 9;
pub const TPM_BAD_ORDINAL: TpmResult = TPM_BASE + 10;
pub const TPM_BAD_PARAM_SIZE: TpmResult = TPM_BASE + 25;
pub const TPM_INVALID_POSTINIT: TpmResult = TPM_BASE + 38;
pub const TPM_BAD_TAG: TpmResult = TPM_BASE + 30;
pub const TPM_BAD_LOCALITY: TpmResult = TPM_BASE + 61;

// result_code_name maps the result codes a PCR read can produce to their
// TCG names
pub fn result_code_name(code: TpmResult) -> Option<&'static str> {
    let name = match code {
        TPM_SUCCESS => "TPM_SUCCESS",
        TPM_AUTHFAIL => "TPM_AUTHFAIL",
        TPM_BADINDEX => "TPM_BADINDEX",
        TPM_BAD_PARAMETER => "TPM_BAD_PARAMETER",
        TPM_DEACTIVATED => "TPM_DEACTIVATED",
        TPM_DISABLED => "TPM_DISABLED",
        TPM_FAIL => "TPM_FAIL",
        TPM_BAD_ORDINAL => "TPM_BAD_ORDINAL",
        TPM_BAD_PARAM_SIZE => "TPM_BAD_PARAM_SIZE",
        TPM_BAD_TAG => "TPM_BAD_TAG",
        TPM_INVALID_POSTINIT => "TPM_INVALID_POSTINIT",
        TPM_BAD_LOCALITY => "TPM_BAD_LOCALITY",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcr_read_constants() {
        assert_eq!(TPM_ORD_PCR_READ, 0x15);
        assert_eq!(TPM_TAG_RQU_COMMAND, 0xC1);
        assert_eq!(TPM_NUM_PCR, 24);
    }

    #[test]
    fn names_known_codes_only() {
        assert_eq!(result_code_name(TPM_BADINDEX), Some("TPM_BADINDEX"));
        assert_eq!(result_code_name(0x0000_0800), None);
    }
}
