pub mod header;
pub mod pcrread;
pub mod pcrs;
