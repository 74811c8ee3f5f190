use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::{Command, Output};
use std::thread;
use tpm12_pcr::tpm12::commands::header::ResponseHeader;
use tpm12_pcr::tpm12::commands::pcrread::{PcrReadCommand, PcrReadResponse};
use tpm12_pcr::tpm12::serialization::inout::Tpm12StructOut;
use tpm12_pcr::tpm12::types::tcg;

fn readpcr(transport: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_readpcr"))
        .env("READPCR_TRANSPORT", transport)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

// serve_tpm answers every PCR read of one session, failing the given
// register with TPM_BADINDEX
fn serve_tpm(failing: u32) -> (String, thread::JoinHandle<Vec<u32>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut indices = Vec::new();
        let mut command = [0u8; 14];
        while stream.read_exact(&mut command).is_ok() {
            let index = PcrReadCommand::from_bytes(&command).unwrap().pcr_index();
            indices.push(index);
            let reply = if index == failing {
                ResponseHeader::new(tcg::TPM_TAG_RSP_COMMAND, 10, tcg::TPM_BADINDEX).to_bytes()
            } else {
                PcrReadResponse::new(tcg::TPM_SUCCESS, [index as u8; 20]).to_bytes()
            };
            stream.write_all(&reply).unwrap();
        }
        indices
    });
    (addr, handle)
}

#[test]
fn missing_tpm_exits_nonzero_without_output() {
    let output = readpcr("device:/nonexistent/tpm0");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot create TPM context"), "{}", stderr);
    assert!(stderr.contains("0x8028400f"), "{}", stderr);
    assert!(!stderr.contains('\u{1b}'), "{}", stderr);
}

#[test]
fn failed_register_is_reported_once_and_skipped() {
    let (addr, server) = serve_tpm(7);
    let output = readpcr(&format!("tcp:{}", addr));

    assert!(output.status.success());
    assert_eq!(server.join().unwrap(), (0..24).collect::<Vec<u32>>());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 23);
    assert!(lines.iter().all(|l| !l.starts_with("PCR07")));
    assert_eq!(lines[7], format!("PCR08{}", " 08".repeat(20)));

    let stderr = String::from_utf8_lossy(&output.stderr);
    let diagnostics: Vec<&str> = stderr
        .lines()
        .filter(|l| l.contains("PCR register #"))
        .collect();
    assert_eq!(diagnostics.len(), 1, "{}", stderr);
    assert!(diagnostics[0].contains("PCR register #7"));
    assert!(diagnostics[0].contains("TPM_BADINDEX"));
}
