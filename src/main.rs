use anyhow::{Context, Result};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tpm12_pcr::config::TransportConfig;
use tpm12_pcr::device::raw::DeviceTransport;
use tpm12_pcr::device::tcp::TcpTransport;
use tpm12_pcr::device::TpmTransport;
use tpm12_pcr::read_pcrs;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // diagnostics go to stderr, stdout only carries PCR values
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = TransportConfig::from_env().context("invalid transport configuration")?;
    match config {
        TransportConfig::Device(path) => print_pcrs(&mut DeviceTransport::new(path)),
        TransportConfig::Tcp(addr) => print_pcrs(&mut TcpTransport::new(addr)),
    }
}

fn print_pcrs<T: TpmTransport>(transport: &mut T) -> Result<()> {
    let pcrs = read_pcrs(transport)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", pcrs).context("could not write PCR values")?;
    out.flush().context("could not write PCR values")?;
    Ok(())
}
