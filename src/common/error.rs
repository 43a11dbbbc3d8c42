use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Environment variable {name} must be set ({purpose})"))]
    MissingVariable {
        name: &'static str,
        purpose: &'static str,
    },
    #[snafu(display("SMTP port format error: {value:?}: {source}"))]
    PortFormat {
        value: String,
        source: std::num::ParseIntError,
    },
    #[cfg(feature = "cli")]
    #[snafu(display("Failed to read environment: {source}"))]
    Environment { source: config::ConfigError },
    #[snafu(display("{field} cannot be empty"))]
    EmptyField { field: &'static str },
    #[snafu(display("Invalid {kind} address {address:?}: {source}"))]
    Address {
        kind: &'static str,
        address: String,
        source: lettre::address::AddressError,
    },
    #[snafu(display("Failed to prepare TLS for {host}: {source}"))]
    Tls {
        host: String,
        source: lettre::transport::smtp::Error,
    },
    #[snafu(display("Failed to connect to {host}:{port}: {source}"))]
    Connect {
        host: String,
        port: u16,
        source: lettre::transport::smtp::Error,
    },
    #[snafu(display("Authentication failed: {source}"))]
    Authentication {
        source: lettre::transport::smtp::Error,
    },
    #[snafu(display("Failed to set sender: {source}"))]
    Sender {
        source: lettre::transport::smtp::Error,
    },
    #[snafu(display("Failed to set recipient: {source}"))]
    Recipient {
        source: lettre::transport::smtp::Error,
    },
    #[snafu(display("Failed to open data stream: {source}"))]
    Data {
        source: lettre::transport::smtp::Error,
    },
    #[snafu(display("Failed to write message: {source}"))]
    Write {
        source: lettre::transport::smtp::Error,
    },
    #[snafu(display("Failed to quit gracefully: {source}"))]
    Quit {
        source: lettre::transport::smtp::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
