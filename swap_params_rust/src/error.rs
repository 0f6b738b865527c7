use error_stack::{AttachmentKind, FrameKind, Report};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type EstimatorResult<T> = error_stack::Result<T, Error>;

#[derive(Error, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Error {
    /// Malformed or non-numeric decimal input
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Custom route text that does not parse into path-groups of hops
    #[error("Invalid route format: {0}")]
    InvalidRouteFormat(String),

    /// Aggregator unreachable or answered with something unusable
    #[error("Quote unavailable: {0}")]
    QuoteUnavailable(String),

    /// Derived or supplied minimum output that is not a positive integer
    #[error("Invalid minimum output: {0}")]
    InvalidMinimumOutput(String),

    /// Missing address for the swap output
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Reqwest error")]
    ReqwestError,

    #[error("Response error")]
    ResponseError,

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Models error")]
    ModelsError,

    #[error("Serde serialize error: {0}")]
    SerdeSerialize(String),

    #[error("Unknown error")]
    Unknown,
}

pub trait ReportDisplayExt {
    fn format(&self) -> String;
}

impl ReportDisplayExt for Report<Error> {
    fn format(&self) -> String {
        let mut output = String::new();

        for frame in self.frames() {
            if let FrameKind::Attachment(AttachmentKind::Printable(attachment)) = frame.kind() {
                output.push_str(&format!(" {attachment} "));
            }
        }

        output.trim().to_string()
    }
}
