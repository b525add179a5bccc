//! Error types.

use thiserror::Error;

use crate::report::Command;

/// Failure reported by the HID backend.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// IPAC error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to access HID: {0}")]
    Backend(#[source] TransportError),

    #[error("no HID devices found for {vendor_id:04x}:{product_id:04x}")]
    NoDeviceFound { vendor_id: u16, product_id: u16 },

    #[error("expected one device on interface {interface}, found {count}")]
    AmbiguousDevice { interface: i32, count: usize },

    #[error("unable to open device on interface {interface}: {source}")]
    OpenFailed {
        interface: i32,
        #[source]
        source: TransportError,
    },

    #[error("unable to {command}: {source}")]
    WriteFailed {
        command: Command,
        #[source]
        source: TransportError,
    },

    #[error("unable to close device: {0}")]
    CloseFailed(#[source] TransportError),

    #[error("no active device connection")]
    NoActiveConnection,
}

/// Result type for IPAC operations.
pub type Result<T> = std::result::Result<T, Error>;
