//! IPAC Ultimate-IO LED control.
//!
//! The Ultimate-IO drives its RGB LEDs through vendor specific HID output reports on its
//! third USB interface. [`DeviceSession`] finds and opens that interface and translates
//! LED commands into reports.

pub mod color;
pub mod error;
pub mod report;
pub mod session;
pub mod transport;

pub use crate::color::{Rgb, Rgb16};
pub use crate::error::{Error, Result, TransportError};
pub use crate::report::{Command, Port, Report};
pub use crate::session::{DeviceConfig, DeviceSession, MatchPolicy};
pub use crate::transport::{DeviceHandle, HidApiTransport, HidConnection, HidTransport};
