//! IPAC Ultimate-IO LED output reports.
//!
//! Every LED command is a single 5 byte HID output report:
//!
//! | Byte | Intensity               | Fade time          |
//! |------|-------------------------|--------------------|
//! | 0    | report ID `3`           | report ID `3`      |
//! | 1    | `0x80` or `port & 0x7f` | `0xc0`             |
//! | 2    | intensity               | fade time `& 0xff` |
//! | 3    | `0`                     | `0`                |
//! | 4    | `0`                     | `0`                |

use std::fmt::{self, Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

use bytes::{BufMut, Bytes, BytesMut};

use crate::color::Rgb;

/// HID report ID used for all LED commands.
pub const REPORT_ID: u8 = 3;

/// Serialized report length, including the report ID.
pub const REPORT_LEN: usize = 5;

/// Port selector addressing every LED.
const BROADCAST_SELECTOR: u8 = 0x80;

/// Command selector for the fade time.
const FADE_TIME_SELECTOR: u8 = 0xc0;

/// Bits available for the port index, the top bit is reserved for selectors.
const PORT_MASK: u8 = 0x7f;

/// LED port.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Port {
    /// Every LED port.
    All,
    /// Single LED port, only the lower 7 bits are addressable.
    Index(u8),
}

impl Port {
    /// Convert a raw port number, `-1` selects all ports.
    ///
    /// Other values are truncated to a byte, so the wire format only sees their lower 7 bits.
    pub fn from_raw(port: i32) -> Self {
        match port {
            -1 => Port::All,
            port => Port::Index(port as u8),
        }
    }

    /// Port selector byte.
    fn selector(self) -> u8 {
        match self {
            Port::All => BROADCAST_SELECTOR,
            Port::Index(index) => index & PORT_MASK,
        }
    }
}

impl FromStr for Port {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Port::All);
        }

        Ok(Port::Index(u8::from_str(s)?))
    }
}

impl Display for Port {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Port::All => write!(f, "all ports"),
            Port::Index(index) => write!(f, "port {}", index),
        }
    }
}

/// LED command.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Command {
    /// Set the brightness of one or all LED ports.
    Intensity { port: Port, intensity: u8 },
    /// Set the global fade time.
    FadeTime(i32),
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Command::Intensity { port, intensity } => {
                write!(f, "set {} to intensity {}", port, intensity)
            },
            Command::FadeTime(fade_time) => write!(f, "set fade time to {}", fade_time),
        }
    }
}

/// Intensity commands for the red, green and blue LEDs of a group.
///
/// Group `n` owns ports `3n`, `3n + 1` and `3n + 2`.
pub fn color_commands(group: u8, color: Rgb) -> [Command; 3] {
    let first = group.wrapping_mul(3);
    let port = |offset: u8| Port::Index(first.wrapping_add(offset));

    [
        Command::Intensity { port: port(0), intensity: color.r },
        Command::Intensity { port: port(1), intensity: color.g },
        Command::Intensity { port: port(2), intensity: color.b },
    ]
}

/// HID output report.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Report {
    id: u8,
    payload: [u8; 4],
}

impl Report {
    /// Report setting the intensity of an LED port.
    pub fn intensity(port: Port, intensity: u8) -> Self {
        Self { id: REPORT_ID, payload: [port.selector(), intensity, 0, 0] }
    }

    /// Report setting the global fade time.
    pub fn fade_time(fade_time: i32) -> Self {
        Self { id: REPORT_ID, payload: [FADE_TIME_SELECTOR, fade_time as u8, 0, 0] }
    }

    /// Serialize the report for writing to the HID device.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(REPORT_LEN);

        buf.put_u8(self.id);
        buf.put_slice(&self.payload);

        buf.freeze()
    }

    /// Recover the command from a serialized report.
    #[cfg(test)]
    pub(crate) fn decode(bytes: &[u8]) -> Option<Command> {
        match *bytes {
            [REPORT_ID, FADE_TIME_SELECTOR, fade_time, 0, 0] => {
                Some(Command::FadeTime(fade_time.into()))
            },
            [REPORT_ID, BROADCAST_SELECTOR, intensity, 0, 0] => {
                Some(Command::Intensity { port: Port::All, intensity })
            },
            [REPORT_ID, index, intensity, 0, 0] if index <= PORT_MASK => {
                Some(Command::Intensity { port: Port::Index(index), intensity })
            },
            _ => None,
        }
    }
}

impl From<Command> for Report {
    fn from(command: Command) -> Self {
        match command {
            Command::Intensity { port, intensity } => Report::intensity(port, intensity),
            Command::FadeTime(fade_time) => Report::fade_time(fade_time),
        }
    }
}
