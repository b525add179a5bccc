//! LED colors.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// RGB color with 8 bits per channel.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = ();

    fn from_str(s: &str) -> Result<Rgb, ()> {
        let chars = match s.strip_prefix("0x") {
            Some(chars) if chars.len() == 6 && chars.bytes().all(|c| c.is_ascii_hexdigit()) => {
                chars
            },
            _ => return Err(()),
        };

        match u32::from_str_radix(chars, 16) {
            Ok(mut color) => {
                let b = (color & 0xff) as u8;
                color >>= 8;
                let g = (color & 0xff) as u8;
                color >>= 8;
                let r = color as u8;
                Ok(Rgb { r, g, b })
            },
            Err(_) => Err(()),
        }
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// RGB color with 16 bits per channel.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone)]
pub struct Rgb16 {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl From<Rgb16> for Rgb {
    /// Keep the high byte of every channel.
    fn from(color: Rgb16) -> Self {
        Self { r: (color.r >> 8) as u8, g: (color.g >> 8) as u8, b: (color.b >> 8) as u8 }
    }
}
