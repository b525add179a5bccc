//! IPAC Ultimate-IO device session.

use tracing::{debug, info, warn};

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::report::{self, Command, Port, Report, REPORT_LEN};
use crate::transport::{HidApiTransport, HidConnection, HidTransport};

/// IPAC USB vendor ID.
pub const VENDOR_ID: u16 = 0xd209;

/// IPAC Ultimate-IO USB product ID.
pub const PRODUCT_ID: u16 = 0x0412;

/// HID interface accepting LED reports.
pub const LED_INTERFACE: i32 = 2;

/// Handling of multiple devices on the LED interface.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone)]
pub enum MatchPolicy {
    /// Open every match and keep the last one.
    #[default]
    LastWins,
    /// Fail unless exactly one device matches.
    ExactlyOne,
}

/// Device discovery parameters.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct DeviceConfig {
    pub vendor_id: u16,
    pub product_id: u16,
    pub interface: i32,
    pub policy: MatchPolicy,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            vendor_id: VENDOR_ID,
            product_id: PRODUCT_ID,
            interface: LED_INTERFACE,
            policy: Default::default(),
        }
    }
}

/// Connection to a single IPAC Ultimate-IO.
///
/// Commands need exclusive access, share the session behind a mutex when multiple threads
/// control the LEDs. Dropping the session closes the device.
pub struct DeviceSession<T: HidTransport = HidApiTransport> {
    transport: T,
    config: DeviceConfig,
    connection: Option<T::Connection>,
}

impl DeviceSession<HidApiTransport> {
    /// Create a session using the system's HID library.
    pub fn with_hidapi(config: DeviceConfig) -> Result<Self> {
        let transport = HidApiTransport::new().map_err(Error::Backend)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: HidTransport> DeviceSession<T> {
    pub fn new(transport: T, config: DeviceConfig) -> Self {
        Self { transport, config, connection: None }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Check if a device connection is open.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Discover the device and open its LED interface.
    ///
    /// Any previously open connection is closed first. Devices on other interfaces are
    /// ignored, so this succeeds without a connection if none of them expose the LED
    /// interface.
    pub fn init(&mut self) -> Result<()> {
        if let Some(connection) = self.connection.take() {
            release(connection);
        }

        let DeviceConfig { vendor_id, product_id, interface, policy } = self.config;

        let devices = self.transport.enumerate(vendor_id, product_id).map_err(Error::Backend)?;
        if devices.is_empty() {
            return Err(Error::NoDeviceFound { vendor_id, product_id });
        }

        info!(count = devices.len(), "Found HID devices");

        let candidates: Vec<_> =
            devices.iter().filter(|device| device.interface_number == interface).collect();

        if policy == MatchPolicy::ExactlyOne && candidates.len() != 1 {
            return Err(Error::AmbiguousDevice { interface, count: candidates.len() });
        }

        if candidates.is_empty() {
            warn!(interface, "No HID device exposes the LED interface");
        }

        let mut connection: Option<T::Connection> = None;
        for device in candidates {
            let opened = match self.transport.open(device) {
                Ok(opened) => opened,
                Err(source) => {
                    if let Some(connection) = connection.take() {
                        release(connection);
                    }
                    return Err(Error::OpenFailed { interface, source });
                },
            };

            debug!(path = ?device.path, serial = ?device.serial_number, "Opened LED interface");

            // Only the last match is retained.
            if let Some(previous) = connection.replace(opened) {
                release(previous);
            }
        }

        self.connection = connection;

        Ok(())
    }

    /// Close the device connection.
    pub fn close(&mut self) -> Result<()> {
        let connection = self.connection.take().ok_or(Error::NoActiveConnection)?;
        connection.close().map_err(Error::CloseFailed)
    }

    /// Set the brightness of one or all LED ports.
    pub fn set_led_intensity(&mut self, port: Port, intensity: u8) -> Result<()> {
        self.send(Command::Intensity { port, intensity })
    }

    /// Set the color of an RGB LED group.
    ///
    /// The red, green and blue channels are written as three separate reports. If one of
    /// them fails, the channels written before it stay applied and the remaining ones are
    /// skipped.
    pub fn set_led_color(&mut self, group: u8, color: impl Into<Rgb>) -> Result<()> {
        for &command in report::color_commands(group, color.into()).iter() {
            self.send(command)?;
        }

        Ok(())
    }

    /// Set the global LED fade time, only the lowest byte is used.
    pub fn set_led_fade_time(&mut self, fade_time: i32) -> Result<()> {
        self.send(Command::FadeTime(fade_time))
    }

    /// Write a command's report to the device.
    fn send(&mut self, command: Command) -> Result<()> {
        let connection = self.connection.as_mut().ok_or(Error::NoActiveConnection)?;

        let bytes = Report::from(command).encode();
        match connection.write(&bytes) {
            Ok(written) if written >= REPORT_LEN => {
                debug!(report = ?&bytes[..], "Wrote LED report");
                Ok(())
            },
            Ok(written) => Err(Error::WriteFailed {
                command,
                source: format!("incomplete write of {} out of {} bytes", written, REPORT_LEN)
                    .into(),
            }),
            Err(source) => Err(Error::WriteFailed { command, source }),
        }
    }
}

impl<T: HidTransport> Drop for DeviceSession<T> {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            release(connection);
        }
    }
}

/// Close a connection which is no longer needed.
fn release<C: HidConnection>(connection: C) {
    if let Err(err) = connection.close() {
        warn!(%err, "Unable to close HID device");
    }
}
