//! HID backend abstraction.

use std::ffi::CString;

use hidapi::{HidApi, HidDevice};

use crate::error::TransportError;

/// HID device found during enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHandle {
    /// Platform specific device path.
    pub path: CString,
    /// USB interface number.
    pub interface_number: i32,
    pub serial_number: Option<String>,
}

/// HID backend.
pub trait HidTransport {
    type Connection: HidConnection;

    /// List all HID devices matching the vendor and product ID.
    fn enumerate(
        &mut self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Vec<DeviceHandle>, TransportError>;

    /// Open an exclusive connection to an enumerated device.
    fn open(&mut self, device: &DeviceHandle) -> Result<Self::Connection, TransportError>;
}

/// Open HID device interface.
pub trait HidConnection {
    /// Write an output report, returning the number of bytes written.
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// Release the device.
    fn close(self) -> Result<(), TransportError>
    where
        Self: Sized,
    {
        drop(self);
        Ok(())
    }
}

/// Transport backed by the system's HID library.
pub struct HidApiTransport {
    api: HidApi,
}

impl HidApiTransport {
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self { api: HidApi::new()? })
    }
}

impl HidTransport for HidApiTransport {
    type Connection = HidDevice;

    fn enumerate(
        &mut self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Vec<DeviceHandle>, TransportError> {
        self.api.refresh_devices()?;

        let devices = self
            .api
            .device_list()
            .filter(|info| info.vendor_id() == vendor_id && info.product_id() == product_id)
            .map(|info| DeviceHandle {
                path: info.path().to_owned(),
                interface_number: info.interface_number(),
                serial_number: info.serial_number().map(str::to_owned),
            })
            .collect();

        Ok(devices)
    }

    fn open(&mut self, device: &DeviceHandle) -> Result<HidDevice, TransportError> {
        Ok(self.api.open_path(&device.path)?)
    }
}

impl HidConnection for HidDevice {
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        Ok(HidDevice::write(self, data)?)
    }
}
