/*
 * SPDX-License-Identifier: Apache-2.0
 *
 * Copyright The Asahi Linux Contributors
 */

use crate::transport::Transport;
use crate::{Error, Result};
use std::io;

#[cfg(any(target_os = "linux", target_os = "android"))]
use crate::transport::{bus, AddressMode};
#[cfg(any(target_os = "linux", target_os = "android"))]
use i2cdev::{
    core::{I2CDevice, I2CMessage, I2CTransfer},
    linux::{I2CMessageFlags, LinuxI2CBus, LinuxI2CDevice, LinuxI2CMessage},
};
#[cfg(any(target_os = "linux", target_os = "android"))]
use std::path::Path;

#[cfg(any(target_os = "linux", target_os = "android"))]
enum Handle {
    /// 7-bit target bound to the fd with `I2C_SLAVE`.
    Device(LinuxI2CDevice),
    /// 10-bit target, addressed on every message.
    Bus(LinuxI2CBus),
}

#[cfg(any(target_os = "linux", target_os = "android"))]
pub struct I2cTransport {
    handle: Option<Handle>,
    addr: u16,
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn open_i2c(path: &Path, addr: u16, force: bool) -> io::Result<LinuxI2CDevice> {
    match LinuxI2CDevice::new(path, addr) {
        Ok(dev) => Ok(dev),
        Err(e) if force => {
            log::info!("Safely opening failed ({e}) ==> Forcefully opening device...");
            unsafe { LinuxI2CDevice::force_new(path, addr) }.map_err(io::Error::from)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn ten_bit_flags(read: bool) -> I2CMessageFlags {
    if read {
        I2CMessageFlags::READ | I2CMessageFlags::TEN_BIT_ADDRESS
    } else {
        I2CMessageFlags::TEN_BIT_ADDRESS
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl I2cTransport {
    /// Opens `bus` (see [`bus::resolve`]) and binds it to `addr`.
    ///
    /// With `force`, a 7-bit address already claimed by a kernel driver is
    /// taken over anyway. 10-bit addresses are never claimed.
    pub fn open(bus: &str, addr: u16, force: bool) -> Result<Self> {
        let mode = AddressMode::of(addr)?;
        let dir = Path::new(bus::DEV_DIR);
        let available = bus::scan(dir)?;
        let path = bus::resolve(dir, bus, &available)?;

        let handle = match mode {
            AddressMode::SevenBit => open_i2c(&path, addr, force).map(Handle::Device),
            AddressMode::TenBit => LinuxI2CBus::new(&path)
                .map(Handle::Bus)
                .map_err(io::Error::from),
        }
        .map_err(|source| Error::Open {
            bus: path.display().to_string(),
            source,
        })?;
        log::info!("opened {} at {:?} address {:#x}", path.display(), mode, addr);
        Ok(Self {
            handle: Some(handle),
            addr,
        })
    }

    fn handle(&mut self) -> io::Result<&mut Handle> {
        self.handle
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "i2c bus is closed"))
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl Transport for I2cTransport {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let addr = self.addr;
        match self.handle()? {
            Handle::Device(dev) => dev.write(data)?,
            Handle::Bus(bus) => {
                let mut msgs = [LinuxI2CMessage::write(data)
                    .with_address(addr)
                    .with_flags(ten_bit_flags(false))];
                bus.transfer(&mut msgs)?;
            }
        }
        Ok(data.len())
    }

    fn write_read(&mut self, out: &[u8], input: &mut [u8]) -> io::Result<()> {
        let addr = self.addr;
        match self.handle()? {
            Handle::Device(dev) => {
                let mut msgs = [LinuxI2CMessage::write(out), LinuxI2CMessage::read(input)];
                dev.transfer(&mut msgs)?;
            }
            Handle::Bus(bus) => {
                let mut msgs = [
                    LinuxI2CMessage::write(out)
                        .with_address(addr)
                        .with_flags(ten_bit_flags(false)),
                    LinuxI2CMessage::read(input)
                        .with_address(addr)
                        .with_flags(ten_bit_flags(true)),
                ];
                bus.transfer(&mut msgs)?;
            }
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        // The file descriptor is released when the handle is dropped.
        self.handle.take();
        Ok(())
    }
}

#[cfg(all(test, any(target_os = "linux", target_os = "android")))]
mod tests {
    use super::*;

    #[test]
    fn ten_bit_messages_keep_direction() {
        assert_eq!(ten_bit_flags(false).bits(), I2CMessageFlags::TEN_BIT_ADDRESS.bits());
        assert!(ten_bit_flags(true).contains(I2CMessageFlags::READ));
        assert!(ten_bit_flags(true).contains(I2CMessageFlags::TEN_BIT_ADDRESS));
    }

    #[test]
    fn open_rejects_out_of_range_address() {
        assert!(matches!(
            I2cTransport::open("/nonexistent/i2c-0", 0x400, false),
            Err(Error::InvalidArgument(_))
        ));
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub struct I2cTransport;

#[cfg(not(any(target_os = "linux", target_os = "android")))]
impl I2cTransport {
    pub fn open(_bus: &str, _addr: u16, _force: bool) -> Result<Self> {
        Err(Error::FeatureMissing)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
impl Transport for I2cTransport {
    fn write(&mut self, _data: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "i2c transport is linux-only"))
    }

    fn write_read(&mut self, _out: &[u8], _input: &mut [u8]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "i2c transport is linux-only"))
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}
