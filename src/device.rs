/*
 * SPDX-License-Identifier: Apache-2.0
 *
 * Copyright The Asahi Linux Contributors
 */

use crate::transport::{i2c::I2cTransport, Transport};
use crate::{Error, Result};
use log::{debug, info};

/// One target address on an opened bus.
///
/// The handle owns the bus and releases it on [`Device::close`].
pub struct Device<T: Transport> {
    transport: T,
    addr: u16,
}

impl Device<I2cTransport> {
    /// Opens `bus` and binds `addr`. An empty bus name selects the first
    /// available bus.
    pub fn open(bus: &str, addr: u16) -> Result<Self> {
        Self::open_with(bus, addr, false)
    }

    /// Like [`Device::open`], optionally forcing the open when a kernel
    /// driver already claims `addr`.
    pub fn open_with(bus: &str, addr: u16, force: bool) -> Result<Self> {
        let transport = I2cTransport::open(bus, addr, force)?;
        Ok(Self::new(transport, addr))
    }
}

impl<T: Transport> Device<T> {
    pub fn new(transport: T, addr: u16) -> Self {
        Self { transport, addr }
    }

    pub fn addr(&self) -> u16 {
        self.addr
    }

    /// Reads a single byte from `reg`.
    pub fn read(&mut self, reg: u8) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.transport
            .write_read(&[reg], &mut buf)
            .map_err(|source| Error::Read {
                reg,
                addr: self.addr,
                source,
            })?;
        debug!("{:#x}: read {:#04x} from {:#04x}", self.addr, buf[0], reg);
        Ok(buf[0])
    }

    /// Reads `n` consecutive bytes starting at `reg`.
    ///
    /// With `n == 0` only the register is selected; many adapters refuse
    /// zero-length reads.
    pub fn read_bytes(&mut self, reg: u8, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        let res = if buf.is_empty() {
            self.transport.write(&[reg]).map(|_| ())
        } else {
            self.transport.write_read(&[reg], &mut buf)
        };
        res.map_err(|source| Error::ReadBytes {
            reg,
            addr: self.addr,
            len: n,
            source,
        })?;
        debug!("{:#x}: read {:02x?} from {:#04x}", self.addr, buf, reg);
        Ok(buf)
    }

    /// Writes `data` to `reg` as a single `[reg, data...]` transaction.
    pub fn write(&mut self, reg: u8, data: &[u8]) -> Result<()> {
        let mut buf = Vec::with_capacity(1 + data.len());
        buf.push(reg);
        buf.extend_from_slice(data);

        let n = self.transport.write(&buf).map_err(|source| Error::Write {
            reg,
            addr: self.addr,
            data: data.to_vec(),
            source,
        })?;
        // first byte on the wire is the register
        let got = n.saturating_sub(1);
        if n == 0 || got != data.len() {
            return Err(Error::ShortWrite {
                want: data.len(),
                got,
            });
        }
        debug!("{:#x}: wrote {:02x?} to {:#04x}", self.addr, data, reg);
        Ok(())
    }

    /// Releases the bus.
    pub fn close(mut self) -> Result<()> {
        self.transport.close().map_err(Error::Close)?;
        info!("closed bus for address {:#x}", self.addr);
        Ok(())
    }
}
