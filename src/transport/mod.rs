pub mod bus;
pub mod i2c;

use crate::{Error, Result};
use std::io;

pub const MAX_SEVEN_BIT_ADDRESS: u16 = 0x7f;
pub const MAX_TEN_BIT_ADDRESS: u16 = 0x3ff;

/// How a target address goes out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    SevenBit,
    TenBit,
}

impl AddressMode {
    pub fn of(addr: u16) -> Result<Self> {
        if addr <= MAX_SEVEN_BIT_ADDRESS {
            Ok(Self::SevenBit)
        } else if addr <= MAX_TEN_BIT_ADDRESS {
            Ok(Self::TenBit)
        } else {
            Err(Error::InvalidArgument(format!(
                "address {addr:#x} is out of range (max {MAX_TEN_BIT_ADDRESS:#x})"
            )))
        }
    }
}

/// A bus already bound to a single target address.
pub trait Transport {
    /// Writes `data` in one transaction and returns how many bytes the
    /// driver reports as sent.
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Writes `out` and then fills `input` in one combined transaction
    /// (repeated start, no stop in between). `input` is never empty.
    fn write_read(&mut self, out: &[u8], input: &mut [u8]) -> io::Result<()>;

    /// Releases the underlying bus.
    fn close(&mut self) -> io::Result<()>;
}
