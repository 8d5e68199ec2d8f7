/*
 * SPDX-License-Identifier: Apache-2.0
 *
 * Copyright The Asahi Linux Contributors
 */

//! Register-addressed access to I2C devices.
//!
//! A [`Device`] binds one bus to one target address and exposes single-byte
//! reads, multi-byte reads and writes against one-byte registers. Each call is
//! a single synchronous transaction handed to the bus driver.

pub mod config;
pub mod device;
pub mod transport;

pub use device::Device;

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not initialize host: {0}")]
    HostInit(#[source] io::Error),
    #[error("could not open I2C bus: no bus found")]
    NoBus,
    #[error("could not open I2C bus: unknown bus {0:?}")]
    UnknownBus(String),
    #[error("could not open I2C bus {bus}: {source}")]
    Open {
        bus: String,
        #[source]
        source: io::Error,
    },
    #[error("could not read byte from register {reg:x} at address {addr:x}: {source}")]
    Read {
        reg: u8,
        addr: u16,
        #[source]
        source: io::Error,
    },
    #[error("could not read all {len} bytes from register {reg:x} at address {addr:x}: {source}")]
    ReadBytes {
        reg: u8,
        addr: u16,
        len: usize,
        #[source]
        source: io::Error,
    },
    #[error("could not write {} to register {reg:x} at address {addr:x}: {source}", hex::encode(.data))]
    Write {
        reg: u8,
        addr: u16,
        data: Vec<u8>,
        #[source]
        source: io::Error,
    },
    #[error("wrong number of bytes written: want {want}, got {got}")]
    ShortWrite { want: usize, got: usize },
    #[error("could not close I2C bus: {0}")]
    Close(#[source] io::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("i2c transport is not supported on this platform")]
    FeatureMissing,
    #[error("could not parse {0:?} as a number")]
    Parse(String, #[source] std::num::ParseIntError),
}

pub type Result<T> = std::result::Result<T, Error>;
