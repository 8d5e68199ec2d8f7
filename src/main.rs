/*
 * SPDX-License-Identifier: Apache-2.0
 *
 * Copyright The Asahi Linux Contributors
 */

#![cfg_attr(not(any(target_os = "linux", target_os = "android")), allow(dead_code, unused_imports))]
#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn main() {
    eprintln!("i2creg currently supports Linux only.");
}

use env_logger::Env;
use i2creg::{
    config::{self, Config, Op},
    Device, Result,
};
use log::error;
use std::process::ExitCode;

fn i2creg() -> Result<()> {
    let matches = config::command().get_matches();
    let cfg = Config::from_matches(&matches)?;

    let mut device = Device::open_with(&cfg.bus, cfg.address, cfg.force)?;

    let res = match &cfg.op {
        Op::Read { reg, count: 1 } => device.read(*reg).map(|val| println!("{val:#04x}")),
        Op::Read { reg, count } => device.read_bytes(*reg, *count).map(|bytes| {
            let line: Vec<String> = bytes.iter().map(|b| format!("{b:#04x}")).collect();
            println!("{}", line.join(" "));
        }),
        Op::Write { reg, data } => device.write(*reg, data),
    };

    // release the bus even when the transaction failed
    let closed = device.close();
    res.and(closed)
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match i2creg() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("i2creg: {e}");
            ExitCode::FAILURE
        }
    }
}
