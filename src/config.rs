/*
 * SPDX-License-Identifier: Apache-2.0
 *
 * Copyright The Asahi Linux Contributors
 */

//! Command-line configuration for the `i2creg` binary.

use crate::transport::AddressMode;
use crate::{Error, Result};
use clap::{ArgMatches, Command};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Read { reg: u8, count: usize },
    Write { reg: u8, data: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bus: String,
    pub address: u16,
    pub force: bool,
    pub op: Op,
}

pub fn command() -> Command {
    clap::command!()
        .arg(
            clap::arg!(-b --bus [BUS] "i2c bus: a /dev path, a bus number or I2C<n>. Defaults to the first bus."),
        )
        .arg(
            clap::arg!(-a --address <ADDRESS> "i2c slave address of the target device.")
                .required(true),
        )
        .arg(clap::arg!(-f --force "Open the address even if a kernel driver claims it."))
        .subcommand(
            Command::new("read")
                .about("read from a register")
                .arg(clap::arg!(<REG> "register to read"))
                .arg(clap::arg!(-n --count [COUNT] "number of bytes to read").default_value("1")),
        )
        .subcommand(
            Command::new("write")
                .about("write bytes to a register")
                .arg(clap::arg!(<REG> "register to write"))
                .arg(clap::arg!([DATA]... "bytes to write")),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
}

/// Parses `0x`-prefixed hex or plain decimal.
pub fn parse_u16(s: &str) -> Result<u16> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(stripped) => u16::from_str_radix(stripped, 16),
        None => s.parse::<u16>(),
    };
    parsed.map_err(|e| Error::Parse(s.to_string(), e))
}

/// Parses a 7- or 10-bit target address.
pub fn parse_address(s: &str) -> Result<u16> {
    let addr = parse_u16(s)?;
    AddressMode::of(addr)?;
    Ok(addr)
}

pub fn parse_byte(s: &str) -> Result<u8> {
    let val = parse_u16(s)?;
    u8::try_from(val).map_err(|_| Error::InvalidArgument(format!("{s} does not fit in a byte")))
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| Error::InvalidArgument(format!("missing {id}")))
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let bus = matches
            .get_one::<String>("bus")
            .cloned()
            .unwrap_or_default();
        let address = parse_address(required(matches, "address")?)?;
        let force = matches.get_flag("force");

        let op = match matches.subcommand() {
            Some(("read", args)) => {
                let count = required(args, "count")?;
                Op::Read {
                    reg: parse_byte(required(args, "REG")?)?,
                    count: count
                        .parse::<usize>()
                        .map_err(|e| Error::Parse(count.to_string(), e))?,
                }
            }
            Some(("write", args)) => Op::Write {
                reg: parse_byte(required(args, "REG")?)?,
                data: args
                    .get_many::<String>("DATA")
                    .into_iter()
                    .flatten()
                    .map(|s| parse_byte(s))
                    .collect::<Result<Vec<u8>>>()?,
            },
            _ => return Err(Error::InvalidArgument("missing subcommand".to_string())),
        };

        Ok(Self {
            bus,
            address,
            force,
            op,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Result<Config> {
        let matches = command()
            .try_get_matches_from(std::iter::once("i2creg").chain(args.iter().copied()))
            .unwrap();
        Config::from_matches(&matches)
    }

    #[test]
    fn numbers_in_hex_and_decimal() {
        assert_eq!(parse_u16("0x38").unwrap(), 0x38);
        assert_eq!(parse_u16("0X1f").unwrap(), 0x1f);
        assert_eq!(parse_u16("104").unwrap(), 104);
        assert!(matches!(parse_u16("0xzz"), Err(Error::Parse(..))));
        assert!(matches!(parse_u16("-1"), Err(Error::Parse(..))));
    }

    #[test]
    fn address_range() {
        assert_eq!(parse_address("0x7f").unwrap(), 0x7f);
        assert_eq!(parse_address("0x80").unwrap(), 0x80);
        assert_eq!(parse_address("0x3ff").unwrap(), 0x3ff);
        assert!(matches!(
            parse_address("0x400"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn byte_range() {
        assert_eq!(parse_byte("0xff").unwrap(), 0xff);
        assert!(matches!(parse_byte("256"), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn read_defaults() {
        let cfg = config(&["-a", "0x68", "read", "0x75"]).unwrap();
        assert_eq!(
            cfg,
            Config {
                bus: String::new(),
                address: 0x68,
                force: false,
                op: Op::Read {
                    reg: 0x75,
                    count: 1
                },
            }
        );
    }

    #[test]
    fn write_with_bus_and_force() {
        let cfg = config(&["-b", "1", "-a", "56", "-f", "write", "0x6b", "0", "0x80"]).unwrap();
        assert_eq!(cfg.bus, "1");
        assert_eq!(cfg.address, 56);
        assert!(cfg.force);
        assert_eq!(
            cfg.op,
            Op::Write {
                reg: 0x6b,
                data: vec![0x00, 0x80]
            }
        );
    }

    #[test]
    fn write_without_data() {
        let cfg = config(&["-a", "0x38", "write", "0x10"]).unwrap();
        assert_eq!(
            cfg.op,
            Op::Write {
                reg: 0x10,
                data: vec![]
            }
        );
    }

    #[test]
    fn read_count() {
        let cfg = config(&["-a", "0x68", "read", "0x3b", "-n", "6"]).unwrap();
        assert_eq!(
            cfg.op,
            Op::Read {
                reg: 0x3b,
                count: 6
            }
        );
    }

    #[test]
    fn bad_register_is_rejected() {
        assert!(config(&["-a", "0x68", "read", "0x100"]).is_err());
    }
}
