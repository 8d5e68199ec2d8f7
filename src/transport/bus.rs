/*
 * SPDX-License-Identifier: Apache-2.0
 *
 * Copyright The Asahi Linux Contributors
 */

//! Bus discovery and name resolution for Linux `i2c-dev` nodes.

use crate::{Error, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEV_DIR: &str = "/dev";

/// Returns the numbers of every `i2c-N` node under `dir`, ascending.
pub fn scan(dir: &Path) -> Result<Vec<u32>> {
    let mut buses: Vec<u32> = fs::read_dir(dir)
        .map_err(Error::HostInit)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_prefix("i2c-"))
                .and_then(|num| num.parse::<u32>().ok())
        })
        .collect();
    buses.sort_unstable();
    log::debug!("found i2c buses {:?} under {}", buses, dir.display());
    Ok(buses)
}

fn node(dir: &Path, num: u32) -> PathBuf {
    dir.join(format!("i2c-{num}"))
}

/// Maps a bus name to a device node path.
///
/// An empty name picks the lowest-numbered bus in `available`. Names are
/// either a path, a bare bus number, `I2C<n>` or the node name `i2c-<n>`.
pub fn resolve(dir: &Path, name: &str, available: &[u32]) -> Result<PathBuf> {
    if name.is_empty() {
        return available
            .iter()
            .min()
            .map(|&num| node(dir, num))
            .ok_or(Error::NoBus);
    }
    if name.contains('/') {
        return Ok(PathBuf::from(name));
    }

    let num = match name.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("i2c") => {
            name[3..].strip_prefix('-').unwrap_or(&name[3..])
        }
        _ => name,
    };
    if num.is_empty() || !num.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::UnknownBus(name.to_string()));
    }
    num.parse::<u32>()
        .map(|num| node(dir, num))
        .map_err(|_| Error::UnknownBus(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn scan_orders_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["i2c-10", "i2c-2", "i2c-0", "tty0", "i2c-x", "spidev0.0"] {
            touch(dir.path(), name);
        }

        assert_eq!(scan(dir.path()).unwrap(), vec![0, 2, 10]);
    }

    #[test]
    fn scan_missing_dir_is_host_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        assert!(matches!(scan(&missing), Err(Error::HostInit(_))));
    }

    #[test]
    fn empty_name_picks_first_bus() {
        let dev = Path::new("/dev");
        assert_eq!(
            resolve(dev, "", &[3, 1, 7]).unwrap(),
            PathBuf::from("/dev/i2c-1")
        );
    }

    #[test]
    fn empty_name_without_buses() {
        assert!(matches!(
            resolve(Path::new("/dev"), "", &[]),
            Err(Error::NoBus)
        ));
    }

    #[test]
    fn named_buses() {
        let dev = Path::new("/dev");
        assert_eq!(resolve(dev, "4", &[]).unwrap(), PathBuf::from("/dev/i2c-4"));
        assert_eq!(resolve(dev, "I2C1", &[]).unwrap(), PathBuf::from("/dev/i2c-1"));
        assert_eq!(resolve(dev, "i2c2", &[]).unwrap(), PathBuf::from("/dev/i2c-2"));
        assert_eq!(
            resolve(dev, "/dev/i2c-9", &[]).unwrap(),
            PathBuf::from("/dev/i2c-9")
        );
    }

    #[test]
    fn node_names() {
        let dev = Path::new("/dev");
        assert_eq!(resolve(dev, "i2c-1", &[1]).unwrap(), PathBuf::from("/dev/i2c-1"));
        assert_eq!(resolve(dev, "I2C-12", &[]).unwrap(), PathBuf::from("/dev/i2c-12"));
    }

    #[test]
    fn signed_or_empty_numbers_are_rejected() {
        let dev = Path::new("/dev");
        for name in ["+4", "i2c+4", "i2c-", "i2c", "-1", "i2c--1"] {
            assert!(
                matches!(resolve(dev, name, &[4]), Err(Error::UnknownBus(_))),
                "{name} should not resolve"
            );
        }
    }

    #[test]
    fn unknown_bus_name() {
        let err = resolve(Path::new("/dev"), "spi0", &[0]).unwrap_err();
        assert!(matches!(err, Error::UnknownBus(name) if name == "spi0"));
    }
}
