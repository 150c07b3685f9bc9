// router-probe: Probe Cisco IOS routers over SSH
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! This library drives Cisco IOS routers over SSH.
//!
//! # Sessions
//!
//! All communication uses the system `ssh` client with a control master (see [`ssh::SshSession`]).
//! If a router requires a password, `sshpass` must be installed; the password is passed through
//! the `SSHPASS` environment variable and never appears on the command line. Without a password,
//! `ssh` runs in batch mode and expects key-based authentication (configured in `~/.ssh/config`).
//!
//! # Drivers
//!
//! Devices are accessed through the [`driver::NetworkDriver`] trait, offering `open`,
//! `get_config`, `ping`, and `close`. [`driver::get_network_driver`] returns the constructor for a
//! platform name; currently, only `ios` is supported (see [`router::IosDriver`]).
//!
//! # Parsing
//!
//! The [`router`] module contains the functions to extract interface addresses and OSPF areas
//! from the configuration, and to parse the result of `ping`.
//!
//! # Inventory
//!
//! The [`config`] module reads the list of routers and checks from a TOML file.

pub mod config;
pub mod driver;
pub mod router;
pub mod ssh;

#[cfg(test)]
mod test;

pub use driver::{get_network_driver, Config, ConfigKind, Device, DriverError, NetworkDriver};
