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

//! This module contains the code for reading the lab inventory and the checks to run on it.
//!
//! The inventory is a TOML file listing all routers and the checks:
//!
//! ```toml
//! [[routers]]
//! name = "r3"
//! mgmt_addr = "198.51.100.13"
//! username = "lab"
//! password = "lab123"
//!
//! [[checks]]
//! kind = "loopback-address"
//! router = "r3"
//! interface = "Loopback99"
//! expected = "10.1.3.1/24"
//! ```

use std::{collections::HashSet, net::Ipv4Addr, path::Path, str::FromStr};

use ipnet::Ipv4Net;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{de::Error as _, Deserialize, Deserializer};
use thiserror::Error;

use crate::{
    driver::{Device, Platform},
    router::PingOptions,
    ssh::Credentials,
};

/// Interface that is checked if a `loopback-address` check does not name one.
pub const DEFAULT_INTERFACE: &str = "Loopback99";

/// The parsed inventory file.
#[derive(Debug, Clone, Deserialize)]
pub struct LabConfig {
    /// All routers in the lab
    pub routers: Vec<RouterProperties>,
    /// Checks to run, in order
    #[serde(default)]
    pub checks: Vec<Check>,
}

/// Properties of routers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouterProperties {
    /// Name used to refer to the router in checks
    pub name: String,
    /// The ip address of the management interface.
    pub mgmt_addr: Ipv4Addr,
    /// SSH port of the management interface.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username to log in with
    #[serde(default)]
    pub username: Option<String>,
    /// Password to log in with. Leave empty for key-based authentication.
    #[serde(default)]
    pub password: Option<String>,
    /// Platform of the router
    #[serde(default)]
    pub platform: Platform,
}

impl RouterProperties {
    /// Address and login information used by the driver.
    pub fn device(&self) -> Device {
        Device {
            hostname: self.mgmt_addr.to_string(),
            port: self.port,
            credentials: Credentials {
                username: self.username.clone(),
                password: self.password.clone(),
            },
        }
    }
}

/// A single check to perform on the lab.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Check {
    /// Check that an interface carries the expected address and prefix length.
    LoopbackAddress {
        router: String,
        #[serde(
            default = "default_interface",
            deserialize_with = "deserialize_interface"
        )]
        interface: String,
        expected: Ipv4Net,
    },
    /// Check that the router has exactly one OSPF area configured.
    SingleOspfArea { router: String },
    /// Check that the router can reach the destination.
    Ping {
        router: String,
        destination: Ipv4Addr,
        #[serde(default)]
        options: PingOptions,
    },
}

impl Check {
    /// Name of the router on which the check is executed.
    pub fn router(&self) -> &str {
        match self {
            Check::LoopbackAddress { router, .. }
            | Check::SingleOspfArea { router }
            | Check::Ping { router, .. } => router,
        }
    }

    /// Short description of the check.
    pub fn name(&self) -> String {
        match self {
            Check::LoopbackAddress { interface, .. } => format!("{interface} address"),
            Check::SingleOspfArea { .. } => String::from("single OSPF area"),
            Check::Ping { destination, .. } => format!("ping {destination}"),
        }
    }
}

impl LabConfig {
    /// Read and validate the inventory file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("Reading lab configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e))?;
        content.parse()
    }

    /// Get the properties of a router by its name.
    pub fn router(&self, name: &str) -> Result<&RouterProperties, ConfigError> {
        self.routers
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| ConfigError::UnknownRouter(name.to_string()))
    }

    /// Make sure that router names are unique, and that all checks refer to existing routers.
    fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for r in self.routers.iter() {
            if !names.insert(r.name.as_str()) {
                return Err(ConfigError::DuplicateRouter(r.name.clone()));
            }
        }
        for check in self.checks.iter() {
            if !names.contains(check.router()) {
                return Err(ConfigError::UnknownRouter(check.router().to_string()));
            }
        }
        Ok(())
    }
}

impl FromStr for LabConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: LabConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

fn default_port() -> u16 {
    22
}

fn default_interface() -> String {
    String::from(DEFAULT_INTERFACE)
}

fn deserialize_interface<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lazy_static! {
        static ref IFACE_RE: Regex =
            Regex::new(r"^[A-Za-z][A-Za-z-]*[0-9]+(/[0-9]+)*(\.[0-9]+)?$").unwrap();
    }
    let iface = String::deserialize(de)?;
    if IFACE_RE.is_match(&iface) {
        Ok(iface)
    } else {
        Err(D::Error::custom(format!(
            "Invalid interface string: {iface} (should be like 'Loopback99' or 'GigabitEthernet0/1')"
        )))
    }
}

/// Error while reading the inventory.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Cannot read the file
    #[error("Cannot read '{0}': {1}")]
    Read(String, std::io::Error),
    /// Cannot parse the file
    #[error("Cannot parse the lab configuration: {0}")]
    Toml(#[from] toml::de::Error),
    /// Two routers share the same name
    #[error("Router {0} is defined twice")]
    DuplicateRouter(String),
    /// A router name is not part of the inventory
    #[error("Unknown router: {0}")]
    UnknownRouter(String),
}
