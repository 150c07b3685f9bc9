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

//! The generic driver interface used to talk to network devices.
//!
//! Every device platform implements [`NetworkDriver`]. A driver is created closed; it must be
//! opened with [`NetworkDriver::open`] before any other method can be called, and should be closed
//! with [`NetworkDriver::close`] afterwards. Use [`get_network_driver`] to look up the constructor
//! for a platform by name.

use std::{fmt, net::Ipv4Addr, str::FromStr};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    router::{IosDriver, ParseError, PingOptions, PingResult},
    ssh::{Credentials, SshError},
};

/// Which configuration to retrieve with [`NetworkDriver::get_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConfigKind {
    /// Only the running configuration
    #[default]
    Running,
    /// Only the startup configuration
    Startup,
    /// Both the running and the startup configuration
    All,
}

/// Configuration retrieved from a device. Configurations that were not requested are empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Config {
    pub running: String,
    pub startup: String,
}

/// Platforms for which a driver exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Cisco IOS and IOS-XE
    #[default]
    Ios,
}

impl FromStr for Platform {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            _ => Err(DriverError::UnsupportedPlatform(s.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Ios => f.write_str("ios"),
        }
    }
}

/// Address and login information of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Hostname or management address
    pub hostname: String,
    /// SSH port
    pub port: u16,
    /// Login information
    pub credentials: Credentials,
}

impl Device {
    /// Create a device reachable on port 22.
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            port: 22,
            credentials: Credentials {
                username: Some(username.into()),
                password: Some(password.into()),
            },
        }
    }
}

/// Constructor of a driver for a specific platform.
pub type DriverConstructor = fn(Device) -> Box<dyn NetworkDriver>;

/// Get the driver constructor for the given platform name.
///
/// ```rust,no_run
/// use ios_driver::driver::{get_network_driver, ConfigKind, Device};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
///
/// let driver = get_network_driver("ios")?;
/// let mut router = driver(Device::new("198.51.100.13", "lab", "lab123"));
/// router.open().await?;
/// let config = router.get_config(ConfigKind::Running).await?;
/// router.close().await?;
/// println!("{}", config.running);
/// # Ok(())
/// # }
/// ```
pub fn get_network_driver(platform: &str) -> Result<DriverConstructor, DriverError> {
    match platform.parse::<Platform>()? {
        Platform::Ios => Ok(ios_driver as DriverConstructor),
    }
}

fn ios_driver(device: Device) -> Box<dyn NetworkDriver> {
    Box::new(IosDriver::new(device))
}

/// Interface to a network device.
#[async_trait]
pub trait NetworkDriver: Send {
    /// Name of the device (used for logging).
    fn hostname(&self) -> &str;

    /// Establish the session with the device.
    async fn open(&mut self) -> Result<(), DriverError>;

    /// Retrieve the configuration of the device.
    async fn get_config(&mut self, retrieve: ConfigKind) -> Result<Config, DriverError>;

    /// Send ICMP echo requests from the device towards `destination`.
    async fn ping(
        &mut self,
        destination: Ipv4Addr,
        options: &PingOptions,
    ) -> Result<PingResult, DriverError>;

    /// Terminate the session with the device.
    async fn close(&mut self) -> Result<(), DriverError>;
}

/// Error thrown by a [`NetworkDriver`].
#[derive(Debug, Error)]
pub enum DriverError {
    /// The session was used before calling `open`.
    #[error("Session with {0} is not open")]
    NotOpen(String),
    /// No driver exists for the platform.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
    /// Error in the SSH session
    #[error("Session error: {0}")]
    Ssh(#[from] SshError),
    /// Cannot parse the output of the device.
    #[error("Cannot parse the result from the router! {0}")]
    Parse(#[from] ParseError),
}
