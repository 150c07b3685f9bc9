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

//! This module implements the [`NetworkDriver`] for Cisco IOS devices.

use std::net::Ipv4Addr;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    driver::{Config, ConfigKind, Device, DriverError, NetworkDriver},
    ssh::{SshError, SshSession},
};

mod config;
mod ping;
pub use config::{has_single_area, interface_address, ospf_areas, strip_preamble};
pub use ping::{PingOptions, PingResult, PingSummary, ProbeResult};

/// Number of attempts to establish a session before giving up.
const CONNECT_ATTEMPTS: usize = 5;

/// Driver for Cisco IOS devices. Each command is executed as a separate SSH exec request, reusing
/// the control master established in [`NetworkDriver::open`].
#[derive(Debug, Clone)]
pub struct IosDriver {
    device: Device,
    session: Option<SshSession>,
}

impl IosDriver {
    /// Create a new driver. This will not yet connect to the device.
    pub fn new(device: Device) -> Self {
        Self {
            device,
            session: None,
        }
    }

    /// Get the session, or fail if the driver was not opened.
    fn session(&self) -> Result<&SshSession, DriverError> {
        self.session
            .as_ref()
            .ok_or_else(|| DriverError::NotOpen(self.device.hostname.clone()))
    }

    /// Execute the show command with the provided arguments.
    ///
    /// ```rust,no_run
    /// use ios_driver::{driver::{Device, NetworkDriver}, router::IosDriver};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///
    /// let mut r = IosDriver::new(Device::new("198.51.100.11", "lab", "lab123"));
    /// r.open().await?;
    /// let ospf = r.show("ip ospf interface brief").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn show(&self, cmd: impl AsRef<str> + Send + Sync) -> Result<String, DriverError> {
        Ok(self
            .session()?
            .execute_cmd_stdout(&["show", cmd.as_ref()])
            .await?)
    }
}

#[async_trait]
impl NetworkDriver for IosDriver {
    fn hostname(&self) -> &str {
        &self.device.hostname
    }

    async fn open(&mut self) -> Result<(), DriverError> {
        if self.session.is_some() {
            return Ok(());
        }
        let mut i = 0;
        let session = loop {
            i += 1;
            match SshSession::new(
                self.device.hostname.clone(),
                self.device.port,
                self.device.credentials.clone(),
            )
            .await
            {
                Ok(s) => break s,
                Err(e) if i >= CONNECT_ATTEMPTS => return Err(e.into()),
                Err(_) => {
                    log::warn!(
                        "[{}] Cannot establish connection, trying again!",
                        self.device.hostname,
                    )
                }
            }
        };
        log::debug!("[{}] session opened", self.device.hostname);
        self.session = Some(session);
        Ok(())
    }

    async fn get_config(&mut self, retrieve: ConfigKind) -> Result<Config, DriverError> {
        let mut config = Config::default();
        if matches!(retrieve, ConfigKind::Running | ConfigKind::All) {
            config.running = strip_preamble(&self.show("running-config").await?).to_string();
        }
        if matches!(retrieve, ConfigKind::Startup | ConfigKind::All) {
            config.startup = strip_preamble(&self.show("startup-config").await?).to_string();
        }
        Ok(config)
    }

    async fn ping(
        &mut self,
        destination: Ipv4Addr,
        options: &PingOptions,
    ) -> Result<PingResult, DriverError> {
        let cmd = options.command(destination);
        let session = self.session()?;
        log::debug!("[{}] {}", session.name(), cmd);
        let (stdout, _) = session.execute_cmd(&[cmd.as_str()]).await?;
        let output = String::from_utf8(stdout).map_err(SshError::from)?;
        Ok(PingResult::from_output(&output, destination)?)
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        if let Some(session) = self.session.take() {
            session.close().await?;
            log::debug!("[{}] session closed", self.device.hostname);
        }
        Ok(())
    }
}

/// Error while parsing output from a cisco router.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The interface has no address configured.
    #[error("{0} IP and subnet not found.")]
    InterfaceAddressNotFound(String),
    /// Cannot build the regular expression
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),
    /// Cannot parse IP address
    #[error("Cannot parse IP address: {0}")]
    IpAddrParse(#[from] std::net::AddrParseError),
    /// Cannot parse int
    #[error("Cannot parse integer: {0}")]
    IntParse(#[from] std::num::ParseIntError),
    /// Invalid netmask
    #[error("Invalid netmask: {0}")]
    PrefixLen(#[from] ipnet::PrefixLenError),
    /// The output of `ping` does not contain a success rate.
    #[error("Unexpected ping output:\n{0}")]
    UnexpectedPingOutput(String),
}
