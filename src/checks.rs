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

//! The individual checks. Each check opens the driver, performs a single remote call, and closes
//! the driver again, also if the remote call fails.

use std::{collections::BTreeSet, net::Ipv4Addr};

use ios_driver::{
    router::{interface_address, ospf_areas, ParseError, PingOptions, PingResult},
    Config, ConfigKind, DriverError, NetworkDriver,
};
use ipnet::Ipv4Net;
use thiserror::Error;

/// Retrieve the configuration of the router.
pub async fn get_config<D>(driver: &mut D, retrieve: ConfigKind) -> Result<Config, CheckError>
where
    D: NetworkDriver + ?Sized,
{
    driver.open().await?;
    let result = driver.get_config(retrieve).await;
    Ok(finish(driver, result).await?)
}

/// Retrieve the running configuration of the router.
pub async fn fetch_config<D>(driver: &mut D) -> Result<String, CheckError>
where
    D: NetworkDriver + ?Sized,
{
    Ok(get_config(driver, ConfigKind::Running).await?.running)
}

/// Get the address and prefix length of the interface `iface`, e.g., `10.1.3.1/24`. If the
/// interface has no address configured, this function returns
/// [`ParseError::InterfaceAddressNotFound`].
pub async fn validate_loopback_ip<D>(driver: &mut D, iface: &str) -> Result<Ipv4Net, CheckError>
where
    D: NetworkDriver + ?Sized,
{
    let config = fetch_config(driver).await?;
    let addr = interface_address(&config, iface)?;
    log::debug!("[{}] {iface} has address {addr}", driver.hostname());
    Ok(addr)
}

/// Get all OSPF areas mentioned in the running configuration.
pub async fn collect_ospf_areas<D>(driver: &mut D) -> Result<BTreeSet<Ipv4Addr>, CheckError>
where
    D: NetworkDriver + ?Sized,
{
    let config = fetch_config(driver).await?;
    let areas = ospf_areas(&config)?;
    log::debug!("[{}] OSPF areas: {areas:?}", driver.hostname());
    Ok(areas)
}

/// Check if the router has only a single OSPF area configured.
pub async fn check_single_area<D>(driver: &mut D) -> Result<bool, CheckError>
where
    D: NetworkDriver + ?Sized,
{
    Ok(collect_ospf_areas(driver).await?.len() == 1)
}

/// Send a ping from the router towards `destination`, and return the structured result.
pub async fn ping<D>(
    driver: &mut D,
    destination: Ipv4Addr,
    options: &PingOptions,
) -> Result<PingResult, CheckError>
where
    D: NetworkDriver + ?Sized,
{
    driver.open().await?;
    let result = driver.ping(destination, options).await;
    Ok(finish(driver, result).await?)
}

/// Verify that the ping from the router towards `destination` is successful, i.e., the router
/// returned a result, and at least one probe was answered.
pub async fn verify_ping<D>(
    driver: &mut D,
    destination: Ipv4Addr,
    options: &PingOptions,
) -> Result<bool, CheckError>
where
    D: NetworkDriver + ?Sized,
{
    let result = ping(driver, destination, options).await?;
    if let PingResult::Error(e) = &result {
        log::warn!("[{}] ping {destination}: {e}", driver.hostname());
    }
    Ok(result.is_reachable())
}

/// Close the driver and return the result of the remote call. An error while closing is only
/// returned if the remote call succeeded.
async fn finish<D, T>(driver: &mut D, result: Result<T, DriverError>) -> Result<T, DriverError>
where
    D: NetworkDriver + ?Sized,
{
    match (result, driver.close().await) {
        (Ok(x), Ok(())) => Ok(x),
        (Ok(_), Err(e)) | (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            log::warn!("[{}] Cannot close session: {close_err}", driver.hostname());
            Err(e)
        }
    }
}

/// Error thrown while running a check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Error while communicating with the router.
    #[error("{0}")]
    Driver(#[from] DriverError),
    /// Cannot find the requested information in the router output.
    #[error("{0}")]
    Parse(#[from] ParseError),
}
