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

//! Extract information from the running configuration of IOS devices.

use std::{collections::BTreeSet, net::Ipv4Addr};

use ipnet::{ipv4_mask_to_prefix, Ipv4Net};
use lazy_static::lazy_static;
use regex::Regex;

use super::ParseError;

lazy_static! {
    static ref AREA_RE: Regex = Regex::new(r"\barea\s+(\d+(?:\.\d+\.\d+\.\d+)?)\b").unwrap();
}

/// Remove the lines that IOS prints before the configuration itself, namely
/// `Building configuration...` and `Current configuration : N bytes`, together with the empty
/// lines around them.
pub fn strip_preamble(config: &str) -> &str {
    let mut rest = config;
    loop {
        let (line, tail) = rest.split_once('\n').unwrap_or((rest, ""));
        let line = line.trim();
        if line.is_empty()
            || line.starts_with("Building configuration")
            || line.starts_with("Current configuration")
        {
            if tail.is_empty() {
                return tail;
            }
            rest = tail;
        } else {
            return rest;
        }
    }
}

/// Find the primary address of an interface, looking for the following block:
///
/// ```text
/// interface Loopback99
///  ip address 10.1.3.1 255.255.255.0
/// ```
///
/// Other lines of the interface block may come before the `ip address` line. Secondary addresses
/// (`ip address A M secondary`) are skipped. The netmask is
/// converted to a prefix length. The interface name must match exactly.
pub fn interface_address(config: &str, iface: &str) -> Result<Ipv4Net, ParseError> {
    let re = Regex::new(&format!(
        r"(?m)^interface {}[ \t\r]*\n(?:[ \t]+.*\n)*?[ \t]+ip address[ \t]+(\d+\.\d+\.\d+\.\d+)[ \t]+(\d+\.\d+\.\d+\.\d+)[ \t]*\r?$",
        regex::escape(iface)
    ))?;
    let caps = re
        .captures(config)
        .ok_or_else(|| ParseError::InterfaceAddressNotFound(iface.to_string()))?;
    let addr: Ipv4Addr = caps[1].parse()?;
    let mask: Ipv4Addr = caps[2].parse()?;
    let prefix_len = ipv4_mask_to_prefix(mask)?;
    log::trace!("{iface}: {addr} {mask} (/{prefix_len})");
    Ok(Ipv4Net::new(addr, prefix_len)?)
}

/// Collect all OSPF area identifiers mentioned anywhere in the configuration (e.g., `network
/// 10.0.0.0 0.0.0.255 area 0`, `ip ospf 1 area 0`, or `area 1 stub`). Areas written in decimal
/// form are converted to dotted form, such that `area 0` and `area 0.0.0.0` are the same area.
pub fn ospf_areas(config: &str) -> Result<BTreeSet<Ipv4Addr>, ParseError> {
    AREA_RE
        .captures_iter(config)
        .map(|caps| -> Result<Ipv4Addr, ParseError> {
            let id = &caps[1];
            if id.contains('.') {
                Ok(id.parse::<Ipv4Addr>()?)
            } else {
                Ok(Ipv4Addr::from(id.parse::<u32>()?))
            }
        })
        .collect()
}

/// Check that the configuration mentions exactly one OSPF area.
pub fn has_single_area(config: &str) -> Result<bool, ParseError> {
    let areas = ospf_areas(config)?;
    log::trace!("OSPF areas: {:?}", areas);
    Ok(areas.len() == 1)
}
