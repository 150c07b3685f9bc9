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

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use maplit::btreeset;
use pretty_assertions::assert_eq;
use test_log::test;

use crate::router::{
    has_single_area, interface_address, ospf_areas, strip_preamble, ParseError,
};

const R1: &str = include_str!("files/show_run_r1.txt");
const R3: &str = include_str!("files/show_run_r3.txt");

fn net(s: &str) -> Ipv4Net {
    s.parse().unwrap()
}

#[test]
fn preamble_is_removed() {
    let cfg = strip_preamble(R3);
    assert!(cfg.starts_with("!\n! Last configuration change"));
    assert!(cfg.ends_with("end\n"));
    assert_eq!(strip_preamble("hostname R1\n"), "hostname R1\n");
    assert_eq!(strip_preamble("Building configuration...\n\n"), "");
}

#[test]
fn loopback_address() {
    let addr = interface_address(R3, "Loopback99").unwrap();
    assert_eq!(addr, net("10.1.3.1/24"));
    assert_eq!(addr.to_string(), "10.1.3.1/24");
}

#[test]
fn interface_name_must_match_exactly() {
    assert_eq!(
        interface_address(R3, "Loopback990").unwrap(),
        net("10.9.9.1/30")
    );
    assert_eq!(
        interface_address(R3, "Loopback0").unwrap(),
        net("3.3.3.3/32")
    );
    assert_eq!(
        interface_address(R3, "GigabitEthernet0/1").unwrap(),
        net("10.0.23.3/24")
    );
}

#[test]
fn missing_interface() {
    match interface_address(R1, "Loopback99") {
        Err(ParseError::InterfaceAddressNotFound(iface)) => assert_eq!(iface, "Loopback99"),
        x => panic!("Unexpected result: {x:?}"),
    }
}

#[test]
fn interface_without_address() {
    assert!(matches!(
        interface_address(R3, "GigabitEthernet0/2"),
        Err(ParseError::InterfaceAddressNotFound(_))
    ));
}

#[test]
fn address_directly_after_interface() {
    let cfg = "interface Loopback99\n ip address 10.1.3.1 255.255.255.0\n!\n";
    assert_eq!(interface_address(cfg, "Loopback99").unwrap(), net("10.1.3.1/24"));
}

#[test]
fn secondary_address_is_skipped() {
    let cfg = "interface Loopback99\n ip address 10.9.9.1 255.255.255.0 secondary\n ip address 10.1.3.1 255.255.255.0\n!\n";
    assert_eq!(interface_address(cfg, "Loopback99").unwrap(), net("10.1.3.1/24"));
    let cfg = "interface Loopback99\r\n ip address 10.1.3.1 255.255.255.0\r\n ip address 10.9.9.1 255.255.255.0 secondary\r\n!\r\n";
    assert_eq!(interface_address(cfg, "Loopback99").unwrap(), net("10.1.3.1/24"));
}

#[test]
fn only_secondary_address() {
    let cfg = "interface Loopback99\n ip address 10.9.9.1 255.255.255.0 secondary\n!\ninterface Loopback0\n ip address 3.3.3.3 255.255.255.255\n!\n";
    assert!(matches!(
        interface_address(cfg, "Loopback99"),
        Err(ParseError::InterfaceAddressNotFound(_))
    ));
}

#[test]
fn non_contiguous_netmask() {
    let cfg = "interface Loopback99\n ip address 10.1.3.1 255.0.255.0\n!\n";
    assert!(matches!(
        interface_address(cfg, "Loopback99"),
        Err(ParseError::PrefixLen(_))
    ));
}

#[test]
fn areas_single() {
    assert_eq!(
        ospf_areas(R3).unwrap(),
        btreeset! {Ipv4Addr::new(0, 0, 0, 0)}
    );
    assert!(has_single_area(R3).unwrap());
}

#[test]
fn areas_multiple() {
    assert_eq!(
        ospf_areas(R1).unwrap(),
        btreeset! {Ipv4Addr::new(0, 0, 0, 0), Ipv4Addr::new(0, 0, 0, 1)}
    );
    assert!(!has_single_area(R1).unwrap());
}

#[test]
fn areas_decimal_and_dotted() {
    let cfg = "router ospf 1\n network 10.0.0.0 0.255.255.255 area 256\n area 0.0.1.0 stub\n";
    assert_eq!(
        ospf_areas(cfg).unwrap(),
        btreeset! {Ipv4Addr::new(0, 0, 1, 0)}
    );
}

#[test]
fn no_areas() {
    let cfg = "hostname R9\n!\nend\n";
    assert!(ospf_areas(cfg).unwrap().is_empty());
    assert!(!has_single_area(cfg).unwrap());
}
