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

use pretty_assertions::assert_eq;

use crate::{
    driver::{ConfigKind, Device, DriverError, NetworkDriver},
    router::{IosDriver, PingOptions},
    ssh::{command_line, Credentials, SshSession, EMPTY},
};

fn args(session: &SshSession, extra: &[&str]) -> (String, Vec<String>) {
    let cmd = session.std_command(extra);
    (
        cmd.get_program().to_string_lossy().to_string(),
        cmd.get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect(),
    )
}

#[test]
fn command_with_password() {
    let session = SshSession::unchecked(
        "198.51.100.13",
        22,
        Credentials {
            username: Some("lab".to_string()),
            password: Some("lab123".to_string()),
        },
    );
    let (program, args) = args(&session, &["show", "clock"]);
    assert_eq!(program, "sshpass");
    assert_eq!(
        args,
        vec![
            "-e",
            "ssh",
            "-oBatchMode=no",
            "-oControlMaster=auto",
            "-oControlPath=/tmp/.ssh-%r@%h:%p",
            "-oControlPersist=10m",
            "-p",
            "22",
            "show",
            "clock",
            "lab@198.51.100.13",
        ]
    );
    let cmd = session.std_command(EMPTY);
    let envs: Vec<_> = cmd.get_envs().collect();
    assert_eq!(envs.len(), 1);
    assert_eq!(envs[0].0, "SSHPASS");
    assert!(!args.iter().any(|a| a.contains("lab123")));
}

#[test]
fn command_without_password() {
    let session = SshSession::unchecked("r2.lab", 2222, Credentials::default());
    let (program, args) = args(&session, &["-O", "exit"]);
    assert_eq!(program, "ssh");
    assert_eq!(
        args,
        vec![
            "-oBatchMode=yes",
            "-oControlMaster=auto",
            "-oControlPath=/tmp/.ssh-%r@%h:%p",
            "-oControlPersist=10m",
            "-p",
            "2222",
            "-O",
            "exit",
            "r2.lab",
        ]
    );
    assert_eq!(session.std_command(EMPTY).get_envs().count(), 0);
}

#[test]
fn logged_command_hides_password() {
    let session = SshSession::unchecked(
        "198.51.100.13",
        22,
        Credentials {
            username: Some("lab".to_string()),
            password: Some("lab123".to_string()),
        },
    );
    let line = command_line(&session.std_command(&["show", "clock"]));
    assert!(line.starts_with("sshpass -e ssh -oBatchMode=no "));
    assert!(line.ends_with(" show clock lab@198.51.100.13"));
    assert!(!line.contains("lab123"));
}

#[test_log::test(tokio::test)]
async fn get_config_before_open() {
    let mut driver = IosDriver::new(Device::new("198.51.100.13", "lab", "lab123"));
    match driver.get_config(ConfigKind::Running).await {
        Err(DriverError::NotOpen(host)) => assert_eq!(host, "198.51.100.13"),
        x => panic!("Unexpected result: {x:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn ping_before_open() {
    let mut driver = IosDriver::new(Device::new("198.51.100.12", "lab", "lab123"));
    let result = driver
        .ping(Ipv4Addr::new(198, 51, 100, 15), &PingOptions::default())
        .await;
    assert!(matches!(result, Err(DriverError::NotOpen(_))));
}
