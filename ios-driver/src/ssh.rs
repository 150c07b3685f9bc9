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

//! Module for managing SSH sessions.

use std::{
    ffi::OsStr,
    process::{Command as StdCommand, Output},
    string::FromUtf8Error,
    time::Duration,
};

use itertools::Itertools;
use thiserror::Error;
use tokio::{process::Command, time::timeout};

pub const EMPTY: &[&str] = &[];

/// Command used to probe a freshly opened session. IOS has no `echo`, so we ask for the clock.
const PROBE_CMD: &str = "show clock";

/// Banner printed by IOS on stderr when the session is established.
const IOS_BANNER: &str = "User Access Verification";

/// Login information for a remote host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Username to log in with. If `None`, the username from `~/.ssh/config` is used.
    pub username: Option<String>,
    /// Password to log in with. When set, `sshpass -e` is used to feed the password to `ssh`,
    /// and batch mode is disabled. When `None`, key-based authentication is expected.
    pub password: Option<String>,
}

/// This is the main SSH session with a remote host.
///
/// This session is configured to automatically manage a control master using the following
/// arguments:
///
/// - `ControlMaster auto`
/// - `ControlPath /tmp/.ssh-%r@%h:%p`
/// - `ControlPersist 10m`
/// - `BatchMode yes` (only without a password)
///
/// Every command is sent as a separate exec request, which IOS answers without paging.
#[derive(Debug, Clone)]
pub struct SshSession {
    /// SSH destination host
    destination: String,
    /// SSH port
    port: u16,
    /// Login information
    credentials: Credentials,
}

impl SshSession {
    /// Create a new SSH Session with the destination.
    pub async fn new(
        destination: impl Into<String>,
        port: u16,
        credentials: Credentials,
    ) -> Result<Self, SshError> {
        let this = Self::unchecked(destination, port, credentials);

        log::trace!("[{}] connecting...", this.name());

        // wait for 10 seconds until the connection is established
        match timeout(Duration::from_secs(10), this.execute_cmd(&[PROBE_CMD])).await {
            Ok(Ok((stdout, stderr))) => {
                let stdout = String::from_utf8_lossy(&stdout);
                let stderr = String::from_utf8_lossy(&stderr);
                if stderr.is_empty() || stderr.trim() == IOS_BANNER {
                    if !stdout.trim().is_empty() {
                        log::trace!("[{}] connection established!", this.name());
                        Ok(this)
                    } else {
                        log::error!(
                            "[{}] Empty answer to `{PROBE_CMD}` while connecting!",
                            this.name()
                        );
                        Err(SshError::Setup(std::io::Error::new(
                            std::io::ErrorKind::Other,
                            format!("Expected an answer to `{PROBE_CMD}`, but got nothing"),
                        )))
                    }
                } else {
                    log::error!("[{}] Unexpected stderr:\n{stderr}", this.name());
                    Err(SshError::Setup(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        format!("Expected empty stderr, but got {stderr}"),
                    )))
                }
            }
            Ok(Err(e)) => {
                log::error!(
                    "[{}] Error while connecting to the target: {e}",
                    this.name()
                );
                Err(e)
            }
            Err(_) => {
                log::error!("[{}] connection timeout!", this.name());
                Err(SshError::Timeout)
            }
        }
    }

    /// Create the session without probing the connection. Commands will only fail once they are
    /// executed.
    pub(crate) fn unchecked(
        destination: impl Into<String>,
        port: u16,
        credentials: Credentials,
    ) -> Self {
        Self {
            destination: destination.into(),
            port,
            credentials,
        }
    }

    /// Get the hostname for the session.
    pub fn name(&self) -> &str {
        &self.destination
    }

    /// Get the destination as passed to `ssh`, including the username if one is configured.
    fn target(&self) -> String {
        match self.credentials.username.as_ref() {
            Some(user) => format!("{user}@{}", self.destination),
            None => self.destination.clone(),
        }
    }

    /// Create a raw `ssh` command (see [`SshSession::std_command`]) wrapped in a tokio command
    /// with `kill_on_drop = true` to kill the process once it is dropped.
    pub(crate) fn raw_command(&self, args: &[impl AsRef<OsStr>]) -> Command {
        let std_cmd = self.std_command(args);
        log::trace!("[tokio::process::Command] {}", command_line(&std_cmd));
        let mut cmd = Command::from(std_cmd);
        cmd.kill_on_drop(true);
        cmd
    }

    /// Execute a command and return the bytes of both `STDOUT` and `STDERR`. This function call
    /// will check that the returned exit code is 0.
    ///
    /// The following example will execute the command `show clock`:
    /// ```rust,no_run
    /// use ios_driver::ssh::{Credentials, SshSession};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///
    /// let s = SshSession::new("198.51.100.11", 22, Credentials::default()).await?;
    /// let (stdout, _stderr) = s.execute_cmd(&["show", "clock"]).await?;
    /// assert!(!stdout.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute_cmd(
        &self,
        args: &[impl AsRef<str> + Sync],
    ) -> Result<(Vec<u8>, Vec<u8>), SshError> {
        let cmd_str = || args.iter().map(AsRef::as_ref).join(" ");

        log::trace!("[{}] `{}`", self.name(), cmd_str());
        let mut cmd = self.raw_command(EMPTY);
        for arg in args {
            cmd.arg(arg.as_ref());
        }
        let output = match cmd.output().await {
            Ok(out) => out,
            Err(e) => {
                log::error!("[{}] {} failed: {}", self.name(), cmd_str(), e);
                Err(e)?
            }
        };

        check_output(self.name(), output, cmd_str)
    }

    /// Execute a command. Then, check that the status is successful, and that STDERR is
    /// empty (apart from the login banner). Finally, return the parsed STDOUT.
    ///
    /// ```rust,no_run
    /// use ios_driver::ssh::{Credentials, SshSession};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///
    /// let s = SshSession::new("198.51.100.11", 22, Credentials::default()).await?;
    /// let stdout = s.execute_cmd_stdout(&["show", "running-config"]).await?;
    /// assert!(stdout.contains("hostname"));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute_cmd_stdout(
        &self,
        args: &[impl AsRef<str> + Sync],
    ) -> Result<String, SshError> {
        let (stdout, stderr) = self.execute_cmd(args).await?;

        if !stderr.is_empty() && String::from_utf8_lossy(&stderr).trim() != IOS_BANNER {
            log::trace!(
                "[{}] {} returned non-empty stderr:{}",
                self.name(),
                args.iter().map(AsRef::as_ref).join(" "),
                format!("\nSTDERR:\n{}", String::from_utf8_lossy(&stderr))
            );
            Err(SshError::CommandError(
                self.name().to_string(),
                args.iter().map(AsRef::as_ref).join(" "),
                255,
            ))
        } else {
            Ok(String::from_utf8(stdout)?)
        }
    }

    /// Stop the control master of this session. If no control master is running, this function
    /// does nothing.
    pub async fn close(&self) -> Result<(), SshError> {
        log::trace!("[{}] closing control master", self.name());
        let mut cmd = self.raw_command(&["-O", "exit"]);
        let output = cmd.output().await?;
        if !output.status.success() {
            log::debug!(
                "[{}] No control master to close: {}",
                self.name(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }

    /// Create a raw `ssh` command with the following attributes set:
    /// - `oControlMaster=auto`
    /// - `oControlPath=/tmp/.ssh-%r@%h:%p`
    /// - `oControlPersist=10m`
    /// - `oBatchMode=yes` if no password is given. Otherwise, the command is wrapped in `sshpass
    ///   -e`, reading the password from the `SSHPASS` environment variable.
    /// - `-p port`
    /// - `args` as given by the other arguments.
    /// - `[user@]destination` to connect to the given destination.
    pub fn std_command(&self, args: &[impl AsRef<OsStr>]) -> StdCommand {
        let mut cmd = if let Some(password) = self.credentials.password.as_ref() {
            let mut cmd = StdCommand::new("sshpass");
            cmd.env("SSHPASS", password)
                .arg("-e")
                .arg("ssh")
                .arg("-oBatchMode=no");
            cmd
        } else {
            let mut cmd = StdCommand::new("ssh");
            cmd.arg("-oBatchMode=yes");
            cmd
        };
        cmd.arg("-oControlMaster=auto")
            .arg("-oControlPath=/tmp/.ssh-%r@%h:%p")
            .arg("-oControlPersist=10m")
            .arg("-p")
            .arg(self.port.to_string())
            .args(args)
            .arg(self.target());
        cmd
    }
}

/// Program and arguments of a command, separated by spaces. The environment (and thus the
/// password in `SSHPASS`) is not part of it.
pub(crate) fn command_line(cmd: &StdCommand) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(OsStr::to_string_lossy)
        .join(" ")
}

/// Check the output for successful exit code
pub fn check_output<F, S>(
    host: &str,
    output: Output,
    cmd: F,
) -> Result<(Vec<u8>, Vec<u8>), SshError>
where
    F: FnOnce() -> S,
    S: std::fmt::Display,
{
    if output.status.success() {
        Ok((output.stdout, output.stderr))
    } else {
        let cmd = cmd().to_string();
        log::error!(
            "[{}] {} exited with exit code {}{}{}",
            host,
            cmd,
            output.status.code().unwrap_or_default(),
            if !output.stdout.is_empty() {
                format!("\nSTDOUT:\n{}", String::from_utf8_lossy(&output.stdout))
            } else {
                String::new()
            },
            if !output.stderr.is_empty() {
                format!("\nSTDERR:\n{}", String::from_utf8_lossy(&output.stderr))
            } else {
                String::new()
            }
        );
        Err(SshError::CommandError(
            host.to_string(),
            cmd,
            output.status.code().unwrap_or_default(),
        ))
    }
}

/// Error kind returned by [`SshSession`].
#[derive(Debug, Error)]
pub enum SshError {
    /// Error while establishing the main connection
    #[error("Error while establishing the connection: {0}")]
    Setup(std::io::Error),
    /// Timeout while establishing the session
    #[error("Timeout while establishing the session.")]
    Timeout,
    /// Error while interacting with the main connection
    #[error("SSH Client error: {0}")]
    Client(#[from] std::io::Error),
    /// Error while executing a command.
    #[error("Non-zero exit code of command {1} on {0}: {2}")]
    CommandError(String, String, i32),
    /// Cannot parse output as utf8
    #[error("Cannot parse output as UTF-8: {0}")]
    FromUtf8(#[from] FromUtf8Error),
}

