//! Subprocess plumbing for `pass-cli`.
//!
//! This module locates the binary, runs it with a timeout and an output cap,
//! and turns failed invocations into classified [`PassError`]s.

use crate::error::classify_failure;
use crate::{Config, PassError, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Well-known install locations, checked in order after the configured path.
///
/// Entries starting with `~/` are expanded against the home directory.
pub const WELL_KNOWN_PATHS: &[&str] = &[
    "~/.local/bin/pass-cli",
    "/usr/local/bin/pass-cli",
    "/opt/homebrew/bin/pass-cli",
    "/usr/bin/pass-cli",
    "~/.local/bin/proton-pass-cli",
];

/// Resource limits applied to every invocation.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Wall-clock limit; the child is killed when it elapses
    pub timeout: Duration,
    /// Maximum bytes accepted on stdout or stderr
    pub max_output: usize,
    /// Exit codes classified as "authentication required"
    pub auth_exit_codes: Vec<i32>,
}

impl Default for Limits {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for Limits {
    fn from(config: &Config) -> Self {
        Self {
            timeout: config.timeout,
            max_output: config.max_output,
            auth_exit_codes: config.auth_exit_codes.clone(),
        }
    }
}

/// Lists every path that binary resolution will try, in order.
pub fn candidate_paths(configured: Option<&Path>, home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(WELL_KNOWN_PATHS.len() + 1);

    if let Some(path) = configured {
        paths.push(path.to_path_buf());
    }

    for entry in WELL_KNOWN_PATHS {
        match entry.strip_prefix("~/") {
            Some(rest) => {
                if let Some(home) = home {
                    paths.push(home.join(rest));
                }
            }
            None => paths.push(PathBuf::from(entry)),
        }
    }

    paths
}

/// Finds the `pass-cli` binary.
///
/// The configured path wins if it exists, then the first existing
/// [`WELL_KNOWN_PATHS`] entry.
///
/// # Errors
///
/// Returns [`PassError::CliNotFound`] if no candidate exists.
pub fn resolve_binary(config: &Config) -> Result<PathBuf> {
    candidate_paths(config.cli_path.as_deref(), config.home.as_deref())
        .into_iter()
        .find(|path| path.exists())
        .ok_or(PassError::CliNotFound)
}

/// Executes a command and returns its trimmed stdout.
///
/// The command is spawned directly (no shell) with stdin closed.
///
/// # Errors
///
/// - [`PassError::CliNotFound`] if the program cannot be found
/// - [`PassError::Timeout`] if it runs longer than `limits.timeout`
/// - [`PassError::OutputTooLarge`] if stdout or stderr exceeds `limits.max_output`
/// - [`PassError::AuthenticationRequired`] or [`PassError::CommandFailed`] on
///   a non-zero exit, see [`classify_failure`]
pub async fn run_command(program: &Path, args: &[&str], limits: &Limits) -> Result<String> {
    let started = Instant::now();
    let subcommand = describe(args);

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PassError::CliNotFound
        } else {
            PassError::Io(e)
        }
    })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| PassError::Other(anyhow::anyhow!("child stdout was not captured")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| PassError::Other(anyhow::anyhow!("child stderr was not captured")))?;

    let cap = limits.max_output;
    let collect = async {
        let (out, err) = tokio::try_join!(read_capped(stdout, cap), read_capped(stderr, cap))?;
        let status = child.wait().await?;
        Ok::<_, PassError>((status, out, err))
    };

    let (status, out, err) = match tokio::time::timeout(limits.timeout, collect).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::debug!(command = %subcommand, "pass-cli timed out");
            return Err(PassError::Timeout(limits.timeout));
        }
    };

    tracing::debug!(
        command = %subcommand,
        exit_code = ?status.code(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "pass-cli finished"
    );

    if !status.success() {
        let stderr = String::from_utf8_lossy(&err);
        let message = if stderr.trim().is_empty() {
            String::from_utf8_lossy(&out).into_owned()
        } else {
            stderr.into_owned()
        };
        return Err(classify_failure(status.code(), &message, &limits.auth_exit_codes));
    }

    let output = String::from_utf8(out).map_err(|e| {
        PassError::Other(anyhow::anyhow!("Invalid UTF-8 in command output: {}", e))
    })?;

    Ok(output.trim().to_string())
}

/// Executes a command with `--output json` appended and decodes stdout.
pub async fn run_json<T: DeserializeOwned>(
    program: &Path,
    args: &[&str],
    limits: &Limits,
) -> Result<T> {
    let mut full = Vec::with_capacity(args.len() + 2);
    full.extend_from_slice(args);
    full.extend_from_slice(&["--output", "json"]);

    let output = run_command(program, &full, limits).await?;
    parse_json(&output)
}

/// Decodes CLI output, reporting a truncated preview on failure.
pub fn parse_json<T: DeserializeOwned>(output: &str) -> Result<T> {
    serde_json::from_str(output).map_err(|e| PassError::parse(output, e))
}

async fn read_capped<R: AsyncRead + Unpin>(reader: R, cap: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let limit = u64::try_from(cap).unwrap_or(u64::MAX).saturating_add(1);
    reader.take(limit).read_to_end(&mut buf).await?;

    if buf.len() > cap {
        return Err(PassError::OutputTooLarge(cap));
    }
    Ok(buf)
}

// Only the leading subcommand words are logged; later positionals can be secrets.
fn describe(args: &[&str]) -> String {
    args.iter()
        .take_while(|a| !a.starts_with('-'))
        .take(2)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
