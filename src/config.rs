//! Configuration for locating and invoking `pass-cli`.

use crate::actions::ActionType;
use crate::{PassError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for a single CLI invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default cap on the bytes read from a single CLI invocation (50 MiB).
pub const DEFAULT_MAX_OUTPUT: usize = 50 * 1024 * 1024;

/// Configuration for the Proton Pass backend.
///
/// Use the builder pattern for ergonomic configuration:
///
/// ```
/// use protonpass::{ActionType, Config};
/// use std::time::Duration;
///
/// let config = Config::new()
///     .with_cli_path("/opt/pass/pass-cli")
///     .with_primary_action(ActionType::CopyTotp)
///     .with_timeout(Duration::from_secs(10));
///
/// assert_eq!(config.primary_action, ActionType::CopyTotp);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit path to the CLI binary, checked before the well-known locations
    pub cli_path: Option<PathBuf>,

    /// Action offered first for login items
    pub primary_action: ActionType,

    /// Action offered second for login items
    pub secondary_action: ActionType,

    /// Whether a front-end should close itself after copying a value
    pub close_after_copy: bool,

    /// Per-invocation timeout (default: 60 seconds)
    pub timeout: Duration,

    /// Per-invocation output cap in bytes (default: 50 MiB)
    pub max_output: usize,

    /// Exit codes that mean "not logged in"
    pub auth_exit_codes: Vec<i32>,

    /// Home directory used to expand the `~/.local/bin` candidates
    pub home: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cli_path: None,
            primary_action: ActionType::CopyPassword,
            secondary_action: ActionType::CopyUsername,
            close_after_copy: true,
            timeout: DEFAULT_TIMEOUT,
            max_output: DEFAULT_MAX_OUTPUT,
            auth_exit_codes: Vec::new(),
            home: std::env::var_os("HOME").map(PathBuf::from),
        }
    }
}

impl Config {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from environment variables.
    ///
    /// - `PASS_CLI_PATH`: explicit CLI binary path
    /// - `PASS_PRIMARY_ACTION` / `PASS_SECONDARY_ACTION`: action identifiers
    ///   such as `copy-password`
    /// - `PASS_CLOSE_AFTER_COPY`: `true` or `false`
    /// - `PASS_CLI_TIMEOUT_SECS`: timeout in whole seconds
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup("PASS_CLI_PATH").filter(|p| !p.trim().is_empty()) {
            config = config.with_cli_path(path);
        }

        if let Some(action) = lookup("PASS_PRIMARY_ACTION") {
            config.primary_action = action.parse()?;
        }

        if let Some(action) = lookup("PASS_SECONDARY_ACTION") {
            config.secondary_action = action.parse()?;
        }

        if let Some(flag) = lookup("PASS_CLOSE_AFTER_COPY") {
            config.close_after_copy = flag.trim().parse().map_err(|_| {
                PassError::Other(anyhow::anyhow!(
                    "PASS_CLOSE_AFTER_COPY must be 'true' or 'false', got '{}'",
                    flag
                ))
            })?;
        }

        if let Some(secs) = lookup("PASS_CLI_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                PassError::Other(anyhow::anyhow!(
                    "PASS_CLI_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    secs
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Sets the explicit CLI binary path.
    ///
    /// If the path does not exist the well-known install locations are
    /// still searched.
    pub fn with_cli_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cli_path = Some(path.into());
        self
    }

    /// Sets the primary login action.
    pub fn with_primary_action(mut self, action: ActionType) -> Self {
        self.primary_action = action;
        self
    }

    /// Sets the secondary login action.
    pub fn with_secondary_action(mut self, action: ActionType) -> Self {
        self.secondary_action = action;
        self
    }

    /// Sets whether front-ends close after a copy.
    pub fn with_close_after_copy(mut self, close: bool) -> Self {
        self.close_after_copy = close;
        self
    }

    /// Sets the per-invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the per-invocation output cap.
    pub fn with_max_output(mut self, bytes: usize) -> Self {
        self.max_output = bytes;
        self
    }

    /// Treats the given exit code as "authentication required".
    ///
    /// Checked before the message keywords, so a CLI that reports login
    /// state through its exit status is classified without string matching.
    pub fn with_auth_exit_code(mut self, code: i32) -> Self {
        self.auth_exit_codes.push(code);
        self
    }

    /// Overrides the home directory used for `~/.local/bin` candidates.
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }
}
