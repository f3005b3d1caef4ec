//! Password generation options, strength scores and the local fallback
//! generator.
//!
//! Generation and scoring are normally delegated to `pass-cli`. The only
//! piece that runs in-process is [`generate_local_password`], used when the
//! CLI cannot produce a random password.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Minimum password length offered by front-ends.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length offered by front-ends.
pub const MAX_PASSWORD_LENGTH: usize = 64;

/// Default password length.
pub const DEFAULT_PASSWORD_LENGTH: usize = 20;

/// Minimum passphrase word count offered by front-ends.
pub const MIN_WORD_COUNT: usize = 3;

/// Maximum passphrase word count offered by front-ends.
pub const MAX_WORD_COUNT: usize = 10;

/// Default passphrase word count.
pub const DEFAULT_WORD_COUNT: usize = 5;

// Character sets
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Options for a random password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomPasswordOptions {
    /// Number of characters
    pub length: usize,
    /// Include digits (0-9)
    pub numbers: bool,
    /// Include uppercase letters (A-Z)
    pub uppercase: bool,
    /// Include symbols (!@#$%...)
    pub symbols: bool,
}

impl Default for RandomPasswordOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_PASSWORD_LENGTH,
            numbers: true,
            uppercase: true,
            symbols: true,
        }
    }
}

impl RandomPasswordOptions {
    /// Returns the character pool these options draw from.
    ///
    /// Lowercase letters are always included.
    pub fn pool(&self) -> Vec<u8> {
        let mut pool = LOWERCASE.to_vec();
        if self.uppercase {
            pool.extend_from_slice(UPPERCASE);
        }
        if self.numbers {
            pool.extend_from_slice(DIGITS);
        }
        if self.symbols {
            pool.extend_from_slice(SYMBOLS);
        }
        pool
    }

    pub(crate) fn cli_args(&self) -> Vec<String> {
        vec![
            "password".to_string(),
            "generate".to_string(),
            "random".to_string(),
            "--length".to_string(),
            self.length.to_string(),
            "--numbers".to_string(),
            self.numbers.to_string(),
            "--uppercase".to_string(),
            self.uppercase.to_string(),
            "--symbols".to_string(),
            self.symbols.to_string(),
        ]
    }
}

/// Separator placed between passphrase words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Separator {
    Hyphens,
    Spaces,
    Periods,
    Commas,
    Underscores,
    Numbers,
    NumbersAndSymbols,
}

impl Separator {
    /// All separators in menu order.
    pub const ALL: [Separator; 7] = [
        Self::Hyphens,
        Self::Spaces,
        Self::Periods,
        Self::Commas,
        Self::Underscores,
        Self::Numbers,
        Self::NumbersAndSymbols,
    ];

    /// The spelling `pass-cli` expects.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hyphens => "hyphens",
            Self::Spaces => "spaces",
            Self::Periods => "periods",
            Self::Commas => "commas",
            Self::Underscores => "underscores",
            Self::Numbers => "numbers",
            Self::NumbersAndSymbols => "numbers-and-symbols",
        }
    }

    /// Menu label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hyphens => "Hyphens (-)",
            Self::Spaces => "Spaces",
            Self::Periods => "Periods (.)",
            Self::Commas => "Commas (,)",
            Self::Underscores => "Underscores (_)",
            Self::Numbers => "Numbers",
            Self::NumbersAndSymbols => "Numbers & Symbols",
        }
    }
}

impl std::fmt::Display for Separator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Separator {
    type Err = crate::PassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sep| sep.as_str() == s)
            .ok_or_else(|| crate::PassError::Other(anyhow::anyhow!("unknown separator: {}", s)))
    }
}

/// Options for a passphrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassphraseOptions {
    /// Number of words
    pub words: usize,
    /// Separator style
    pub separator: Separator,
    /// Capitalize each word
    pub capitalize: bool,
    /// Include digits
    pub numbers: bool,
}

impl Default for PassphraseOptions {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORD_COUNT,
            separator: Separator::Hyphens,
            capitalize: true,
            numbers: true,
        }
    }
}

impl PassphraseOptions {
    pub(crate) fn cli_args(&self) -> Vec<String> {
        vec![
            "password".to_string(),
            "generate".to_string(),
            "passphrase".to_string(),
            "--count".to_string(),
            self.words.to_string(),
            "--separator".to_string(),
            self.separator.as_str().to_string(),
            "--capitalise".to_string(),
            self.capitalize.to_string(),
            "--numbers".to_string(),
            self.numbers.to_string(),
        ]
    }
}

/// Qualitative strength bucket reported by `pass-cli password score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strength {
    Vulnerable,
    Weak,
    Good,
    Strong,
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vulnerable => write!(f, "Vulnerable"),
            Self::Weak => write!(f, "Weak"),
            Self::Good => write!(f, "Good"),
            Self::Strong => write!(f, "Strong"),
        }
    }
}

/// Strength score of a password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordScore {
    /// Score in percent
    pub numeric_score: f64,
    /// Bucket
    pub password_score: Strength,
    /// Penalty tags such as `TooShort`
    #[serde(default)]
    pub penalties: Vec<String>,
}

/// Readable description of a penalty tag; unknown tags are returned as-is.
pub fn penalty_label(tag: &str) -> &str {
    match tag {
        "ContainsCommonPassword" => "Contains common password pattern",
        "Consecutive" => "Has consecutive characters",
        "TooShort" => "Too short",
        "NoUppercase" => "No uppercase letters",
        "NoLowercase" => "No lowercase letters",
        "NoNumbers" => "No numbers",
        "NoSymbols" => "No symbols",
        "Repetitive" => "Repetitive characters",
        "Sequential" => "Sequential pattern detected",
        other => other,
    }
}

/// Generates a random password without the CLI.
///
/// Every character is drawn uniformly from [`RandomPasswordOptions::pool`]
/// using the OS CSPRNG, so the result has exactly `options.length`
/// characters, all from the enabled classes.
pub fn generate_local_password(options: &RandomPasswordOptions) -> String {
    let pool = options.pool();
    let mut rng = rand::rngs::OsRng;

    (0..options.length)
        .map(|_| char::from(pool[rng.gen_range(0..pool.len())]))
        .collect()
}
