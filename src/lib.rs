//! Protonpass - async client for the Proton Pass `pass-cli` tool.
//!
//! This crate drives the official Proton Pass command-line client as a
//! subprocess and exposes its vaults, items and password tooling through a
//! typed, async API.
//!
//! # Features
//!
//! - **Binary Discovery**: Configured path first, then well-known install locations
//! - **Bounded Subprocesses**: Every call has a timeout and an output cap
//! - **Classified Errors**: Missing CLI and missing login are distinct error kinds
//! - **Typed Items**: Each category carries exactly its own fields
//! - **Resilient Aggregation**: One failing vault never hides the others
//!
//! # Quick Start
//!
//! ```no_run
//! use protonpass::{Backend, Config, ProtonPassBackend};
//!
//! #[tokio::main]
//! async fn main() -> protonpass::Result<()> {
//!     let backend = ProtonPassBackend::new(Config::from_env()?);
//!     backend.check_authentication().await?;
//!
//!     let all = backend.list_all_items().await?;
//!     for item in &all.items {
//!         println!("{} ({})", item.name, item.category());
//!     }
//!
//!     if let Some(first) = all.items.first() {
//!         let password = backend.get_password(&first.share_id, &first.id).await?;
//!         println!("{} characters", password.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Notes |
//! |---------|---------|-------|
//! | `mock` | yes | In-memory [`backends::mock::MockBackend`] for tests |

pub mod actions;
pub mod backend;
pub mod backends;
pub mod cli;
pub mod config;
pub mod detail;
pub mod error;
pub mod item;
pub mod password;
pub mod validation;
pub mod vault;

pub use actions::{actions_for_item, ActionType, CopyField};
pub use backend::{AllItems, Backend, User, VaultFailure};
pub use backends::protonpass::ProtonPassBackend;
pub use config::Config;
pub use error::{ErrorKind, PassError, Result};
pub use item::{ExtraField, Item, ItemCategory, ItemContent, ItemState};
pub use password::{
    PassphraseOptions, PasswordScore, RandomPasswordOptions, Separator, Strength,
};
pub use vault::Vault;
