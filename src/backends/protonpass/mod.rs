//! Proton Pass CLI backend.
//!
//! This backend integrates with Proton Pass via the `pass-cli` command-line
//! tool. The CLI owns the session: log in once with `pass-cli login` and
//! every invocation made here reuses it.
//!
//! # Binary discovery
//!
//! The configured path is tried first, then the locations listed in
//! [`WELL_KNOWN_PATHS`](crate::cli::WELL_KNOWN_PATHS).
//!
//! # Example
//!
//! ```no_run
//! use protonpass::{Backend, Config, ProtonPassBackend};
//!
//! #[tokio::main]
//! async fn main() -> protonpass::Result<()> {
//!     let backend = ProtonPassBackend::new(Config::new().with_cli_path("/usr/local/bin/pass-cli"));
//!
//!     let all = backend.list_all_items().await?;
//!     for failure in &all.failures {
//!         eprintln!("skipped {}: {}", failure.vault, failure.error);
//!     }
//!     println!("{} items", all.items.len());
//!     Ok(())
//! }
//! ```

mod backend;
mod wire;

pub use backend::ProtonPassBackend;
