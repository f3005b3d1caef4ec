//! Backend trait definition.
//!
//! This module defines the [`Backend`] trait satisfied by the real
//! `pass-cli` integration and by the in-memory mock. The trait covers account
//! status, vault and item listing, secret retrieval, and password tooling.

use crate::actions::{ActionType, CopyField};
use crate::item::sort_items;
use crate::password::{PassphraseOptions, PasswordScore, RandomPasswordOptions};
use crate::{Item, PassError, Result, Vault};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Account information reported by `pass-cli user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account email
    pub email: String,
    /// Account identifier
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Display name
    #[serde(default, alias = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// A vault whose item listing failed during aggregation.
#[derive(Debug)]
pub struct VaultFailure {
    /// Name of the vault that could not be listed
    pub vault: String,
    /// Why it failed
    pub error: PassError,
}

/// Items gathered across every vault.
///
/// `failures` records vaults whose listing failed; their items are simply
/// absent from `items`.
#[derive(Debug, Default)]
pub struct AllItems {
    /// Items from every vault that listed successfully, favorites first
    pub items: Vec<Item>,
    /// Per-vault failures
    pub failures: Vec<VaultFailure>,
}

impl AllItems {
    /// True when every vault listed successfully.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Backend represents a Proton Pass account reachable through some transport.
///
/// All implementations must be `Send + Sync` to support concurrent access
/// across async tasks. No call is retried; failures surface immediately as
/// classified [`PassError`]s.
///
/// # Example
///
/// ```no_run
/// use protonpass::{Backend, Config, ProtonPassBackend};
///
/// #[tokio::main]
/// async fn main() -> protonpass::Result<()> {
///     let backend = ProtonPassBackend::new(Config::from_env()?);
///     backend.check_authentication().await?;
///
///     for vault in backend.list_vaults().await? {
///         println!("{}", vault.name);
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait Backend: Send + Sync {
    // ========================================================================
    // Metadata
    // ========================================================================

    /// Returns the backend name.
    fn name(&self) -> &str;

    // ========================================================================
    // Account
    // ========================================================================

    /// Verifies that the backend is reachable and logged in.
    ///
    /// # Errors
    ///
    /// - [`PassError::CliNotFound`]: the CLI is not installed
    /// - [`PassError::AuthenticationRequired`]: any other failure of the check
    async fn check_authentication(&self) -> Result<()>;

    /// Returns the logged-in account, or `None` if it cannot be determined.
    async fn current_user(&self) -> Option<User>;

    /// Checks authentication, then fetches the current user.
    async fn status(&self) -> Result<Option<User>> {
        self.check_authentication().await?;
        Ok(self.current_user().await)
    }

    // ========================================================================
    // Listing
    // ========================================================================

    /// Lists vaults, sorted by name.
    async fn list_vaults(&self) -> Result<Vec<Vault>>;

    /// Lists the active items of one vault, favorites first then by name.
    ///
    /// Trashed items are never returned.
    async fn list_items(&self, vault_name: &str) -> Result<Vec<Item>>;

    /// Lists active items across every vault.
    ///
    /// One [`list_items`](Backend::list_items) call per vault runs
    /// concurrently. A failing vault contributes no items and is recorded in
    /// [`AllItems::failures`]; only a failure to list the vaults themselves
    /// fails the whole call.
    async fn list_all_items(&self) -> Result<AllItems> {
        let vaults = self.list_vaults().await?;

        let listings = futures::future::join_all(vaults.iter().map(|vault| async move {
            (vault.name.as_str(), self.list_items(&vault.name).await)
        }))
        .await;

        let mut all = AllItems::default();
        for (vault, result) in listings {
            match result {
                Ok(items) => all.items.extend(items),
                Err(error) => {
                    tracing::warn!(vault = %vault, error = %error, "failed to list vault items");
                    all.failures.push(VaultFailure {
                        vault: vault.to_string(),
                        error,
                    });
                }
            }
        }

        sort_items(&mut all.items);
        Ok(all)
    }

    // ========================================================================
    // Secrets
    // ========================================================================

    /// Fetches one field of an item, such as `password`.
    ///
    /// # Errors
    ///
    /// - [`PassError::InvalidReference`]: an id or field is not addressable
    async fn get_field(&self, share_id: &str, item_id: &str, field: &str) -> Result<String>;

    /// Fetches the password of an item.
    async fn get_password(&self, share_id: &str, item_id: &str) -> Result<String> {
        self.get_field(share_id, item_id, "password").await
    }

    /// Fetches the current TOTP code of an item, if it has one.
    async fn get_totp(&self, share_id: &str, item_id: &str) -> Result<Option<String>>;

    /// Resolves the value of `field` for a listed item.
    ///
    /// Values already on the item are returned without invoking the CLI. A
    /// password missing from the listing is fetched with
    /// [`get_password`](Backend::get_password), and TOTP codes are always
    /// fetched. Empty values count as absent.
    async fn field_value(&self, item: &Item, field: CopyField) -> Result<Option<String>> {
        if let Some(value) = field.read(item) {
            return Ok(Some(value.to_string()));
        }

        let fetched = match field {
            CopyField::Password => Some(self.get_password(&item.share_id, &item.id).await?),
            CopyField::Totp => self.get_totp(&item.share_id, &item.id).await?,
            _ => None,
        };
        Ok(fetched.filter(|v| !v.is_empty()))
    }

    /// Resolves the value an action copies, pastes or opens.
    ///
    /// [`ActionType::OpenBrowser`] yields the item's first URL.
    async fn action_value(&self, item: &Item, action: ActionType) -> Result<Option<String>> {
        match action.field() {
            Some(field) => self.field_value(item, field).await,
            None => Ok(item.primary_url().map(str::to_string)),
        }
    }

    // ========================================================================
    // Passwords
    // ========================================================================

    /// Generates a random password.
    ///
    /// Implementations must not fail because the generator is unavailable;
    /// they fall back to [`generate_local_password`](crate::password::generate_local_password).
    async fn generate_password(&self, options: &RandomPasswordOptions) -> Result<String>;

    /// Generates a passphrase. There is no local fallback.
    async fn generate_passphrase(&self, options: &PassphraseOptions) -> Result<String>;

    /// Scores a password. There is no local fallback.
    async fn score_password(&self, password: &str) -> Result<PasswordScore>;
}
