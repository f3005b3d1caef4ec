//! Mock backend for testing.
//!
//! This backend provides a complete in-memory implementation with error
//! injection capabilities for testing code that uses protonpass.

use crate::backend::User;
use crate::item::sort_items;
use crate::password::{
    generate_local_password, PassphraseOptions, PasswordScore, RandomPasswordOptions, Separator,
};
use crate::validation::{validate_reference_segment, ItemReference};
use crate::vault::sort_vaults;
use crate::{Backend, Item, ItemState, PassError, Result, Vault};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

type FieldKey = (String, String, String);

/// Mock backend for testing.
///
/// Stores all data in memory with support for error injection to simulate
/// failure conditions.
///
/// # Example
///
/// ```
/// use protonpass::backends::mock::MockBackend;
/// use protonpass::{Backend, Vault};
///
/// #[tokio::main]
/// async fn main() -> protonpass::Result<()> {
///     let backend = MockBackend::new();
///     backend.set_vault(Vault::new("Personal", "v1", "s1")).await;
///     backend.set_vault(Vault::new("Work", "v2", "s2")).await;
///
///     // Simulate one vault failing to list
///     backend.fail_vault("Work").await;
///
///     let all = backend.list_all_items().await?;
///     assert_eq!(all.failures.len(), 1);
///     Ok(())
/// }
/// ```
pub struct MockBackend {
    vaults: Arc<RwLock<Vec<Vault>>>,
    items: Arc<RwLock<HashMap<String, Vec<Item>>>>,
    fields: Arc<RwLock<HashMap<FieldKey, String>>>,
    totp: Arc<RwLock<HashMap<(String, String), String>>>,
    scores: Arc<RwLock<HashMap<String, PasswordScore>>>,
    failing_vaults: Arc<RwLock<HashSet<String>>>,

    /// Logged-in account returned by `current_user()`
    pub user: Option<User>,
    /// Error to return from `check_authentication()`
    pub auth_error: Option<PassError>,
    /// Error to return from `list_vaults()`
    pub list_error: Option<PassError>,
    /// Error to return from `get_field()` and `get_totp()`
    pub get_error: Option<PassError>,
}

impl MockBackend {
    /// Creates a new mock backend with empty storage.
    pub fn new() -> Self {
        Self {
            vaults: Arc::new(RwLock::new(Vec::new())),
            items: Arc::new(RwLock::new(HashMap::new())),
            fields: Arc::new(RwLock::new(HashMap::new())),
            totp: Arc::new(RwLock::new(HashMap::new())),
            scores: Arc::new(RwLock::new(HashMap::new())),
            failing_vaults: Arc::new(RwLock::new(HashSet::new())),
            user: None,
            auth_error: None,
            list_error: None,
            get_error: None,
        }
    }

    /// Adds a vault.
    pub async fn set_vault(&self, vault: Vault) {
        self.vaults.write().await.push(vault);
    }

    /// Adds an item to the named vault.
    ///
    /// Useful for setting up test fixtures.
    pub async fn set_item(&self, vault_name: impl Into<String>, item: Item) {
        let mut items = self.items.write().await;
        items.entry(vault_name.into()).or_default().push(item);
    }

    /// Makes every listing of the named vault fail.
    pub async fn fail_vault(&self, vault_name: impl Into<String>) {
        self.failing_vaults.write().await.insert(vault_name.into());
    }

    /// Stores the value returned for one field of an item.
    pub async fn set_field(
        &self,
        share_id: impl Into<String>,
        item_id: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) {
        let key = (share_id.into(), item_id.into(), field.into());
        self.fields.write().await.insert(key, value.into());
    }

    /// Stores the current TOTP code of an item.
    pub async fn set_totp(
        &self,
        share_id: impl Into<String>,
        item_id: impl Into<String>,
        code: impl Into<String>,
    ) {
        let key = (share_id.into(), item_id.into());
        self.totp.write().await.insert(key, code.into());
    }

    /// Stores the score reported for a password.
    pub async fn set_score(&self, password: impl Into<String>, score: PasswordScore) {
        self.scores.write().await.insert(password.into(), score);
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

// Injected errors are stored once but may be returned many times.
fn replay(err: &PassError) -> PassError {
    match err {
        PassError::CliNotFound => PassError::CliNotFound,
        PassError::AuthenticationRequired => PassError::AuthenticationRequired,
        PassError::Timeout(d) => PassError::Timeout(*d),
        PassError::OutputTooLarge(n) => PassError::OutputTooLarge(*n),
        PassError::InvalidReference(msg) => PassError::InvalidReference(msg.clone()),
        other => PassError::CommandFailed(other.to_string()),
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn check_authentication(&self) -> Result<()> {
        match self.auth_error {
            Some(ref err) => Err(replay(err)),
            None => Ok(()),
        }
    }

    async fn current_user(&self) -> Option<User> {
        self.user.clone()
    }

    async fn list_vaults(&self) -> Result<Vec<Vault>> {
        if let Some(ref err) = self.list_error {
            return Err(replay(err));
        }

        let mut vaults = self.vaults.read().await.clone();
        sort_vaults(&mut vaults);
        Ok(vaults)
    }

    async fn list_items(&self, vault_name: &str) -> Result<Vec<Item>> {
        if vault_name.trim().is_empty() {
            return Err(PassError::InvalidReference(
                "vault name cannot be empty".to_string(),
            ));
        }
        if self.failing_vaults.read().await.contains(vault_name) {
            return Err(PassError::operation(
                "item list",
                vault_name,
                PassError::CommandFailed(format!("vault {} is unavailable", vault_name)),
            ));
        }

        let items = self.items.read().await;
        let mut listed: Vec<Item> = items
            .get(vault_name)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.state == ItemState::Active)
                    .cloned()
                    .map(|mut item| {
                        item.vault_name = Some(vault_name.to_string());
                        item
                    })
                    .collect()
            })
            .unwrap_or_default();

        sort_items(&mut listed);
        Ok(listed)
    }

    async fn get_field(&self, share_id: &str, item_id: &str, field: &str) -> Result<String> {
        let reference = ItemReference::new(share_id, item_id, field)?;
        if let Some(ref err) = self.get_error {
            return Err(replay(err));
        }

        let key = (
            reference.share_id().to_string(),
            reference.item_id().to_string(),
            reference.field().to_string(),
        );
        self.fields
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| PassError::CommandFailed(format!("field not found: {}", reference)))
    }

    async fn get_totp(&self, share_id: &str, item_id: &str) -> Result<Option<String>> {
        validate_reference_segment("share id", share_id)?;
        validate_reference_segment("item id", item_id)?;
        if let Some(ref err) = self.get_error {
            return Err(replay(err));
        }

        let key = (share_id.to_string(), item_id.to_string());
        Ok(self.totp.read().await.get(&key).cloned())
    }

    async fn generate_password(&self, options: &RandomPasswordOptions) -> Result<String> {
        Ok(generate_local_password(options))
    }

    async fn generate_passphrase(&self, options: &PassphraseOptions) -> Result<String> {
        let separator = match options.separator {
            Separator::Hyphens => "-",
            Separator::Spaces => " ",
            Separator::Periods => ".",
            Separator::Commas => ",",
            Separator::Underscores => "_",
            Separator::Numbers => "7",
            Separator::NumbersAndSymbols => "7!",
        };

        let words: Vec<String> = (1..=options.words)
            .map(|n| {
                let word = if options.capitalize { "Word" } else { "word" };
                if options.numbers {
                    format!("{}{}", word, n)
                } else {
                    word.to_string()
                }
            })
            .collect();
        Ok(words.join(separator))
    }

    async fn score_password(&self, password: &str) -> Result<PasswordScore> {
        self.scores
            .read()
            .await
            .get(password)
            .cloned()
            .ok_or_else(|| PassError::CommandFailed("no score configured".to_string()))
    }
}
