//! Proton Pass backend implementation.

use super::wire::{CliItemsResponse, CliVaultsResponse, TotpResponse};
use crate::backend::User;
use crate::cli::{self, resolve_binary, run_command, Limits};
use crate::item::sort_items;
use crate::password::{
    generate_local_password, PassphraseOptions, PasswordScore, RandomPasswordOptions,
};
use crate::validation::{validate_reference_segment, ItemReference};
use crate::vault::sort_vaults;
use crate::{Backend, Config, Item, ItemState, PassError, Result, Vault};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Proton Pass backend.
///
/// Integrates with Proton Pass via the `pass-cli` tool. The binary is
/// resolved on every call, so installing it while a program runs takes
/// effect immediately.
pub struct ProtonPassBackend {
    config: Config,
    limits: Limits,
}

impl ProtonPassBackend {
    /// Creates a new Proton Pass backend from configuration.
    pub fn new(config: Config) -> Self {
        let limits = Limits::from(&config);
        Self { config, limits }
    }

    /// Returns the configuration this backend was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the path of the CLI binary that would be used.
    ///
    /// # Errors
    ///
    /// Returns [`PassError::CliNotFound`] if no candidate path exists.
    pub fn binary_path(&self) -> Result<PathBuf> {
        resolve_binary(&self.config)
    }

    /// Checks whether the CLI binary can be found.
    pub fn is_installed(&self) -> bool {
        self.binary_path().is_ok()
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let program = self.binary_path()?;
        run_command(&program, args, &self.limits).await
    }

    async fn run_json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        let program = self.binary_path()?;
        cli::run_json(&program, args, &self.limits).await
    }
}

#[async_trait]
impl Backend for ProtonPassBackend {
    fn name(&self) -> &str {
        "protonpass"
    }

    async fn check_authentication(&self) -> Result<()> {
        match self.run(&["info"]).await {
            Ok(_) => Ok(()),
            Err(PassError::CliNotFound) => Err(PassError::CliNotFound),
            Err(e) => {
                tracing::debug!(error = %e, "pass-cli info failed");
                Err(PassError::AuthenticationRequired)
            }
        }
    }

    async fn current_user(&self) -> Option<User> {
        match self.run_json::<User>(&["user"]).await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!(error = %e, "could not read current user");
                None
            }
        }
    }

    async fn list_vaults(&self) -> Result<Vec<Vault>> {
        let response: CliVaultsResponse = self.run_json(&["vault", "list"]).await?;

        let mut vaults: Vec<Vault> = response.vaults.into_iter().map(Vault::from).collect();
        sort_vaults(&mut vaults);
        Ok(vaults)
    }

    async fn list_items(&self, vault_name: &str) -> Result<Vec<Item>> {
        if vault_name.trim().is_empty() {
            return Err(PassError::InvalidReference(
                "vault name cannot be empty".to_string(),
            ));
        }

        let response: CliItemsResponse = self
            .run_json(&["item", "list", vault_name])
            .await
            .map_err(|e| PassError::operation("item list", vault_name, e))?;

        let mut items: Vec<Item> = response
            .into_records()
            .map(|raw| raw.into_item(Some(vault_name)))
            .filter(|item| item.state == ItemState::Active)
            .collect();

        sort_items(&mut items);
        Ok(items)
    }

    async fn get_field(&self, share_id: &str, item_id: &str, field: &str) -> Result<String> {
        let reference = ItemReference::new(share_id, item_id, field)?;
        let uri = reference.uri();
        self.run(&["item", "view", &uri]).await
    }

    async fn get_totp(&self, share_id: &str, item_id: &str) -> Result<Option<String>> {
        validate_reference_segment("share id", share_id)?;
        validate_reference_segment("item id", item_id)?;

        let response: TotpResponse = self
            .run_json(&["item", "totp", "--share-id", share_id, "--item-id", item_id])
            .await?;

        Ok(response.0)
    }

    async fn generate_password(&self, options: &RandomPasswordOptions) -> Result<String> {
        let args = options.cli_args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        match self.run(&args).await {
            Ok(password) if !password.is_empty() => Ok(password),
            Ok(_) => {
                tracing::warn!("pass-cli returned an empty password, using local generator");
                Ok(generate_local_password(options))
            }
            Err(e) => {
                tracing::warn!(error = %e, "pass-cli password generation failed, using local generator");
                Ok(generate_local_password(options))
            }
        }
    }

    async fn generate_passphrase(&self, options: &PassphraseOptions) -> Result<String> {
        let args = options.cli_args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&args).await
    }

    async fn score_password(&self, password: &str) -> Result<PasswordScore> {
        // A leading '-' would be read as a flag.
        if password.starts_with('-') {
            let output = self
                .run(&["password", "score", "--output", "json", "--", password])
                .await?;
            cli::parse_json(&output)
        } else {
            self.run_json(&["password", "score", password]).await
        }
    }
}
