//! Item actions and their ordering.

use crate::item::{Item, ItemCategory, ItemContent};
use crate::{Config, PassError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Something a front-end can do with an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionType {
    CopyPassword,
    CopyUsername,
    CopyTotp,
    OpenBrowser,
    PastePassword,
    PasteUsername,
    PasteTotp,
    CopyNote,
    CopyCardNumber,
    CopyAlias,
}

/// Login actions in their default order.
pub const DEFAULT_LOGIN_ACTIONS: [ActionType; 7] = [
    ActionType::CopyPassword,
    ActionType::CopyUsername,
    ActionType::CopyTotp,
    ActionType::OpenBrowser,
    ActionType::PastePassword,
    ActionType::PasteUsername,
    ActionType::PasteTotp,
];

impl ActionType {
    const ALL: [ActionType; 10] = [
        Self::CopyPassword,
        Self::CopyUsername,
        Self::CopyTotp,
        Self::OpenBrowser,
        Self::PastePassword,
        Self::PasteUsername,
        Self::PasteTotp,
        Self::CopyNote,
        Self::CopyCardNumber,
        Self::CopyAlias,
    ];

    /// Identifier used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CopyPassword => "copy-password",
            Self::CopyUsername => "copy-username",
            Self::CopyTotp => "copy-totp",
            Self::OpenBrowser => "open-browser",
            Self::PastePassword => "paste-password",
            Self::PasteUsername => "paste-username",
            Self::PasteTotp => "paste-totp",
            Self::CopyNote => "copy-note",
            Self::CopyCardNumber => "copy-card-number",
            Self::CopyAlias => "copy-alias",
        }
    }

    /// The field this action copies or pastes; `None` for [`ActionType::OpenBrowser`].
    pub const fn field(self) -> Option<CopyField> {
        match self {
            Self::CopyPassword | Self::PastePassword => Some(CopyField::Password),
            Self::CopyUsername | Self::PasteUsername => Some(CopyField::Username),
            Self::CopyTotp | Self::PasteTotp => Some(CopyField::Totp),
            Self::CopyNote => Some(CopyField::Note),
            Self::CopyCardNumber => Some(CopyField::CardNumber),
            Self::CopyAlias => Some(CopyField::Alias),
            Self::OpenBrowser => None,
        }
    }

    /// True for the paste variants.
    pub const fn is_paste(self) -> bool {
        matches!(self, Self::PastePassword | Self::PasteUsername | Self::PasteTotp)
    }

    /// Whether the front-end should close once the action has run.
    ///
    /// Pasting and opening the browser always close; copying follows
    /// [`Config::close_after_copy`].
    pub fn closes_window(self, config: &Config) -> bool {
        match self {
            Self::OpenBrowser => true,
            action if action.is_paste() => true,
            _ => config.close_after_copy,
        }
    }

    /// Whether the action applies to `item`.
    fn applies_to(self, item: &Item) -> bool {
        match self {
            Self::CopyTotp | Self::PasteTotp => item.has_totp(),
            Self::CopyUsername | Self::PasteUsername => item.username_or_email().is_some(),
            Self::OpenBrowser => item.primary_url().is_some(),
            _ => true,
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = PassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == key)
            .ok_or_else(|| PassError::Other(anyhow::anyhow!("unknown action: {}", s)))
    }
}

/// An item field that can be copied or pasted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CopyField {
    Password,
    Username,
    Totp,
    Note,
    CardNumber,
    Cvv,
    Alias,
    Ssid,
    WifiPassword,
    PublicKey,
    Fingerprint,
}

impl CopyField {
    /// All fields.
    pub const ALL: [CopyField; 11] = [
        Self::Password,
        Self::Username,
        Self::Totp,
        Self::Note,
        Self::CardNumber,
        Self::Cvv,
        Self::Alias,
        Self::Ssid,
        Self::WifiPassword,
        Self::PublicKey,
        Self::Fingerprint,
    ];

    /// Identifier used on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Username => "username",
            Self::Totp => "totp",
            Self::Note => "note",
            Self::CardNumber => "card-number",
            Self::Cvv => "cvv",
            Self::Alias => "alias",
            Self::Ssid => "ssid",
            Self::WifiPassword => "wifi-password",
            Self::PublicKey => "public-key",
            Self::Fingerprint => "fingerprint",
        }
    }

    /// Human-readable name.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Password => "Password",
            Self::Username => "Username",
            Self::Totp => "One-Time Password",
            Self::Note => "Note",
            Self::CardNumber => "Card Number",
            Self::Cvv => "CVV",
            Self::Alias => "Alias Email",
            Self::Ssid => "Network Name",
            Self::WifiPassword => "WiFi Password",
            Self::PublicKey => "Public Key",
            Self::Fingerprint => "Fingerprint",
        }
    }

    /// Whether a clipboard copy of this field should be marked concealed.
    pub const fn concealed(self) -> bool {
        matches!(
            self,
            Self::Password | Self::CardNumber | Self::Cvv | Self::WifiPassword
        )
    }

    /// Reads the field from the listed item, without asking the CLI.
    ///
    /// Empty values count as absent. TOTP codes are never stored on the item,
    /// so [`CopyField::Totp`] always reads `None`.
    pub fn read(self, item: &Item) -> Option<&str> {
        let value = match (self, &item.content) {
            (Self::Password, ItemContent::Login(l)) => l.password.as_deref(),
            (Self::Username, ItemContent::Identity(i)) => i.email.as_deref(),
            (Self::Username, _) => item.username_or_email(),
            (Self::Note, _) => Some(item.note.as_str()),
            (Self::CardNumber, ItemContent::CreditCard(c)) => c.card_number.as_deref(),
            (Self::Cvv, ItemContent::CreditCard(c)) => c.cvv.as_deref(),
            (Self::Alias, ItemContent::Alias(a)) => a.alias_email.as_deref(),
            (Self::Ssid, ItemContent::WiFi(w)) => w.ssid.as_deref(),
            (Self::WifiPassword, ItemContent::WiFi(w)) => w.password.as_deref(),
            (Self::PublicKey, ItemContent::SshKey(k)) => k.public_key.as_deref(),
            (Self::Fingerprint, ItemContent::SshKey(k)) => k.fingerprint.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.is_empty())
    }
}

impl std::fmt::Display for CopyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CopyField {
    type Err = PassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == key)
            .ok_or_else(|| PassError::Other(anyhow::anyhow!("unknown field: {}", s)))
    }
}

/// Lists the actions available for `item`, most preferred first.
///
/// For logins the configured primary and secondary actions lead, followed by
/// the remaining [`DEFAULT_LOGIN_ACTIONS`]; duplicates are dropped and
/// actions the item cannot satisfy are filtered out. Other categories get a
/// single fixed action, or none.
pub fn actions_for_item(item: &Item, config: &Config) -> Vec<ActionType> {
    match item.category() {
        ItemCategory::Login => {
            let mut actions = Vec::with_capacity(DEFAULT_LOGIN_ACTIONS.len());
            let ordered = [config.primary_action, config.secondary_action]
                .into_iter()
                .chain(DEFAULT_LOGIN_ACTIONS);

            for action in ordered {
                if !actions.contains(&action) {
                    actions.push(action);
                }
            }

            actions.retain(|a| a.applies_to(item));
            actions
        }
        ItemCategory::Note => vec![ActionType::CopyNote],
        ItemCategory::CreditCard => vec![ActionType::CopyCardNumber],
        ItemCategory::Alias => vec![ActionType::CopyAlias],
        _ => Vec::new(),
    }
}
