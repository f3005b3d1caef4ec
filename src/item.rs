//! Normalized item model.
//!
//! Every fetch produces fresh [`Item`] values; nothing here is mutated after
//! construction except for the `vault_name` annotation applied by listings.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// An item stored in a Proton Pass vault.
///
/// Category-specific data lives in [`ItemContent`], so exactly one group of
/// category fields exists per item and it always matches [`Item::category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Item identifier
    pub id: String,

    /// Share identifier used to address the item
    pub share_id: String,

    /// Identifier of the owning vault
    pub vault_id: String,

    /// Title, `"Untitled"` when the CLI has none
    pub name: String,

    /// Free-form note, empty when absent
    pub note: String,

    /// Whether the item is active or in the trash
    pub state: ItemState,

    /// Whether the item is flagged as a favorite
    pub favorite: bool,

    /// Creation time as reported by the CLI
    pub created_at: String,

    /// Category-specific content
    #[serde(flatten)]
    pub content: ItemContent,

    /// User-defined extra fields
    #[serde(default)]
    pub extra_fields: Vec<ExtraField>,

    /// Name of the vault the item was listed from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_name: Option<String>,
}

impl Item {
    /// Returns the category derived from the item's content.
    pub fn category(&self) -> ItemCategory {
        self.content.category()
    }

    /// Returns the login fields if this is a login item.
    pub fn login(&self) -> Option<&LoginContent> {
        match &self.content {
            ItemContent::Login(login) => Some(login),
            _ => None,
        }
    }

    /// Username of a login item, falling back to its email.
    pub fn username_or_email(&self) -> Option<&str> {
        let login = self.login()?;
        non_empty(login.username.as_deref()).or_else(|| non_empty(login.email.as_deref()))
    }

    /// True for login items carrying a non-empty TOTP URI.
    pub fn has_totp(&self) -> bool {
        self.login()
            .and_then(|l| non_empty(l.totp_uri.as_deref()))
            .is_some()
    }

    /// First URL of a login item.
    pub fn primary_url(&self) -> Option<&str> {
        self.login()?.urls.first().map(String::as_str)
    }

    /// Parses [`created_at`](Item::created_at) as RFC 3339 or Unix seconds.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.trim();
        if let Ok(secs) = raw.parse::<i64>() {
            return Utc.timestamp_opt(secs, 0).single();
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Lifecycle state of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemState {
    /// Visible in the vault
    Active,
    /// Moved to the trash
    Trashed,
}

/// Category-specific content of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum ItemContent {
    /// Website or app credentials
    Login(LoginContent),
    /// Email alias
    Alias(AliasContent),
    /// Secure note (the note text is [`Item::note`])
    Note,
    /// Payment card
    CreditCard(CreditCardContent),
    /// Personal identity details
    Identity(IdentityContent),
    /// Wireless network credentials
    #[serde(rename = "WiFi")]
    WiFi(WifiContent),
    /// SSH key pair (public half only)
    #[serde(rename = "SSHKey")]
    SshKey(SshKeyContent),
}

impl ItemContent {
    /// Returns the category this content belongs to.
    pub fn category(&self) -> ItemCategory {
        match self {
            Self::Login(_) => ItemCategory::Login,
            Self::Alias(_) => ItemCategory::Alias,
            Self::Note => ItemCategory::Note,
            Self::CreditCard(_) => ItemCategory::CreditCard,
            Self::Identity(_) => ItemCategory::Identity,
            Self::WiFi(_) => ItemCategory::WiFi,
            Self::SshKey(_) => ItemCategory::SshKey,
        }
    }
}

/// Login fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totp_uri: Option<String>,
}

/// Alias fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_email: Option<String>,
}

/// Credit card fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
}

/// Identity fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// WiFi fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,
}

/// SSH key fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshKeyContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// A user-defined field attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraField {
    pub name: String,
    pub value: String,
    pub hidden: bool,
}

/// Item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Login,
    Alias,
    Note,
    CreditCard,
    Identity,
    WiFi,
    #[serde(rename = "SSHKey")]
    SshKey,
}

impl ItemCategory {
    /// All categories in display order.
    pub const ALL: [ItemCategory; 7] = [
        Self::Login,
        Self::Alias,
        Self::Note,
        Self::CreditCard,
        Self::Identity,
        Self::WiFi,
        Self::SshKey,
    ];

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Alias => "Alias",
            Self::Note => "Secure Note",
            Self::CreditCard => "Credit Card",
            Self::Identity => "Identity",
            Self::WiFi => "WiFi",
            Self::SshKey => "SSH Key",
        }
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login => write!(f, "Login"),
            Self::Alias => write!(f, "Alias"),
            Self::Note => write!(f, "Note"),
            Self::CreditCard => write!(f, "CreditCard"),
            Self::Identity => write!(f, "Identity"),
            Self::WiFi => write!(f, "WiFi"),
            Self::SshKey => write!(f, "SSHKey"),
        }
    }
}

impl FromStr for ItemCategory {
    type Err = crate::PassError;

    /// Accepts the canonical name or the display name, ignoring case,
    /// spaces, hyphens and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        Self::ALL
            .into_iter()
            .find(|c| {
                c.to_string().to_lowercase() == key
                    || c.display_name().replace(' ', "").to_lowercase() == key
            })
            .ok_or_else(|| crate::PassError::Other(anyhow::anyhow!("unknown item category: {}", s)))
    }
}

/// Orders favorites first, then by name.
///
/// Names compare case-insensitively; ties fall back to exact comparison so
/// the order is total.
pub fn compare_items(a: &Item, b: &Item) -> Ordering {
    b.favorite
        .cmp(&a.favorite)
        .then_with(|| compare_names(&a.name, &b.name))
}

/// Sorts items in place with [`compare_items`].
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(compare_items);
}

pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn item(name: &str, favorite: bool, content: ItemContent) -> Item {
        Item {
            id: format!("id-{}", name),
            share_id: "share-1".to_string(),
            vault_id: "vault-1".to_string(),
            name: name.to_string(),
            note: String::new(),
            state: ItemState::Active,
            favorite,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            content,
            extra_fields: Vec::new(),
            vault_name: None,
        }
    }

    pub fn login(name: &str) -> Item {
        item(
            name,
            false,
            ItemContent::Login(LoginContent {
                username: Some("alice".to_string()),
                email: None,
                password: Some("pw".to_string()),
                urls: vec!["https://example.com".to_string()],
                totp_uri: None,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_category_follows_content() {
        assert_eq!(login("a").category(), ItemCategory::Login);
        assert_eq!(item("n", false, ItemContent::Note).category(), ItemCategory::Note);
        let wifi = item("w", false, ItemContent::WiFi(WifiContent::default()));
        assert_eq!(wifi.category(), ItemCategory::WiFi);
    }

    #[test]
    fn test_username_falls_back_to_email() {
        let mut it = login("a");
        if let ItemContent::Login(l) = &mut it.content {
            l.username = Some(String::new());
            l.email = Some("alice@example.com".to_string());
        }
        assert_eq!(it.username_or_email(), Some("alice@example.com"));
        assert_eq!(item("n", false, ItemContent::Note).username_or_email(), None);
    }

    #[test]
    fn test_has_totp() {
        let mut it = login("a");
        assert!(!it.has_totp());
        if let ItemContent::Login(l) = &mut it.content {
            l.totp_uri = Some("otpauth://totp/x?secret=ABC".to_string());
        }
        assert!(it.has_totp());
    }

    #[test]
    fn test_primary_url() {
        assert_eq!(login("a").primary_url(), Some("https://example.com"));
        assert_eq!(item("n", false, ItemContent::Note).primary_url(), None);
    }

    #[test]
    fn test_created_parses_rfc3339_and_seconds() {
        let mut it = login("a");
        assert_eq!(it.created().unwrap().timestamp(), 1_704_067_200);

        it.created_at = "1704067200".to_string();
        assert_eq!(it.created().unwrap().timestamp(), 1_704_067_200);

        it.created_at = "yesterday".to_string();
        assert!(it.created().is_none());
    }

    #[test]
    fn test_sort_favorites_first_then_name() {
        let mut items = vec![
            login("beta"),
            item("Zeta card", true, ItemContent::CreditCard(CreditCardContent::default())),
            login("Alpha"),
        ];
        sort_items(&mut items);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta card", "Alpha", "beta"]);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("login".parse::<ItemCategory>().unwrap(), ItemCategory::Login);
        assert_eq!("Credit Card".parse::<ItemCategory>().unwrap(), ItemCategory::CreditCard);
        assert_eq!("ssh-key".parse::<ItemCategory>().unwrap(), ItemCategory::SshKey);
        assert_eq!("secure note".parse::<ItemCategory>().unwrap(), ItemCategory::Note);
        assert!("vehicle".parse::<ItemCategory>().is_err());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ItemCategory::SshKey.to_string(), "SSHKey");
        assert_eq!(ItemCategory::SshKey.display_name(), "SSH Key");
        assert_eq!(ItemCategory::Note.display_name(), "Secure Note");
    }

    #[test]
    fn test_item_serialization_has_category_tag() {
        let it = login("github");
        let json = serde_json::to_value(&it).unwrap();
        assert_eq!(json["category"], "Login");
        assert_eq!(json["shareId"], "share-1");
        assert_eq!(json["username"], "alice");

        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back, it);
    }
}
