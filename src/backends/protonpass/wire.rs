//! JSON shapes emitted by `pass-cli` and their normalization.

use crate::item::{
    AliasContent, CreditCardContent, ExtraField, IdentityContent, Item, ItemContent, ItemState,
    LoginContent, SshKeyContent, WifiContent,
};
use crate::Vault;
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// `vault list` response.
#[derive(Debug, Deserialize)]
pub(crate) struct CliVaultsResponse {
    #[serde(default)]
    pub vaults: Vec<CliVault>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CliVault {
    pub name: String,
    pub vault_id: String,
    pub share_id: String,
}

impl From<CliVault> for Vault {
    fn from(v: CliVault) -> Self {
        Vault {
            name: v.name,
            vault_id: v.vault_id,
            share_id: v.share_id,
        }
    }
}

/// `item list` response.
///
/// Records are kept as raw JSON so one malformed record cannot fail the
/// whole listing; see [`CliItemsResponse::into_records`].
#[derive(Debug, Deserialize)]
pub(crate) struct CliItemsResponse {
    #[serde(default)]
    pub items: Vec<Value>,
}

impl CliItemsResponse {
    /// Decodes each record, skipping the ones that do not decode.
    pub fn into_records(self) -> impl Iterator<Item = CliItem> {
        self.items
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| match serde_json::from_value::<CliItem>(raw) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed item record");
                    None
                }
            })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CliItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub share_id: String,
    #[serde(default)]
    pub vault_id: String,
    #[serde(default)]
    pub content: Option<CliItemBody>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub flags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub create_time: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CliItemBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    // Tagged union: {"Login": {...}}, {"Note": {}}, ...
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub extra_fields: Option<Vec<CliExtraField>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CliExtraField {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: Option<CliExtraFieldContent>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CliExtraFieldContent {
    #[serde(rename = "Text", default)]
    pub text: Option<String>,
    #[serde(rename = "Hidden", default)]
    pub hidden: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CliLogin {
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
    urls: Option<Vec<String>>,
    totp_uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CliAlias {
    alias_email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CliCreditCard {
    cardholder_name: Option<String>,
    card_number: Option<String>,
    expiration_date: Option<String>,
    cvv: Option<String>,
    pin: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CliIdentity {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CliWifi {
    ssid: Option<String>,
    password: Option<String>,
    security: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CliSshKey {
    public_key: Option<String>,
    fingerprint: Option<String>,
}

impl CliItem {
    /// Flattens the CLI record into an [`Item`].
    pub fn into_item(self, vault_name: Option<&str>) -> Item {
        let body = self.content.unwrap_or_default();
        let flags = self.flags.unwrap_or_default();

        let state = match self.state.as_deref() {
            Some("Active") => ItemState::Active,
            _ => ItemState::Trashed,
        };

        let extra_fields = body
            .extra_fields
            .unwrap_or_default()
            .into_iter()
            .map(|f| {
                let content = f.content.unwrap_or_default();
                let hidden = content.hidden.as_deref().is_some_and(|h| !h.is_empty());
                ExtraField {
                    name: f.name,
                    value: content.text.or(content.hidden).unwrap_or_default(),
                    hidden,
                }
            })
            .collect();

        Item {
            id: self.id,
            share_id: self.share_id,
            vault_id: self.vault_id,
            name: body
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            note: body.note.unwrap_or_default(),
            state,
            favorite: flags.iter().any(|f| f == "favorite" || f == "Favorite"),
            created_at: self.create_time,
            content: normalize_content(body.content.as_ref()),
            extra_fields,
            vault_name: vault_name.map(str::to_string),
        }
    }
}

/// Maps the tagged CLI content onto [`ItemContent`].
///
/// Missing, null or unrecognized tags become [`ItemContent::Note`], as do
/// `Custom` items.
pub(crate) fn normalize_content(content: Option<&Value>) -> ItemContent {
    let Some(Value::Object(map)) = content else {
        return ItemContent::Note;
    };

    if let Some(v) = map.get("Login") {
        let l: CliLogin = decode("Login", v);
        return ItemContent::Login(LoginContent {
            username: l.username,
            email: l.email,
            password: l.password,
            urls: l.urls.unwrap_or_default(),
            totp_uri: l.totp_uri,
        });
    }
    if let Some(v) = map.get("Alias") {
        let a: CliAlias = decode("Alias", v);
        return ItemContent::Alias(AliasContent {
            alias_email: a.alias_email,
        });
    }
    if map.contains_key("Note") {
        return ItemContent::Note;
    }
    if let Some(v) = map.get("CreditCard") {
        let c: CliCreditCard = decode("CreditCard", v);
        return ItemContent::CreditCard(CreditCardContent {
            cardholder_name: c.cardholder_name,
            card_number: c.card_number,
            expiration_date: c.expiration_date,
            cvv: c.cvv,
            pin: c.pin,
        });
    }
    if let Some(v) = map.get("Identity") {
        let i: CliIdentity = decode("Identity", v);
        return ItemContent::Identity(IdentityContent {
            first_name: i.first_name,
            last_name: i.last_name,
            email: i.email,
            phone: i.phone,
        });
    }
    if let Some(v) = map.get("Wifi") {
        let w: CliWifi = decode("Wifi", v);
        return ItemContent::WiFi(WifiContent {
            ssid: w.ssid,
            password: w.password,
            security: w.security,
        });
    }
    if let Some(v) = map.get("SshKey") {
        let s: CliSshKey = decode("SshKey", v);
        return ItemContent::SshKey(SshKeyContent {
            public_key: s.public_key,
            fingerprint: s.fingerprint,
        });
    }

    ItemContent::Note
}

// A malformed category payload keeps its category with empty fields.
fn decode<T: DeserializeOwned + Default>(tag: &str, value: &Value) -> T {
    if value.is_null() {
        return T::default();
    }
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        tracing::debug!(category = tag, error = %e, "malformed item content");
        T::default()
    })
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}

/// `item totp` response: the first value of the emitted map, if any.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct TotpResponse(pub Option<String>);

impl<'de> Deserialize<'de> for TotpResponse {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct FirstValue;

        impl<'de> Visitor<'de> for FirstValue {
            type Value = TotpResponse;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of TOTP codes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut first = None;
                while let Some((_, value)) = map.next_entry::<String, Value>()? {
                    if first.is_none() {
                        first = Some(match value {
                            Value::String(s) => s,
                            other => other.to_string(),
                        });
                    }
                }
                Ok(TotpResponse(first))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(TotpResponse(None))
            }
        }

        d.deserialize_any(FirstValue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemCategory;
    use serde_json::json;

    fn cli_item(content: Value) -> CliItem {
        serde_json::from_value(json!({
            "id": "i1",
            "share_id": "s1",
            "vault_id": "v1",
            "content": {
                "title": "Example",
                "note": "a note",
                "item_uuid": "u1",
                "content": content,
                "extra_fields": []
            },
            "state": "Active",
            "flags": [],
            "create_time": "2024-03-01T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_vaults_response() {
        let response: CliVaultsResponse = serde_json::from_str(
            r#"{"vaults":[{"name":"Work","vault_id":"v1","share_id":"s1"}]}"#,
        )
        .unwrap();
        let vaults: Vec<Vault> = response.vaults.into_iter().map(Vault::from).collect();
        assert_eq!(vaults, vec![Vault::new("Work", "v1", "s1")]);
    }

    #[test]
    fn test_login_normalization() {
        let item = cli_item(json!({"Login": {
            "email": "a@example.com",
            "username": "alice",
            "password": "pw",
            "urls": ["https://example.com"],
            "totp_uri": "otpauth://totp/x?secret=ABC"
        }}))
        .into_item(Some("Work"));

        assert_eq!(item.category(), ItemCategory::Login);
        assert_eq!(item.name, "Example");
        assert_eq!(item.note, "a note");
        assert_eq!(item.vault_name.as_deref(), Some("Work"));
        let ItemContent::Login(login) = &item.content else {
            panic!("expected login content");
        };
        assert_eq!(login.username.as_deref(), Some("alice"));
        assert_eq!(login.email.as_deref(), Some("a@example.com"));
        assert_eq!(login.urls, vec!["https://example.com".to_string()]);
        assert!(item.has_totp());
    }

    #[test]
    fn test_each_tag_maps_to_category() {
        let cases = [
            (json!({"Alias": {"alias_email": "x@alias.me"}}), ItemCategory::Alias),
            (json!({"Note": {}}), ItemCategory::Note),
            (json!({"CreditCard": {"card_number": "4111"}}), ItemCategory::CreditCard),
            (json!({"Identity": {"first_name": "Ada"}}), ItemCategory::Identity),
            (json!({"Wifi": {"ssid": "home"}}), ItemCategory::WiFi),
            (json!({"SshKey": {"public_key": "ssh-ed25519 AAAA", "private_key": "secret"}}), ItemCategory::SshKey),
            (json!({"Custom": {"sections": []}}), ItemCategory::Note),
            (json!({"Vehicle": {}}), ItemCategory::Note),
            (Value::Null, ItemCategory::Note),
        ];

        for (content, expected) in cases {
            let item = cli_item(content.clone()).into_item(None);
            assert_eq!(item.category(), expected, "content {}", content);
        }
    }

    #[test]
    fn test_card_fields() {
        let item = cli_item(json!({"CreditCard": {
            "cardholder_name": "Ada Lovelace",
            "card_number": "4111111111111111",
            "expiration_date": "2030-01",
            "cvv": "123",
            "pin": "0000"
        }}))
        .into_item(None);
        assert_eq!(
            item.content,
            ItemContent::CreditCard(CreditCardContent {
                cardholder_name: Some("Ada Lovelace".to_string()),
                card_number: Some("4111111111111111".to_string()),
                expiration_date: Some("2030-01".to_string()),
                cvv: Some("123".to_string()),
                pin: Some("0000".to_string()),
            })
        );
    }

    #[test]
    fn test_malformed_payload_keeps_category() {
        let item = cli_item(json!({"Login": {"urls": "not-a-list"}})).into_item(None);
        assert_eq!(item.content, ItemContent::Login(LoginContent::default()));

        let item = cli_item(json!({"Wifi": null})).into_item(None);
        assert_eq!(item.content, ItemContent::WiFi(WifiContent::default()));
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let item: CliItem = serde_json::from_value(json!({
            "id": "i2",
            "share_id": "s1",
            "vault_id": "v1",
            "state": "Trashed",
            "flags": null,
            "create_time": 1709287200
        }))
        .unwrap();
        let item = item.into_item(None);

        assert_eq!(item.name, "Untitled");
        assert_eq!(item.note, "");
        assert_eq!(item.state, ItemState::Trashed);
        assert!(!item.favorite);
        assert_eq!(item.created_at, "1709287200");
        assert_eq!(item.category(), ItemCategory::Note);
    }

    #[test]
    fn test_empty_title_is_untitled() {
        let mut raw = cli_item(json!({"Note": {}}));
        raw.content.as_mut().unwrap().title = Some(String::new());
        assert_eq!(raw.into_item(None).name, "Untitled");
    }

    #[test]
    fn test_favorite_flag_variants() {
        for flag in ["favorite", "Favorite"] {
            let mut raw = cli_item(json!({"Note": {}}));
            raw.flags = Some(vec!["pinned".to_string(), flag.to_string()]);
            assert!(raw.into_item(None).favorite);
        }
    }

    #[test]
    fn test_extra_fields() {
        let raw: CliItem = serde_json::from_value(json!({
            "id": "i3",
            "share_id": "s1",
            "vault_id": "v1",
            "content": {
                "title": "Server",
                "content": {"Note": {}},
                "extra_fields": [
                    {"name": "host", "content": {"Text": "10.0.0.1"}},
                    {"name": "token", "content": {"Hidden": "s3cret"}},
                    {"name": "blank", "content": {}}
                ]
            },
            "state": "Active",
            "flags": [],
            "create_time": ""
        }))
        .unwrap();

        let fields = raw.into_item(None).extra_fields;
        assert_eq!(
            fields,
            vec![
                ExtraField { name: "host".into(), value: "10.0.0.1".into(), hidden: false },
                ExtraField { name: "token".into(), value: "s3cret".into(), hidden: true },
                ExtraField { name: "blank".into(), value: String::new(), hidden: false },
            ]
        );
    }

    #[test]
    fn test_empty_hidden_value_is_not_hidden() {
        let raw: CliItem = serde_json::from_value(json!({
            "id": "i4",
            "share_id": "s1",
            "vault_id": "v1",
            "content": {
                "title": "Blank secret",
                "content": {"Note": {}},
                "extra_fields": [{"name": "pin", "content": {"Hidden": ""}}]
            },
            "state": "Active"
        }))
        .unwrap();

        let fields = raw.into_item(None).extra_fields;
        assert_eq!(
            fields,
            vec![ExtraField { name: "pin".into(), value: String::new(), hidden: false }]
        );
    }

    #[test]
    fn test_items_response_skips_malformed_records() {
        let response: CliItemsResponse = serde_json::from_str(
            r#"{"items":[
              {"id":"i1","share_id":"s1","vault_id":"v1","state":"Active","content":{"title":"Good"}},
              {"id":"i2","share_id":"s1","state":"Active","content":{"title":"No vault id"}},
              {"id":42,"share_id":"s1","vault_id":"v1","state":"Active"},
              "not even an object"
            ]}"#,
        )
        .unwrap();

        let items: Vec<Item> = response.into_records().map(|r| r.into_item(Some("Work"))).collect();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Good", "No vault id"]);
        assert_eq!(items[1].vault_id, "");
        assert_eq!(items[1].share_id, "s1");
    }

    #[test]
    fn test_totp_response_first_value() {
        let r: TotpResponse = serde_json::from_str(r#"{"zeta": "111111", "alpha": "222222"}"#).unwrap();
        assert_eq!(r, TotpResponse(Some("111111".to_string())));

        let r: TotpResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(r, TotpResponse(None));

        let r: TotpResponse = serde_json::from_str(r#"{"totp": 123456}"#).unwrap();
        assert_eq!(r, TotpResponse(Some("123456".to_string())));
    }
}
