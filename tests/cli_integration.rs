//! End-to-end tests against a scripted stand-in for `pass-cli`.
//!
//! Each test writes a small `sh` script that answers the subcommands the
//! backend issues, then drives [`ProtonPassBackend`] through the real
//! subprocess path.

#![cfg(unix)]

use protonpass::{
    Backend, Config, ErrorKind, ItemCategory, PassError, PassphraseOptions, ProtonPassBackend,
    RandomPasswordOptions, Separator, Strength,
};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

const VAULTS: &str = r#"{"vaults":[
  {"name":"Work","vault_id":"v2","share_id":"s2"},
  {"name":"personal","vault_id":"v1","share_id":"s1"}
]}"#;

const PERSONAL_ITEMS: &str = r#"{"items":[
  {"id":"i1","share_id":"s1","vault_id":"v1","state":"Active","create_time":1700000000,
   "content":{"title":"zulu","note":"","content":{"Login":{"username":"alice","password":"pw","urls":["https://zulu.example"],"totp_uri":""}}}},
  {"id":"i2","share_id":"s1","vault_id":"v1","state":"Active","flags":["Favorite"],
   "content":{"title":"Yankee","content":{"Note":{}}}},
  {"id":"i3","share_id":"s1","vault_id":"v1","state":"Trashed",
   "content":{"title":"Old","content":{"Note":{}}}},
  {"id":"i4","share_id":"s1","vault_id":"v1","state":"Active",
   "content":{"title":"alpha","content":{"CreditCard":{"card_number":"4111"}}}}
]}"#;

fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("pass-cli");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn backend_for(body: &str) -> (TempDir, ProtonPassBackend) {
    let dir = tempfile::tempdir().unwrap();
    let cli = write_script(dir.path(), body);
    let config = Config::new()
        .with_cli_path(cli)
        .with_home(dir.path())
        .with_timeout(Duration::from_secs(10));
    (dir, ProtonPassBackend::new(config))
}

fn vault_script() -> String {
    format!(
        r#"case "$1 $2" in
  "vault list") cat <<'EOF'
{VAULTS}
EOF
  ;;
  "item list")
    case "$3" in
      personal) cat <<'EOF'
{PERSONAL_ITEMS}
EOF
      ;;
      *) echo "vault $3 is locked" >&2; exit 3 ;;
    esac
  ;;
  *) echo "unexpected: $*" >&2; exit 2 ;;
esac"#
    )
}

#[tokio::test]
async fn test_list_vaults_sorted_by_name() {
    let (_dir, backend) = backend_for(&vault_script());

    let vaults = backend.list_vaults().await.unwrap();
    let names: Vec<&str> = vaults.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["personal", "Work"]);
    assert_eq!(vaults[0].share_id, "s1");
}

#[tokio::test]
async fn test_list_items_filters_and_sorts() {
    let (_dir, backend) = backend_for(&vault_script());

    let items = backend.list_items("personal").await.unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Yankee", "alpha", "zulu"]);

    assert!(items.iter().all(|i| i.vault_name.as_deref() == Some("personal")));
    assert_eq!(items[1].category(), ItemCategory::CreditCard);

    let zulu = &items[2];
    assert_eq!(zulu.username_or_email(), Some("alice"));
    assert!(!zulu.has_totp());
    assert_eq!(zulu.created_at, "1700000000");
}

#[tokio::test]
async fn test_list_all_items_reports_failed_vault() {
    let (_dir, backend) = backend_for(&vault_script());

    let all = backend.list_all_items().await.unwrap();
    assert_eq!(all.items.len(), 3);
    assert_eq!(all.failures.len(), 1);

    let failure = &all.failures[0];
    assert_eq!(failure.vault, "Work");
    assert_eq!(failure.error.kind(), ErrorKind::Failure);
    assert!(failure.error.to_string().contains("vault Work is locked"));
}

#[tokio::test]
async fn test_auth_failure_is_classified() {
    let (_dir, backend) =
        backend_for(r#"echo "Error: not logged in. Run pass-cli login" >&2; exit 1"#);

    let err = backend.list_vaults().await.unwrap_err();
    assert!(matches!(err, PassError::AuthenticationRequired));

    let err = backend.list_all_items().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationRequired);
}

#[tokio::test]
async fn test_check_authentication() {
    let (_dir, ok) = backend_for(r#"[ "$1" = "info" ] && echo "ok""#);
    assert!(ok.check_authentication().await.is_ok());

    let (_dir, failing) = backend_for(r#"echo "network down" >&2; exit 1"#);
    let err = failing.check_authentication().await.unwrap_err();
    assert!(matches!(err, PassError::AuthenticationRequired));
}

#[tokio::test]
async fn test_status_reports_user() {
    let (_dir, backend) = backend_for(
        r#"case "$1" in
  info) echo ok ;;
  user) echo '{"email":"ada@proton.me","userId":"u1"}' ;;
esac"#,
    );

    let user = backend.status().await.unwrap().unwrap();
    assert_eq!(user.email, "ada@proton.me");
    assert_eq!(user.user_id.as_deref(), Some("u1"));
}

#[tokio::test]
async fn test_missing_binary() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new()
        .with_cli_path(dir.path().join("absent"))
        .with_home(dir.path());
    let backend = ProtonPassBackend::new(config);
    if backend.is_installed() {
        // A system-wide pass-cli shadows the missing configured path.
        return;
    }

    let err = backend.list_vaults().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BinaryNotFound);
    assert!(matches!(
        backend.check_authentication().await,
        Err(PassError::CliNotFound)
    ));
}

#[tokio::test]
async fn test_invalid_json_is_parse_error() {
    let (_dir, backend) = backend_for("echo 'this is not json'");

    let err = backend.list_vaults().await.unwrap_err();
    assert!(matches!(err, PassError::Parse { .. }));
    assert!(err.to_string().contains("this is not json"));
}

#[tokio::test]
async fn test_field_uses_pass_uri() {
    let (_dir, backend) = backend_for(
        r#"[ "$1 $2" = "item view" ] || exit 9
[ "$3" = "pass://s1/i1/password" ] && echo "  hunter2  " && exit 0
exit 4"#,
    );

    assert_eq!(backend.get_password("s1", "i1").await.unwrap(), "hunter2");
    assert!(backend.get_field("s1", "i1", "username").await.is_err());
}

#[tokio::test]
async fn test_totp_code() {
    let (_dir, backend) = backend_for(
        r#"[ "$3 $4 $5 $6" = "--share-id s1 --item-id i1" ] && echo '{"totp":"492039"}' && exit 0
echo '{}'"#,
    );

    assert_eq!(
        backend.get_totp("s1", "i1").await.unwrap().as_deref(),
        Some("492039")
    );
    assert_eq!(backend.get_totp("s1", "i2").await.unwrap(), None);
}

#[tokio::test]
async fn test_password_generation_uses_cli() {
    let (_dir, backend) = backend_for(
        r#"[ "$*" = "password generate random --length 12 --numbers true --uppercase false --symbols false" ] || exit 1
echo "fromthecli12""#,
    );

    let options = RandomPasswordOptions {
        length: 12,
        numbers: true,
        uppercase: false,
        symbols: false,
    };
    assert_eq!(backend.generate_password(&options).await.unwrap(), "fromthecli12");
}

#[tokio::test]
async fn test_password_generation_falls_back() {
    let (_dir, backend) = backend_for(r#"echo "generator offline" >&2; exit 1"#);

    let options = RandomPasswordOptions {
        length: 24,
        numbers: false,
        uppercase: true,
        symbols: false,
    };
    let password = backend.generate_password(&options).await.unwrap();
    assert_eq!(password.len(), 24);
    assert!(password.chars().all(|c| c.is_ascii_alphabetic()));

    let (_dir, empty) = backend_for("exit 0");
    assert_eq!(empty.generate_password(&options).await.unwrap().len(), 24);
}

#[tokio::test]
async fn test_passphrase_has_no_fallback() {
    let (_dir, backend) = backend_for(
        r#"[ "$*" = "password generate passphrase --count 4 --separator spaces --capitalise false --numbers true" ] || { echo "bad args: $*" >&2; exit 1; }
echo "apple tree 7 river""#,
    );

    let options = PassphraseOptions {
        words: 4,
        separator: Separator::Spaces,
        capitalize: false,
        numbers: true,
    };
    assert_eq!(
        backend.generate_passphrase(&options).await.unwrap(),
        "apple tree 7 river"
    );

    let (_dir, failing) = backend_for("exit 1");
    assert!(failing.generate_passphrase(&options).await.is_err());
}

#[tokio::test]
async fn test_score_argument_forms() {
    let (_dir, backend) = backend_for(
        r#"if [ "$3" = "--" ] || [ "$5" = "--" ]; then
  echo '{"numeric_score":91.5,"password_score":"Strong","penalties":[]}'
elif [ "$3" = "plain" ] && [ "$4 $5" = "--output json" ]; then
  echo '{"numeric_score":12,"password_score":"Vulnerable","penalties":["TooShort","NoDigits"]}'
else
  echo "bad args: $*" >&2; exit 1
fi"#,
    );

    let weak = backend.score_password("plain").await.unwrap();
    assert_eq!(weak.password_score, Strength::Vulnerable);
    assert_eq!(weak.penalties, vec!["TooShort", "NoDigits"]);

    let dashed = backend.score_password("-looks-like-a-flag").await.unwrap();
    assert_eq!(dashed.password_score, Strength::Strong);
}

#[tokio::test]
async fn test_slow_cli_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let cli = write_script(dir.path(), "sleep 5");
    let config = Config::new()
        .with_cli_path(cli)
        .with_home(dir.path())
        .with_timeout(Duration::from_millis(200));
    let backend = ProtonPassBackend::new(config);

    let err = backend.list_vaults().await.unwrap_err();
    assert!(matches!(err, PassError::Timeout(_)));
}
