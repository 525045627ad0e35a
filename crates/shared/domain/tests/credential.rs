use chrono::{TimeZone, Utc};
use quill_domain::{Credential, CredentialSet};
use serde_json::json;

fn sample() -> CredentialSet {
    CredentialSet::new(
        vec![
            Credential::new("sessionid", "abc", ".example.com").with_path("/"),
            Credential::new("csrftoken", "xyz", ".example.com").with_expires_at(1_000.0),
            Credential::new("tt_webid", "42", "www.example.com").with_expires_at(-1.0),
        ],
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
    )
}

#[test]
fn serializes_with_camel_case_and_epoch_millis() {
    let set = sample();
    let value = serde_json::to_value(&set).unwrap();

    assert_eq!(value["savedAt"], json!(1_700_000_000_000_i64));
    assert_eq!(value["credentials"][1]["expiresAt"], json!(1000.0));
    assert!(value["credentials"][0].get("httpOnly").is_none());

    let back: CredentialSet = serde_json::from_value(value).unwrap();
    assert_eq!(back, set);
}

#[test]
fn payload_without_credentials_is_empty() {
    let set: CredentialSet = serde_json::from_value(json!({ "savedAt": 5 })).unwrap();
    assert!(set.is_empty());
    assert_eq!(set.saved_at.timestamp_millis(), 5);
}

#[test]
fn null_credentials_are_empty() {
    let set: CredentialSet =
        serde_json::from_value(json!({ "credentials": null, "savedAt": 5 })).unwrap();
    assert!(set.is_empty());
}

#[test]
fn cookie_header_keeps_order() {
    assert_eq!(sample().cookie_header(), "sessionid=abc; csrftoken=xyz; tt_webid=42");
    assert_eq!(CredentialSet::default().cookie_header(), "");
}

#[test]
fn live_skips_expired_but_keeps_session_credentials() {
    let now = Utc.timestamp_opt(2_000, 0).unwrap();
    let set = sample();
    let live: Vec<_> = set.live(now).into_iter().map(|c| c.name.as_str()).collect();
    assert_eq!(live, vec!["sessionid", "tt_webid"]);

    let before = Utc.timestamp_opt(500, 0).unwrap();
    assert_eq!(set.live(before).len(), 3);
}

#[test]
fn dedup_keeps_last_value_at_first_position() {
    let mut set = CredentialSet::new(
        vec![
            Credential::new("a", "1", "d"),
            Credential::new("b", "1", "d"),
            Credential::new("a", "2", "d"),
            Credential::new("a", "3", "d").with_path("/x"),
        ],
        Utc::now(),
    );
    set.dedup_by_key();

    let pairs: Vec<_> = set.iter().map(|c| (c.name.as_str(), c.value.as_str())).collect();
    assert_eq!(pairs, vec![("a", "2"), ("b", "1"), ("a", "3")]);
}
