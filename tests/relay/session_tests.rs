/*!
Tests for the relay session: selection, URL building, cached fetches, and
settings save/load with its fallback paths.
*/

use corsrelay::core::relay::session::{PAGE_CACHE_KEY, SELECTED_ENDPOINT_KEY};
use corsrelay::{
    EndpointRegistry, MemoryStore, PageCache, RelayError, RelaySession, SettingsStore,
};

use crate::common::{MockClock, MockRelayClient};

fn session_with_store() -> (RelaySession, MemoryStore) {
    let store = MemoryStore::new();
    let session = RelaySession::new(EndpointRegistry::builtin(), Box::new(store.clone()));
    (session, store)
}

#[test]
fn test_starts_at_registry_default() {
    let (session, _store) = session_with_store();
    assert_eq!(session.selected_id(), "cors-anywhere");
    assert!(session.cache().is_empty());
}

#[test]
fn test_build_url_composes_prefix_and_encoded_target() {
    let (mut session, _store) = session_with_store();

    let url = session.build_url("https://example.com/page").expect("url");
    assert_eq!(
        url,
        "https://cors-anywhere.herokuapp.com/https%3A%2F%2Fexample.com%2Fpage"
    );

    session.select("allorigins").expect("registered id");
    let url = session.build_url("https://example.com/page").expect("url");
    assert_eq!(
        url,
        "https://api.allorigins.win/raw?url=https%3A%2F%2Fexample.com%2Fpage"
    );
}

#[test]
fn test_with_clock_drives_session_cache_expiry() {
    let clock = MockClock::at(1_000);
    let mut session = RelaySession::new(EndpointRegistry::builtin(), Box::new(MemoryStore::new()))
        .with_clock(Box::new(clock.clone()));

    session.cache_mut().put("https://example.com/a", "alpha");
    assert_eq!(session.cache().get("https://example.com/a"), Some("alpha"));

    clock.advance(PageCache::MAX_AGE_MS);
    assert_eq!(session.cache().get("https://example.com/a"), None);
}

#[test]
fn test_select_unknown_keeps_previous_selection() {
    let (mut session, _store) = session_with_store();
    session.select("allorigins").expect("registered id");

    let err = session.select("nope").unwrap_err();
    assert!(matches!(err, RelayError::UnknownEndpoint(ref id) if id == "nope"));
    assert_eq!(session.selected_id(), "allorigins");
}

#[test]
fn test_save_load_round_trip() {
    let (mut session, store) = session_with_store();
    session.select("codetabs").expect("registered id");
    session.cache_mut().put("https://example.com/a", "alpha");
    session.save().expect("save");

    // The store now holds both fixed keys.
    assert_eq!(
        store.get(SELECTED_ENDPOINT_KEY).expect("read"),
        Some("codetabs".to_string())
    );
    assert!(store.get(PAGE_CACHE_KEY).expect("read").is_some());

    let mut restored = RelaySession::new(EndpointRegistry::builtin(), Box::new(store));
    restored.load().expect("load");

    assert_eq!(restored.selected_id(), "codetabs");
    assert_eq!(restored.cache().serialize(), session.cache().serialize());
    assert_eq!(
        restored.cache().get("https://example.com/a"),
        Some("alpha")
    );
}

#[test]
fn test_load_with_empty_store_yields_defaults() {
    let (mut session, _store) = session_with_store();
    session.select("thingproxy").expect("registered id");

    session.load().expect("load");
    assert_eq!(session.selected_id(), "cors-anywhere");
    assert!(session.cache().is_empty());
}

#[test]
fn test_load_unknown_persisted_id_falls_back_to_default() {
    let (mut session, store) = session_with_store();
    store
        .set(SELECTED_ENDPOINT_KEY, "retired-endpoint")
        .expect("seed store");

    session.load().expect("load");
    assert_eq!(session.selected_id(), "cors-anywhere");
}

#[test]
fn test_load_malformed_cache_yields_empty_cache() {
    let (mut session, store) = session_with_store();
    store.set(SELECTED_ENDPOINT_KEY, "allorigins").expect("seed");
    store.set(PAGE_CACHE_KEY, "{definitely not json").expect("seed");

    session.load().expect("load never fails on bad cache data");
    assert_eq!(session.selected_id(), "allorigins");
    assert!(session.cache().is_empty());
}

#[tokio::test]
async fn test_fetch_through_cache_miss_fetches_and_caches() {
    let (mut session, _store) = session_with_store();
    let target = "https://example.com/page";
    let relayed = session.build_url(target).expect("url");

    let mut client = MockRelayClient::new();
    client.respond(&relayed, 200, "hello");

    let content = session
        .fetch_through_cache(&client, target, 5000)
        .await
        .expect("fetch");
    assert_eq!(content, "hello");
    assert_eq!(session.cache().len(), 1);

    // Second call is served from the cache: an empty transport would fail
    // if the session went to the network again.
    let silent = MockRelayClient::new();
    let content = session
        .fetch_through_cache(&silent, target, 5000)
        .await
        .expect("cache hit");
    assert_eq!(content, "hello");
}

#[tokio::test]
async fn test_fetch_through_cache_non_ok_surfaces_and_skips_cache() {
    let (mut session, _store) = session_with_store();
    let target = "https://example.com/down";
    let relayed = session.build_url(target).expect("url");

    let mut client = MockRelayClient::new();
    client.respond(&relayed, 503, "unavailable");

    let err = session
        .fetch_through_cache(&client, target, 5000)
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::Transport(_)));
    assert!(session.cache().is_empty());
}

#[tokio::test]
async fn test_fetch_through_cache_transport_failure_surfaces() {
    let (mut session, _store) = session_with_store();
    let target = "https://example.com/unreachable";
    let relayed = session.build_url(target).expect("url");

    let mut client = MockRelayClient::new();
    client.fail(&relayed, "connection refused");

    let err = session
        .fetch_through_cache(&client, target, 5000)
        .await
        .unwrap_err();
    match err {
        RelayError::Transport(message) => assert!(message.contains("connection refused")),
        other => panic!("expected transport error, got {:?}", other),
    }
}
