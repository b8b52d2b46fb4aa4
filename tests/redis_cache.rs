//! Redis cache store against a running server.
//!
//! - Marked `#[ignore]`; run with `cargo test -- --ignored`.
//! - Reads the server address from `EVENTDESK_TEST_REDIS_URL` and skips when unset.

use std::time::Duration;

use bytes::Bytes;
use uuid::Uuid;

use eventdesk::cache::CacheStore;
use eventdesk::infra::redis::RedisCacheStore;

const REDIS_URL_ENV: &str = "EVENTDESK_TEST_REDIS_URL";

async fn connect() -> Option<RedisCacheStore> {
    let Ok(url) = std::env::var(REDIS_URL_ENV) else {
        eprintln!("{REDIS_URL_ENV} not set; skipping");
        return None;
    };
    Some(
        RedisCacheStore::connect(&url)
            .await
            .expect("redis should be reachable"),
    )
}

fn unique_prefix() -> String {
    format!("eventdesk-test:{}:", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore]
async fn redis_set_then_get_round_trips_bytes() {
    let Some(store) = connect().await else {
        return;
    };
    let key = format!("{}1:10", unique_prefix());

    assert!(store.get(&key).await.expect("get").is_none());

    store
        .set(&key, Bytes::from_static(b"{\"total\":0}"), Duration::from_secs(60))
        .await
        .expect("set");
    let cached = store.get(&key).await.expect("get");
    assert_eq!(cached, Some(Bytes::from_static(b"{\"total\":0}")));

    store.delete(&key).await.expect("delete");
    assert!(store.get(&key).await.expect("get").is_none());
}

#[tokio::test]
#[ignore]
async fn redis_entries_expire_with_their_ttl() {
    let Some(store) = connect().await else {
        return;
    };
    let key = format!("{}item", unique_prefix());

    store
        .set(&key, Bytes::from_static(b"1"), Duration::from_secs(1))
        .await
        .expect("set");
    assert!(store.get(&key).await.expect("get").is_some());

    tokio::time::sleep(Duration::from_millis(2_100)).await;
    assert!(store.get(&key).await.expect("get").is_none());
}

#[tokio::test]
#[ignore]
async fn redis_prefix_delete_spares_other_prefixes() {
    let Some(store) = connect().await else {
        return;
    };
    let doomed = unique_prefix();
    let kept = unique_prefix();
    let ttl = Duration::from_secs(60);

    for page in 1..=3 {
        store
            .set(&format!("{doomed}{page}:10"), Bytes::from_static(b"[]"), ttl)
            .await
            .expect("set");
    }
    store
        .set(&format!("{kept}1:10"), Bytes::from_static(b"[]"), ttl)
        .await
        .expect("set");

    let removed = store.delete_prefix(&doomed).await.expect("delete prefix");
    assert_eq!(removed, 3);
    assert!(store.get(&format!("{doomed}2:10")).await.expect("get").is_none());
    assert!(store.get(&format!("{kept}1:10")).await.expect("get").is_some());

    store.delete_prefix(&kept).await.expect("cleanup");
}
