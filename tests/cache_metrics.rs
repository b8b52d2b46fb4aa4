mod support;

use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::time::Duration;

use bytes::Bytes;
use metrics_util::debugging::DebuggingRecorder;

use eventdesk::application::pagination::PageRequest;
use eventdesk::cache::{
    CacheKey, CacheStore, METRIC_CACHE_CORRUPT, METRIC_CACHE_HIT, METRIC_CACHE_INVALIDATE,
    METRIC_CACHE_MISS, METRIC_CACHE_UNAVAILABLE, METRIC_CACHE_WRITE_FAILED,
};
use eventdesk::domain::entities::EventRecord;
use eventdesk::domain::resource::OwnedResource;
use eventdesk::domain::types::ResourceKind;

use support::{CountingCache, MemoryRepo, event_draft, owner, read_through, record_service};

#[tokio::test]
async fn read_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let repo = MemoryRepo::<EventRecord>::new();
    let cache = CountingCache::new();
    let alice = owner();
    let stored = repo.seed(alice, event_draft("metrics"));
    let service = record_service(&repo, Some(cache.clone()));
    let raw_id = stored.id.to_string();

    // miss then hit
    service.get(alice, &raw_id).await.expect("miss");
    service.get(alice, &raw_id).await.expect("hit");

    // corrupt entry
    let list_key = CacheKey::list(ResourceKind::Events, alice, PageRequest::new(1, 10));
    cache
        .set(
            list_key.as_str(),
            Bytes::from_static(b"{truncated"),
            Duration::from_secs(60),
        )
        .await
        .expect("plant entry");
    service
        .list(alice, PageRequest::new(1, 10))
        .await
        .expect("corrupt fallback");

    // invalidation
    service
        .update(alice, &raw_id, event_draft("renamed"))
        .await
        .expect("update");

    // unavailable store: lookup and write-back both fail
    cache.unavailable.store(true, Ordering::SeqCst);
    let offline = read_through(&repo, Some(cache.clone()));
    offline
        .get_item(alice, &stored.record_id().as_uuid().to_string())
        .await
        .expect("offline read");

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        METRIC_CACHE_HIT,
        METRIC_CACHE_MISS,
        METRIC_CACHE_CORRUPT,
        METRIC_CACHE_UNAVAILABLE,
        METRIC_CACHE_WRITE_FAILED,
        METRIC_CACHE_INVALIDATE,
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
