//! In-process doubles shared by the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;
use time::macros::datetime;
use uuid::Uuid;

use eventdesk::application::admin::AdminService;
use eventdesk::application::pagination::PageRequest;
use eventdesk::application::records::RecordService;
use eventdesk::application::repos::{
    DirectoryRepo, HealthCheck, OwnedRecordsRepo, OwnedRecordsWriteRepo, RepoError,
};
use eventdesk::cache::{CacheConfig, CacheError, CacheStore, MemoryCacheStore, ReadThrough};
use eventdesk::domain::entities::{
    EventDraft, EventRecord, FunctionDraft, FunctionRecord, UserRecord,
};
use eventdesk::domain::resource::OwnedResource;
use eventdesk::domain::types::{OwnerId, RecordId};
use eventdesk::infra::http::ApiState;

pub const DEADLINE: Duration = Duration::from_secs(10);

/// Builds a stored record from a draft the way the primary store would.
pub trait Materialize: OwnedResource {
    fn materialize(id: Uuid, owner: OwnerId, draft: Self::Draft, now: OffsetDateTime) -> Self;

    fn apply(&mut self, draft: Self::Draft, now: OffsetDateTime);
}

impl Materialize for EventRecord {
    fn materialize(id: Uuid, owner: OwnerId, draft: EventDraft, now: OffsetDateTime) -> Self {
        EventRecord {
            id,
            user_id: owner.as_uuid(),
            event_name: draft.event_name,
            event_type: draft.event_type,
            attendance: draft.attendance,
            description: draft.description,
            is_public: draft.is_public,
            status: draft.status,
            location: draft.location,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: EventDraft, now: OffsetDateTime) {
        self.event_name = draft.event_name;
        self.event_type = draft.event_type;
        self.attendance = draft.attendance;
        self.description = draft.description;
        self.is_public = draft.is_public;
        self.status = draft.status;
        self.location = draft.location;
        self.image_url = draft.image_url;
        self.updated_at = now;
    }
}

impl Materialize for FunctionRecord {
    fn materialize(id: Uuid, owner: OwnerId, draft: FunctionDraft, now: OffsetDateTime) -> Self {
        FunctionRecord {
            id,
            user_id: owner.as_uuid(),
            func_name: draft.func_name,
            func_type: draft.func_type,
            description: draft.description,
            is_public: draft.is_public,
            status: draft.status,
            location: draft.location,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, draft: FunctionDraft, now: OffsetDateTime) {
        self.func_name = draft.func_name;
        self.func_type = draft.func_type;
        self.description = draft.description;
        self.is_public = draft.is_public;
        self.status = draft.status;
        self.location = draft.location;
        self.image_url = draft.image_url;
        self.updated_at = now;
    }
}

pub fn event_draft(name: &str) -> EventDraft {
    EventDraft {
        event_name: name.to_string(),
        event_type: "meetup".to_string(),
        attendance: 25,
        description: String::new(),
        is_public: true,
        status: "planned".to_string(),
        location: "Hall A".to_string(),
        image_url: None,
    }
}

pub fn function_draft(name: &str) -> FunctionDraft {
    FunctionDraft {
        func_name: name.to_string(),
        func_type: "wedding".to_string(),
        description: String::new(),
        is_public: false,
        status: "booked".to_string(),
        location: "Garden".to_string(),
        image_url: None,
    }
}

pub fn owner() -> OwnerId {
    OwnerId::new(Uuid::new_v4())
}

/// Primary-store double. Records are kept newest first.
pub struct MemoryRepo<R> {
    records: Mutex<Vec<R>>,
    clock: Mutex<OffsetDateTime>,
    pub reads: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub read_delay: Mutex<Option<Duration>>,
}

impl<R: Materialize> MemoryRepo<R> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(Vec::new()),
            clock: Mutex::new(datetime!(2024-01-01 00:00 UTC)),
            reads: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            read_delay: Mutex::new(None),
        })
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn seed(&self, owner: OwnerId, draft: R::Draft) -> R {
        let record = R::materialize(Uuid::new_v4(), owner, draft, self.tick());
        self.records.lock().unwrap().insert(0, record.clone());
        record
    }

    /// Changes a record behind the cache's back.
    pub fn overwrite(&self, id: RecordId, draft: R::Draft) {
        let now = self.tick();
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.record_id() == id) {
            record.apply(draft, now);
        }
    }

    fn tick(&self) -> OffsetDateTime {
        let mut clock = self.clock.lock().unwrap();
        *clock += time::Duration::seconds(1);
        *clock
    }

    async fn begin_read(&self) -> Result<(), RepoError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let delay = *self.read_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Materialize> OwnedRecordsRepo<R> for MemoryRepo<R> {
    async fn count_for_owner(&self, owner: OwnerId) -> Result<u64, RepoError> {
        self.begin_read().await?;
        let records = self.records.lock().unwrap();
        Ok(records.iter().filter(|r| r.owner() == owner).count() as u64)
    }

    async fn list_for_owner(
        &self,
        owner: OwnerId,
        page: PageRequest,
    ) -> Result<Vec<R>, RepoError> {
        self.begin_read().await?;
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.owner() == owner)
            .skip(page.skip() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect())
    }

    async fn find_for_owner(&self, owner: OwnerId, id: RecordId) -> Result<Option<R>, RepoError> {
        self.begin_read().await?;
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .find(|r| r.owner() == owner && r.record_id() == id)
            .cloned())
    }
}

#[async_trait]
impl<R: Materialize> OwnedRecordsWriteRepo<R> for MemoryRepo<R> {
    async fn insert(&self, owner: OwnerId, draft: R::Draft) -> Result<R, RepoError> {
        Ok(self.seed(owner, draft))
    }

    async fn update_for_owner(
        &self,
        owner: OwnerId,
        id: RecordId,
        draft: R::Draft,
    ) -> Result<Option<R>, RepoError> {
        let now = self.tick();
        let mut records = self.records.lock().unwrap();
        let Some(record) = records
            .iter_mut()
            .find(|r| r.owner() == owner && r.record_id() == id)
        else {
            return Ok(None);
        };
        record.apply(draft, now);
        Ok(Some(record.clone()))
    }

    async fn delete_for_owner(&self, owner: OwnerId, id: RecordId) -> Result<bool, RepoError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !(r.owner() == owner && r.record_id() == id));
        Ok(records.len() != before)
    }

    async fn delete_all_for_owner(&self, owner: OwnerId) -> Result<u64, RepoError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.owner() != owner);
        Ok((before - records.len()) as u64)
    }
}

#[async_trait]
impl<R: Materialize> DirectoryRepo<R> for MemoryRepo<R> {
    async fn list_all(&self) -> Result<Vec<R>, RepoError> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<R>, RepoError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.record_id() == id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    pub users: Vec<UserRecord>,
}

impl MemoryUsers {
    pub fn with_user(id: Uuid, username: &str) -> Arc<Self> {
        Arc::new(Self {
            users: vec![UserRecord {
                id,
                username: username.to_string(),
                email: format!("{username}@example.com"),
                created_at: datetime!(2024-01-01 00:00 UTC),
                updated_at: datetime!(2024-01-01 00:00 UTC),
            }],
        })
    }
}

#[async_trait]
impl DirectoryRepo<UserRecord> for MemoryUsers {
    async fn list_all(&self) -> Result<Vec<UserRecord>, RepoError> {
        Ok(self.users.clone())
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<UserRecord>, RepoError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.id == id.as_uuid())
            .cloned())
    }
}

/// Cache store that counts traffic and can be switched to failing.
pub struct CountingCache {
    inner: MemoryCacheStore,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub unavailable: AtomicBool,
}

impl CountingCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryCacheStore::new(&CacheConfig::default()),
            gets: AtomicUsize::new(0),
            sets: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
        })
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(CacheError::unavailable("connection reset"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheStore for CountingCache {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        self.check()?;
        self.inner.delete_prefix(prefix).await
    }
}

/// Cache store whose lookups never answer.
pub struct StallingCache;

#[async_trait]
impl CacheStore for StallingCache {
    async fn get(&self, _key: &str) -> Result<Option<Bytes>, CacheError> {
        std::future::pending().await
    }

    async fn set(&self, _key: &str, _value: Bytes, _ttl: Duration) -> Result<(), CacheError> {
        std::future::pending().await
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        std::future::pending().await
    }

    async fn delete_prefix(&self, _prefix: &str) -> Result<u64, CacheError> {
        std::future::pending().await
    }
}

/// Cache store whose prefix deletes take `delay`, like a keyspace scan.
pub struct SlowPrefixCache {
    inner: MemoryCacheStore,
    delay: Duration,
}

impl SlowPrefixCache {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryCacheStore::new(&CacheConfig::default()),
            delay,
        })
    }
}

#[async_trait]
impl CacheStore for SlowPrefixCache {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.delete(key).await
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete_prefix(prefix).await
    }
}

pub struct StaticHealth(pub bool);

#[async_trait]
impl HealthCheck for StaticHealth {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.0 {
            Ok(())
        } else {
            Err(RepoError::Timeout)
        }
    }
}

pub fn read_through<R: Materialize>(
    repo: &Arc<MemoryRepo<R>>,
    cache: Option<Arc<dyn CacheStore>>,
) -> ReadThrough<R> {
    ReadThrough::new(repo.clone(), cache, CacheConfig::default(), DEADLINE)
}

pub fn record_service<R: Materialize>(
    repo: &Arc<MemoryRepo<R>>,
    cache: Option<Arc<dyn CacheStore>>,
) -> RecordService<R> {
    RecordService::new(Arc::new(read_through(repo, cache)), repo.clone())
}

/// Everything an HTTP test needs to drive and inspect the API.
pub struct TestApp {
    pub state: ApiState,
    pub events: Arc<MemoryRepo<EventRecord>>,
    pub functions: Arc<MemoryRepo<FunctionRecord>>,
    pub cache: Arc<CountingCache>,
    pub user_id: Uuid,
}

pub fn test_app(admin_token: Option<&str>, healthy: bool) -> TestApp {
    let events = MemoryRepo::<EventRecord>::new();
    let functions = MemoryRepo::<FunctionRecord>::new();
    let cache = CountingCache::new();
    let user_id = Uuid::new_v4();
    let shared: Arc<dyn CacheStore> = cache.clone();

    let state = ApiState {
        events: record_service(&events, Some(shared.clone())),
        functions: record_service(&functions, Some(shared)),
        admin: AdminService::new(
            MemoryUsers::with_user(user_id, "ada"),
            events.clone(),
            functions.clone(),
        ),
        health: Arc::new(StaticHealth(healthy)),
        admin_token: admin_token.map(Arc::from),
    };

    TestApp {
        state,
        events,
        functions,
        cache,
        user_id,
    }
}
