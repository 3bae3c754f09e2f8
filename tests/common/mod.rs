#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use tower::Layer;
use visit_counter::application::services::{DevModeVisitService, VisitService};
use visit_counter::domain::entities::Visit;
use visit_counter::domain::repositories::VisitRepository;
use visit_counter::error::StoreError;
use visit_counter::infrastructure::cache::{CacheError, CacheResult, CounterCache, NullCache};
use visit_counter::infrastructure::persistence::NullVisitRepository;
use visit_counter::state::AppState;

/// In-process visit store with switchable failures.
#[derive(Default)]
pub struct InMemoryVisitRepository {
    visits: Mutex<Vec<Visit>>,
    next_id: AtomicI64,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    count_calls: AtomicUsize,
}

impl InMemoryVisitRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `n` visits.
    pub fn with_visits(n: usize) -> Self {
        let repo = Self::new();
        for i in 0..n {
            repo.push(&format!("10.0.0.{}", i + 1));
        }
        repo
    }

    /// Appends a visit behind the service's back.
    pub fn push(&self, ip: &str) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.visits
            .lock()
            .unwrap()
            .push(Visit::new(id, ip.to_string(), Utc::now()));
    }

    pub fn len(&self) -> usize {
        self.visits.lock().unwrap().len()
    }

    pub fn ips(&self) -> Vec<String> {
        self.visits
            .lock()
            .unwrap()
            .iter()
            .map(|v| v.ip_address.clone())
            .collect()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisitRepository for InMemoryVisitRepository {
    async fn create(&self, ip_address: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        self.push(ip_address);
        Ok(())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(self.len() as i64)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Visit>, StoreError> {
        let visits = self.visits.lock().unwrap();
        Ok(visits.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn health_check(&self) -> bool {
        !self.fail_reads.load(Ordering::SeqCst)
    }
}

/// In-process counter cache with switchable transport failures.
///
/// TTL is not modelled; [`InMemoryCache::expire`] drops the slot explicitly.
#[derive(Default)]
pub struct InMemoryCache {
    value: Mutex<Option<i64>>,
    failing: AtomicBool,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Option<i64> {
        *self.value.lock().unwrap()
    }

    pub fn expire(&self) {
        *self.value.lock().unwrap() = None;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> CacheResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CacheError::ConnectionError("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CounterCache for InMemoryCache {
    async fn get(&self) -> CacheResult<Option<i64>> {
        self.check()?;
        Ok(self.value())
    }

    async fn set(&self, count: i64) -> CacheResult<()> {
        self.check()?;
        *self.value.lock().unwrap() = Some(count);
        Ok(())
    }

    async fn increment(&self) -> CacheResult<i64> {
        self.check()?;
        let mut value = self.value.lock().unwrap();
        let count = value.unwrap_or(0) + 1;
        *value = Some(count);
        Ok(count)
    }

    async fn invalidate(&self) -> CacheResult<()> {
        self.check()?;
        *self.value.lock().unwrap() = None;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.check().is_ok()
    }
}

/// Backends kept by the test for inspection after requests.
pub struct TestBackends {
    pub store: Arc<InMemoryVisitRepository>,
    pub cache: Arc<InMemoryCache>,
}

pub fn create_backends() -> TestBackends {
    TestBackends {
        store: Arc::new(InMemoryVisitRepository::new()),
        cache: Arc::new(InMemoryCache::new()),
    }
}

pub fn create_service(backends: &TestBackends) -> VisitService {
    VisitService::new(backends.store.clone(), backends.cache.clone())
}

pub fn create_test_state(backends: &TestBackends) -> AppState {
    AppState::new(
        Arc::new(create_service(backends)),
        backends.store.clone(),
        backends.cache.clone(),
    )
}

pub fn create_dev_state() -> AppState {
    let store: Arc<dyn VisitRepository> = Arc::new(NullVisitRepository::new());
    let cache: Arc<dyn CounterCache> = Arc::new(NullCache::new());
    let visits = DevModeVisitService::new(VisitService::new(store.clone(), cache.clone()));

    AppState::new(Arc::new(visits), store, cache).with_dev_mode(true)
}

/// Injects a fixed peer address, as `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
