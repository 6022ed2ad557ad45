//! The cart manager: in-memory state plus best-effort persistence.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use gomarket_store::{Cache, StoreError};
use tokio::runtime::Handle;
use tokio::sync::{watch, Mutex};
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::config::CartConfig;
use crate::error::CartError;
use crate::ids::ProductId;
use crate::item::ProductDescriptor;
use crate::state::CartState;
use crate::subscription::CartSubscription;

/// Outcome of the initial snapshot read.
#[derive(Debug, Clone, PartialEq)]
enum LoadStatus {
    Pending,
    Loaded,
    Corrupt(String),
}

/// A published mutation, kept until the initial load so it can be replayed
/// on top of the restored cart.
#[derive(Debug, Clone)]
enum Mutation {
    Add(ProductDescriptor),
    Increment(ProductId),
    Decrement(ProductId),
}

impl Mutation {
    fn name(&self) -> &'static str {
        match self {
            Mutation::Add(_) => "add",
            Mutation::Increment(_) => "increment",
            Mutation::Decrement(_) => "decrement",
        }
    }

    fn product(&self) -> &ProductId {
        match self {
            Mutation::Add(descriptor) => &descriptor.id,
            Mutation::Increment(id) | Mutation::Decrement(id) => id,
        }
    }

    fn apply(&self, state: &CartState) -> CartState {
        match self {
            Mutation::Add(descriptor) => state.with_added(descriptor.clone()),
            Mutation::Increment(id) => state.with_incremented(id),
            Mutation::Decrement(id) => state.with_decremented(id),
        }
    }
}

/// Single source of truth for the cart.
///
/// Mutations update and publish the in-memory state synchronously, then
/// spawn a task that writes the snapshot to the store. Callers never wait
/// for that write; failures are logged and dropped. Use [`flush`](Self::flush)
/// when a host needs the store to have caught up (e.g. before exit).
///
/// Mutations made before the stored snapshot has loaded are replayed on top
/// of it once it arrives, and nothing is written until then.
///
/// Intended for one logical writer. Clones share the same cart.
///
/// # Example
///
/// ```rust,ignore
/// let cache = Cache::new(FileStore::open(".gomarket/store").await?);
/// let cart = CartManager::open(cache, &CartConfig::default()).await?;
///
/// cart.add(ProductDescriptor::new("1", "Shoe", "https://img/shoe.png", 10.0));
/// cart.increment(&ProductId::new("1"));
///
/// assert_eq!(cart.state().total_quantity(), 2);
/// ```
#[derive(Clone)]
pub struct CartManager {
    inner: Arc<Inner>,
}

struct Inner {
    cache: Cache,
    key: String,
    state: watch::Sender<Arc<CartState>>,
    /// Generation of the newest published mutation (0 = none yet).
    generation: AtomicU64,
    /// Generation of the newest write attempted against the store.
    persisted: Mutex<u64>,
    /// Mutations published while the load is pending; `None` once loaded.
    pending: StdMutex<Option<Vec<Mutation>>>,
    load: watch::Receiver<LoadStatus>,
    flushing: Mutex<()>,
    runtime: Handle,
    tasks: TaskTracker,
}

impl Inner {
    fn pending(&self) -> MutexGuard<'_, Option<Vec<Mutation>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CartManager {
    /// Create a manager and start loading the persisted snapshot in the
    /// background.
    ///
    /// The state is empty until the load completes. Must be called from
    /// within a Tokio runtime; the runtime is used for all background work.
    pub fn new(cache: Cache, config: &CartConfig) -> Result<Self, CartError> {
        let runtime = Handle::try_current().map_err(|_| CartError::NoRuntime)?;
        let (state, _) = watch::channel(Arc::new(CartState::new()));
        let (load_tx, load_rx) = watch::channel(LoadStatus::Pending);

        let manager = Self {
            inner: Arc::new(Inner {
                cache,
                key: config.snapshot_key(),
                state,
                generation: AtomicU64::new(0),
                persisted: Mutex::new(0),
                pending: StdMutex::new(Some(Vec::new())),
                load: load_rx,
                flushing: Mutex::new(()),
                runtime,
                tasks: TaskTracker::new(),
            }),
        };

        let inner = Arc::clone(&manager.inner);
        manager
            .inner
            .tasks
            .spawn_on(load_snapshot(inner, load_tx), &manager.inner.runtime);

        Ok(manager)
    }

    /// Create a manager and wait for the persisted snapshot to load.
    ///
    /// Fails with [`CartError::CorruptSnapshot`] if the stored snapshot
    /// cannot be decoded.
    pub async fn open(cache: Cache, config: &CartConfig) -> Result<Self, CartError> {
        let manager = Self::new(cache, config)?;
        manager.ready().await?;
        Ok(manager)
    }

    /// Wait for the initial load to finish.
    ///
    /// A missing snapshot or a failed read both count as a successful load of
    /// an empty cart.
    pub async fn ready(&self) -> Result<(), CartError> {
        let mut load = self.inner.load.clone();
        let status = load
            .wait_for(|s| *s != LoadStatus::Pending)
            .await
            .map_err(|_| CartError::LoadAborted)?
            .clone();

        match status {
            LoadStatus::Corrupt(reason) => Err(CartError::CorruptSnapshot {
                key: self.inner.key.clone(),
                reason,
            }),
            _ => Ok(()),
        }
    }

    /// Current cart contents.
    pub fn state(&self) -> Arc<CartState> {
        Arc::clone(&self.inner.state.borrow())
    }

    /// Register an observer of cart changes.
    pub fn subscribe(&self) -> CartSubscription {
        CartSubscription::new(self.inner.state.subscribe())
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.state.receiver_count()
    }

    /// Store key the snapshot is written under.
    pub fn snapshot_key(&self) -> &str {
        &self.inner.key
    }

    /// Add one unit of a product, refreshing its title, image and price.
    pub fn add(&self, descriptor: ProductDescriptor) {
        self.apply(Mutation::Add(descriptor));
    }

    /// Add one unit to an existing line. Unknown ids change nothing but still
    /// re-persist the cart.
    pub fn increment(&self, id: &ProductId) {
        self.apply(Mutation::Increment(id.clone()));
    }

    /// Remove one unit from a line; a line at quantity 1 is removed. Unknown
    /// ids change nothing but still re-persist the cart.
    pub fn decrement(&self, id: &ProductId) {
        self.apply(Mutation::Decrement(id.clone()));
    }

    /// Wait until every persistence write spawned so far has finished.
    ///
    /// Concurrent calls are serialized.
    pub async fn flush(&self) {
        let _flushing = self.inner.flushing.lock().await;
        let tasks = &self.inner.tasks;
        tasks.close();
        tasks.wait().await;
        tasks.reopen();
    }

    fn apply(&self, mutation: Mutation) {
        let op = mutation.name();
        let product = mutation.product().clone();
        let mut generation = 0;
        let mut items = 0;

        // Publish, generation bump and replay bookkeeping happen under the
        // channel lock so the initial load observes them atomically.
        self.inner.state.send_modify(|current| {
            let updated = mutation.apply(&**current);
            generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            items = updated.len();
            *current = Arc::new(updated);

            if let Some(pending) = self.inner.pending().as_mut() {
                pending.push(mutation);
            }
        });

        debug!(op, product = %product, generation, items, "cart updated");

        let inner = Arc::clone(&self.inner);
        self.inner
            .tasks
            .spawn_on(persist(inner, generation), &self.inner.runtime);
    }
}

impl std::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("key", &self.inner.key)
            .field("generation", &self.inner.generation.load(Ordering::SeqCst))
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

async fn load_snapshot(inner: Arc<Inner>, status: watch::Sender<LoadStatus>) {
    let key = inner.key.as_str();
    let mut outcome = LoadStatus::Loaded;

    let restored = match inner.cache.get::<CartState>(key).await {
        Ok(Some(state)) => Some(state),
        Ok(None) => {
            debug!(key, "no stored cart");
            None
        }
        Err(StoreError::SerializeError(e)) => {
            error!(key, error = %e, "stored cart is not a valid snapshot");
            outcome = LoadStatus::Corrupt(e.to_string());
            None
        }
        Err(e) => {
            warn!(key, error = %e, "failed to read stored cart, starting empty");
            None
        }
    };

    let mut replayed = 0;
    let applied = inner.state.send_if_modified(|current| {
        let pending = inner.pending().take().unwrap_or_default();
        let Some(restored) = restored else {
            return false;
        };
        replayed = pending.len();
        let state = pending
            .iter()
            .fold(restored, |state, mutation| mutation.apply(&state));
        *current = Arc::new(state);
        true
    });

    if applied {
        info!(key, items = inner.state.borrow().len(), replayed, "restored cart");
    }
    status.send_replace(outcome);
}

async fn persist(inner: Arc<Inner>, generation: u64) {
    let mut load = inner.load.clone();
    if load.wait_for(|s| *s != LoadStatus::Pending).await.is_err() {
        warn!(generation, "cart load aborted, writing anyway");
    }

    let mut persisted = inner.persisted.lock().await;
    let (latest, snapshot) = {
        let current = inner.state.borrow();
        (inner.generation.load(Ordering::SeqCst), Arc::clone(&current))
    };
    if *persisted >= latest {
        debug!(generation, latest = *persisted, "skipping stale cart write");
        return;
    }
    *persisted = latest;

    match inner.cache.set(&inner.key, snapshot.as_ref()).await {
        Ok(()) => debug!(key = %inner.key, generation = latest, "cart persisted"),
        Err(e) => error!(key = %inner.key, generation = latest, error = %e, "failed to persist cart"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomarket_store::{KeyValueStore, MemoryStore};

    fn shoe() -> ProductDescriptor {
        ProductDescriptor::new("1", "Shoe", "u", 10.0)
    }

    fn quantities(state: &CartState) -> Vec<(String, u32)> {
        state
            .iter()
            .map(|i| (i.id.as_str().to_string(), i.quantity))
            .collect()
    }

    async fn stored(store: &MemoryStore) -> Option<CartState> {
        let bytes = store.peek("@GoMarketPlace:products").await?;
        Some(serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_new_outside_runtime() {
        let result = CartManager::new(Cache::new(MemoryStore::new()), &CartConfig::default());
        assert!(matches!(result, Err(CartError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_starts_empty_without_snapshot() {
        let cart = CartManager::open(Cache::new(MemoryStore::new()), &CartConfig::default())
            .await
            .unwrap();
        assert!(cart.state().is_empty());
    }

    #[tokio::test]
    async fn test_scenario_add_to_empty() {
        let store = Arc::new(MemoryStore::new());
        let cart = CartManager::open(Cache::from_shared(store.clone()), &CartConfig::default())
            .await
            .unwrap();

        cart.add(shoe());
        assert_eq!(quantities(&cart.state()), vec![("1".to_string(), 1)]);

        cart.flush().await;
        assert_eq!(stored(&store).await.unwrap(), *cart.state());
    }

    #[tokio::test]
    async fn test_scenario_add_again() {
        let cart = CartManager::open(Cache::new(MemoryStore::new()), &CartConfig::default())
            .await
            .unwrap();
        cart.add(shoe());
        cart.add(shoe());
        assert_eq!(quantities(&cart.state()), vec![("1".to_string(), 2)]);
    }

    #[tokio::test]
    async fn test_scenario_decrement_to_one_then_removed() {
        let cart = CartManager::open(Cache::new(MemoryStore::new()), &CartConfig::default())
            .await
            .unwrap();
        let id = ProductId::new("1");
        cart.add(shoe());
        cart.add(shoe());

        cart.decrement(&id);
        assert_eq!(quantities(&cart.state()), vec![("1".to_string(), 1)]);

        cart.decrement(&id);
        assert!(cart.state().is_empty());
    }

    #[tokio::test]
    async fn test_scenario_increment_preserves_order() {
        let cart = CartManager::open(Cache::new(MemoryStore::new()), &CartConfig::default())
            .await
            .unwrap();
        cart.add(shoe());
        cart.add(ProductDescriptor::new("2", "Sock", "v", 2.0));

        cart.increment(&ProductId::new("2"));
        assert_eq!(
            quantities(&cart.state()),
            vec![("1".to_string(), 1), ("2".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn test_unknown_id_still_persists() {
        let store = Arc::new(MemoryStore::new());
        let cart = CartManager::open(Cache::from_shared(store.clone()), &CartConfig::default())
            .await
            .unwrap();

        cart.increment(&ProductId::new("404"));
        cart.flush().await;
        cart.decrement(&ProductId::new("404"));
        cart.flush().await;

        assert!(cart.state().is_empty());
        assert_eq!(store.write_count(), 2);
        assert_eq!(stored(&store).await.unwrap(), CartState::new());
    }

    #[tokio::test]
    async fn test_subscriber_sees_each_publish() {
        let cart = CartManager::open(Cache::new(MemoryStore::new()), &CartConfig::default())
            .await
            .unwrap();
        let mut sub = cart.subscribe();
        assert_eq!(cart.subscriber_count(), 1);

        cart.add(shoe());
        let seen = sub.changed().await.unwrap();
        assert_eq!(seen.total_quantity(), 1);

        cart.increment(&ProductId::new("404"));
        assert!(sub.has_changed());

        sub.unsubscribe();
        assert_eq!(cart.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_restores_snapshot() {
        let json = r#"[{"id":"9","title":"Cap","image_url":"c","price":7.5,"quantity":4}]"#;
        let store = MemoryStore::with_entry("@GoMarketPlace:products", json);
        let cart = CartManager::open(Cache::new(store), &CartConfig::default())
            .await
            .unwrap();

        let item = cart.state().get(&ProductId::new("9")).cloned().unwrap();
        assert_eq!(item.quantity, 4);
        assert_eq!(item.price, 7.5);
    }

    #[tokio::test]
    async fn test_read_failure_starts_empty() {
        let store = MemoryStore::with_entry("@GoMarketPlace:products", "[]");
        store.fail_reads(true);
        let cart = CartManager::open(Cache::new(store), &CartConfig::default())
            .await
            .unwrap();
        assert!(cart.state().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_surfaces_on_ready() {
        let store = MemoryStore::with_entry("@GoMarketPlace:products", "{oops");
        let cart = CartManager::new(Cache::new(store), &CartConfig::default()).unwrap();

        let result = cart.ready().await;
        assert!(matches!(result, Err(CartError::CorruptSnapshot { .. })));
        assert!(cart.state().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes(true);
        let cart = CartManager::open(Cache::from_shared(store.clone()), &CartConfig::default())
            .await
            .unwrap();

        cart.add(shoe());
        cart.flush().await;

        assert_eq!(cart.state().len(), 1);
        assert_eq!(store.write_count(), 0);
        assert!(store.get("@GoMarketPlace:products").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_flushes_complete() {
        let store = Arc::new(MemoryStore::new());
        let cart = CartManager::open(Cache::from_shared(store.clone()), &CartConfig::default())
            .await
            .unwrap();
        let (first, second) = (cart.clone(), cart.clone());

        cart.add(shoe());
        let flushed = tokio::time::timeout(std::time::Duration::from_secs(5), async {
            tokio::join!(first.flush(), second.flush());
        })
        .await;

        assert!(flushed.is_ok());
        assert_eq!(stored(&store).await.unwrap(), *cart.state());
    }

    #[tokio::test]
    async fn test_custom_key() {
        let store = Arc::new(MemoryStore::new());
        let config = CartConfig {
            namespace: "@Test".to_string(),
            key: "cart".to_string(),
        };
        let cart = CartManager::open(Cache::from_shared(store.clone()), &config)
            .await
            .unwrap();
        assert_eq!(cart.snapshot_key(), "@Test:cart");

        cart.add(shoe());
        cart.flush().await;
        assert!(store.peek("@Test:cart").await.is_some());
    }
}
