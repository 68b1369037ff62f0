//! Resolution cache identity, lifetime and concurrency behaviour.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use certstore_roles::{
    CertSelector, CertificateCollection, CertificateView, KeyUsageBit, MemoryCertStore,
    QueryError, ResolutionCache, ResolveError,
};
use common::{store, CertSpec};

fn ra_specs() -> Vec<CertSpec> {
    vec![
        CertSpec::ca(1, Some(0)),
        CertSpec::end_entity(
            2,
            &[KeyUsageBit::DigitalSignature, KeyUsageBit::KeyEncipherment],
        ),
    ]
}

/// Collection that counts queries and can be switched into failure.
struct CountingCollection {
    inner: MemoryCertStore,
    queries: AtomicUsize,
    failing: bool,
}

impl CountingCollection {
    fn new(specs: &[CertSpec], failing: bool) -> Self {
        Self {
            inner: MemoryCertStore::new(specs.iter().map(CertSpec::view).collect()),
            queries: AtomicUsize::new(0),
            failing,
        }
    }
}

impl CertificateCollection for CountingCollection {
    fn query(&self, selector: &CertSelector) -> Result<Vec<Arc<CertificateView>>, QueryError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(QueryError::new("store offline"));
        }
        self.inner.query(selector)
    }
}

#[test]
fn same_collection_returns_same_role_set() {
    let cache = ResolutionCache::<MemoryCertStore>::new();
    let collection = store(&ra_specs());

    let first = cache.get_or_resolve(&collection).unwrap();
    let second = cache.get_or_resolve(&collection).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn cached_lookup_does_not_query_again() {
    let cache = ResolutionCache::<CountingCollection>::new();
    let collection = Arc::new(CountingCollection::new(&ra_specs(), false));

    cache.get_or_resolve(&collection).unwrap();
    let after_first = collection.queries.load(Ordering::SeqCst);
    assert!(after_first > 0);

    cache.get_or_resolve(&collection).unwrap();
    assert_eq!(collection.queries.load(Ordering::SeqCst), after_first);
}

#[test]
fn identical_content_gets_independent_entries() {
    let cache = ResolutionCache::<MemoryCertStore>::new();
    let left = store(&ra_specs());
    let right = store(&ra_specs());

    let left_roles = cache.get_or_resolve(&left).unwrap();
    let right_roles = cache.get_or_resolve(&right).unwrap();

    assert!(!Arc::ptr_eq(&left_roles, &right_roles));
    assert_eq!(
        left_roles.summary(),
        right_roles.summary(),
        "same content resolves to structurally equal roles"
    );
    assert_eq!(cache.len(), 2);
}

#[test]
fn clones_of_the_same_arc_share_the_entry() {
    let cache = ResolutionCache::<MemoryCertStore>::new();
    let collection = store(&ra_specs());
    let alias = Arc::clone(&collection);

    let a = cache.get_or_resolve(&collection).unwrap();
    let b = cache.get_or_resolve(&alias).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn entries_disappear_with_their_collection() {
    let cache = ResolutionCache::<MemoryCertStore>::new();
    let kept = store(&ra_specs());
    cache.get_or_resolve(&kept).unwrap();

    {
        let transient = store(&ra_specs());
        cache.get_or_resolve(&transient).unwrap();
        assert_eq!(cache.len(), 2);
    }

    // Any access prunes entries of dropped collections.
    cache.get_or_resolve(&kept).unwrap();
    assert_eq!(cache.len(), 1);
}

#[test]
fn role_set_outlives_collection_without_keeping_it() {
    let cache = ResolutionCache::<MemoryCertStore>::new();
    let collection = store(&ra_specs());
    let weak = Arc::downgrade(&collection);
    let roles = cache.get_or_resolve(&collection).unwrap();

    drop(collection);
    assert!(weak.upgrade().is_none());
    assert!(roles.issuer().is_ca());
}

#[test]
fn failures_are_not_cached() {
    let cache = ResolutionCache::<CountingCollection>::new();
    let collection = Arc::new(CountingCollection::new(&ra_specs(), true));

    let err = cache.get_or_resolve(&collection).unwrap_err();
    assert!(matches!(err, ResolveError::Query(_)));
    assert!(cache.get(&collection).is_none());

    let before = collection.queries.load(Ordering::SeqCst);
    cache.get_or_resolve(&collection).unwrap_err();
    assert!(collection.queries.load(Ordering::SeqCst) > before);
}

#[test]
fn not_found_is_reported_through_cache() {
    let cache = ResolutionCache::<MemoryCertStore>::new();
    let collection = store(&[CertSpec::end_entity(2, &[KeyUsageBit::DigitalSignature])]);
    let err = cache.get_or_resolve(&collection).unwrap_err();
    assert!(matches!(err, ResolveError::NotFound(_)));
}

#[test]
fn trait_object_collections_are_supported() {
    let cache: ResolutionCache = ResolutionCache::new();
    let collection: Arc<dyn CertificateCollection> = store(&ra_specs());

    let first = cache.get_or_resolve(&collection).unwrap();
    let second = cache.get_or_resolve(&collection).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(cache.invalidate(&collection));
    assert!(cache.is_empty());
}

#[test]
fn concurrent_callers_observe_one_role_set() {
    const THREADS: usize = 8;

    let cache = Arc::new(ResolutionCache::<CountingCollection>::new());
    let collection = Arc::new(CountingCollection::new(&ra_specs(), false));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let collection = Arc::clone(&collection);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.get_or_resolve(&collection).unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for roles in &results[1..] {
        assert!(Arc::ptr_eq(&results[0], roles));
    }

    // One resolution: inventory, recipient, signer and issuer queries.
    assert_eq!(collection.queries.load(Ordering::SeqCst), 4);
}
