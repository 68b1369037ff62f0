//! Memoized role resolution keyed by collection identity.
//!
//! Entries hold a `Weak` reference to their collection, so the cache never
//! keeps a collection alive. Entries whose collection has been dropped are
//! pruned on every access. Two collections with identical contents are still
//! distinct keys.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::domain::collection::CertificateCollection;
use crate::domain::roles::RoleSet;
use crate::infra::error::ResolveResult;
use crate::services::role_resolver::RoleResolver;

/// Per-collection result cell. Its lock serializes check-then-populate for
/// one collection without blocking resolution of other collections.
type RoleCell = Arc<Mutex<Option<Arc<RoleSet>>>>;

struct CacheSlot<C: ?Sized> {
    collection: Weak<C>,
    roles: RoleCell,
}

impl<C: ?Sized> CacheSlot<C> {
    fn is_live(&self) -> bool {
        self.collection.strong_count() > 0
    }
}

/// Caller-owned cache of resolved role sets.
///
/// Share one instance (for example behind an `Arc` or a `static`) between
/// every caller that should see the same memoized results.
pub struct ResolutionCache<C: ?Sized + CertificateCollection = dyn CertificateCollection> {
    slots: Mutex<HashMap<usize, CacheSlot<C>>>,
}

impl<C: ?Sized + CertificateCollection> Default for ResolutionCache<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized + CertificateCollection> ResolutionCache<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached role set for `collection`, resolving it on first use.
    ///
    /// Concurrent callers on the same collection block on one another and all
    /// receive the single stored `Arc<RoleSet>`. Failures are returned to the
    /// caller and not cached.
    pub fn get_or_resolve(&self, collection: &Arc<C>) -> ResolveResult<Arc<RoleSet>> {
        let cell = self.cell_for(collection);
        let mut roles = cell.lock();
        if let Some(cached) = roles.as_ref() {
            log::trace!("Role set cache hit for collection {:#x}", identity(collection));
            return Ok(Arc::clone(cached));
        }

        log::debug!("Resolving roles for collection {:#x}", identity(collection));
        let resolved = Arc::new(RoleResolver::resolve(collection.as_ref())?);
        *roles = Some(Arc::clone(&resolved));
        Ok(resolved)
    }

    /// The cached role set for `collection`, without resolving.
    pub fn get(&self, collection: &Arc<C>) -> Option<Arc<RoleSet>> {
        let cell = {
            let slots = self.slots.lock();
            let slot = slots.get(&identity(collection))?;
            if !is_slot_for(slot, collection) {
                return None;
            }
            Arc::clone(&slot.roles)
        };
        let roles = cell.lock();
        roles.clone()
    }

    /// Drop the entry for `collection`. Returns whether one existed.
    pub fn invalidate(&self, collection: &Arc<C>) -> bool {
        let mut slots = self.slots.lock();
        let key = identity(collection);
        match slots.get(&key) {
            Some(slot) if is_slot_for(slot, collection) => {
                slots.remove(&key);
                log::debug!("Invalidated role set for collection {key:#x}");
                true
            }
            _ => false,
        }
    }

    /// Remove entries whose collection no longer exists. Returns how many
    /// were removed.
    pub fn prune(&self) -> usize {
        let mut slots = self.slots.lock();
        Self::prune_locked(&mut slots)
    }

    /// Number of entries, including ones whose collection was dropped since
    /// the last access.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    fn cell_for(&self, collection: &Arc<C>) -> RoleCell {
        let mut slots = self.slots.lock();
        Self::prune_locked(&mut slots);

        match slots.entry(identity(collection)) {
            Entry::Occupied(entry) => Arc::clone(&entry.get().roles),
            Entry::Vacant(entry) => {
                let slot = entry.insert(CacheSlot {
                    collection: Arc::downgrade(collection),
                    roles: Arc::new(Mutex::new(None)),
                });
                Arc::clone(&slot.roles)
            }
        }
    }

    fn prune_locked(slots: &mut HashMap<usize, CacheSlot<C>>) -> usize {
        let before = slots.len();
        slots.retain(|_, slot| slot.is_live());
        let removed = before - slots.len();
        if removed > 0 {
            log::debug!("Pruned {removed} role set(s) for dropped collections");
        }
        removed
    }
}

/// Allocation address of the collection. Unique among live collections.
fn identity<C: ?Sized>(collection: &Arc<C>) -> usize {
    Arc::as_ptr(collection).cast::<()>() as usize
}

fn is_slot_for<C: ?Sized>(slot: &CacheSlot<C>, collection: &Arc<C>) -> bool {
    slot.is_live() && std::ptr::addr_eq(slot.collection.as_ptr(), Arc::as_ptr(collection))
}
