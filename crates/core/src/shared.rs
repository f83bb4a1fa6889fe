//! Thread-safe handle around the shelf

use crate::entry::ShelfEntry;
use crate::shelf::Shelf;
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::Arc;

type ChangeCallback = Box<dyn Fn() + Send + Sync>;

/// Cloneable, thread-safe handle to one shelf
///
/// All mutation and read paths go through a single exclusive lock, so
/// producers on different threads serialize and a reader never observes a
/// half-applied update. The lock is held only for in-memory work:
/// `snapshot` copies the ranked entries under the lock and does its
/// existence checks after releasing it, trading a few milliseconds of
/// staleness for never blocking producers on filesystem latency.
///
/// An optional change callback fires after every mutation that altered the
/// observable sequence. It is invoked on the mutating thread, outside the
/// shelf lock, so it may call back into this handle; it is expected to only
/// queue a refresh and return.
#[derive(Clone)]
pub struct SharedShelf {
    inner: Arc<Inner>,
}

struct Inner {
    shelf: Mutex<Shelf>,
    on_change: RwLock<Option<ChangeCallback>>,
}

impl SharedShelf {
    /// Create an empty shared shelf with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                shelf: Mutex::new(Shelf::new(capacity)),
                on_change: RwLock::new(None),
            }),
        }
    }

    /// Register the change callback, replacing any previous one
    ///
    /// The shelf is fully functional with no callback registered.
    pub fn set_on_change(&self, callback: impl Fn() + Send + Sync + 'static) {
        *self.inner.on_change.write() = Some(Box::new(callback));
    }

    /// Insert or re-rank a document; see [`Shelf::upsert`]
    pub fn upsert(&self, entry: ShelfEntry) {
        let changed = self.inner.shelf.lock().upsert(entry);
        if changed {
            self.notify_changed();
        }
    }

    /// Remove the entry at exactly this path; see [`Shelf::remove`]
    pub fn remove(&self, path: &Path) {
        let changed = self.inner.shelf.lock().remove(path);
        if changed {
            self.notify_changed();
        }
    }

    /// The current ranked entries whose files still exist
    ///
    /// Entries whose backing file has vanished without a remove
    /// notification are filtered from the returned view; they stay in
    /// internal storage until displaced by eviction, a removal, or a
    /// re-scan.
    pub fn snapshot(&self) -> Vec<ShelfEntry> {
        let ranked = self.inner.shelf.lock().entries().to_vec();
        ranked.into_iter().filter(|e| e.path.exists()).collect()
    }

    /// Number of entries in internal storage, stale ones included
    pub fn len(&self) -> usize {
        self.inner.shelf.lock().len()
    }

    /// Whether internal storage holds no entries
    pub fn is_empty(&self) -> bool {
        self.inner.shelf.lock().is_empty()
    }

    /// Maximum number of entries admitted
    pub fn capacity(&self) -> usize {
        self.inner.shelf.lock().capacity()
    }

    fn notify_changed(&self) {
        // Called with the shelf lock released
        if let Some(callback) = self.inner.on_change.read().as_ref() {
            callback();
        }
    }
}
