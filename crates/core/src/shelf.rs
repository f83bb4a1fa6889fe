//! The bounded, deduplicated, rank-ordered document shelf

use crate::entry::ShelfEntry;
use std::path::Path;

/// Default number of documents kept on the shelf
pub const DEFAULT_CAPACITY: usize = 15;

/// Ordered collection of the freshest tracked documents
///
/// Entries are kept sorted by `touched_at` descending, deduplicated by file
/// name, and truncated to the capacity after every insert. Both invariants
/// hold after every mutation by construction; there is no separate repair
/// path.
///
/// Name collisions across roots are resolved by call order: the later
/// `upsert` replaces the earlier entry outright, whatever the two
/// timestamps say. A same-named file in two watched folders therefore
/// occupies a single slot, owned by whichever producer reported it last.
#[derive(Debug, Clone)]
pub struct Shelf {
    entries: Vec<ShelfEntry>,
    capacity: usize,
}

impl Shelf {
    /// Create an empty shelf holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Insert a document or move an existing one to its new rank
    ///
    /// Any entry sharing the file name is replaced. The entry is placed at
    /// its rank position (after all strictly fresher entries, so repeated
    /// equal timestamps keep their insertion order), then the tail beyond
    /// the capacity is dropped. An entry ranking below a full shelf's tail
    /// is not admitted.
    ///
    /// Returns whether the observable sequence changed.
    pub fn upsert(&mut self, entry: ShelfEntry) -> bool {
        let before = self.entries.clone();

        self.entries.retain(|e| e.name != entry.name);
        let rank = self
            .entries
            .iter()
            .position(|e| e.touched_at < entry.touched_at)
            .unwrap_or(self.entries.len());
        self.entries.insert(rank, entry);
        self.entries.truncate(self.capacity);

        self.entries != before
    }

    /// Drop the entry at exactly this path, if present
    ///
    /// Unknown paths are a no-op, not an error.
    ///
    /// Returns whether an entry was removed.
    pub fn remove(&mut self, path: &Path) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.path != path);
        self.entries.len() != before
    }

    /// The ranked entries, freshest first
    pub fn entries(&self) -> &[ShelfEntry] {
        &self.entries
    }

    /// Number of entries currently held (including ones whose backing file
    /// may no longer exist)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the shelf holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries this shelf admits
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Shelf {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn entry(path: &str, secs: u64) -> ShelfEntry {
        ShelfEntry::from_path(
            PathBuf::from(path),
            SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
        )
        .unwrap()
    }

    fn names(shelf: &Shelf) -> Vec<&str> {
        shelf.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_upsert_orders_descending() {
        let mut shelf = Shelf::default();
        shelf.upsert(entry("/a/one.pdf", 100));
        shelf.upsert(entry("/a/three.pdf", 300));
        shelf.upsert(entry("/a/two.pdf", 200));

        assert_eq!(names(&shelf), vec!["three.pdf", "two.pdf", "one.pdf"]);
    }

    #[test]
    fn test_upsert_dedups_by_name() {
        let mut shelf = Shelf::default();
        shelf.upsert(entry("/a/x.pdf", 100));
        shelf.upsert(entry("/b/y.pdf", 200));
        shelf.upsert(entry("/a/x.pdf", 300));

        // Same name promotes; the other entry keeps its rank below it
        assert_eq!(names(&shelf), vec!["x.pdf", "y.pdf"]);
        assert_eq!(
            shelf.entries()[0].touched_at,
            SystemTime::UNIX_EPOCH + Duration::from_secs(300)
        );
        assert_eq!(shelf.len(), 2);
    }

    #[test]
    fn test_upsert_same_name_across_roots_last_writer_wins() {
        let mut shelf = Shelf::default();
        shelf.upsert(entry("/desktop/report.pdf", 500));
        shelf.upsert(entry("/downloads/report.pdf", 100));

        // The later call wins even with an older timestamp
        assert_eq!(shelf.len(), 1);
        assert_eq!(shelf.entries()[0].path, PathBuf::from("/downloads/report.pdf"));
        assert_eq!(
            shelf.entries()[0].touched_at,
            SystemTime::UNIX_EPOCH + Duration::from_secs(100)
        );
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut shelf = Shelf::new(2);
        shelf.upsert(entry("/a/a.pdf", 10));
        shelf.upsert(entry("/a/b.pdf", 20));
        shelf.upsert(entry("/a/c.pdf", 30));

        assert_eq!(names(&shelf), vec!["c.pdf", "b.pdf"]);
    }

    #[test]
    fn test_overfill_drops_smallest_timestamp() {
        let k = DEFAULT_CAPACITY;
        let mut shelf = Shelf::new(k);
        // K+1 entries with strictly decreasing timestamps
        for i in 0..=k {
            shelf.upsert(entry(&format!("/a/doc{i}.pdf"), (1000 - i) as u64));
        }
        assert_eq!(shelf.len(), k);
        assert!(!names(&shelf).contains(&format!("doc{k}.pdf").as_str()));
    }

    #[test]
    fn test_upsert_below_full_tail_not_admitted() {
        let mut shelf = Shelf::new(2);
        shelf.upsert(entry("/a/a.pdf", 20));
        shelf.upsert(entry("/a/b.pdf", 30));

        let changed = shelf.upsert(entry("/a/old.pdf", 10));
        assert!(!changed);
        assert_eq!(names(&shelf), vec!["b.pdf", "a.pdf"]);
    }

    #[test]
    fn test_upsert_reports_noop_for_identical_entry() {
        let mut shelf = Shelf::default();
        assert!(shelf.upsert(entry("/a/x.pdf", 100)));
        assert!(!shelf.upsert(entry("/a/x.pdf", 100)));
        assert_eq!(shelf.len(), 1);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut shelf = Shelf::default();
        shelf.upsert(entry("/a/first.pdf", 100));
        shelf.upsert(entry("/a/second.pdf", 100));
        shelf.upsert(entry("/a/third.pdf", 100));

        assert_eq!(names(&shelf), vec!["first.pdf", "second.pdf", "third.pdf"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut shelf = Shelf::default();
        shelf.upsert(entry("/a/x.pdf", 100));

        assert!(shelf.remove(Path::new("/a/x.pdf")));
        assert!(!shelf.remove(Path::new("/a/x.pdf")));
        assert!(!shelf.remove(Path::new("/a/never-there.pdf")));
        assert!(shelf.is_empty());
    }

    #[test]
    fn test_remove_matches_path_not_name() {
        let mut shelf = Shelf::default();
        shelf.upsert(entry("/desktop/x.pdf", 100));

        // Same name, different directory: not a match
        assert!(!shelf.remove(Path::new("/downloads/x.pdf")));
        assert_eq!(shelf.len(), 1);
    }

    #[test]
    fn test_update_demotes_when_timestamp_moves_back() {
        let mut shelf = Shelf::default();
        shelf.upsert(entry("/a/x.pdf", 300));
        shelf.upsert(entry("/a/y.pdf", 200));
        shelf.upsert(entry("/a/x.pdf", 100));

        assert_eq!(names(&shelf), vec!["y.pdf", "x.pdf"]);
    }

    #[test]
    fn test_invariants_hold_under_random_churn() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut shelf = Shelf::new(DEFAULT_CAPACITY);

        for _ in 0..1000 {
            let doc = rng.gen_range(0..40);
            let secs: u64 = rng.gen_range(0..10_000);
            shelf.upsert(entry(&format!("/pool/doc{doc}.pdf"), secs));

            // Bounded
            assert!(shelf.len() <= DEFAULT_CAPACITY);
            // Sorted descending
            assert!(shelf
                .entries()
                .windows(2)
                .all(|w| w[0].touched_at >= w[1].touched_at));
            // Unique names
            let mut seen: Vec<&str> = shelf.entries().iter().map(|e| e.name.as_str()).collect();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), shelf.len());
        }
    }
}
