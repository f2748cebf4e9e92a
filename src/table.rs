//! Table: open addressing over a prime-sized slot array.
//!
//! Layout
//! - One `Vec<Slot>`; each slot is empty, a tombstone, or an occupied
//!   `(hash, key, value)` triple. The hash is computed once on insert and
//!   kept, so growth never calls back into user strategies.
//! - Probing is quadratic: attempt `c` looks at `(hash + c²) mod size`
//!   for `c` in `0..size`. With a prime size that visits `(size + 1) / 2`
//!   distinct slots.
//!
//! Growth
//! - Every `put` first checks `(len + tombstones + 1) / size`. At 0.7 or
//!   above the store is rebuilt at the smallest prime `p` above the current
//!   size with `len / p <= 0.5`, tombstones dropped.
//! - If `len / size` is already at most 0.5, the tombstones alone crossed
//!   the threshold and the store is rebuilt at the same size instead.
//! - The rebuild fills a fresh store and swaps it in with one assignment.
//!   The fresh store sits at most half full, which is below the growth
//!   threshold, so rebuilding can never recurse.

use core::mem;

use crate::diag::{invariant_broken, misuse};
use crate::prime::{next_prime, prime_at_least};
use crate::reentrancy::ReentryCheck;
use crate::strategy::{Djb2, IdentityEq, KeyEq, KeyHash, Word};

/// Capacity used when a table is created with capacity 0.
pub const DEFAULT_CAPACITY: usize = 17;

/// Growth threshold on the projected load factor, as `NUM / DEN`.
const HIGH_NUM: usize = 7;
const HIGH_DEN: usize = 10;

/// Load factor a rebuilt store must reach, as `NUM / DEN`.
const TARGET_NUM: usize = 1;
const TARGET_DEN: usize = 2;

// Reinsertion into a rebuilt store must stay under the growth threshold.
const _: () = assert!(TARGET_NUM * HIGH_DEN < HIGH_NUM * TARGET_DEN);

/// Load factor above which `put` grows the table.
pub const MAX_LOAD_FACTOR: f64 = HIGH_NUM as f64 / HIGH_DEN as f64;

/// Load factor a table is brought down to when it grows.
pub const TARGET_LOAD_FACTOR: f64 = TARGET_NUM as f64 / TARGET_DEN as f64;

#[derive(Debug)]
enum Slot<K, V> {
    Empty,
    Deleted,
    Occupied { hash: u64, key: K, value: V },
}

/// Quadratic probe positions for one hash.
struct Probe {
    pos: usize,
    attempt: usize,
    size: usize,
}

impl Probe {
    fn new(hash: u64, size: usize) -> Self {
        Self {
            pos: (hash % size as u64) as usize,
            attempt: 0,
            size,
        }
    }
}

impl Iterator for Probe {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.attempt == self.size {
            return None;
        }
        let pos = self.pos;
        // (c + 1)² - c² = 2c + 1
        let step = (2 * self.attempt + 1) % self.size;
        self.pos = (self.pos + step) % self.size;
        self.attempt += 1;
        Some(pos)
    }
}

enum Insert<K, V> {
    Added,
    Replaced(V),
    Exhausted(K, V),
}

/// Slot storage plus its counters. Strategies live on `Table`.
#[derive(Debug)]
struct Store<K, V> {
    slots: Vec<Slot<K, V>>,
    len: usize,
    deleted: usize,
}

impl<K, V> Store<K, V> {
    fn with_size(size: usize) -> Self {
        let mut slots = Vec::with_capacity(size);
        slots.resize_with(size, || Slot::Empty);
        Self {
            slots,
            len: 0,
            deleted: 0,
        }
    }

    #[inline]
    fn size(&self) -> usize {
        self.slots.len()
    }

    fn find<E>(&self, hash: u64, key: &K, eq: &E) -> Option<usize>
    where
        E: KeyEq<K>,
    {
        for idx in Probe::new(hash, self.size()) {
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Deleted => {}
                Slot::Occupied { hash: h, key: k, .. } => {
                    if *h == hash && KeyEq::eq(eq, k, key) {
                        return Some(idx);
                    }
                }
            }
        }
        None
    }

    /// Overwrite a matching key or claim a free slot.
    ///
    /// The first tombstone on the probe path is reused, but only once the
    /// path has been searched far enough to rule out a live match.
    fn insert<E>(&mut self, hash: u64, key: K, value: V, eq: &E) -> Insert<K, V>
    where
        E: KeyEq<K>,
    {
        let mut reuse = None;
        let mut vacant = None;
        for idx in Probe::new(hash, self.size()) {
            match &mut self.slots[idx] {
                Slot::Empty => {
                    vacant = Some(idx);
                    break;
                }
                Slot::Deleted => {
                    reuse.get_or_insert(idx);
                }
                Slot::Occupied {
                    hash: h,
                    key: k,
                    value: v,
                } => {
                    if *h == hash && KeyEq::eq(eq, k, &key) {
                        return Insert::Replaced(mem::replace(v, value));
                    }
                }
            }
        }

        let Some(idx) = reuse.or(vacant) else {
            return Insert::Exhausted(key, value);
        };
        if matches!(self.slots[idx], Slot::Deleted) {
            self.deleted -= 1;
        }
        self.slots[idx] = Slot::Occupied { hash, key, value };
        self.len += 1;
        Insert::Added
    }

    /// Place a key known to be absent into a store without tombstones.
    fn insert_unique(&mut self, hash: u64, key: K, value: V) -> bool {
        let free = Probe::new(hash, self.size()).find(|&idx| matches!(self.slots[idx], Slot::Empty));
        match free {
            Some(idx) => {
                self.slots[idx] = Slot::Occupied { hash, key, value };
                self.len += 1;
                true
            }
            None => false,
        }
    }

    fn take(&mut self, idx: usize) -> Option<V> {
        match mem::replace(&mut self.slots[idx], Slot::Deleted) {
            Slot::Occupied { value, .. } => {
                self.len -= 1;
                self.deleted += 1;
                Some(value)
            }
            other => {
                self.slots[idx] = other;
                None
            }
        }
    }

    fn needs_growth(&self) -> bool {
        let projected = self.len + self.deleted + 1;
        projected * HIGH_DEN >= HIGH_NUM * self.size()
    }

    /// Live entries alone already sit at the target load, and one more
    /// would stay under the threshold: tombstones are the only pressure.
    fn purge_suffices(&self) -> bool {
        let size = self.size();
        self.len * TARGET_DEN <= TARGET_NUM * size && (self.len + 1) * HIGH_DEN < HIGH_NUM * size
    }

    /// Make room if the next insert would cross the load threshold.
    ///
    /// When tombstones are what crossed it, the store is rebuilt at its
    /// current size instead of growing, so put/remove churn over a stable
    /// key count keeps a stable capacity.
    fn maybe_grow(&mut self) {
        if !self.needs_growth() {
            return;
        }
        if self.purge_suffices() {
            self.rebuild(self.size());
        } else {
            self.grow();
        }
    }

    /// Rebuild at the smallest prime above the current size that brings
    /// the live entries to the target load.
    ///
    /// Each candidate is compared against the pre-growth length, so one
    /// prime step is not always enough.
    fn grow(&mut self) {
        let mut size = self.size() as u64;
        loop {
            size = next_prime(size).expect("table capacity overflow");
            if (self.len as u64) * (TARGET_DEN as u64) <= (TARGET_NUM as u64) * size {
                break;
            }
        }
        let size = usize::try_from(size).expect("table capacity overflow");
        self.rebuild(size);
    }

    /// Move every live entry into a fresh store of `size` slots, dropping
    /// tombstones. `size` must hold `len` at or below the target load.
    fn rebuild(&mut self, size: usize) {
        let mut fresh = Store::with_size(size);
        for slot in mem::take(&mut self.slots) {
            if let Slot::Occupied { hash, key, value } = slot {
                let placed = fresh.insert_unique(hash, key, value);
                debug_assert!(placed, "rebuilt store at size {} rejected an entry", size);
            }
        }
        debug_assert_eq!(fresh.len, self.len, "entries lost while rebuilding");
        *self = fresh;
    }
}

/// Round a requested capacity to a usable prime size.
fn initial_size(capacity: usize) -> usize {
    if capacity == 0 {
        return DEFAULT_CAPACITY;
    }
    prime_at_least(capacity as u64)
        .and_then(|p| usize::try_from(p).ok())
        .expect("table capacity overflow")
}

/// A located entry, borrowed from its table.
#[derive(Debug)]
pub struct Bucket<'a, K, V> {
    index: usize,
    key: &'a K,
    value: &'a V,
}

impl<'a, K, V> Bucket<'a, K, V> {
    /// Slot index of the entry. Only meaningful until the table changes.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn key(&self) -> &'a K {
        self.key
    }

    pub fn value(&self) -> &'a V {
        self.value
    }
}

/// Open-addressing hash table with caller-supplied key strategies.
///
/// `E` decides key equality and `H` hashes keys; both default to identity
/// strategies for fixed-width [`Word`] keys. Keys and values are stored by
/// value. When they are references, raw pointers or arena handles the table
/// never touches what they point to.
///
/// Capacity is always prime. After any `put` returns, `len / capacity` is
/// below [`MAX_LOAD_FACTOR`].
pub struct Table<K, V, E = IdentityEq, H = Djb2> {
    store: Store<K, V>,
    eq: E,
    hash: H,
    reentry: ReentryCheck,
}

impl<K: Word, V> Table<K, V> {
    /// Empty table of [`DEFAULT_CAPACITY`] with the default strategies.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Empty table with the default strategies. Capacity 0 selects
    /// [`DEFAULT_CAPACITY`]; anything else is rounded up to a prime.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_strategies(capacity, IdentityEq, Djb2)
    }
}

impl<K: Word, V> Default for Table<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Word, V, E: KeyEq<K>> Table<K, V, E, Djb2> {
    /// Custom equality, default hash.
    pub fn with_eq(capacity: usize, eq: E) -> Self {
        Self::with_strategies(capacity, eq, Djb2)
    }
}

impl<K: Word, V, H: KeyHash<K>> Table<K, V, IdentityEq, H> {
    /// Default equality, custom hash.
    pub fn with_hash(capacity: usize, hash: H) -> Self {
        Self::with_strategies(capacity, IdentityEq, hash)
    }
}

impl<K, V, E, H> Table<K, V, E, H>
where
    E: KeyEq<K>,
    H: KeyHash<K>,
{
    /// Empty table with both strategies supplied.
    pub fn with_strategies(capacity: usize, eq: E, hash: H) -> Self {
        Self {
            store: Store::with_size(initial_size(capacity)),
            eq,
            hash,
            reentry: ReentryCheck::new(),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.store.len
    }

    pub fn is_empty(&self) -> bool {
        self.store.len == 0
    }

    /// Number of slots. Always prime.
    pub fn capacity(&self) -> usize {
        self.store.size()
    }

    pub fn load_factor(&self) -> f64 {
        self.store.len as f64 / self.store.size() as f64
    }

    /// Insert or overwrite. Returns the previous value for an equal key.
    ///
    /// The growth check runs before every insert, including ones that end
    /// up overwriting.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.reentry.enter();
        self.store.maybe_grow();
        let hash = KeyHash::hash(&self.hash, &key);
        match self.store.insert(hash, key, value, &self.eq) {
            Insert::Added => None,
            Insert::Replaced(old) => Some(old),
            Insert::Exhausted(key, value) => {
                misuse!(
                    "probe sequence for hash {:#x} exhausted at capacity {}; growing early",
                    hash,
                    self.store.size()
                );
                // A rebuilt store is at most half full, so every key has a
                // free slot within its first (size + 1) / 2 probes.
                self.store.grow();
                match self.store.insert(hash, key, value, &self.eq) {
                    Insert::Added => None,
                    Insert::Replaced(old) => Some(old),
                    Insert::Exhausted(..) => {
                        debug_assert!(false, "no free slot after growing to {}", self.store.size());
                        invariant_broken!(
                            "dropped insert: no free slot after growing to {}",
                            self.store.size()
                        );
                        None
                    }
                }
            }
        }
    }

    fn find_index(&self, key: &K) -> Option<usize> {
        let hash = KeyHash::hash(&self.hash, key);
        self.store.find(hash, key, &self.eq)
    }

    /// Locate the entry for `key`.
    pub fn find(&self, key: &K) -> Option<Bucket<'_, K, V>> {
        let _g = self.reentry.enter();
        let index = self.find_index(key)?;
        match &self.store.slots[index] {
            Slot::Occupied { key, value, .. } => Some(Bucket { index, key, value }),
            _ => None,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let _g = self.reentry.enter();
        let index = self.find_index(key)?;
        match &self.store.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let _g = self.reentry.enter();
        let hash = KeyHash::hash(&self.hash, key);
        let index = self.store.find(hash, key, &self.eq)?;
        match &mut self.store.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        let _g = self.reentry.enter();
        self.find_index(key).is_some()
    }

    /// Remove `key`, leaving a tombstone. Missing keys are a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let _g = self.reentry.enter();
        let hash = KeyHash::hash(&self.hash, key);
        let index = self.store.find(hash, key, &self.eq)?;
        self.store.take(index)
    }
}

impl<K, V, E, H> core::fmt::Debug for Table<K, V, E, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Table")
            .field("len", &self.store.len)
            .field("capacity", &self.store.size())
            .field("tombstones", &self.store.deleted)
            .finish()
    }
}

#[cfg(test)]
impl<K, V, E, H> Table<K, V, E, H> {
    pub(crate) fn tombstones(&self) -> usize {
        self.store.deleted
    }

    pub(crate) fn occupied_keys(&self) -> impl Iterator<Item = &K> {
        self.store.slots.iter().filter_map(|s| match s {
            Slot::Occupied { key, .. } => Some(key),
            _ => None,
        })
    }
}
