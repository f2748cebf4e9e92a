//! prime-hashtable: an open-addressing hash table with caller-supplied
//! key strategies, quadratic probing and prime-sized growth.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, predictable key→value table for low-level code, where
//!   the caller decides what "same key" means and how keys hash.
//! - Layers:
//!   - `prime`: exact Miller–Rabin primality and `next_prime`, used only
//!     to pick table sizes.
//!   - `strategy`: the `KeyEq`/`KeyHash` capability traits, identity and
//!     djb2 defaults for fixed-width `Word` keys, and adapters for
//!     closures and `Eq + Hash` keys.
//!   - `Table<K, V, E, H>`: prime-sized slot array, quadratic probing,
//!     tombstone deletion and load-driven growth.
//!   - `TableHandle<K, V, E, H>`: a table that may be absent, for hosts
//!     that create and destroy tables explicitly.
//!
//! Constraints
//! - Single-threaded: `Table` is `!Sync`; there is no internal locking.
//! - Capacity is always prime. After every `put`, `len / capacity < 0.7`.
//! - Every operation is a bounded scan of at most `capacity` probes.
//! - Reentrancy from a strategy into the same table panics in debug
//!   builds.
//!
//! Ownership
//! - Keys and values are stored by value. References, raw pointers and
//!   arena handles (for example `slotmap` keys) stored in a table are
//!   never dereferenced or freed by it; the caller keeps the referents
//!   alive for as long as they are stored.
//!
//! Deletion
//! - `remove` leaves a tombstone. Lookups walk past tombstones and stop
//!   at a never-used slot; inserts reuse the first tombstone on their
//!   path after ruling out a live match further along. Tombstones count
//!   toward the growth threshold and disappear on rebuild. When live
//!   entries alone fit the target load, the rebuild keeps the current
//!   size, so churn does not inflate capacity.
//!
//! Diagnostics
//! - With the default `misuse-warnings` feature, misuse of an absent
//!   handle and unexpected probe exhaustion are reported through the
//!   `log` facade under the `prime_hashtable` target.
//!
//! Notes and non-goals
//! - No iteration, key enumeration, serialization or shrinking.
//! - The default hash reads four bytes of the key and is only offered for
//!   `Word` keys; other keys must bring their own strategies.

mod diag;
pub mod handle;
pub mod prime;
mod reentrancy;
pub mod strategy;
pub mod table;
mod table_proptest;

// Public surface
pub use handle::TableHandle;
pub use prime::{is_prime, next_prime};
pub use strategy::{Djb2, IdentityEq, KeyEq, KeyHash, StdEq, StdHash, Word};
pub use table::{Bucket, Table, DEFAULT_CAPACITY, MAX_LOAD_FACTOR, TARGET_LOAD_FACTOR};
