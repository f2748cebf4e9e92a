//! Key strategies: how a table compares and hashes its keys.
//!
//! A table is parameterised by one [`KeyEq`] and one [`KeyHash`]. The two
//! must agree: whenever `eq(a, b)` holds, `hash(a) == hash(b)` must hold as
//! well. The table does not check this; breaking it makes lookups return
//! arbitrary results.
//!
//! Defaults ([`IdentityEq`] and [`Djb2`]) only apply to [`Word`] keys.
//! Closures, [`StdEq`] and [`StdHash`] cover everything else.

use core::hash::{BuildHasher, Hash};
use core::ptr::NonNull;

/// Key equality used by a table. Must be reflexive, symmetric and
/// transitive.
pub trait KeyEq<K: ?Sized> {
    fn eq(&self, a: &K, b: &K) -> bool;
}

/// Key hash used by a table.
pub trait KeyHash<K: ?Sized> {
    fn hash(&self, key: &K) -> u64;
}

impl<K: ?Sized, F> KeyEq<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn eq(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

impl<K: ?Sized, F> KeyHash<K> for F
where
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self(key)
    }
}

/// A fixed-width identifier usable with the default strategies.
///
/// The default hash reads exactly four bytes of the key's in-memory
/// representation, so this trait is only implemented for identifiers at
/// least four bytes wide: integers of 32 bits and up, pointers, references
/// (by address) and `slotmap` keys. Shorter integers and anything whose
/// identity lives behind a pointer (strings, vectors) need custom
/// strategies such as [`StdEq`] with [`StdHash`].
pub trait Word {
    /// Identity comparison: value equality for integers, address equality
    /// for pointers and references.
    fn same(&self, other: &Self) -> bool;

    /// The first four bytes of the identifier in native byte order.
    fn leading_bytes(&self) -> [u8; 4];
}

#[inline]
fn first_four(bytes: &[u8]) -> [u8; 4] {
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

macro_rules! impl_word_for_int {
    ($($t:ty),* $(,)?) => {$(
        impl Word for $t {
            #[inline]
            fn same(&self, other: &Self) -> bool {
                self == other
            }

            #[inline]
            fn leading_bytes(&self) -> [u8; 4] {
                first_four(&self.to_ne_bytes())
            }
        }
    )*};
}

impl_word_for_int!(u32, i32, u64, i64, u128, i128, usize, isize);

#[inline]
fn address_bytes(addr: usize) -> [u8; 4] {
    first_four(&addr.to_ne_bytes())
}

impl<T: ?Sized> Word for *const T {
    #[inline]
    fn same(&self, other: &Self) -> bool {
        self.cast::<()>() == other.cast::<()>()
    }

    #[inline]
    fn leading_bytes(&self) -> [u8; 4] {
        address_bytes(self.cast::<()>() as usize)
    }
}

impl<T: ?Sized> Word for *mut T {
    #[inline]
    fn same(&self, other: &Self) -> bool {
        self.cast_const().same(&other.cast_const())
    }

    #[inline]
    fn leading_bytes(&self) -> [u8; 4] {
        self.cast_const().leading_bytes()
    }
}

impl<T: ?Sized> Word for NonNull<T> {
    #[inline]
    fn same(&self, other: &Self) -> bool {
        self.as_ptr().same(&other.as_ptr())
    }

    #[inline]
    fn leading_bytes(&self) -> [u8; 4] {
        self.as_ptr().leading_bytes()
    }
}

impl<T: ?Sized> Word for &T {
    #[inline]
    fn same(&self, other: &Self) -> bool {
        (*self as *const T).same(&(*other as *const T))
    }

    #[inline]
    fn leading_bytes(&self) -> [u8; 4] {
        (*self as *const T).leading_bytes()
    }
}

impl Word for slotmap::KeyData {
    #[inline]
    fn same(&self, other: &Self) -> bool {
        self == other
    }

    #[inline]
    fn leading_bytes(&self) -> [u8; 4] {
        first_four(&self.as_ffi().to_ne_bytes())
    }
}

impl Word for slotmap::DefaultKey {
    #[inline]
    fn same(&self, other: &Self) -> bool {
        self == other
    }

    #[inline]
    fn leading_bytes(&self) -> [u8; 4] {
        slotmap::Key::data(self).leading_bytes()
    }
}

/// Default equality: identity of a [`Word`] key.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityEq;

impl<K: Word + ?Sized> KeyEq<K> for IdentityEq {
    #[inline]
    fn eq(&self, a: &K, b: &K) -> bool {
        a.same(b)
    }
}

/// Default hash: djb2 folded over the first four bytes of a [`Word`] key.
#[derive(Clone, Copy, Debug, Default)]
pub struct Djb2;

const DJB2_SEED: u64 = 5381;

impl<K: Word + ?Sized> KeyHash<K> for Djb2 {
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        key.leading_bytes()
            .iter()
            .fold(DJB2_SEED, |h, &b| (h << 5).wrapping_add(h).wrapping_add(b as u64))
    }
}

/// Equality through `K: Eq`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdEq;

impl<K: Eq + ?Sized> KeyEq<K> for StdEq {
    #[inline]
    fn eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Hashing through `K: Hash` and a [`BuildHasher`], hashbrown's default
/// unless another is given.
#[derive(Clone, Debug, Default)]
pub struct StdHash<S = hashbrown::hash_map::DefaultHashBuilder> {
    build: S,
}

impl<S> StdHash<S> {
    pub fn with_hasher(build: S) -> Self {
        Self { build }
    }
}

impl<K: Hash + ?Sized, S: BuildHasher> KeyHash<K> for StdHash<S> {
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.build.hash_one(key)
    }
}
