//! Key hashing and bucket index derivation.
//!
//! A [`LongMap`](crate::LongMap) hashes its `i64` keys through a
//! [`BuildHasher`], folds the 64-bit output down to 32 bits with [`fold`], and
//! picks a bucket with [`index`]. The default builder, [`LongHashBuilder`],
//! hands the key's bit pattern straight through, so the folded hash of a key is
//! the XOR of its high and low halves.

use core::hash::BuildHasher;
use core::hash::Hasher;

/// Folds a 64-bit hash into 32 bits by XORing its high and low halves.
///
/// # Examples
///
/// ```rust
/// # use long_map::hasher::fold;
/// #
/// assert_eq!(fold(7), 7);
/// assert_eq!(fold(0x0000_0001_0000_0001), 0);
/// assert_eq!(fold(-1i64 as u64), 0);
/// ```
#[inline(always)]
pub fn fold(hash: u64) -> u32 {
    (hash ^ (hash >> 32)) as u32
}

/// Maps a folded hash to a bucket of a table with `capacity` buckets.
///
/// `capacity` must be a non-zero power of two. The hash is treated as
/// unsigned, so every hash, including ones whose signed reading is
/// `i32::MIN`, lands in `0..capacity`.
///
/// # Examples
///
/// ```rust
/// # use long_map::hasher::index;
/// #
/// assert_eq!(index(5, 16), 5);
/// assert_eq!(index(21, 16), 5);
/// assert_eq!(index(0x8000_0000, 16), 0);
/// ```
#[inline(always)]
pub fn index(hash: u32, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    hash as usize & (capacity - 1)
}

/// Hashes `key` with `hash_builder` and folds the result.
#[inline(always)]
pub(crate) fn hash_key<S: BuildHasher>(hash_builder: &S, key: i64) -> u32 {
    fold(hash_builder.hash_one(key))
}

/// The default hash builder for [`LongMap`](crate::LongMap).
///
/// Builds [`LongHasher`]s, which use the raw bits of the written integer as
/// the hash. Integer keys need no mixing for a chained table of this kind, and
/// the mapping is stable across runs and platforms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LongHashBuilder;

impl BuildHasher for LongHashBuilder {
    type Hasher = LongHasher;

    fn build_hasher(&self) -> Self::Hasher {
        LongHasher::default()
    }
}

/// A hasher that passes integer bit patterns through unchanged.
///
/// Writing an `i64` or `u64` replaces the state with that value. Arbitrary
/// byte writes are folded in eight bytes at a time so the hasher stays total
/// for any [`Hash`](core::hash::Hash) input.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongHasher {
    state: u64,
}

impl Hasher for LongHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            self.state = self.state.rotate_left(8) ^ u64::from_le_bytes(word);
        }
    }

    #[inline]
    fn write_u64(&mut self, value: u64) {
        self.state = value;
    }

    #[inline]
    fn write_i64(&mut self, value: i64) {
        self.state = value as u64;
    }
}
