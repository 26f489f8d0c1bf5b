//! The separately chained table behind [`LongMap`](crate::LongMap).
//!
//! `HashTable<V>` owns the bucket array and the growth policy. It does not
//! hash keys itself: every operation takes the key together with its folded
//! 32-bit hash (see [`crate::hasher`]), which is stored on the node so that
//! growth can relink nodes without rehashing their keys.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem;

use crate::config::MAXIMUM_CAPACITY;
use crate::config::threshold_for;
use crate::hasher::index;

type Link<V> = Option<Box<Node<V>>>;

/// A single key/value entry, owned by the link that points at it.
struct Node<V> {
    key: i64,
    value: V,
    hash: u32,
    next: Link<V>,
}

impl<V> Node<V> {
    #[inline(always)]
    fn matches(&self, hash: u32, key: i64) -> bool {
        self.hash == hash && self.key == key
    }
}

/// Bucket count after the next doubling, or `None` once the table is at
/// `max_capacity`.
#[inline]
fn next_capacity(capacity: usize, max_capacity: usize) -> Option<usize> {
    (capacity < max_capacity).then(|| capacity * 2)
}

fn empty_buckets<V>(capacity: usize) -> Vec<Link<V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, || None);
    buckets
}

/// Drops a chain one node at a time. The default recursive drop of
/// `Option<Box<Node>>` would use stack proportional to the chain length.
fn drop_chain<V>(mut link: Link<V>) {
    while let Some(mut node) = link {
        link = node.next.take();
    }
}

/// Debug statistics for hash table analysis.
///
/// Available in tests and with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries currently in the table
    pub populated: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Entry count above which the next insert grows the table
    pub threshold: usize,
    /// Number of buckets holding at least one entry
    pub occupied_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Bucket utilization (occupied_buckets / capacity)
    pub bucket_utilization: f64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Long Map Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor, grows above {})",
            self.populated,
            self.capacity,
            self.load_factor * 100.0,
            self.threshold
        );
        println!(
            "Bucket Usage: {}/{} ({:.2}% utilization)",
            self.occupied_buckets,
            self.capacity,
            self.bucket_utilization * 100.0
        );
        println!("Longest chain: {}", self.longest_chain);
    }
}

/// A hash table of `i64` keys using separate chaining.
///
/// Each bucket holds the head of a singly linked chain of nodes. New nodes are
/// pushed at the front of their chain. Once the number of entries exceeds the
/// threshold (`capacity * load_factor`), the bucket array doubles and every
/// node is moved to the bucket its stored hash selects under the new capacity.
///
/// ## Example
///
/// ```rust
/// # use long_map::hash_table::HashTable;
/// #
/// let mut table = HashTable::new(16, 0.75);
/// assert_eq!(table.insert(7, 7, "seven"), None);
/// assert_eq!(table.find(7, 7), Some(&"seven"));
/// assert_eq!(table.insert(7, 7, "SEVEN"), Some("seven"));
/// assert_eq!(table.remove(7, 7), Some((7, "SEVEN")));
/// assert!(table.is_empty());
/// ```
pub struct HashTable<V> {
    buckets: Vec<Link<V>>,
    populated: usize,
    threshold: usize,
    load_factor: f32,
    max_capacity: usize,
}

impl<V> HashTable<V> {
    /// Creates a table with exactly `capacity` buckets.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of two in `1..=2^30`, or if
    /// `load_factor` is not positive. [`Config`](crate::Config) produces
    /// values that satisfy both.
    pub fn new(capacity: usize, load_factor: f32) -> Self {
        assert!(
            capacity.is_power_of_two() && capacity <= MAXIMUM_CAPACITY,
            "capacity must be a power of two no larger than 2^30: {capacity}"
        );
        assert!(load_factor > 0.0, "illegal load factor: {load_factor}");

        Self::with_max_capacity(capacity, load_factor, MAXIMUM_CAPACITY)
    }

    fn with_max_capacity(capacity: usize, load_factor: f32, max_capacity: usize) -> Self {
        debug_assert!(capacity <= max_capacity && max_capacity <= MAXIMUM_CAPACITY);
        Self {
            buckets: empty_buckets(capacity),
            populated: 0,
            threshold: threshold_for(capacity, load_factor),
            load_factor,
            max_capacity,
        }
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the entry count above which an insert grows the table.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Returns the load factor the table was created with.
    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    ///
    /// A new key is pushed at the front of its chain and may trigger growth.
    /// An existing key keeps its node; only the value is swapped.
    pub fn insert(&mut self, hash: u32, key: i64, value: V) -> Option<V> {
        if let Some(node) = self.find_node_mut(hash, key) {
            return Some(mem::replace(&mut node.value, value));
        }

        let slot = index(hash, self.buckets.len());
        let slot = &mut self.buckets[slot];
        let next = slot.take();
        *slot = Some(Box::new(Node {
            key,
            value,
            hash,
            next,
        }));
        self.populated += 1;

        if self.populated > self.threshold {
            self.grow();
        }
        None
    }

    /// Returns the value stored under `key`.
    pub fn find(&self, hash: u32, key: i64) -> Option<&V> {
        self.find_node(hash, key).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn find_mut(&mut self, hash: u32, key: i64) -> Option<&mut V> {
        self.find_node_mut(hash, key).map(|node| &mut node.value)
    }

    /// Unlinks the entry for `key` and returns it.
    pub fn remove(&mut self, hash: u32, key: i64) -> Option<(i64, V)> {
        let slot = index(hash, self.buckets.len());
        let mut link = &mut self.buckets[slot];
        while link.as_ref().is_some_and(|node| !node.matches(hash, key)) {
            link = &mut link.as_mut()?.next;
        }

        let node = link.take()?;
        let Node {
            key, value, next, ..
        } = *node;
        *link = next;
        self.populated -= 1;
        Some((key, value))
    }

    /// Returns `true` if any entry holds a value equal to `value`.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|(_, v)| v == value)
    }

    /// Removes every entry, keeping the bucket count and threshold.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            drop_chain(bucket.take());
        }
        self.populated = 0;
    }

    /// Grows until `additional` more entries fit without another resize.
    ///
    /// # Panics
    ///
    /// Panics with "capacity overflow" if the entries would not fit even at
    /// 2^30 buckets. The check runs before anything is allocated.
    pub fn reserve(&mut self, additional: usize) {
        let wanted = self.populated.saturating_add(additional);
        if wanted <= self.threshold {
            return;
        }
        assert!(
            wanted <= threshold_for(self.max_capacity, self.load_factor),
            "capacity overflow"
        );
        while wanted > self.threshold {
            self.grow();
        }
    }

    /// Returns an iterator over `(key, &value)` pairs in bucket-then-chain
    /// order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
            remaining: self.populated,
        }
    }

    /// Returns an iterator over `(key, &mut value)` pairs in bucket-then-chain
    /// order.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            remaining: self.populated,
            buckets: self.buckets.iter_mut(),
            chain: None,
        }
    }

    /// Returns an iterator that removes and yields every entry.
    ///
    /// The table is empty once the iterator is dropped, whether or not it was
    /// run to completion.
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            table: self,
            bucket_index: 0,
        }
    }

    fn find_node(&self, hash: u32, key: i64) -> Option<&Node<V>> {
        let mut link = self.buckets[index(hash, self.buckets.len())].as_deref();
        while let Some(node) = link {
            if node.matches(hash, key) {
                return Some(node);
            }
            link = node.next.as_deref();
        }
        None
    }

    fn find_node_mut(&mut self, hash: u32, key: i64) -> Option<&mut Node<V>> {
        let slot = index(hash, self.buckets.len());
        let mut link = self.buckets[slot].as_deref_mut();
        while let Some(node) = link {
            if node.matches(hash, key) {
                return Some(node);
            }
            link = node.next.as_deref_mut();
        }
        None
    }

    /// Doubles the bucket array and relinks every node.
    ///
    /// At [`MAXIMUM_CAPACITY`] the table stops growing and the threshold is
    /// pinned so that later inserts never ask again.
    fn grow(&mut self) {
        let Some(new_capacity) = next_capacity(self.buckets.len(), self.max_capacity) else {
            self.threshold = usize::MAX;
            return;
        };

        let old_buckets = mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        for mut link in old_buckets {
            while let Some(mut node) = link {
                link = node.next.take();
                let slot = &mut self.buckets[index(node.hash, new_capacity)];
                node.next = slot.take();
                *slot = Some(node);
            }
        }

        self.threshold = threshold_for(new_capacity, self.load_factor);
    }

    /// Pops the first entry at or after `*bucket_index`.
    fn pop_entry(&mut self, bucket_index: &mut usize) -> Option<(i64, V)> {
        while *bucket_index < self.buckets.len() {
            let bucket = &mut self.buckets[*bucket_index];
            if let Some(node) = bucket.take() {
                let Node {
                    key, value, next, ..
                } = *node;
                *bucket = next;
                self.populated -= 1;
                return Some((key, value));
            }
            *bucket_index += 1;
        }
        None
    }

    /// Returns chain-length counts: index `n` holds the number of buckets
    /// whose chain has exactly `n` nodes.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> Vec<usize> {
        let mut hist = alloc::vec![0usize; 1];
        for bucket in &self.buckets {
            let length = chain_length(bucket);
            if length >= hist.len() {
                hist.resize(length + 1, 0);
            }
            hist[length] += 1;
        }
        hist
    }

    /// Returns occupancy statistics for debugging.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.buckets.len();
        let mut occupied_buckets = 0;
        let mut longest_chain = 0;
        for bucket in &self.buckets {
            let length = chain_length(bucket);
            if length > 0 {
                occupied_buckets += 1;
            }
            longest_chain = longest_chain.max(length);
        }

        DebugStats {
            populated: self.populated,
            capacity,
            threshold: self.threshold,
            occupied_buckets,
            longest_chain,
            load_factor: self.populated as f64 / capacity as f64,
            bucket_utilization: occupied_buckets as f64 / capacity as f64,
        }
    }

    /// Pretty-prints the chain-length histogram using stdout.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_chain_histogram(&self) {
        let hist = self.chain_histogram();
        let max = hist.iter().copied().max().unwrap_or(0);
        println!("chain histogram ({} entries):", self.populated);

        let max_bar = 60usize;
        for (length, &count) in hist.iter().enumerate() {
            let width = if max == 0 {
                0
            } else {
                (count * max_bar).div_ceil(max)
            };
            println!("{:>3} | {} ({})", length, "█".repeat(width), count);
        }
    }
}

#[cfg(any(test, feature = "stats"))]
fn chain_length<V>(bucket: &Link<V>) -> usize {
    let mut length = 0;
    let mut link = bucket.as_deref();
    while let Some(node) = link {
        length += 1;
        link = node.next.as_deref();
    }
    length
}

impl<V> Debug for HashTable<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        struct Chain<'a, V>(&'a Link<V>);

        impl<V: Debug> Debug for Chain<'_, V> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let mut list = f.debug_list();
                let mut link = self.0.as_deref();
                while let Some(node) = link {
                    list.entry(&format_args!("{} -> {:?}", node.key, node.value));
                    link = node.next.as_deref();
                }
                list.finish()
            }
        }

        f.debug_struct("HashTable")
            .field(
                "buckets",
                &self.buckets.iter().map(Chain).collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("threshold", &self.threshold)
            .field("load_factor", &self.load_factor)
            .finish()
    }
}

impl<V> Clone for HashTable<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        let mut new_table = Self {
            buckets: empty_buckets(self.buckets.len()),
            populated: self.populated,
            threshold: self.threshold,
            load_factor: self.load_factor,
            max_capacity: self.max_capacity,
        };

        let mut chain = Vec::new();
        for (src, dst) in self.buckets.iter().zip(new_table.buckets.iter_mut()) {
            let mut link = src.as_deref();
            while let Some(node) = link {
                chain.push(node);
                link = node.next.as_deref();
            }

            // Rebuild back to front so the copy keeps the chain order.
            for node in chain.drain(..).rev() {
                let next = dst.take();
                *dst = Some(Box::new(Node {
                    key: node.key,
                    value: node.value.clone(),
                    hash: node.hash,
                    next,
                }));
            }
        }

        new_table
    }
}

impl<V> Drop for HashTable<V> {
    fn drop(&mut self) {
        for bucket in self.buckets.iter_mut() {
            drop_chain(bucket.take());
        }
    }
}

/// An iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Link<V>>,
    chain: Option<&'a Node<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.chain {
                self.chain = node.next.as_deref();
                self.remaining -= 1;
                return Some((node.key, &node.value));
            }
            self.chain = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            chain: self.chain,
            remaining: self.remaining,
        }
    }
}

/// A mutable iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`iter_mut`] method on [`HashTable`].
///
/// [`iter_mut`]: HashTable::iter_mut
pub struct IterMut<'a, V> {
    buckets: core::slice::IterMut<'a, Link<V>>,
    chain: Option<&'a mut Node<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (i64, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.chain.take() {
                self.chain = node.next.as_deref_mut();
                self.remaining -= 1;
                return Some((node.key, &mut node.value));
            }
            self.chain = self.buckets.next()?.as_deref_mut();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

/// A draining iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    bucket_index: usize,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = (i64, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.table.pop_entry(&mut self.bucket_index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        self.table.clear();
    }
}

/// An owning iterator over the entries of a [`HashTable`].
///
/// This struct is created by the `into_iter` method on [`HashTable`].
pub struct IntoIter<V> {
    table: HashTable<V>,
    bucket_index: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (i64, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.table.pop_entry(&mut self.bucket_index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> IntoIterator for HashTable<V> {
    type Item = (i64, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            table: self,
            bucket_index: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::hasher::LongHashBuilder;
    use crate::hasher::hash_key;

    fn hash(key: i64) -> u32 {
        hash_key(&LongHashBuilder, key)
    }

    fn insert(table: &mut HashTable<String>, key: i64) -> Option<String> {
        table.insert(hash(key), key, format!("value-{key}"))
    }

    #[test]
    fn insert_and_find() {
        let mut table = HashTable::new(1, 0.75);
        for k in 0..32i64 {
            assert_eq!(insert(&mut table, k), None);
            assert_eq!(
                table.find(hash(k), k),
                Some(&format!("value-{k}")),
                "{:#?}",
                table
            );
        }
        assert_eq!(table.len(), 32);
        for k in 0..32i64 {
            assert_eq!(table.find(hash(k), k), Some(&format!("value-{k}")));
        }
        assert!(table.find(hash(999), 999).is_none());
    }

    #[test]
    fn overwrite_keeps_population() {
        let mut table = HashTable::new(16, 0.75);
        assert_eq!(table.insert(hash(42), 42, 7), None);
        assert_eq!(table.insert(hash(42), 42, 11), Some(7));
        assert_eq!(table.len(), 1);
        assert_eq!(table.find(hash(42), 42), Some(&11));
    }

    #[test]
    fn find_mut_and_modify() {
        let mut table = HashTable::new(16, 0.75);
        for k in 0..5i64 {
            table.insert(hash(k), k, 1);
        }
        for k in 0..5i64 {
            if let Some(v) = table.find_mut(hash(k), k) {
                *v += 9;
            }
        }
        for k in 0..5i64 {
            assert_eq!(table.find(hash(k), k), Some(&10));
        }
    }

    #[test]
    fn remove_head_middle_and_tail_of_chain() {
        // Keys 1, 17, 33 and 49 share bucket 1 of a 16 bucket table.
        let mut table = HashTable::new(16, 4.0);
        for k in [1i64, 17, 33, 49] {
            insert(&mut table, k);
        }
        assert_eq!(table.debug_stats().longest_chain, 4);

        // Chain order is 49, 33, 17, 1 since nodes are pushed at the front.
        assert_eq!(table.remove(hash(49), 49), Some((49, "value-49".to_string())));
        assert_eq!(table.remove(hash(17), 17), Some((17, "value-17".to_string())));
        assert_eq!(table.remove(hash(1), 1), Some((1, "value-1".to_string())));
        assert_eq!(table.remove(hash(1), 1), None);
        assert_eq!(table.len(), 1);
        assert_eq!(table.find(hash(33), 33), Some(&"value-33".to_string()));
    }

    #[test]
    fn remove_missing_key_is_noop() {
        let mut table = HashTable::new(16, 0.75);
        for k in 0..8i64 {
            insert(&mut table, k);
        }
        assert_eq!(table.remove(hash(1000), 1000), None);
        assert_eq!(table.remove(hash(16), 16), None);
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn growth_follows_threshold() {
        let mut table = HashTable::new(16, 0.75);
        assert_eq!(table.threshold(), 12);
        for k in 0..12i64 {
            insert(&mut table, k);
        }
        assert_eq!(table.capacity(), 16);

        insert(&mut table, 12);
        assert_eq!(table.capacity(), 32);
        assert_eq!(table.threshold(), 24);

        // Overwrites never grow.
        for k in 0..13i64 {
            insert(&mut table, k);
        }
        assert_eq!(table.capacity(), 32);
    }

    #[test]
    fn single_bucket_table_grows_on_first_insert() {
        let mut table = HashTable::new(1, 0.75);
        assert_eq!(table.threshold(), 0);
        insert(&mut table, 5);
        assert_eq!(table.capacity(), 2);
        assert_eq!(table.threshold(), 1);
        assert_eq!(table.find(hash(5), 5), Some(&"value-5".to_string()));
    }

    #[test]
    fn entries_survive_growth() {
        let mut table = HashTable::new(1, 0.75);
        for k in 0..10_000i64 {
            table.insert(hash(k), k, k * 3);
        }
        assert_eq!(table.len(), 10_000);
        assert_eq!(table.capacity(), 16384);
        for k in 0..10_000i64 {
            assert_eq!(table.find(hash(k), k), Some(&(k * 3)), "lost key {k}");
        }
    }

    #[test]
    fn nodes_sit_in_their_current_bucket() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut table = HashTable::new(2, 0.75);
        for _ in 0..5000 {
            let k: i64 = rng.random();
            table.insert(hash(k), k, ());
        }

        let capacity = table.capacity();
        for (slot, bucket) in table.buckets.iter().enumerate() {
            let mut link = bucket.as_deref();
            while let Some(node) = link {
                assert_eq!(index(node.hash, capacity), slot);
                link = node.next.as_deref();
            }
        }
    }

    #[test]
    fn growth_stops_at_maximum_capacity() {
        assert_eq!(next_capacity(1, MAXIMUM_CAPACITY), Some(2));
        assert_eq!(
            next_capacity(MAXIMUM_CAPACITY / 2, MAXIMUM_CAPACITY),
            Some(MAXIMUM_CAPACITY)
        );
        assert_eq!(next_capacity(MAXIMUM_CAPACITY, MAXIMUM_CAPACITY), None);
    }

    #[test]
    fn full_table_pins_threshold() {
        let mut table = HashTable::with_max_capacity(2, 0.75, 4);
        for k in 0..3i64 {
            table.insert(hash(k), k, k);
        }
        assert_eq!(table.capacity(), 4);
        assert_eq!(table.threshold(), 3);

        table.insert(hash(3), 3, 3);
        assert_eq!(table.capacity(), 4);
        assert_eq!(table.threshold(), usize::MAX);

        for k in 4..64i64 {
            table.insert(hash(k), k, k);
        }
        assert_eq!(table.capacity(), 4);
        assert_eq!(table.len(), 64);
        for k in 0..64i64 {
            assert_eq!(table.find(hash(k), k), Some(&k));
        }
    }

    #[test]
    fn reserve_up_to_the_largest_table() {
        let mut table = HashTable::<i64>::with_max_capacity(1, 0.75, 8);
        table.reserve(6);
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.threshold(), 6);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn reserve_past_the_largest_table_panics() {
        let mut table = HashTable::<i64>::with_max_capacity(1, 0.75, 8);
        table.reserve(7);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn reserve_usize_max_panics_without_allocating() {
        let mut table = HashTable::<i64>::new(16, 0.75);
        table.reserve(usize::MAX);
    }

    #[test]
    fn reserve_grows_ahead() {
        let mut table = HashTable::new(16, 0.75);
        table.reserve(100);
        assert_eq!(table.capacity(), 256);
        let capacity = table.capacity();
        for k in 0..100i64 {
            table.insert(hash(k), k, k);
        }
        assert_eq!(table.capacity(), capacity);

        table.reserve(0);
        assert_eq!(table.capacity(), capacity);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut table = HashTable::new(16, 0.75);
        for k in 0..100i64 {
            insert(&mut table, k);
        }
        let capacity = table.capacity();
        let threshold = table.threshold();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), capacity);
        assert_eq!(table.threshold(), threshold);
        assert_eq!(table.iter().count(), 0);
        assert!(table.find(hash(1), 1).is_none());
    }

    #[test]
    fn iteration_visits_every_entry_once() {
        let mut table = HashTable::new(4, 0.75);
        for k in -50..50i64 {
            table.insert(hash(k), k, k * 2);
        }

        let iter = table.iter();
        assert_eq!(iter.len(), 100);
        let mut seen: Vec<i64> = iter
            .map(|(k, v)| {
                assert_eq!(*v, k * 2);
                k
            })
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (-50..50).collect::<Vec<_>>());

        for (_, v) in table.iter_mut() {
            *v += 1;
        }
        assert!(table.iter().all(|(k, v)| *v == k * 2 + 1));
    }

    #[test]
    fn contains_value_scans_all_chains() {
        let mut table = HashTable::new(16, 0.75);
        for k in 0..40i64 {
            insert(&mut table, k);
        }
        assert!(table.contains_value(&"value-39".to_string()));
        assert!(!table.contains_value(&"value-40".to_string()));
    }

    #[test]
    fn drain_empties_table() {
        let mut table = HashTable::new(16, 0.75);
        for k in 0..20i64 {
            insert(&mut table, k);
        }

        let mut drained: Vec<i64> = table.drain().map(|(k, _)| k).collect();
        drained.sort_unstable();
        assert_eq!(drained, (0..20).collect::<Vec<_>>());
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 32);
    }

    #[test]
    fn partial_drain_clears_on_drop() {
        let mut table = HashTable::new(16, 0.75);
        for k in 0..20i64 {
            insert(&mut table, k);
        }
        {
            let mut drain = table.drain();
            assert!(drain.next().is_some());
            assert_eq!(drain.len(), 19);
        }
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn into_iter_yields_owned_entries() {
        let mut table = HashTable::new(16, 0.75);
        for k in 0..10i64 {
            insert(&mut table, k);
        }
        let mut entries: Vec<(i64, String)> = table.into_iter().collect();
        entries.sort();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[3], (3, "value-3".to_string()));
    }

    #[test]
    fn clone_preserves_chain_order() {
        let mut table = HashTable::new(16, 4.0);
        for k in [2i64, 18, 34, 50, 3] {
            insert(&mut table, k);
        }
        let copy = table.clone();
        assert_eq!(
            copy.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            table.iter().map(|(k, _)| k).collect::<Vec<_>>()
        );
        assert_eq!(copy.len(), table.len());
        assert_eq!(copy.threshold(), table.threshold());

        table.clear();
        assert_eq!(copy.find(hash(34), 34), Some(&"value-34".to_string()));
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn long_chains_drop_without_recursion() {
        // Build the chain directly; inserting would walk it on every call.
        let mut table = HashTable::new(1, f32::INFINITY);
        for k in 0..200_000i64 {
            let next = table.buckets[0].take();
            table.buckets[0] = Some(Box::new(Node {
                key: k,
                value: k,
                hash: 0,
                next,
            }));
            table.populated += 1;
        }
        assert_eq!(table.debug_stats().longest_chain, 200_000);
        assert_eq!(table.find(0, 0), Some(&0));
        assert_eq!(table.insert(0, 200_000, 200_000), None);
        assert_eq!(table.capacity(), 1);

        let copy = table.clone();
        table.clear();
        drop(copy);
    }

    #[test]
    fn stats_and_histogram() {
        let mut table = HashTable::new(16, 4.0);
        for k in [0i64, 16, 32, 1, 2] {
            insert(&mut table, k);
        }

        let stats = table.debug_stats();
        assert_eq!(stats.populated, 5);
        assert_eq!(stats.capacity, 16);
        assert_eq!(stats.occupied_buckets, 3);
        assert_eq!(stats.longest_chain, 3);
        assert_eq!(stats.threshold, 64);

        assert_eq!(table.chain_histogram(), vec![13, 2, 0, 1]);
    }

    #[test]
    fn debug_lists_chains() {
        let mut table = HashTable::new(2, 0.75);
        table.insert(hash(1), 1, "one");
        let rendered = format!("{table:?}");
        assert!(rendered.contains("1 -> \"one\""), "{rendered}");
        assert!(rendered.contains("populated: 1"), "{rendered}");
    }

    #[test]
    #[should_panic(expected = "capacity must be a power of two")]
    fn new_rejects_odd_capacity() {
        let _ = HashTable::<()>::new(10, 0.75);
    }
}
