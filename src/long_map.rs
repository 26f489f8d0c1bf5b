use core::fmt::Debug;
use core::hash::BuildHasher;
use core::ops::Index;

use crate::config::Config;
use crate::config::ConfigError;
use crate::config::DEFAULT_INITIAL_CAPACITY;
use crate::config::DEFAULT_LOAD_FACTOR;
use crate::config::bucket_count;
use crate::hash_table::HashTable;
use crate::hasher::LongHashBuilder;
use crate::hasher::hash_key;

/// A hash map from `i64` keys to values of type `V`.
///
/// `LongMap<V, S>` stores its keys unboxed in a separately chained
/// [`HashTable`]. Keys are hashed by the builder `S` (by default
/// [`LongHashBuilder`], which uses the key's own bits), folded to 32 bits and
/// masked down to a bucket index.
///
/// The table doubles its bucket count once the number of entries exceeds
/// `capacity * load_factor`, and never shrinks.
///
/// # Examples
///
/// ```rust
/// # use long_map::LongMap;
/// #
/// let mut map = LongMap::new();
/// map.insert(1, "First");
/// map.insert(2, "Second");
///
/// assert_eq!(map.get(1), Some(&"First"));
/// assert_eq!(map.remove(2), Some("Second"));
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Clone)]
pub struct LongMap<V, S = LongHashBuilder> {
    table: HashTable<V>,
    hash_builder: S,
}

/// A [`LongMap`] hashing its keys with foldhash.
#[cfg(feature = "foldhash")]
pub type FoldHashLongMap<V> = LongMap<V, foldhash::fast::FixedState>;

impl<V, S> Debug for LongMap<V, S>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> LongMap<V> {
    /// Creates an empty map with 16 buckets and a load factor of 0.75.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let map: LongMap<String> = LongMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(LongHashBuilder)
    }

    /// Creates an empty map with at least `capacity` buckets.
    ///
    /// The bucket count is rounded up to a power of two and clamped to
    /// 2^30.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let map: LongMap<String> = LongMap::with_capacity(100);
    /// assert_eq!(map.capacity(), 128);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, LongHashBuilder)
    }

    /// Creates an empty map from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the initial capacity is negative or the load
    /// factor is not positive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::Config;
    /// # use long_map::ConfigError;
    /// # use long_map::LongMap;
    /// #
    /// let map: LongMap<u8> = LongMap::with_config(Config::default().with_initial_capacity(10))?;
    /// assert_eq!(map.capacity(), 16);
    ///
    /// let err = LongMap::<u8>::with_config(Config::default().with_load_factor(0.0)).unwrap_err();
    /// assert_eq!(err, ConfigError::InvalidLoadFactor(0.0));
    /// # Ok::<(), ConfigError>(())
    /// ```
    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, LongHashBuilder)
    }
}

impl<V> Default for LongMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> LongMap<V, S> {
    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let mut map = LongMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the entry count above which the next insert doubles the
    /// bucket count.
    pub fn threshold(&self) -> usize {
        self.table.threshold()
    }

    /// Returns the configured load factor.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Returns a reference to the map's hash builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all entries, keeping the bucket count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let mut map = LongMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.get(1), None);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns `true` if some entry holds a value equal to `value`.
    ///
    /// This scans every entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let mut map = LongMap::new();
    /// map.insert(1, "First");
    /// assert!(map.contains_value(&"First"));
    /// assert!(!map.contains_value(&"Ninth"));
    /// ```
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.table.contains_value(value)
    }

    /// Returns an iterator over `(key, &value)` pairs in an arbitrary order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let mut map = LongMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let mut pairs: Vec<_> = map.iter().collect();
    /// pairs.sort();
    /// assert_eq!(pairs, [(1, &"a"), (2, &"b")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over `(key, &mut value)` pairs in an arbitrary
    /// order.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys of the map.
    ///
    /// The iterator yields exactly [`len`](Self::len) keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let mut map = LongMap::new();
    /// map.insert(11, "a");
    /// map.insert(31, "b");
    ///
    /// let mut keys: Vec<i64> = map.keys().collect();
    /// keys.sort();
    /// assert_eq!(keys, [11, 31]);
    /// ```
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map, in the same order as
    /// [`keys`](Self::keys).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let map: LongMap<String> = LongMap::new();
    /// assert_eq!(map.values().count(), 0);
    /// ```
    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values of the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let mut map = LongMap::new();
    /// map.insert(1, 10);
    /// for value in map.values_mut() {
    ///     *value += 1;
    /// }
    /// assert_eq!(map.get(1), Some(&11));
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Removes and yields every entry, keeping the bucket count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let mut map = LongMap::new();
    /// map.insert(1, "a");
    /// let drained: Vec<_> = map.drain().collect();
    /// assert_eq!(drained, [(1, "a")]);
    /// assert!(map.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Grows the bucket array so that `additional` more entries can be
    /// inserted without another resize.
    ///
    /// # Panics
    ///
    /// Panics with "capacity overflow" if that many entries would not fit
    /// even in the largest table. Nothing is allocated in that case.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Returns occupancy statistics of the underlying table.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Returns the chain-length histogram of the underlying table.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> alloc::vec::Vec<usize> {
        self.table.chain_histogram()
    }

    /// Pretty-prints the chain-length histogram using stdout.
    ///
    /// Available with the `stats` and `std` features.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_chain_histogram(&self) {
        self.table.print_chain_histogram();
    }
}

impl<V, S> LongMap<V, S>
where
    S: BuildHasher,
{
    /// Creates an empty map with default capacity using `hash_builder`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use long_map::LongMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = LongMap::with_hasher(SimpleHasher);
    /// map.insert(-5, "minus five");
    /// assert_eq!(map.get(-5), Some(&"minus five"));
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(bucket_count(DEFAULT_INITIAL_CAPACITY), DEFAULT_LOAD_FACTOR),
            hash_builder,
        }
    }

    /// Creates an empty map with at least `capacity` buckets using
    /// `hash_builder`.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::new(bucket_count(capacity), DEFAULT_LOAD_FACTOR),
            hash_builder,
        }
    }

    /// Creates an empty map from `config` using `hash_builder`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the initial capacity is negative or the load
    /// factor is not positive.
    pub fn with_config_and_hasher(config: Config, hash_builder: S) -> Result<Self, ConfigError> {
        let capacity = config.validate()?;
        Ok(Self {
            table: HashTable::new(capacity, config.load_factor),
            hash_builder,
        })
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    /// If the map did have this key present, the value is updated, and the old
    /// value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let mut map = LongMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(37), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: i64, value: V) -> Option<V> {
        let hash = hash_key(&self.hash_builder, key);
        self.table.insert(hash, key, value)
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let mut map = LongMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(1), Some(&"a"));
    /// assert_eq!(map.get(2), None);
    /// ```
    pub fn get(&self, key: i64) -> Option<&V> {
        let hash = hash_key(&self.hash_builder, key);
        self.table.find(hash, key)
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let mut map = LongMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map.get(1), Some(&"b"));
    /// ```
    pub fn get_mut(&mut self, key: i64) -> Option<&mut V> {
        let hash = hash_key(&self.hash_builder, key);
        self.table.find_mut(hash, key)
    }

    /// Returns `true` if the map contains a value for `key`.
    ///
    /// Probes the same bucket as [`get`](Self::get), so the two always agree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let mut map = LongMap::new();
    /// map.insert(4, "Fourth");
    /// assert!(map.contains_key(4));
    /// assert!(!map.contains_key(11));
    /// ```
    pub fn contains_key(&self, key: i64) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key` from the map, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::LongMap;
    /// #
    /// let mut map = LongMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(1), Some("a"));
    /// assert_eq!(map.remove(1), None);
    /// ```
    pub fn remove(&mut self, key: i64) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key` from the map, returning the stored key and value if it
    /// was present.
    pub fn remove_entry(&mut self, key: i64) -> Option<(i64, V)> {
        let hash = hash_key(&self.hash_builder, key);
        self.table.remove(hash, key)
    }
}

impl<V, S> PartialEq for LongMap<V, S>
where
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<V, S> Eq for LongMap<V, S>
where
    V: Eq,
    S: BuildHasher,
{
}

impl<V, S> Index<i64> for LongMap<V, S>
where
    S: BuildHasher,
{
    type Output = V;

    /// Returns the value stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not present in the map.
    fn index(&self, key: i64) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found: {key}"),
        }
    }
}

impl<V, S> Extend<(i64, V)> for LongMap<V, S>
where
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (i64, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V, S> FromIterator<(i64, V)> for LongMap<V, S>
where
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (i64, V)>>(iter: T) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<V, S> IntoIterator for LongMap<V, S> {
    type Item = (i64, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, V, S> IntoIterator for &'a LongMap<V, S> {
    type Item = (i64, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V, S> IntoIterator for &'a mut LongMap<V, S> {
    type Item = (i64, &'a mut V);
    type IntoIter = IterMut<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// An iterator over the entries of a `LongMap`.
#[derive(Clone)]
pub struct Iter<'a, V> {
    inner: crate::hash_table::Iter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// A mutable iterator over the entries of a `LongMap`.
pub struct IterMut<'a, V> {
    inner: crate::hash_table::IterMut<'a, V>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (i64, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

/// An iterator over the keys of a `LongMap`.
#[derive(Clone)]
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<V> Iterator for Keys<'_, V> {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

/// An iterator over the values of a `LongMap`.
#[derive(Clone)]
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

/// A mutable iterator over the values of a `LongMap`.
pub struct ValuesMut<'a, V> {
    inner: IterMut<'a, V>,
}

impl<'a, V> Iterator for ValuesMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for ValuesMut<'_, V> {}

/// A draining iterator over the entries of a `LongMap`.
pub struct Drain<'a, V> {
    inner: crate::hash_table::Drain<'a, V>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = (i64, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

/// An owning iterator over the entries of a `LongMap`.
pub struct IntoIter<V> {
    inner: crate::hash_table::IntoIter<V>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (i64, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}
