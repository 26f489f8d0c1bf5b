use core::fmt;

/// Capacity used when none is given.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Largest number of buckets a table will ever allocate. Must be a power of
/// two.
pub const MAXIMUM_CAPACITY: usize = 1 << 30;

/// Load factor used when none is given.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Construction options for a [`LongMap`](crate::LongMap).
///
/// # Examples
///
/// ```rust
/// # use long_map::Config;
/// # use long_map::LongMap;
/// #
/// let config = Config::default()
///     .with_initial_capacity(64)
///     .with_load_factor(0.5);
/// let map: LongMap<&str> = LongMap::with_config(config).unwrap();
/// assert_eq!(map.capacity(), 64);
/// assert_eq!(map.threshold(), 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Requested number of buckets. Negative values are rejected, values
    /// above [`MAXIMUM_CAPACITY`] are clamped, and the result is rounded up to
    /// a power of two.
    pub initial_capacity: i64,
    /// Ratio of entries to buckets above which the table doubles. Must be
    /// positive and not NaN.
    pub load_factor: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY as i64,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl Config {
    /// Sets the requested initial capacity.
    pub fn with_initial_capacity(mut self, initial_capacity: i64) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the load factor.
    pub fn with_load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Checks the options and returns the bucket count they resolve to.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use long_map::Config;
    /// # use long_map::ConfigError;
    /// #
    /// assert_eq!(Config::default().validate(), Ok(16));
    /// assert_eq!(Config::default().with_initial_capacity(0).validate(), Ok(1));
    /// assert_eq!(Config::default().with_initial_capacity(100).validate(), Ok(128));
    /// assert_eq!(
    ///     Config::default().with_initial_capacity(-1).validate(),
    ///     Err(ConfigError::NegativeCapacity(-1))
    /// );
    /// ```
    pub fn validate(&self) -> Result<usize, ConfigError> {
        if self.initial_capacity < 0 {
            return Err(ConfigError::NegativeCapacity(self.initial_capacity));
        }
        if self.load_factor.is_nan() || self.load_factor <= 0.0 {
            return Err(ConfigError::InvalidLoadFactor(self.load_factor));
        }
        let requested = (self.initial_capacity as u64).min(MAXIMUM_CAPACITY as u64) as usize;
        Ok(bucket_count(requested))
    }
}

/// Rounds a requested capacity to the bucket count actually allocated.
#[inline]
pub(crate) fn bucket_count(requested: usize) -> usize {
    requested.clamp(1, MAXIMUM_CAPACITY).next_power_of_two()
}

/// Number of entries a table of `capacity` buckets holds before it grows.
#[inline]
pub(crate) fn threshold_for(capacity: usize, load_factor: f32) -> usize {
    // Float to int casts saturate, which keeps huge load factors well defined.
    (capacity as f64 * load_factor as f64) as usize
}

/// Reasons a [`Config`] is rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The initial capacity was below zero.
    NegativeCapacity(i64),
    /// The load factor was zero, negative or NaN.
    InvalidLoadFactor(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NegativeCapacity(capacity) => {
                write!(f, "initial capacity must not be negative: {capacity}")
            }
            ConfigError::InvalidLoadFactor(load_factor) => {
                write!(f, "illegal load factor: {load_factor}")
            }
        }
    }
}

impl core::error::Error for ConfigError {}
