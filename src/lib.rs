#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Construction options and their validation.
///
/// This module provides [`Config`] together with the capacity and load
/// factor defaults, and the [`ConfigError`] returned for invalid options.
pub mod config;

pub mod hash_table;

pub mod hasher;

/// A hash map specialised for `i64` keys.
///
/// This module provides a `LongMap` that wraps the chained `HashTable` and
/// provides a standard key-value map interface with configurable hashers.
pub mod long_map;

pub use config::Config;
pub use config::ConfigError;
pub use hash_table::HashTable;
pub use hasher::LongHashBuilder;
#[cfg(feature = "foldhash")]
pub use long_map::FoldHashLongMap;
pub use long_map::LongMap;
