#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bidirectional;
mod error;
mod lcfs;
mod linear;
mod robin_hood;
mod word;

/// The integer set engine, its width and policy aliases, and the
/// object-safe [`IntSet`] trait.
pub mod hash_set;

pub mod hasher;

pub mod policy;
pub mod registry;
pub mod speck;

/// The backing array and bucket arithmetic shared by every policy.
pub mod table;

pub use bidirectional::Bidirectional;
pub use error::Error;
pub use error::Result;
pub use hash_set::BlpIntHashSet;
pub use hash_set::BlpLongHashSet;
pub use hash_set::IntHashSet;
pub use hash_set::IntSet;
pub use hash_set::LcfsIntHashSet;
pub use hash_set::LcfsLongHashSet;
pub use hash_set::LpIntHashSet;
pub use hash_set::LpLongHashSet;
pub use hash_set::RhIntHashSet;
pub use hash_set::RhLongHashSet;
pub use hasher::DefaultIntHasher;
pub use hasher::DefaultLongHasher;
pub use hasher::ReversibleHasher;
pub use lcfs::Lcfs;
pub use linear::LinearProbing;
pub use policy::Policy;
pub use policy::Probe;
pub use robin_hood::RobinHood;
pub use speck::SpeckIntHasher;
pub use speck::SpeckLongHasher;
#[cfg(any(test, feature = "stats"))]
pub use table::DebugStats;
pub use table::Table;
pub use word::Word;
