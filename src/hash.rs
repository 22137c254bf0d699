//! Map type used for sparse bitmap words and tick metadata.
//!
//! `std-hash` forces the std `HashMap`. Otherwise `rustc-hash` is preferred
//! over `ahash` when both are enabled.

#[cfg(feature = "std-hash")]
pub type FastMap<K, V> = std::collections::HashMap<K, V>;

#[cfg(all(not(feature = "std-hash"), feature = "rustc-hash"))]
pub type FastMap<K, V> = rustc_hash::FxHashMap<K, V>;

#[cfg(all(
    not(feature = "std-hash"),
    not(feature = "rustc-hash"),
    feature = "ahash"
))]
pub type FastMap<K, V> = ahash::AHashMap<K, V>;

#[cfg(not(any(feature = "std-hash", feature = "rustc-hash", feature = "ahash")))]
pub type FastMap<K, V> = std::collections::HashMap<K, V>;
