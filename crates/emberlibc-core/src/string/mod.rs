//! String helpers for the provider boundary.

pub mod wide;

pub use wide::widen;
