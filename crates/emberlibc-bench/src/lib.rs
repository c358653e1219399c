//! Benchmarks for the emberlibc stream core.
//!
//! See `benches/` for the criterion targets; this library is empty.
