//! # emberlibc-core
//!
//! Hosted C-standard-library file I/O for firmware execution environments.
//!
//! There is no operating system underneath this crate: every byte that
//! reaches durable storage goes through a handful of primitive, synchronous
//! firmware services (open-by-name, raw read/write, set-position, close).
//! This crate is the translation layer between C-library stream semantics
//! and those primitives: the file-handle table, open-mode resolution, and
//! the write-buffering/flush engine with text-mode newline translation.
//!
//! The firmware services themselves are consumed through the
//! [`services::ServiceProvider`] trait and never implemented here.
//! No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod context;
pub mod errno;
pub mod services;
pub mod stdio;
pub mod string;

pub use context::{Context, StdStream};
pub use services::{FilePos, NativeHandle, ServiceProvider};
pub use stdio::EOF;
pub use stdio::file::{BUFSIZ, FileId, STDERR, STDIN, STDOUT};
pub use stdio::mode::{OpenFlags, resolve_mode};
