//! Execution context.
//!
//! One context per running application: it owns the service provider, the
//! handle table, the three console-stream records, and the last-error
//! cell. Every stream operation takes the context explicitly; there is no
//! ambient lookup, so "context not found" is an explicit input at the
//! errno accessor rather than a global failure mode.
//!
//! The hosting environment is single-threaded and synchronous by
//! construction: no locking discipline exists anywhere in this core.

use crate::services::{NativeHandle, ServiceProvider};
use crate::stdio::file::{FileHandle, FileId, HandleTable};
use crate::stdio::mode::OpenFlags;

/// The three console streams, installed by the startup glue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    In,
    Out,
    Err,
}

impl StdStream {
    fn index(self) -> usize {
        match self {
            StdStream::In => 0,
            StdStream::Out => 1,
            StdStream::Err => 2,
        }
    }
}

/// Process-wide execution context.
///
/// Created at program start, torn down at program exit; never shared
/// across concurrent executions.
#[derive(Debug)]
pub struct Context<P: ServiceProvider> {
    pub(crate) services: P,
    pub(crate) files: HandleTable,
    pub(crate) std_streams: [FileHandle; 3],
    pub(crate) errno: i32,
}

impl<P: ServiceProvider> Context<P> {
    /// Create a context over `services` with a handle table of `max_open`
    /// slots. The capacity is fixed for the context's lifetime.
    pub fn new(services: P, max_open: usize) -> Self {
        Self {
            services,
            files: HandleTable::new(max_open),
            std_streams: [
                FileHandle::vacant(),
                FileHandle::vacant(),
                FileHandle::vacant(),
            ],
            errno: 0,
        }
    }

    /// Install a console stream at its sentinel id.
    ///
    /// Called by the startup glue once the provider has produced handles
    /// for the console. `redirected` marks a stream pointed at a real
    /// sink, which suppresses the write engine's console auto-flush.
    pub fn install_std_stream(&mut self, which: StdStream, native: NativeHandle, redirected: bool) {
        let flags = match which {
            StdStream::In => OpenFlags {
                readable: true,
                text: true,
                redirected,
                ..OpenFlags::default()
            },
            StdStream::Out | StdStream::Err => OpenFlags {
                writable: true,
                text: true,
                redirected,
                ..OpenFlags::default()
            },
        };
        self.std_streams[which.index()] = FileHandle {
            reserved: true,
            native: Some(native),
            open_flags: flags,
            ..FileHandle::vacant()
        };
    }

    pub fn services(&self) -> &P {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut P {
        &mut self.services
    }

    pub fn max_open(&self) -> usize {
        self.files.capacity()
    }

    // -----------------------------------------------------------------------
    // Error state
    // -----------------------------------------------------------------------

    /// Last error recorded by any component of this context.
    pub fn errno(&self) -> i32 {
        self.errno
    }

    pub fn set_errno(&mut self, code: i32) {
        self.errno = code;
    }

    pub(crate) fn errno_mut(&mut self) -> &mut i32 {
        &mut self.errno
    }

    // -----------------------------------------------------------------------
    // Stream lookup
    // -----------------------------------------------------------------------

    /// The "is this really one of ours" check: a stream is addressable
    /// only if its slot is reserved and its provider handle is live.
    /// Foreign or stale ids degrade to `None`, never fault.
    pub(crate) fn stream(&self, id: FileId) -> Option<&FileHandle> {
        let handle = match id.std_index() {
            Some(k) => &self.std_streams[k],
            None => self.files.get(id)?,
        };
        handle.is_open().then_some(handle)
    }

    pub(crate) fn stream_mut(&mut self, id: FileId) -> Option<&mut FileHandle> {
        let handle = match id.std_index() {
            Some(k) => &mut self.std_streams[k],
            None => self.files.get_mut(id)?,
        };
        handle.is_open().then_some(handle)
    }

    /// Split borrow: one open stream plus the provider, for engine code
    /// that must call provider primitives while mutating the handle.
    pub(crate) fn stream_and_services(&mut self, id: FileId) -> Option<(&mut FileHandle, &mut P)> {
        let Context {
            services,
            files,
            std_streams,
            ..
        } = self;
        let handle = match id.std_index() {
            Some(k) => &mut std_streams[k],
            None => files.get_mut(id)?,
        };
        handle.is_open().then_some((handle, services))
    }
}
