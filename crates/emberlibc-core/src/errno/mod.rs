//! Error number definitions.
//!
//! Implements `<errno.h>` support with a per-context last-error cell.
//! There is one cell per execution context; components write into it on
//! failure and callers read it back through [`errno_cell`].

use crate::context::Context;
use crate::services::ServiceProvider;

/// Well-known errno constants.
pub const EPERM: i32 = 1;
pub const ENOENT: i32 = 2;
pub const EIO: i32 = 5;
pub const EBADF: i32 = 9;
pub const EACCES: i32 = 13;
pub const EEXIST: i32 = 17;
pub const EINVAL: i32 = 22;
pub const ENFILE: i32 = 23;
pub const EMFILE: i32 = 24;
pub const ENOSPC: i32 = 28;
pub const ERANGE: i32 = 34;
pub const ENOSYS: i32 = 38;

/// Returns the context's error cell, or `None` when no context is
/// available.
///
/// Equivalent to the C `_errno()` accessor: rather than faulting when the
/// execution context cannot be located, the caller gets "no error cell
/// available" and decides what to do.
pub fn errno_cell<P: ServiceProvider>(ctx: Option<&mut Context<P>>) -> Option<&mut i32> {
    ctx.map(Context::errno_mut)
}
