//! Write-buffering engine.
//!
//! Accumulates caller bytes into the per-handle buffer, performs
//! text-mode newline translation, enforces read-only buffer protection,
//! and flushes to the service provider when the buffer fills, on explicit
//! flush, or on append-forced seeks.
//!
//! Invariants the engine maintains per flush: the logical position is
//! pushed to the provider before the first raw write of a call; a buffer
//! whose contents came from a read flushes as a no-op byte count; all
//! buffer bookkeeping resets after a flush.

use crate::context::Context;
use crate::services::{FilePos, ServiceProvider};
use crate::stdio::file::{FileId, STDERR, STDOUT};

// ---------------------------------------------------------------------------
// Text-mode newline translation
// ---------------------------------------------------------------------------

/// Two-phase CRLF insertion state: a source `'\n'` first emits `'\r'`
/// without consuming the source byte, then owes exactly one `'\n'` on the
/// following step. Literal `'\r'` bytes in the source are never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CrState {
    Idle,
    PendingLf,
}

#[derive(Debug)]
pub(crate) struct NewlineEncoder {
    state: CrState,
}

impl NewlineEncoder {
    pub(crate) fn new() -> Self {
        Self {
            state: CrState::Idle,
        }
    }

    /// Returns the byte to store and whether the source cursor advances.
    pub(crate) fn step(&mut self, text_mode: bool, byte: u8) -> (u8, bool) {
        if text_mode && byte == b'\n' && self.state == CrState::Idle {
            self.state = CrState::PendingLf;
            (b'\r', false)
        } else {
            self.state = CrState::Idle;
            (byte, true)
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

impl<P: ServiceProvider> Context<P> {
    /// Write `size * nelem` bytes from `src` to the stream.
    ///
    /// Returns the number of whole `size`-sized elements accepted, which
    /// is less than `nelem` only on a write error. A zero `size` divides
    /// as one for the return accounting. `src` must cover the request;
    /// the shorter of the two bounds the copy.
    pub fn fwrite(&mut self, src: &[u8], size: usize, nelem: usize, id: FileId) -> usize {
        self.write_stream(Some(src), size, nelem, id)
    }

    /// Force any buffered bytes out without adding new data.
    ///
    /// Drives the same engine as [`Context::fwrite`] through the sentinel
    /// flush path; a stream with nothing valid buffered performs no
    /// provider write at all.
    pub fn fflush(&mut self, id: FileId) {
        self.write_stream(None, 0, 0, id);
    }

    fn write_stream(&mut self, src: Option<&[u8]>, size: usize, nelem: usize, id: FileId) -> usize {
        let flush_request = src.is_none();

        let accepted = {
            let Some((file, services)) = self.stream_and_services(id) else {
                return 0;
            };
            let Some(native) = file.native else {
                return 0;
            };

            // Append mode forces end-of-file positioning before every
            // write batch, not just the first.
            if file.open_flags.append {
                file.position = FilePos::SeekEnd;
                file.at_eof = true;
            }

            let capacity = file.buffer_capacity();
            let src_bytes = src.unwrap_or(&[]);
            let requested = size.saturating_mul(nelem).min(src_bytes.len());
            let text_mode = file.open_flags.text;
            let read_only = file.open_flags.is_read_only();

            let mut provided = 0usize;
            let mut pos_synced = false;
            let mut encoder = NewlineEncoder::new();
            let mut flush_pending = flush_request;

            while flush_pending || provided < requested {
                while provided < requested && file.buf_index < capacity {
                    let (byte, consumed) = encoder.step(text_mode, src_bytes[provided]);
                    if let Some(buffer) = file.buffer.as_mut() {
                        buffer[file.buf_index] = byte;
                    }
                    file.buf_index += 1;
                    // A read-only handle's valid count belongs to the
                    // reader; writes must not extend it.
                    if !read_only {
                        file.buf_valid += 1;
                    }
                    file.buf_dirty = true;
                    if consumed {
                        provided += 1;
                    }
                }

                if read_only
                    && (file.buf_index >= file.buf_valid || (file.buf_dirty && !file.buf_clean))
                {
                    // Write protection: a read-only stream only accepts
                    // bytes that overlay a region populated by a prior
                    // read. Errno is left untouched.
                    file.has_error = true;
                    provided = 0;
                    break;
                }

                if (flush_pending || file.buf_index >= capacity) && file.buf_valid != 0 {
                    if !pos_synced {
                        match services.set_position(native, file.position) {
                            Some(resolved) => file.position = FilePos::At(resolved),
                            None => file.has_error = true,
                        }
                        pos_synced = true;
                    }

                    let count = file.buf_valid;
                    let written = if file.buf_clean {
                        // Contents came from a read and are already on
                        // the media; skip the redundant provider write.
                        count
                    } else {
                        match file.buffer.as_ref() {
                            Some(buffer) => services.write(native, &buffer[..count]),
                            None => 0,
                        }
                    };
                    if written < count {
                        file.has_error = true;
                    }

                    file.position = file.position.advanced(written as i64);
                    file.buf_index = 0;
                    file.buf_valid = 0;
                    file.buf_dirty = false;
                    file.buf_clean = false;
                }

                flush_pending = false;
            }

            provided
        };

        let elements = accepted / if size == 0 { 1 } else { size };

        // Console output appears without buffering delay; a redirected
        // console stream has a real sink worth buffering for.
        if elements != 0 && (id == STDOUT || id == STDERR) {
            let redirected = self
                .stream(id)
                .map(|file| file.open_flags.redirected)
                .unwrap_or(true);
            if !redirected {
                self.fflush(id);
            }
        }

        elements
    }
}
