//! Buffered read engine, symmetric to the write engine.
//!
//! Reads consume the shared per-handle buffer and refill it from the
//! provider when exhausted. A refill first resolves the read/write
//! conflict on the shared buffer: genuinely dirty written bytes are
//! flushed out, while a fully consumed clean region just advances the
//! logical position past itself. Refilled contents are marked clean,
//! which is what arms the read-then-writeback allowance in the write
//! engine's protection rule.

use crate::context::Context;
use crate::services::{FilePos, ServiceProvider};
use crate::stdio::file::FileId;

/// Text-mode end-of-stream marker (CTRL-Z).
const TEXT_EOF: u8 = 0x1A;

impl<P: ServiceProvider> Context<P> {
    /// Read up to `size * nelem` bytes into `dst`.
    ///
    /// Returns whole elements produced, with the same divide-by-zero
    /// guard as the write engine. In text mode a CR immediately followed
    /// by LF collapses to LF, and CTRL-Z ends the stream.
    pub fn fread(&mut self, dst: &mut [u8], size: usize, nelem: usize, id: FileId) -> usize {
        let Some((file, services)) = self.stream_and_services(id) else {
            return 0;
        };
        let Some(native) = file.native else {
            return 0;
        };
        if !file.open_flags.readable {
            file.has_error = true;
            return 0;
        }
        if file.at_eof {
            return 0;
        }

        let capacity = file.buffer_capacity();
        let requested = size.saturating_mul(nelem).min(dst.len());
        let text_mode = file.open_flags.text;

        let mut provided = 0usize;
        while provided < requested {
            if file.buf_index >= file.buf_valid {
                if file.buf_dirty && !file.buf_clean && file.buf_valid != 0 {
                    // Unflushed written bytes share this buffer; push
                    // them out before repositioning for the read.
                    if let Some(resolved) = services.set_position(native, file.position) {
                        file.position = FilePos::At(resolved);
                    }
                    let count = file.buf_valid;
                    let written = match file.buffer.as_ref() {
                        Some(buffer) => services.write(native, &buffer[..count]),
                        None => 0,
                    };
                    if written < count {
                        file.has_error = true;
                    }
                    file.position = file.position.advanced(written as i64);
                } else if file.buf_clean {
                    // Consumed read region is behind us now.
                    file.position = file.position.advanced(file.buf_valid as i64);
                }
                file.buf_index = 0;
                file.buf_valid = 0;
                file.buf_dirty = false;
                file.buf_clean = false;

                if let Some(resolved) = services.set_position(native, file.position) {
                    file.position = FilePos::At(resolved);
                }
                let filled = match file.buffer.as_mut() {
                    Some(buffer) => services.read(native, &mut buffer[..capacity]),
                    None => 0,
                };
                if filled == 0 {
                    file.at_eof = true;
                    break;
                }
                file.buf_valid = filled;
                file.buf_clean = true;
            }

            let byte = match file.buffer.as_ref() {
                Some(buffer) => buffer[file.buf_index],
                None => break,
            };
            file.buf_index += 1;

            if text_mode {
                if byte == TEXT_EOF {
                    file.at_eof = true;
                    break;
                }
                if byte == b'\r' {
                    let lf_follows = match file.buffer.as_ref() {
                        Some(buffer) => {
                            file.buf_index < file.buf_valid && buffer[file.buf_index] == b'\n'
                        }
                        None => false,
                    };
                    if lf_follows {
                        // Collapse the pair; the LF is delivered on the
                        // next iteration.
                        continue;
                    }
                }
            }

            dst[provided] = byte;
            provided += 1;
        }

        provided / if size == 0 { 1 } else { size }
    }
}
