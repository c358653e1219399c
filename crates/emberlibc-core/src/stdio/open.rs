//! Opening and closing streams.
//!
//! Open combines slot allocation, an existence probe, and mode resolution
//! into a ready-to-use handle. The probe is load-bearing: the provider's
//! single open primitive cannot disambiguate every combination of
//! create/append/truncate/read/write against pre-existing files, so a
//! read-only, non-creating open supplies the missing "does it already
//! exist" fact first.

use crate::context::Context;
use crate::errno::{EMFILE, ENOENT};
use crate::services::{FilePos, ServiceProvider};
use crate::stdio::file::{FileHandle, FileId};
use crate::stdio::mode::resolve_mode;
use crate::string::wide::widen;

impl<P: ServiceProvider> Context<P> {
    /// Open `filename` with a C mode string. Returns the stream id, or
    /// `None` with errno set ("no free handle" or "open rejected").
    pub fn fopen(&mut self, filename: &str, mode: &str) -> Option<FileId> {
        let flags = resolve_mode(mode);
        let wide_name = widen(filename);

        let Some(id) = self.files.allocate() else {
            self.errno = EMFILE;
            return None;
        };

        // Existence probe: read-only, non-creating open of the same name;
        // the hint value passed with it does not matter.
        let probe = resolve_mode("r");
        let exists = match self.services.open(&wide_name, &probe, false) {
            Some(handle) => {
                self.services.close(handle);
                true
            }
            None => false,
        };

        match self.services.open(&wide_name, &flags, exists) {
            Some(native) => {
                let Some(slot) = self.files.get_mut(id) else {
                    self.services.close(native);
                    return None;
                };
                slot.native = Some(native);
                slot.open_flags = flags;
                slot.position = FilePos::At(0);
                Some(id)
            }
            None => {
                self.files.release(id);
                self.errno = ENOENT;
                None
            }
        }
    }

    /// Switch a stream between text and binary translation.
    ///
    /// Mirrors the Microsoft `_setmode` extension. Mode strings cannot
    /// request text translation (the `t` token is stripped during
    /// normalization), so console setup and callers that want CRLF
    /// translation flip it here. Returns `false` on an invalid id.
    pub fn set_text_mode(&mut self, id: FileId, text: bool) -> bool {
        match self.stream_mut(id) {
            Some(file) => {
                file.open_flags.text = text;
                file.open_flags.binary = !text;
                true
            }
            None => false,
        }
    }

    /// Close a stream: flush pending written bytes, close the provider
    /// handle, release the slot. Returns `false` on an invalid id or
    /// provider rejection.
    pub fn fclose(&mut self, id: FileId) -> bool {
        let dirty = match self.stream(id) {
            Some(handle) => handle.buf_dirty && !handle.buf_clean,
            None => return false,
        };
        if dirty {
            self.fflush(id);
        }

        let Some((handle, services)) = self.stream_and_services(id) else {
            return false;
        };
        let closed = match handle.native.take() {
            Some(native) => services.close(native),
            None => false,
        };

        match id.std_index() {
            Some(k) => self.std_streams[k] = FileHandle::vacant(),
            None => self.files.release(id),
        }
        closed
    }
}
