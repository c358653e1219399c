//! Stream status queries and the single-byte read helper.

use crate::context::Context;
use crate::services::{FilePos, ServiceProvider};
use crate::stdio::EOF;
use crate::stdio::file::FileId;

impl<P: ServiceProvider> Context<P> {
    /// End-of-file indicator. A foreign or stale id reads as "not at
    /// EOF" rather than failing.
    pub fn feof(&self, id: FileId) -> bool {
        self.stream(id).map(|file| file.at_eof).unwrap_or(false)
    }

    /// Error indicator, with the same invalid-id degradation as
    /// [`Context::feof`].
    pub fn ferror(&self, id: FileId) -> bool {
        self.stream(id).map(|file| file.has_error).unwrap_or(false)
    }

    /// Reset the end-of-file and error indicators.
    pub fn clearerr(&mut self, id: FileId) {
        if let Some(file) = self.stream_mut(id) {
            file.at_eof = false;
            file.has_error = false;
        }
    }

    /// Read one byte through the buffered read engine.
    ///
    /// Returns the byte zero-extended, or [`EOF`] if the stream produced
    /// nothing (end of file or error).
    pub fn fgetc(&mut self, id: FileId) -> i32 {
        let mut byte = [0u8; 1];
        if self.fread(&mut byte, 1, 1, id) != 1 {
            return EOF;
        }
        i32::from(byte[0])
    }

    /// Logical stream offset: buffer start plus bytes buffered or
    /// consumed. Returns -1 for an invalid id or a position still at the
    /// unresolved end-of-file sentinel.
    pub fn ftell(&self, id: FileId) -> i64 {
        match self.stream(id) {
            Some(file) => match file.position {
                FilePos::At(p) => p + file.buf_index as i64,
                FilePos::SeekEnd => -1,
            },
            None => -1,
        }
    }
}
