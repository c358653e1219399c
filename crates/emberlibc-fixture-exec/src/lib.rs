//! In-memory service provider for emberlibc tooling.
//!
//! [`MemProvider`] implements the firmware [`ServiceProvider`] contract
//! against a plain in-memory file store, and records every primitive call
//! in a journal so tests can assert provider-visible behavior: probe
//! opens, existence-hint handling, flush counts, seek resolution.
//!
//! This crate is test/harness tooling. The core consumes it only as a
//! dev-dependency; nothing here ships to the firmware target.

#![forbid(unsafe_code)]

use std::collections::HashMap;

use emberlibc_core::{FilePos, NativeHandle, OpenFlags, ServiceProvider};

// ---------------------------------------------------------------------------
// Call journal
// ---------------------------------------------------------------------------

/// One recorded provider primitive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Open {
        name: String,
        exists_hint: bool,
        accepted: bool,
        /// Whether the existing-file truncate special-casing ran.
        truncated: bool,
    },
    Read {
        count: usize,
    },
    Write {
        count: usize,
    },
    SetPosition {
        requested: FilePos,
        resolved: Option<i64>,
    },
    Close {
        accepted: bool,
    },
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct OpenFile {
    name: String,
    cursor: usize,
}

/// In-memory file store implementing the service-provider contract.
#[derive(Debug, Default)]
pub struct MemProvider {
    files: HashMap<String, Vec<u8>>,
    handles: HashMap<u64, OpenFile>,
    next_handle: u64,
    journal: Vec<ProviderCall>,
    write_cap: Option<usize>,
}

impl MemProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file before the scenario under test runs.
    pub fn insert_file(&mut self, name: &str, bytes: &[u8]) {
        self.files.insert(name.to_string(), bytes.to_vec());
    }

    /// Media content of a file, as the provider sees it right now.
    pub fn contents(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }

    pub fn journal(&self) -> &[ProviderCall] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    /// Number of raw-write calls recorded so far.
    pub fn write_calls(&self) -> usize {
        self.journal
            .iter()
            .filter(|call| matches!(call, ProviderCall::Write { .. }))
            .count()
    }

    /// Cap every raw write at `cap` bytes, to exercise short-write
    /// handling. `None` restores unlimited writes.
    pub fn set_write_cap(&mut self, cap: Option<usize>) {
        self.write_cap = cap;
    }

    /// Test setup hook: open a named stream directly, bypassing the open
    /// matrix and the journal. Used to stand in for console handles.
    pub fn open_console(&mut self, name: &str) -> NativeHandle {
        self.files.entry(name.to_string()).or_default();
        self.issue_handle(name)
    }

    fn issue_handle(&mut self, name: &str) -> NativeHandle {
        self.next_handle += 1;
        let raw = self.next_handle;
        self.handles.insert(
            raw,
            OpenFile {
                name: name.to_string(),
                cursor: 0,
            },
        );
        NativeHandle::new(raw)
    }
}

fn narrow(name: &[u16]) -> String {
    name.iter()
        .take_while(|&&unit| unit != 0)
        .map(|&unit| char::from(unit as u8))
        .collect()
}

impl ServiceProvider for MemProvider {
    fn open(&mut self, name: &[u16], flags: &OpenFlags, exists: bool) -> Option<NativeHandle> {
        let name = narrow(name);
        let present = self.files.contains_key(&name);

        let accepted = if flags.exclusive && exists {
            false
        } else if !present && !flags.create {
            false
        } else {
            true
        };

        let mut truncated = false;
        if accepted {
            if !present {
                self.files.insert(name.clone(), Vec::new());
            } else if exists && flags.truncate {
                // Truncate special-casing is reserved for files the
                // caller said exist.
                if let Some(content) = self.files.get_mut(&name) {
                    content.clear();
                    truncated = true;
                }
            }
        }

        self.journal.push(ProviderCall::Open {
            name: name.clone(),
            exists_hint: exists,
            accepted,
            truncated,
        });

        accepted.then(|| self.issue_handle(&name))
    }

    fn read(&mut self, handle: NativeHandle, buf: &mut [u8]) -> usize {
        let Some(open) = self.handles.get_mut(&handle.raw()) else {
            return 0;
        };
        let Some(content) = self.files.get(&open.name) else {
            return 0;
        };
        let available = content.len().saturating_sub(open.cursor);
        let count = buf.len().min(available);
        buf[..count].copy_from_slice(&content[open.cursor..open.cursor + count]);
        open.cursor += count;
        self.journal.push(ProviderCall::Read { count });
        count
    }

    fn write(&mut self, handle: NativeHandle, buf: &[u8]) -> usize {
        let Some(open) = self.handles.get_mut(&handle.raw()) else {
            return 0;
        };
        let Some(content) = self.files.get_mut(&open.name) else {
            return 0;
        };
        let count = match self.write_cap {
            Some(cap) => buf.len().min(cap),
            None => buf.len(),
        };
        if content.len() < open.cursor + count {
            content.resize(open.cursor + count, 0);
        }
        content[open.cursor..open.cursor + count].copy_from_slice(&buf[..count]);
        open.cursor += count;
        self.journal.push(ProviderCall::Write { count });
        count
    }

    fn set_position(&mut self, handle: NativeHandle, pos: FilePos) -> Option<i64> {
        let resolved = match self.handles.get_mut(&handle.raw()) {
            Some(open) => {
                let len = self.files.get(&open.name).map(Vec::len).unwrap_or(0);
                let target = match pos {
                    FilePos::At(p) if p >= 0 => Some(p as usize),
                    FilePos::At(_) => None,
                    FilePos::SeekEnd => Some(len),
                };
                if let Some(target) = target {
                    open.cursor = target;
                }
                target.map(|t| t as i64)
            }
            None => None,
        };
        self.journal.push(ProviderCall::SetPosition {
            requested: pos,
            resolved,
        });
        resolved
    }

    fn close(&mut self, handle: NativeHandle) -> bool {
        let accepted = self.handles.remove(&handle.raw()).is_some();
        self.journal.push(ProviderCall::Close { accepted });
        accepted
    }
}
