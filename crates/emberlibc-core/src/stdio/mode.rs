//! Open-mode resolution.
//!
//! Parses C-library mode strings (`r`, `w`, `a`, `+`, `b`, `t`, `x`) into a
//! canonical flag set. Whitespace and the non-standard text-mode token `t`
//! are stripped before matching; the internal literal shortcut `"ctrwaxb"`
//! (create, truncate, read-write, append, binary) is recognized whole and
//! bypasses tokenization. Parsing is permissive: unrecognized characters
//! pass through silently, mirroring C-library behavior.

// ---------------------------------------------------------------------------
// Flag bit vocabulary
// ---------------------------------------------------------------------------

// Microsoft-compatible open flag bits, preserved bit-for-bit for callers
// that persist them.
pub const O_RDONLY: u32 = 0x0000;
pub const O_WRONLY: u32 = 0x0001;
pub const O_RDWR: u32 = 0x0002;
pub const O_RDWRMSK: u32 = 0x0003;
pub const O_APPEND: u32 = 0x0008;
pub const O_CREAT: u32 = 0x0100;
pub const O_TRUNC: u32 = 0x0200;
pub const O_EXCL: u32 = 0x0400;
pub const O_TEXT: u32 = 0x4000;
pub const O_BINARY: u32 = 0x8000;
/// Redirection marker for the console streams; affects only the
/// auto-flush shortcut in the write engine.
pub const O_CDEREDIR: u32 = 0x2000_0000;

/// Internal fixed literal shortcut: create, truncate, read-write, append,
/// binary as a single token. Matched case-insensitively before tokenization.
const MODE_SHORTCUT: &str = "ctrwaxb";

/// Delimiters stripped from mode strings: whitespace plus the
/// non-standard text-mode token.
const MODE_DELIMS: [char; 3] = [' ', '\t', 't'];

// ---------------------------------------------------------------------------
// Canonical flags
// ---------------------------------------------------------------------------

/// Canonical, post-parse open mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenFlags {
    pub readable: bool,
    pub writable: bool,
    pub append: bool,
    pub create: bool,
    pub truncate: bool,
    pub exclusive: bool,
    pub text: bool,
    pub binary: bool,
    /// Console stream redirected to a real sink.
    pub redirected: bool,
}

impl OpenFlags {
    /// A handle without write access. Such a handle's buffer is
    /// write-protected outside the read-then-writeback pattern.
    pub fn is_read_only(&self) -> bool {
        !self.writable
    }

    /// Serialize to the persisted `O_*` bit vocabulary.
    pub fn bits(&self) -> u32 {
        let mut bits = if self.readable && self.writable {
            O_RDWR
        } else if self.writable {
            O_WRONLY
        } else {
            O_RDONLY
        };
        if self.append {
            bits |= O_APPEND;
        }
        if self.create {
            bits |= O_CREAT;
        }
        if self.truncate {
            bits |= O_TRUNC;
        }
        if self.exclusive {
            bits |= O_EXCL;
        }
        if self.text {
            bits |= O_TEXT;
        }
        if self.binary {
            bits |= O_BINARY;
        }
        if self.redirected {
            bits |= O_CDEREDIR;
        }
        bits
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve a mode string to canonical flags.
///
/// Normalization strips whitespace and `t` (tokenize on the delimiter set,
/// concatenate the tokens), so `"r t"` and `"rt"` and `"r"` resolve
/// identically. Default mode, when neither `t` nor `b` survives, is binary.
pub fn resolve_mode(mode: &str) -> OpenFlags {
    if mode.eq_ignore_ascii_case(MODE_SHORTCUT) {
        return OpenFlags {
            readable: true,
            writable: true,
            append: true,
            create: true,
            truncate: true,
            binary: true,
            ..OpenFlags::default()
        };
    }

    let normalized: String = mode
        .split(MODE_DELIMS)
        .collect::<Vec<&str>>()
        .concat();

    let mut flags = OpenFlags::default();
    for c in normalized.chars() {
        match c {
            'r' => flags.readable = true,
            'w' => {
                flags.writable = true;
                flags.create = true;
                flags.truncate = true;
            }
            'a' => {
                flags.writable = true;
                flags.create = true;
                flags.append = true;
            }
            '+' => {
                flags.readable = true;
                flags.writable = true;
            }
            'b' => flags.binary = true,
            'x' => flags.exclusive = true,
            // Permissive: unrecognized characters pass through.
            _ => {}
        }
    }

    if !flags.text && !flags.binary {
        flags.binary = true;
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_read() {
        let f = resolve_mode("r");
        assert!(f.readable);
        assert!(!f.writable);
        assert!(f.is_read_only());
        assert!(f.binary); // default is binary
    }

    #[test]
    fn resolve_write_creates_and_truncates() {
        let f = resolve_mode("w");
        assert!(f.writable);
        assert!(f.create);
        assert!(f.truncate);
        assert!(!f.readable);
    }

    #[test]
    fn resolve_append_plus() {
        let f = resolve_mode("a+");
        assert!(f.readable);
        assert!(f.writable);
        assert!(f.append);
        assert!(!f.truncate);
    }

    #[test]
    fn resolve_exclusive() {
        let f = resolve_mode("wx");
        assert!(f.writable);
        assert!(f.exclusive);
    }

    #[test]
    fn normalization_is_idempotent_over_whitespace_and_t() {
        // All spellings equivalent after stripping resolve identically.
        let canonical = resolve_mode("rb");
        assert_eq!(resolve_mode("r b"), canonical);
        assert_eq!(resolve_mode("rbt"), canonical);
        assert_eq!(resolve_mode(" r\tb "), canonical);
        assert_eq!(resolve_mode("rtb"), canonical);
    }

    #[test]
    fn shortcut_bypasses_tokenization() {
        // The literal contains 't', which tokenization would strip; the
        // shortcut must match whole instead.
        let f = resolve_mode("ctrwaxb");
        assert!(f.readable);
        assert!(f.writable);
        assert!(f.append);
        assert!(f.create);
        assert!(f.truncate);
        assert!(f.binary);
        assert!(!f.exclusive);
        assert_eq!(resolve_mode("CTRWAXB"), f);
    }

    #[test]
    fn mode_unknown_characters_ignored() {
        // Compatibility: malformed mode strings are not rejected.
        assert_eq!(resolve_mode("rz"), resolve_mode("r"));
        assert_eq!(resolve_mode("q"), resolve_mode(""));
    }

    #[test]
    fn bits_round_trip_the_vocabulary() {
        let f = resolve_mode("w");
        let bits = f.bits();
        assert_eq!(bits & O_RDWRMSK, O_WRONLY);
        assert_ne!(bits & O_CREAT, 0);
        assert_ne!(bits & O_TRUNC, 0);
        assert_ne!(bits & O_BINARY, 0);
        assert_eq!(bits & O_CDEREDIR, 0);

        let rw = resolve_mode("r+");
        assert_eq!(rw.bits() & O_RDWRMSK, O_RDWR);
    }

    #[test]
    fn default_mode_is_binary() {
        assert!(resolve_mode("r").binary);
        assert!(resolve_mode("w").binary);
        assert!(!resolve_mode("r").text);
    }
}
