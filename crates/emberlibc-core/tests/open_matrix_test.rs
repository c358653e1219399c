//! Integration tests: open operation, existence probing, and handle
//! table exhaustion.

use emberlibc_core::Context;
use emberlibc_core::errno::{EMFILE, ENOENT};
use emberlibc_fixture_exec::{MemProvider, ProviderCall};

fn context(max_open: usize) -> Context<MemProvider> {
    Context::new(MemProvider::new(), max_open)
}

#[test]
fn open_probes_existence_before_real_open() {
    let mut ctx = context(4);
    ctx.services_mut().insert_file("DATA.BIN", b"abc");

    ctx.fopen("DATA.BIN", "r+").expect("open");

    let journal = ctx.services().journal();
    // Probe open, instant probe close, then the real open carrying the
    // existence fact.
    assert!(matches!(
        journal[0],
        ProviderCall::Open {
            accepted: true,
            exists_hint: false,
            ..
        }
    ));
    assert!(matches!(journal[1], ProviderCall::Close { accepted: true }));
    assert!(matches!(
        journal[2],
        ProviderCall::Open {
            accepted: true,
            exists_hint: true,
            ..
        }
    ));
}

#[test]
fn missing_file_yields_false_existence_hint() {
    let mut ctx = context(4);

    ctx.fopen("NEW.TXT", "w").expect("open");

    let real_opens: Vec<_> = ctx
        .services()
        .journal()
        .iter()
        .filter_map(|call| match call {
            ProviderCall::Open {
                accepted: true,
                exists_hint,
                truncated,
                ..
            } => Some((*exists_hint, *truncated)),
            _ => None,
        })
        .collect();
    // Only the real open was accepted, with hint=false and no
    // existing-file truncate special-casing.
    assert_eq!(real_opens, vec![(false, false)]);
}

#[test]
fn truncating_open_of_existing_file_clears_media() {
    let mut ctx = context(4);
    ctx.services_mut().insert_file("OLD.TXT", b"previous contents");

    let id = ctx.fopen("OLD.TXT", "w").expect("open");
    assert_eq!(ctx.services().contents("OLD.TXT"), Some(&[][..]));

    ctx.fwrite(b"new", 1, 3, id);
    assert!(ctx.fclose(id));
    assert_eq!(ctx.services().contents("OLD.TXT"), Some(&b"new"[..]));
}

#[test]
fn exclusive_open_fails_on_existing_file() {
    let mut ctx = context(4);
    ctx.services_mut().insert_file("TAKEN.TXT", b"x");

    assert!(ctx.fopen("TAKEN.TXT", "wx").is_none());
    assert_eq!(ctx.errno(), ENOENT);
}

#[test]
fn open_of_missing_file_read_only_fails_and_releases_slot() {
    let mut ctx = context(1);

    assert!(ctx.fopen("GHOST.TXT", "r").is_none());
    assert_eq!(ctx.errno(), ENOENT);

    // The failed open released its slot: the single-slot table still
    // has room.
    assert!(ctx.fopen("REAL.TXT", "w").is_some());
}

#[test]
fn table_exhaustion_fails_with_emfile() {
    let capacity = 4;
    let mut ctx = context(capacity);
    ctx.services_mut().insert_file("VALID.TXT", b"ok");

    for i in 0..capacity {
        let name = format!("F{i}.TXT");
        assert!(ctx.fopen(&name, "w").is_some(), "open #{i} should succeed");
    }

    // Exhaustion wins regardless of filename/mode validity.
    assert!(ctx.fopen("VALID.TXT", "r").is_none());
    assert_eq!(ctx.errno(), EMFILE);
}

#[test]
fn close_releases_slot_for_reuse() {
    let mut ctx = context(1);

    let id = ctx.fopen("A.TXT", "w").expect("open");
    assert!(ctx.fclose(id));
    // The released id no longer addresses a stream.
    assert!(!ctx.fclose(id));

    assert!(ctx.fopen("B.TXT", "w").is_some());
}

#[test]
fn close_flushes_buffered_writes() {
    let mut ctx = context(2);

    let id = ctx.fopen("TAIL.TXT", "wb").expect("open");
    ctx.fwrite(b"tail", 1, 4, id);
    assert_eq!(ctx.services().write_calls(), 0);

    assert!(ctx.fclose(id));
    assert_eq!(ctx.services().write_calls(), 1);
    assert_eq!(ctx.services().contents("TAIL.TXT"), Some(&b"tail"[..]));
}
