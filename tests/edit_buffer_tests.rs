//! Integration tests for the edit buffer (`storage_console::state::edit_buffer`).
//!
//! No store needed, only state transitions.

mod common;

use storage_console::models::{Server, StorageResource};
use storage_console::state::EditBuffer;

use common::existing_resource;

const SCRIPT_LEN: usize = 10;

/// A mix of edits, some of which undo earlier ones.
fn edit_step(step: usize, r: &mut StorageResource) {
    match step {
        0 => r.db = "other".into(),
        1 => r.db = "mydb".into(),
        2 => r.servers.push(Server::new("h2", 27018)),
        3 => r.credential_mut().password = "changed".into(),
        4 => {
            r.servers.pop();
        }
        5 => r.credential_mut().password = "p".into(),
        6 => r.credentials.clear(),
        7 => r.credential_mut().username = "u".into(),
        8 => r.servers[0].port = 1,
        _ => r.servers[0].port = 27017,
    }
}

// =============================================================================
// Dirty flag invariant
// =============================================================================

#[test]
fn test_dirty_tracks_structural_difference_after_every_mutation() {
    for initial in [Some(existing_resource("s1")), None] {
        let mut buffer = EditBuffer::initialize(initial);
        assert!(!buffer.is_dirty());

        for step in 0..SCRIPT_LEN {
            buffer.mutate(|r| edit_step(step, r));
            assert_eq!(buffer.is_dirty(), buffer.working() != buffer.pristine());
        }
    }
}

#[test]
fn test_noop_mutation_keeps_clean_buffer_clean() {
    let mut buffer = EditBuffer::initialize(Some(existing_resource("s1")));
    buffer.mutate(|r| r.db = r.db.clone());
    assert!(!buffer.is_dirty());
}

#[test]
fn test_create_mode_is_fixed_at_construction() {
    let mut buffer = EditBuffer::initialize(None);
    buffer.mutate(|r| r.id = "s1".into());
    buffer.rebaseline();
    buffer.reset();
    assert!(buffer.is_create_mode());

    let mut buffer = EditBuffer::initialize(Some(existing_resource("s1")));
    buffer.mutate(|r| r.id.clear());
    buffer.reset();
    assert!(!buffer.is_create_mode());
}

// =============================================================================
// reset / rebaseline
// =============================================================================

#[test]
fn test_reset_restores_pristine() {
    let mut buffer = EditBuffer::initialize(Some(existing_resource("s1")));
    for step in 0..4 {
        buffer.mutate(|r| edit_step(step, r));
    }
    assert!(buffer.is_dirty());

    buffer.reset();
    assert!(!buffer.is_dirty());
    assert_eq!(buffer.working(), buffer.pristine());
    assert_eq!(buffer.working(), &existing_resource("s1"));
}

#[test]
fn test_rebaseline_promotes_working_copy() {
    let mut buffer = EditBuffer::initialize(Some(existing_resource("s1")));
    buffer.mutate(|r| r.db = "renamed".into());
    let at_call = buffer.working().clone();

    buffer.rebaseline();
    assert!(!buffer.is_dirty());
    assert_eq!(buffer.pristine(), &at_call);

    // Later edits diverge from the new baseline, and reset returns to it.
    buffer.mutate(|r| r.db = "again".into());
    assert!(buffer.is_dirty());
    buffer.reset();
    assert_eq!(buffer.working().db, "renamed");
}

#[test]
fn test_reset_keeps_password_confirmation() {
    let mut buffer = EditBuffer::initialize(None);
    buffer.set_password_confirmation("typed");
    buffer.mutate(|r| r.db = "x".into());
    buffer.reset();
    assert_eq!(buffer.password_confirmation(), "typed");
}
