// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for the control record view.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use ivshmem::SharedWindow;
use ivshmem_abi::layout::CONTROL_RECORD_SIZE;

fn session(size: usize) -> ControlSession {
    ControlSession::new(SharedWindow::heap(size).mapping()).unwrap()
}

#[test]
fn slot_count_follows_window_size() {
    assert_eq!(session(CONTROL_RECORD_SIZE + 16).slots(), 4);
    assert_eq!(session(CONTROL_RECORD_SIZE + 31).slots(), 4);
    assert_eq!(session(CONTROL_RECORD_SIZE + 32).slots(), 8);
}

#[test]
fn too_small_windows_are_rejected() {
    for size in [0, CONTROL_RECORD_SIZE, CONTROL_RECORD_SIZE + 15] {
        let err = ControlSession::new(SharedWindow::heap(size).mapping()).unwrap_err();
        assert_eq!(err, HandshakeError::WindowTooSmall(size));
    }
}

#[test]
fn fresh_record_is_empty() {
    let s = session(4096);
    assert_eq!(s.server(), None);
    assert_eq!(s.client(), None);
    assert!(!s.is_ready());
    assert!(!s.is_started());
    assert!(!s.is_done());
    assert!(!s.is_shutdown());
}

#[test]
fn published_ids_round_trip_including_zero() {
    let s = session(4096);
    s.publish_server(PeerId::new(0));
    s.publish_client(PeerId::new(7));
    assert_eq!(s.server(), Some(PeerId::new(0)));
    assert_eq!(s.client(), Some(PeerId::new(7)));
    assert_eq!(s.get(ControlField::IvServer), 0x5A);
    assert_eq!(s.get(ControlField::IvClient), 0x0007_005A);
}

#[test]
fn flags_use_magic_values() {
    let s = session(4096);
    s.set(ControlField::Ready, READY);
    s.set(ControlField::Start, START);
    s.set(ControlField::Done, DONE);
    assert!(s.is_ready() && s.is_started() && s.is_done());

    s.set(ControlField::Done, 1);
    assert!(!s.is_done());
}

#[test]
fn shutdown_is_visible_through_other_views() {
    let window = SharedWindow::heap(4096);
    let a = ControlSession::new(window.mapping()).unwrap();
    let b = ControlSession::new(window.mapping()).unwrap();
    a.request_shutdown();
    assert!(b.is_shutdown());
}

#[test]
fn fields_are_little_endian_in_memory() {
    let window = SharedWindow::heap(4096);
    let s = ControlSession::new(window.mapping()).unwrap();
    s.set(ControlField::Data, 0x0102_0304);

    let mut raw = [0u8; 4];
    window.read_at(ControlField::Data.offset(), &mut raw);
    assert_eq!(raw, [4, 3, 2, 1]);
}

#[test]
fn slots_are_bounded() {
    let s = session(CONTROL_RECORD_SIZE + 16);
    assert!(s.set_slot(3, 9));
    assert_eq!(s.slot(3), Some(9));
    assert!(!s.set_slot(4, 9));
    assert_eq!(s.slot(4), None);
    assert_eq!(s.slot_offset(0), Some(CONTROL_RECORD_SIZE));
}
