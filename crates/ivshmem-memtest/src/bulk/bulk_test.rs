// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for the bulk passes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use ivshmem::SharedWindow;

fn session(slots: usize) -> ControlSession {
    let size = layout::CONTROL_RECORD_SIZE + slots * layout::SLOT_SIZE;
    ControlSession::new(SharedWindow::heap(size).mapping()).unwrap()
}

#[test]
fn write_pass_fills_pattern() {
    let s = session(4);
    assert_eq!(write_pass(&s, 42), 4);
    let slots: Vec<_> = (0..4).map(|i| s.slot(i).unwrap()).collect();
    assert_eq!(slots, vec![42, 1 ^ 42, 2 ^ 42, 3 ^ 42]);
}

#[test]
fn write_pass_leaves_control_record_alone() {
    let s = session(8);
    s.set(ivshmem_abi::ControlField::Shutdown, 0);
    write_pass(&s, u32::MAX);
    assert!(!s.is_shutdown());
    assert_eq!(s.server(), None);
}

#[test]
fn verify_pass_accepts_matching_pattern() {
    let s = session(64);
    write_pass(&s, 0xDEAD_BEEF);
    assert_eq!(verify_pass(&s, 0xDEAD_BEEF), Ok(64));
}

#[test]
fn verify_pass_reports_first_mismatch() {
    let s = session(8);
    write_pass(&s, 7);
    assert!(s.set_slot(5, 0));
    assert!(s.set_slot(2, 0xFFFF_FFFF));
    assert_eq!(
        verify_pass(&s, 7),
        Err(HandshakeError::VerificationMismatch {
            index: 2,
            expected: 2 ^ 7,
            found: 0xFFFF_FFFF,
        })
    );
}

#[test]
fn verify_pass_rejects_other_seed() {
    let s = session(4);
    write_pass(&s, 1);
    let err = verify_pass(&s, 2).unwrap_err();
    assert!(matches!(err, HandshakeError::VerificationMismatch { index: 0, .. }));
}
