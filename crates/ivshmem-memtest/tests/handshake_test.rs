// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! End-to-end handshake tests over the loopback interconnect.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::thread;
use std::time::Duration;

use ivshmem::{Command, Fabric, PeerId};
use ivshmem_abi::layout::{CONTROL_RECORD_SIZE, ControlField, DONE, READY, SLOT_SIZE};
use ivshmem_memtest::bulk::write_pass;
use ivshmem_memtest::{Client, ControlSession, HandshakeConfig, HandshakeError, Server};
use rand::SeedableRng;
use rand::rngs::StdRng;

const SERVER: PeerId = PeerId::new(0);
const CLIENT: PeerId = PeerId::new(1);

fn config() -> HandshakeConfig {
    HandshakeConfig::default()
        .with_passes(2)
        .with_timeout(Duration::from_secs(10))
}

#[test]
fn test_seed_42_over_four_slots() {
    let fabric = Fabric::new(CONTROL_RECORD_SIZE + 4 * SLOT_SIZE);
    let server_dev = fabric.attach(SERVER).unwrap();
    let client_dev = fabric.attach(CLIENT).unwrap();

    let server = Server::new(server_dev.handle().clone(), config()).unwrap();
    assert_eq!(server.session().slots(), 4);
    let server_thread = thread::spawn(move || server.run());

    let mut client = Client::new(client_dev.handle().clone(), config()).unwrap();
    assert_eq!(client.connect().unwrap(), SERVER);
    client.round(42).unwrap();

    let session = client.session();
    let slots: Vec<u32> = (0..4).map(|i| session.slot(i).unwrap()).collect();
    assert_eq!(slots, vec![42, 1 ^ 42, 2 ^ 42, 3 ^ 42]);
    assert!(!session.is_shutdown());
    assert_eq!(client.rounds(), 1);

    client.shutdown().unwrap();
    let summary = server_thread.join().unwrap().unwrap();
    assert_eq!(summary.rounds, 1);
    assert_eq!(summary.throughput.bytes_written(), 2 * 4 * 4);
}

#[test]
fn test_corrupted_slot_fails_verification_and_shuts_down() {
    let fabric = Fabric::new(CONTROL_RECORD_SIZE + 16 * SLOT_SIZE);
    let server_dev = fabric.attach(SERVER).unwrap();
    let client_dev = fabric.attach(CLIENT).unwrap();

    // Play the server by hand so the slots can be corrupted mid-round
    let session = ControlSession::new(server_dev.map().unwrap()).unwrap();
    session.publish_server(SERVER);
    session.set(ControlField::Ready, READY);

    let mut client = Client::new(client_dev.handle().clone(), config()).unwrap();
    let client_thread = thread::spawn(move || client.round(0x1234_5678));

    // Hello, then answer with readiness
    server_dev.wait_event_timeout(Duration::from_secs(10)).unwrap();
    server_dev.ring(CLIENT, Command::WaitEventIrq).unwrap();

    // Round request
    server_dev.wait_event_timeout(Duration::from_secs(10)).unwrap();
    assert!(session.is_started());
    let seed = session.get(ControlField::Data);
    assert_eq!(seed, 0x1234_5678);
    session.set(ControlField::Start, 0);
    write_pass(&session, seed);
    assert!(session.set_slot(2, 0));
    session.set(ControlField::Done, DONE);
    server_dev.ring(CLIENT, Command::WaitEventIrq).unwrap();

    let result = client_thread.join().unwrap();
    assert_eq!(
        result,
        Err(HandshakeError::VerificationMismatch {
            index: 2,
            expected: 2 ^ 0x1234_5678,
            found: 0,
        })
    );
    assert!(session.is_shutdown());
    // The client woke the server one last time
    assert!(server_dev.pending().event);
}

#[test]
fn test_pair_runs_until_round_limit() {
    let fabric = Fabric::new(64 * 1024);
    let server_dev = fabric.attach(SERVER).unwrap();
    let client_dev = fabric.attach(CLIENT).unwrap();

    let server = Server::new(server_dev.handle().clone(), config()).unwrap();
    let client = Client::new(client_dev.handle().clone(), config().with_rounds(3)).unwrap();
    let slots = client.session().slots() as u64;

    let server_thread = thread::spawn(move || server.run());
    let client_summary = client.run(&mut StdRng::seed_from_u64(7)).unwrap();
    let server_summary = server_thread.join().unwrap().unwrap();

    assert_eq!(client_summary.rounds, 3);
    assert_eq!(server_summary.rounds, 3);
    assert_eq!(client_summary.throughput.bytes_read(), 3 * 2 * slots * 4);
    assert_eq!(server_summary.throughput.bytes_written(), 3 * 2 * slots * 4);
}

#[test]
fn test_client_started_first_still_connects() {
    let fabric = Fabric::new(4096);
    let server_dev = fabric.attach(SERVER).unwrap();
    let client_dev = fabric.attach(CLIENT).unwrap();

    let client = Client::new(client_dev.handle().clone(), config().with_rounds(2)).unwrap();
    let client_thread = thread::spawn(move || client.run(&mut StdRng::seed_from_u64(1)));
    thread::sleep(Duration::from_millis(20));

    let server = Server::new(server_dev.handle().clone(), config()).unwrap();
    let server_summary = server.run().unwrap();
    let client_summary = client_thread.join().unwrap().unwrap();
    assert_eq!(server_summary.rounds, 2);
    assert_eq!(client_summary.rounds, 2);
}

#[test]
fn test_zero_rounds_shuts_down_right_after_connecting() {
    let fabric = Fabric::new(4096);
    let server_dev = fabric.attach(SERVER).unwrap();
    let client_dev = fabric.attach(CLIENT).unwrap();

    let server = Server::new(server_dev.handle().clone(), config()).unwrap();
    let client = Client::new(client_dev.handle().clone(), config().with_rounds(0)).unwrap();
    let server_thread = thread::spawn(move || server.run());

    let client_summary = client.run(&mut StdRng::seed_from_u64(3)).unwrap();
    assert_eq!(client_summary.rounds, 0);
    assert_eq!(server_thread.join().unwrap().unwrap().rounds, 0);
}
