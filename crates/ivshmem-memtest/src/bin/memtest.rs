// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Run the memory test handshake between two peers on a loopback
//! interconnect.

use std::thread;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use ivshmem::{Fabric, PeerId};
use ivshmem_memtest::{Client, HandshakeConfig, Server};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "memtest", version, about = "ivshmem write-then-verify handshake")]
struct Args {
    /// Full passes over the window per round
    #[arg(long, default_value_t = ivshmem_memtest::config::DEFAULT_PASSES)]
    passes: u32,

    /// Rounds before the client shuts down (0 runs until interrupted)
    #[arg(long, default_value_t = 10)]
    rounds: u64,

    /// Shared window size in bytes
    #[arg(long, default_value_t = 1 << 20)]
    window_size: usize,

    /// Peer id of the server
    #[arg(long, default_value_t = 0)]
    server_id: u16,

    /// Peer id of the client
    #[arg(long, default_value_t = 1)]
    client_id: u16,

    /// Give up on a doorbell after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Seed for the round seeds, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> HandshakeConfig {
        let mut config = HandshakeConfig::default().with_passes(self.passes);
        if self.rounds > 0 {
            config = config.with_rounds(self.rounds);
        }
        if let Some(ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_thread_names(true)
        .init();

    if args.server_id == args.client_id {
        bail!("server and client need distinct peer ids");
    }
    let config = args.config();
    let server_id = PeerId::new(args.server_id);
    let client_id = PeerId::new(args.client_id);

    let fabric = Fabric::new(args.window_size);
    info!(size = fabric.window_size(), "shared window");
    let server_dev = fabric.attach(server_id).context("attaching server")?;
    let client_dev = fabric.attach(client_id).context("attaching client")?;

    let server = Server::new(server_dev.handle().clone(), config).context("server setup")?;
    let client = Client::new(client_dev.handle().clone(), config).context("client setup")?;

    let server_thread = thread::Builder::new()
        .name("server".into())
        .spawn(move || server.run())
        .context("spawning server")?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let client_result = client.run(&mut rng);
    if client_result.is_err() {
        // The server may still be waiting for a doorbell that never comes
        server_dev.detach();
    }

    let server_result = server_thread
        .join()
        .map_err(|_| anyhow::anyhow!("server thread panicked"))?;

    let client_summary = client_result.context("client")?;
    let server_summary = server_result.context("server")?;
    info!(
        rounds = client_summary.rounds,
        client = %client_summary.throughput,
        server = %server_summary.throughput,
        "memtest passed"
    );
    Ok(())
}
