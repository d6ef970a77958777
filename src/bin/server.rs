//! iSCSI Target Binary
//!
//! Starts the TCP target that answers iSCSI request headers.

use std::sync::atomic::Ordering;

use clap::Parser;
use iscsi_responder::network::Server;
use iscsi_responder::Config;
use tracing_subscriber::{fmt, EnvFilter};

/// iSCSI header responder target
#[derive(Parser, Debug)]
#[command(name = "iscsi-target")]
#[command(about = "Answers iSCSI login, command and logout headers")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:3260")]
    listen: String,

    /// Worker threads serving connections
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Accepted connections allowed to wait for a worker
    #[arg(long, default_value = "1024")]
    max_pending: usize,

    /// Residual count reported in SCSI Command Responses
    #[arg(short, long, default_value = "8")]
    residual: u32,

    /// Read timeout in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,

    /// Write timeout in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,iscsi_responder=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("iSCSI target v{}", iscsi_responder::VERSION);
    tracing::info!("Listen address: {}", args.listen);
    tracing::info!("Command residual: {}", args.residual);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .max_pending_connections(args.max_pending)
        .command_residual(args.residual)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start target: {}", e);
            std::process::exit(1);
        }
    };

    // Ctrl+C stops accepting and closes live connections
    let shutdown = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, initiating shutdown...");
        shutdown.store(true, Ordering::Relaxed);
    }) {
        tracing::warn!("Failed to install Ctrl+C handler: {}", e);
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
