//! iSCSI Probe CLI
//!
//! Sends a single request header to a target and prints the reply.

use std::net::TcpStream;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use iscsi_responder::protocol::{read_header, write_header, RequestOpcode};
use iscsi_responder::{Header, IscsiError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// iSCSI probe
#[derive(Parser, Debug)]
#[command(name = "iscsi-probe")]
#[command(about = "Send one iSCSI request header and print the reply")]
struct Cli {
    /// Target address
    #[arg(short, long, default_value = "127.0.0.1:3260")]
    target: String,

    /// Give up waiting for a reply after this many milliseconds
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

/// Fields every request carries
#[derive(Args, Debug)]
struct Addressing {
    /// Initiator task tag
    #[arg(long, default_value = "1")]
    task_tag: u32,

    /// Connection ID
    #[arg(long, default_value = "0")]
    cid: u32,

    /// Logical unit number
    #[arg(long, default_value = "0")]
    lun: u64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a Login Request
    Login {
        #[command(flatten)]
        addressing: Addressing,
    },

    /// Send a SCSI Command
    Command {
        /// Expected data transfer length
        #[arg(long, default_value = "0")]
        length: u32,

        #[command(flatten)]
        addressing: Addressing,
    },

    /// Send a Logout Request
    Logout {
        #[command(flatten)]
        addressing: Addressing,
    },

    /// Send a header with an arbitrary opcode
    Raw {
        /// Opcode byte (decimal, or hex with 0x prefix)
        #[arg(long, value_parser = parse_opcode)]
        opcode: u8,

        /// Value of the data/length field
        #[arg(long, default_value = "0")]
        data: u32,

        #[command(flatten)]
        addressing: Addressing,
    },
}

fn parse_opcode(s: &str) -> std::result::Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid opcode '{}': {}", s, e))
}

fn request_for(command: &Commands) -> Header {
    let (operation, data_or_length, addressing) = match command {
        Commands::Login { addressing } => (RequestOpcode::LoginRequest as u8, 0, addressing),
        Commands::Command { length, addressing } => {
            (RequestOpcode::ScsiCommand as u8, *length, addressing)
        }
        Commands::Logout { addressing } => (RequestOpcode::LogoutRequest as u8, 0, addressing),
        Commands::Raw {
            opcode,
            data,
            addressing,
        } => (*opcode, *data, addressing),
    };

    Header {
        operation,
        flags: 0,
        task_tag: addressing.task_tag,
        data_or_length,
        connection_id: addressing.cid,
        logical_unit: addressing.lun,
    }
}

fn exchange(target: &str, timeout_ms: u64, request: &Header) -> Result<Header> {
    let mut stream = TcpStream::connect(target)
        .map_err(|e| IscsiError::Network(format!("failed to connect to {}: {}", target, e)))?;
    if timeout_ms > 0 {
        stream.set_read_timeout(Some(Duration::from_millis(timeout_ms)))?;
    }

    write_header(&mut stream, request)?;

    read_header(&mut stream)?.ok_or_else(|| {
        IscsiError::Network("target closed the connection without replying".to_string())
    })
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Cli::parse();
    let request = request_for(&args.command);

    tracing::debug!("Sending {:?} to {}", request, args.target);

    match exchange(&args.target, args.timeout_ms, &request) {
        Ok(reply) => {
            println!("opcode:         0x{:02x}", reply.operation);
            println!("flags:          0x{:02x}", reply.flags);
            println!("task_tag:       {}", reply.task_tag);
            println!("data_or_length: {}", reply.data_or_length);
            println!("connection_id:  {}", reply.connection_id);
            println!("logical_unit:   {}", reply.logical_unit);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
