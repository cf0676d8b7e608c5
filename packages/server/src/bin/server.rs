//! Multi-room WebSocket chat broker.
//!
//! Without a subcommand the primary room `main` (with the admin API) is
//! started on `--port`, plus the fixed rooms `chat1` and `chat2`.
//! `custom <PORT>` starts a single `custom-<PORT>` room instead.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomcast-server
//! cargo run --bin roomcast-server -- --port 3000
//! cargo run --bin roomcast-server -- custom 9090
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use roomcast_server::{
    domain::{Port, RoomId},
    ui::{STATIC_ROOMS, ServerConfig, Supervisor, shutdown_signal},
};
use roomcast_shared::logger::setup_logger;
use tokio::sync::watch;

#[derive(Parser, Debug)]
#[command(name = "roomcast-server")]
#[command(about = "Multi-room WebSocket chat broker", long_about = None)]
struct Args {
    /// Host address every room binds to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port of the primary room
    #[arg(short = 'p', long, default_value = "8080")]
    port: Port,

    /// Directory served as static files by every room
    #[arg(long, default_value = "./public")]
    public_dir: PathBuf,

    /// Outbound queue depth per client; a client falling further behind is disconnected
    #[arg(long, default_value_t = 64)]
    outbound_capacity: usize,

    /// Broadcast intake depth per room
    #[arg(long, default_value_t = 256)]
    broadcast_capacity: usize,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a single room with id `custom-<PORT>`
    Custom {
        /// Port of the room (1024-65535)
        port: String,
    },
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = ServerConfig {
        host: args.host,
        public_dir: args.public_dir,
        outbound_capacity: args.outbound_capacity,
        broadcast_capacity: args.broadcast_capacity,
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let supervisor = Supervisor::new(config, shutdown_rx);

    match args.command {
        Some(Command::Custom { port }) => {
            if let Err(e) = supervisor.start_custom(&port).await {
                tracing::error!("Failed to start custom server: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            if let Err(e) = supervisor.start_primary(args.port).await {
                tracing::error!("Failed to start main server: {}", e);
                std::process::exit(1);
            }
            for (id, port) in STATIC_ROOMS {
                let port = match Port::new(port) {
                    Ok(port) => port,
                    Err(e) => {
                        tracing::error!("Skipping room {}: {}", id, e);
                        continue;
                    }
                };
                if let Err(e) = supervisor.start_room(RoomId::new(id), port).await {
                    tracing::error!("Failed to start server {}: {}", id, e);
                }
            }
        }
    }

    shutdown_signal().await;
    let _ = shutdown_tx.send(true);
    supervisor.wait().await;

    tracing::info!("Server shutdown complete");
}
