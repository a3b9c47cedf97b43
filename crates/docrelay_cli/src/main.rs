//! Docrelay CLI
//!
//! Command-line entry point for the docrelay server.
//!
//! # Commands
//!
//! - `serve` - Run the HTTP/WebSocket server
//! - `hash` - Hash a password for out-of-band user provisioning

use clap::{Parser, Subcommand};
use docrelay_server::{serve, PasswordHasher, ServerConfig};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Docrelay data-access backend.
#[derive(Parser)]
#[command(name = "docrelay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP/WebSocket server
    Serve {
        /// Address to bind to (overrides DOCRELAY_BIND)
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Seed admin password (overrides DOCRELAY_ADMIN_PASSWORD)
        #[arg(long)]
        admin_password: Option<String>,

        /// Skip seed admin creation
        #[arg(long)]
        no_seed: bool,
    },

    /// Hash a password for storing in a user document
    Hash {
        /// Text to hash
        text: String,

        /// Argon2 memory cost in KiB
        #[arg(long, default_value = "19456")]
        memory_kib: u32,

        /// Argon2 iteration count
        #[arg(long, default_value = "2")]
        iterations: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve {
            bind,
            admin_password,
            no_seed,
        } => {
            let mut config = ServerConfig::from_env()?;
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(password) = admin_password {
                config = config.with_admin_password(password);
            }
            if no_seed {
                config = config.with_seed_admin(false);
            }
            tracing::info!(
                bind = %config.bind_addr,
                seed_admin = config.seed_admin,
                "starting docrelay"
            );
            serve(config).await?;
        }
        Commands::Hash {
            text,
            memory_kib,
            iterations,
        } => {
            let hasher = PasswordHasher::new(memory_kib, iterations)?;
            println!("{}", hasher.hash(&text)?);
        }
    }

    Ok(())
}
