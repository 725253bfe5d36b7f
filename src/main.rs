//! Command-line interface for etcd-dump
//!
//! # Usage Examples
//!
//! ## Dump
//! ```bash
//! # Dump the whole v2 keyspace
//! etcd-dump dump \
//!   --endpoints https://etcd-0:2379,https://etcd-1:2379 \
//!   --cert-path client.crt --key-path client.key --ca-path ca.crt \
//!   --destination ./snapshot
//!
//! # Dump one prefix over the v3 API
//! etcd-dump dump --enable-v3 --root /registry/services --destination ./services
//! ```
//!
//! ## Read load
//! ```bash
//! # 10 gets in bursts of 4 (three connections), each delayed up to 3 seconds
//! etcd-dump get-overload --enable-v3 \
//!   --etcd-key /config/a --numgets 10 --refresh-interval 4 --max-wait 3
//! ```
//!
//! Set `RUST_LOG=info` (or `debug`) to see progress.

use anyhow::Context;
use clap::{Parser, Subcommand};
use etcd_dump::{connect_store, ClientOpts, EtcdConnector};
use get_overload::{GetOverloadArgs, LoadGenerator};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "etcd-dump")]
#[command(about = "A tool for dumping etcd keyspaces and generating read load against etcd")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dumps the keyspace with key as path and value as contents of the file
    Dump {
        /// etcd connection options
        #[command(flatten)]
        client: ClientOpts,

        /// Destination directory to which the data will be dumped
        #[arg(long)]
        destination: PathBuf,

        /// Root from which dump will be taken
        #[arg(long, default_value = "/")]
        root: String,
    },

    /// Issues the requested number of gets against one key, in bursts
    #[command(name = "get-overload")]
    GetOverload {
        /// etcd connection options
        #[command(flatten)]
        client: ClientOpts,

        #[command(flatten)]
        args: GetOverloadArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Dump {
            client,
            destination,
            root,
        } => {
            let destination = std::path::absolute(&destination).with_context(|| {
                format!("Failed to resolve destination {}", destination.display())
            })?;
            let config = client
                .to_config()
                .context("Invalid etcd client configuration")?;
            let store = connect_store(&config, client.protocol())
                .await
                .context("Failed to connect to etcd")?;

            let stats = store
                .dump(&root, &destination)
                .await
                .with_context(|| format!("Failed to dump {root} to {}", destination.display()))?;

            tracing::info!(
                "Dump of {root} complete: {} files, {} bytes written to {}",
                stats.files_written,
                stats.bytes_written,
                destination.display()
            );
        }
        Commands::GetOverload { client, args } => {
            let config = client
                .to_config()
                .context("Invalid etcd client configuration")?;
            let connector = EtcdConnector::new(config, client.protocol());

            let summary = LoadGenerator::new(args.to_plan(), connector)
                .run()
                .await
                .with_context(|| format!("get-overload against {} failed", args.etcd_key))?;

            tracing::info!(
                "get-overload complete: {} gets in {} bursts",
                summary.requests,
                summary.bursts
            );
        }
    }

    Ok(())
}
