//! flatdb CLI
//!
//! Command-line front end for flatdb stores.
//!
//! # Commands
//!
//! - `put` - Write a record from a JSON string
//! - `get` - Print a single record
//! - `list` - Print every record in a collection
//! - `delete` - Remove a record, or a whole collection
//! - `seed` - Populate a store with sample user records

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// flatdb command-line store tools.
#[derive(Parser)]
#[command(name = "flatdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store root directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a record from a JSON string
    Put {
        /// Collection to write into
        collection: String,

        /// Resource name of the record
        resource: String,

        /// Record content as a JSON document
        value: String,
    },

    /// Print a single record
    Get {
        /// Collection to read from
        collection: String,

        /// Resource name of the record
        resource: String,
    },

    /// Print every record in a collection
    List {
        /// Collection to list
        collection: String,
    },

    /// Remove a record, or a whole collection if no resource is given
    Delete {
        /// Collection to delete from
        collection: String,

        /// Resource name; omit to delete the entire collection
        resource: Option<String>,
    },

    /// Populate a store with sample user records
    Seed {
        /// Collection to seed
        #[arg(short, long, default_value = "users")]
        collection: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Put {
            collection,
            resource,
            value,
        } => {
            let path = cli.path.ok_or("Store path required for put")?;
            commands::put::run(&path, &collection, &resource, &value)?;
        }
        Commands::Get {
            collection,
            resource,
        } => {
            let path = cli.path.ok_or("Store path required for get")?;
            commands::get::run(&path, &collection, &resource)?;
        }
        Commands::List { collection } => {
            let path = cli.path.ok_or("Store path required for list")?;
            commands::list::run(&path, &collection)?;
        }
        Commands::Delete {
            collection,
            resource,
        } => {
            let path = cli.path.ok_or("Store path required for delete")?;
            commands::delete::run(&path, &collection, resource.as_deref())?;
        }
        Commands::Seed { collection } => {
            let path = cli.path.ok_or("Store path required for seed")?;
            commands::seed::run(&path, &collection)?;
        }
        Commands::Version => {
            println!("flatdb CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("flatdb Core v{}", flatdb_core::VERSION);
        }
    }

    Ok(())
}
