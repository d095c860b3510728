//! Shoop CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply migrations to the database in DB_PATH (default data/shoop.db)
//! shoop-cli migrate
//!
//! # Insert the demo catalog, site content and default admin where missing
//! shoop-cli seed
//!
//! # Create admin user
//! shoop-cli admin create -e admin@occ.io.vn -n "Admin Name" -p '...' -r super_admin
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed demo data
//! - `admin create` - Create admin users

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "shoop-cli")]
#[command(author, version, about = "Shoop CLI tools")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "DB_PATH", default_value = "data/shoop.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert demo data into empty tables
    Seed,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Login password
        #[arg(short, long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,

        /// Admin role (`super_admin`, `admin`)
        #[arg(short, long, default_value = "admin")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run(&cli.db).await?,
        Commands::Seed => commands::seed::run(&cli.db).await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
                role,
            } => {
                let password = SecretString::from(password);
                commands::admin::create_user(&cli.db, &email, &name, &password, &role).await?;
            }
        },
    }
    Ok(())
}
