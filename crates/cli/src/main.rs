//! Tienda CLI - migrations, bearer tokens and client bootstrap runs.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! tienda migrate
//!
//! # Generate a token signing secret
//! tienda token secret
//!
//! # Issue an admin bearer token
//! tienda token issue -u <uuid> -e admin@tienda.es -n "Admin Name" -r admin
//!
//! # Store a token and run the client startup hooks
//! tienda shell login --token "$TOKEN"
//! tienda shell bootstrap --server-url http://127.0.0.1:3000
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `token secret` / `token issue` - Manage bearer tokens
//! - `shell login` / `shell logout` / `shell bootstrap` - Client shell

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use tienda_shell::ExecutionContext;

mod commands;

#[derive(Parser)]
#[command(name = "tienda")]
#[command(author, version, about = "Tienda CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Run the client shell
    Shell {
        #[command(subcommand)]
        action: ShellAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Print a new random signing secret for `TIENDA_TOKEN_SECRET`
    Secret,
    /// Issue a signed bearer token
    Issue {
        /// User ID (UUID)
        #[arg(short, long)]
        user_id: String,

        /// User email address
        #[arg(short, long)]
        email: String,

        /// User display name
        #[arg(short, long)]
        name: String,

        /// User role (`admin`, `staff`, `customer`)
        #[arg(short, long, default_value = "customer")]
        role: String,

        /// Hours until the token expires
        #[arg(long, default_value_t = 12)]
        ttl_hours: i64,
    },
}

#[derive(Subcommand)]
enum ShellAction {
    /// Run the client startup hooks against a server
    Bootstrap {
        #[command(flatten)]
        target: ShellTarget,

        /// Execution context (`client` or `server`)
        #[arg(long, default_value = "client")]
        context: ExecutionContext,
    },
    /// Store a bearer token for later bootstrap runs
    Login {
        #[command(flatten)]
        target: ShellTarget,

        /// Token issued with `tienda token issue`
        #[arg(long)]
        token: String,
    },
    /// Remove the stored bearer token
    Logout {
        #[command(flatten)]
        target: ShellTarget,
    },
}

#[derive(clap::Args)]
struct ShellTarget {
    /// Base URL of the Tienda server
    #[arg(long, env = "TIENDA_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    server_url: String,

    /// File holding the stored bearer token
    #[arg(long, default_value = commands::shell::DEFAULT_SESSION_FILE)]
    session_file: PathBuf,
}

#[tokio::main]
async fn main() {
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Token { action } => match action {
            TokenAction::Secret => commands::token::secret(),
            TokenAction::Issue {
                user_id,
                email,
                name,
                role,
                ttl_hours,
            } => commands::token::issue(&user_id, &email, &name, &role, ttl_hours)?,
        },
        Commands::Shell { action } => match action {
            ShellAction::Bootstrap { target, context } => {
                commands::shell::bootstrap(&target.server_url, target.session_file, context)
                    .await?;
            }
            ShellAction::Login { target, token } => {
                commands::shell::login(&target.server_url, target.session_file, &token).await?;
            }
            ShellAction::Logout { target } => {
                commands::shell::logout(&target.server_url, target.session_file).await?;
            }
        },
    }
    Ok(())
}
