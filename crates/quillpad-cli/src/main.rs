use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod utils;
use commands::{Backend, cmd_init, cmd_migrate, cmd_schema, cmd_seed, cmd_serve, cmd_sql};

/// quillpad command-line interface.
#[derive(Parser, Debug)]
#[command(name = "quillpad", author, version, about)]
struct Cli {
    /// Config file to read instead of ./quillpad.json.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default config to --config, or ./quillpad.json.
    Init,
    /// Create any missing tables and indexes.
    Migrate,
    /// Print the schema DDL for a database backend.
    Sql {
        #[arg(short, long, value_enum, default_value_t = Backend::Sqlite)]
        backend: Backend,
    },
    /// Print the JSON schema of quillpad.json.
    Schema,
    /// Create or reset the admin account.
    Seed {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Run the HTTP server.
    Serve {
        /// Overrides `server.bind`.
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Init => cmd_init(config),
        Commands::Migrate => cmd_migrate(config).await,
        Commands::Sql { backend } => cmd_sql(backend),
        Commands::Schema => cmd_schema(),
        Commands::Seed {
            email,
            username,
            password,
        } => cmd_seed(config, &email, &username, &password).await,
        Commands::Serve { bind } => cmd_serve(config, bind).await,
    }
}
