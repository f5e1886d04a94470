/// Roster - browse and manage users of a remote user service
use clap::{Parser, Subcommand};
use roster_cli::{
    commands::{self, PageLimit, UserArgs},
    config::RosterConfig,
    error::CliError,
};
use roster_client::RosterClient;
use roster_core::{RosterError, UserId};
use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Browse and manage users of a remote user service", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./roster.toml when present)
    #[arg(short, long, global = true, env = "ROSTER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List users page by page
    List {
        /// Number of pages to load
        #[arg(long, default_value_t = 1, conflicts_with = "all")]
        pages: u32,
        /// Load every page
        #[arg(long)]
        all: bool,
    },
    /// Show every field of one user
    Show {
        /// User ID
        id: String,
    },
    /// Create a user
    Create {
        #[command(flatten)]
        fields: UserArgs,
    },
    /// Change fields of an existing user
    Edit {
        /// User ID
        id: String,
        #[command(flatten)]
        fields: UserArgs,
    },
    /// Delete a user
    Delete {
        /// User ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster=info,roster_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = RosterConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let client = RosterClient::new(config.client_config())?;
    tracing::debug!(url = client.url(), "Using user service");

    let page_size = config.feed.page_size;
    let today = chrono::Local::now().date_naive();
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::List { pages, all } => {
            let limit = if all {
                PageLimit::All
            } else {
                PageLimit::Pages(pages.max(1))
            };
            commands::list(client, page_size, limit, &mut stdout).await?;
        }
        Commands::Show { id } => {
            commands::show(&client, &UserId::new(id), &mut stdout).await?;
        }
        Commands::Create { fields } => {
            commands::create(&client, &fields, today, &mut stdout).await?;
        }
        Commands::Edit { id, fields } => {
            commands::edit(&client, &UserId::new(id), &fields, today, &mut stdout).await?;
        }
        Commands::Delete { id, yes } => {
            let id = UserId::new(id);
            if !yes {
                let question = format!("Delete user {}?", id);
                let confirmed =
                    commands::confirm(&question, &mut io::stdin().lock(), &mut stdout)?;
                if !confirmed {
                    writeln!(stdout, "Aborted")?;
                    return Ok(());
                }
            }
            commands::delete(client, page_size, &id, &mut stdout).await?;
        }
    }

    Ok(())
}

/// Print an error, one line per rejected field for validation failures.
fn report(err: &anyhow::Error) {
    if let Some(CliError::Api(RosterError::Validation(errors))) = err.downcast_ref::<CliError>() {
        eprintln!("Invalid user:");
        for (field, message) in errors.iter() {
            eprintln!("  {}: {}", field, message);
        }
        return;
    }
    eprintln!("Error: {:#}", err);
}
