use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod refresh;
mod state;
mod watch;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FORTNIGHT_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "fortnight", version = VERSION, about = "Two-week rotating calendar and task urgency ranking")]
struct Cli {
    /// To-do file to use instead of the configured one
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank the tasks in the to-do file and print them, most urgent first
    Rank,

    /// Rank the to-do file and write it back if the order changed
    Refresh {
        /// Rewrite even when nothing moved
        #[arg(long)]
        force: bool,
    },

    /// Keep the to-do file ranked: hourly and after every edit
    Watch,

    /// Print where in the rotation the current hour falls
    Today,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.fortnight/config.toml with defaults
    Init,

    /// Print the effective configuration and to-do file location
    Show,
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("set up logging")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    if let Command::Config { command } = &cli.command {
        return match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => show_config(cli.file.as_deref()),
        };
    }

    let cfg = config::load_config()?;
    let ring = cfg.ring()?;
    let tz = cfg.tz()?;
    let path = state::tasks_path(&cfg, cli.file.as_deref());

    match cli.command {
        Command::Rank => {
            ensure_exists(&path)?;
            let text = state::read_tasks_file(&path)?;
            let now = Utc::now().with_timezone(&tz);
            let pass = refresh::rank_text(&text, &ring, &now, false)
                .with_context(|| format!("rank {}", path.display()))?;
            print!("{}", refresh::format_table(&pass));
        }

        Command::Refresh { force } => {
            ensure_exists(&path)?;
            let now = Utc::now().with_timezone(&tz);
            let pass = refresh::refresh_file(&path, &ring, &now, force)?;
            for failure in &pass.failures {
                println!("! {failure}");
            }
            match pass.rewrite {
                Some(_) => println!("Updated {}", path.display()),
                None => println!("No change: {}", path.display()),
            }
        }

        Command::Watch => {
            ensure_exists(&path)?;
            watch::run(path, ring, tz, cfg.write_delay()).await?;
        }

        Command::Today => {
            let now = Utc::now().with_timezone(&tz);
            println!(
                "{} ({}), slot {} of the rotation",
                ring.position(&now),
                now.format("%H:%M %m/%d/%Y %Z"),
                ring.to_ring_slot(&now)
            );
        }

        Command::Config { .. } => {}
    }

    Ok(())
}

fn ensure_exists(path: &std::path::Path) -> Result<()> {
    if !path.exists() {
        bail!(
            "To-do file not found: {} (set NOTESDIR, edit ~/.fortnight/config.toml, or pass --file <path>)",
            path.display()
        );
    }
    Ok(())
}

fn show_config(file_override: Option<&std::path::Path>) -> Result<()> {
    let p = config::config_path()?;
    let cfg = config::load_config()?;
    println!("Config: {}{}", p.display(), if p.exists() { "" } else { " (defaults)" });
    println!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    println!("To-do file: {}", state::tasks_path(&cfg, file_override).display());
    Ok(())
}
