use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cmdtrack::backfill::DEFAULT_BACKFILL_WORKDIR;
use cmdtrack::config::DEFAULT_SERVER_URL;
use cmdtrack::{
    backfill, format_history, ClientOptions, CommandRecord, Config, DedupGuard, DeliveryClient,
    HistoryFetcher, TrackOutcome, Tracker,
};

#[derive(Parser, Debug)]
#[command(name = "cmdtrack", about = "cmdtrack stores global command-line history.")]
struct Args {
    /// Secrets file (defaults to ~/.cmdtrack.conf)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Track the command provided.
    #[command(after_help = "Example: cmdtrack track --workdir=~ --command=ls")]
    Track {
        /// Command that was executed
        #[arg(short = 'c', long, default_value = "")]
        command: String,

        /// Working directory command was executed from
        #[arg(short = 'd', long, default_value = "")]
        workdir: String,

        /// Hostname the command was executed on
        #[arg(short = 'n', long, default_value = "")]
        hostname: String,

        /// Seconds since the epoch (defaults to now)
        #[arg(long, default_value_t = 0)]
        timestamp: i64,

        /// Send even if identical to the previous command
        #[arg(long)]
        no_dedup: bool,

        /// URL for the cmdtrack server
        #[arg(long, default_value = DEFAULT_SERVER_URL)]
        url: String,
    },

    /// Output the recent combined history
    #[command(after_help = "Example: cmdtrack history --url=http://localhost:8080/")]
    History {
        /// URL for the cmdtrack server
        #[arg(long, default_value = DEFAULT_SERVER_URL)]
        url: String,

        /// Make command verbose
        #[arg(short = 'v', long)]
        verbose: bool,
    },

    /// Send `fc -t %s -l` output read from stdin
    #[command(after_help = "Example: fc -t %s -l 1 10 | cmdtrack backfill")]
    Backfill {
        /// Working directory recorded for every imported command
        #[arg(long, default_value = DEFAULT_BACKFILL_WORKDIR)]
        workdir: String,

        /// URL for the cmdtrack server
        #[arg(long, default_value = DEFAULT_SERVER_URL)]
        url: String,
    },
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();
}

fn load_config(path: Option<PathBuf>) -> cmdtrack::Result<Config> {
    let path = match path {
        Some(path) => path,
        None => Config::default_path()?,
    };
    Ok(Config::load(&path)?)
}

async fn run(args: Args) -> cmdtrack::Result<()> {
    let config = load_config(args.config)?;

    match args.command {
        Commands::Track {
            command,
            workdir,
            hostname,
            timestamp,
            no_dedup,
            url,
        } => {
            let record = CommandRecord::new(command, workdir)
                .with_hostname(hostname)
                .with_timestamp(timestamp);
            let options = ClientOptions::default().with_base_url(url);
            let client = DeliveryClient::from_config(&config, &options)?;
            let tracker = if no_dedup {
                Tracker::without_dedup(client)
            } else {
                Tracker::new(client, DedupGuard::in_home_dir()?)
            };
            if tracker.track(record).await? == TrackOutcome::Duplicate {
                tracing::debug!("skipped duplicate command");
            }
        }
        Commands::History { url, .. } => {
            let options = ClientOptions::default().with_base_url(url);
            let fetcher = HistoryFetcher::from_config(&config, &options)?;
            let commands = fetcher.fetch().await?;
            for line in format_history(&commands) {
                println!("{}", line);
            }
        }
        Commands::Backfill { workdir, url } => {
            let options = ClientOptions::default().with_base_url(url);
            let client = DeliveryClient::from_config(&config, &options)?;
            let stdin = std::io::stdin().lock();
            backfill(stdin, &workdir, &client, |entry| {
                println!("{} {} {}", entry.number, entry.timestamp, entry.command)
            })
            .await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let verbose = matches!(args.command, Commands::History { verbose: true, .. });
    setup_logging(verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
