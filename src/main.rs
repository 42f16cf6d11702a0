//! Command-line interface for repository indexing and release generation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use debrepo::RepositoryBuilder;

#[derive(Debug, Parser)]
#[command(name = "debrepo", about = "Generate and sign Debian repository metadata")]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Index one repository component for one architecture
    Index {
        /// Path to repository
        path: PathBuf,
        /// Release to act on
        release: String,
        /// Release component to index
        component: String,
        /// Architecture to index
        arch: String,
        #[command(flatten)]
        common: CommonOpts,
    },
    /// Generate (and optionally sign) the repository release descriptor
    Release {
        /// Path to repository
        path: PathBuf,
        /// Release to act on
        release: String,
        /// GPG key to sign the release with
        #[arg(long, env = "DEBREPO_GPGKEY")]
        gpgkey: Option<String>,
        /// Suppress the unsigned-release warning
        #[arg(long)]
        quiet: bool,
        #[command(flatten)]
        common: CommonOpts,
    },
}

#[derive(Debug, clap::Args)]
struct CommonOpts {
    /// Pool directory
    #[arg(long, default_value = debrepo::DEFAULT_POOL)]
    pool: String,

    /// Origin to set
    #[arg(long, default_value = debrepo::DEFAULT_ORIGIN)]
    origin: String,

    /// Release version to set
    #[arg(long, default_value = debrepo::DEFAULT_VERSION)]
    version: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let env_filter = if args.verbose {
        "debrepo=debug,info"
    } else {
        "debrepo=info,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(env_filter)),
        )
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> debrepo::Result<()> {
    match args.command {
        Command::Index {
            path,
            release,
            component,
            arch,
            common,
        } => {
            let repo = RepositoryBuilder::new(path, release)
                .pool(common.pool)
                .origin(common.origin)
                .version(common.version)
                .build()?;
            repo.index(&component, &arch)
        }
        Command::Release {
            path,
            release,
            gpgkey,
            quiet,
            common,
        } => {
            let repo = RepositoryBuilder::new(path, release)
                .pool(common.pool)
                .origin(common.origin)
                .version(common.version)
                .quiet(quiet)
                .build()?;
            repo.generate_release(gpgkey.as_deref())
        }
    }
}
