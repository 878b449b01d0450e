//! Command-line argument model.
use clap::{Parser, Subcommand};

use crate::config::PlatformOverrides;
use crate::platform::{Arch, Os};

/// Top-level CLI entry point for the dependency fetcher.
#[derive(Parser, Debug)]
#[command(
    name = "ezdeps",
    about = "Fetch, verify and extract the binary dependencies declared in DEPS.toml",
    version
)]
pub struct Cli {
    /// Action to run (defaults to `sync`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// The requested subcommand, falling back to [`Command::Sync`].
    #[must_use]
    pub fn selected_command(&self) -> Command {
        self.command.unwrap_or(Command::Sync)
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Directory holding the top-level DEPS.toml
    #[arg(short, long, global = true)]
    pub dir: Option<std::path::PathBuf>,

    /// Override the detected host platform
    #[arg(long, global = true, value_enum)]
    pub host_platform: Option<Os>,

    /// Override the detected host architecture
    #[arg(long, global = true, value_enum)]
    pub host_arch: Option<Arch>,

    /// Platform the dependencies are fetched for
    #[arg(long, global = true, value_enum)]
    pub target_platform: Option<Os>,

    /// Architecture the dependencies are fetched for
    #[arg(long, global = true, value_enum)]
    pub target_arch: Option<Arch>,

    /// Ignore the cached _config.toml
    #[arg(long, global = true)]
    pub skip_config: bool,
}

impl GlobalOpts {
    /// The platform values given on the command line.
    #[must_use]
    pub const fn platform_overrides(&self) -> PlatformOverrides {
        PlatformOverrides {
            host_platform: self.host_platform,
            host_arch: self.host_arch,
            target_platform: self.target_platform,
            target_arch: self.target_arch,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Download, verify and extract every dependency, then remove orphans
    Sync,
    /// Like sync, but extract archives again even when they are up to date
    ForceExtract,
    /// Re-download every dependency and print its current SHA-1
    Update,
    /// Delete every dependency and its extracted files
    Clean,
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file and the log header.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::ForceExtract => "force-extract",
            Self::Update => "update",
            Self::Clean => "clean",
            Self::Version => "version",
        }
    }
}
