//! Command-line surface.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the dotfiles installer.
#[derive(Parser, Debug)]
#[command(
    name = "dotlink",
    about = "Symlink a dotfiles repository into your home directory, backing up what it replaces",
    version
)]
pub struct Cli {
    /// Command to run; defaults to `install`
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by all subcommands
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// The selected subcommand, `install` when none was given.
    #[must_use]
    pub fn selected_command(&self) -> Command {
        self.command.unwrap_or(Command::Install)
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Print the operations without changing anything
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Dotfiles repository root (default: $DOTLINK_ROOT, else the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Home directory to link into (default: $HOME)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Directory to create the backup directory in (default: the current directory)
    #[arg(long, global = true)]
    pub backup_parent: Option<PathBuf>,

    /// Manifest file (default: <root>/dotlink.toml)
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Link every managed file, backing up what is in the way
    Install,
    /// Show the link state of every managed file
    Status,
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Status => "status",
            Self::Version => "version",
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_install() {
        let cli = Cli::parse_from(["dotlink"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.selected_command(), Command::Install);
    }

    #[test]
    fn parse_install_dry_run() {
        let cli = Cli::parse_from(["dotlink", "--dry-run", "install"]);
        assert!(cli.global.dry_run);
        assert_eq!(cli.selected_command(), Command::Install);
    }

    #[test]
    fn parse_dry_run_short_after_subcommand() {
        let cli = Cli::parse_from(["dotlink", "install", "-d"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_status() {
        let cli = Cli::parse_from(["dotlink", "status"]);
        assert_eq!(cli.selected_command(), Command::Status);
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["dotlink", "version"]);
        assert_eq!(cli.selected_command(), Command::Version);
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["dotlink", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_path_overrides() {
        let cli = Cli::parse_from([
            "dotlink",
            "--root",
            "/tmp/dotfiles",
            "--home",
            "/tmp/home",
            "--backup-parent",
            "/tmp/backups",
            "--manifest",
            "/tmp/links.toml",
            "install",
        ]);
        assert_eq!(cli.global.root, Some(PathBuf::from("/tmp/dotfiles")));
        assert_eq!(cli.global.home, Some(PathBuf::from("/tmp/home")));
        assert_eq!(cli.global.backup_parent, Some(PathBuf::from("/tmp/backups")));
        assert_eq!(cli.global.manifest, Some(PathBuf::from("/tmp/links.toml")));
    }

    #[test]
    fn command_names() {
        assert_eq!(Command::Install.name(), "install");
        assert_eq!(Command::Status.name(), "status");
    }
}
