//! CLI definitions for the cause list downloader.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Delhi District Courts cause list downloader.
#[derive(Parser)]
#[command(name = "causelist")]
#[command(about = "Download Delhi District Courts cause lists")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        env = "CAUSELIST_CONFIG",
        default_value = "causelist.toml",
        global = true
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Serve the download form (default)
    Serve {
        /// Override the configured listen host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Open the cause list page, enter its iframe and keep the browser open
    Probe {
        /// Seconds to hold the browser open (Ctrl-C ends early)
        #[arg(long)]
        hold_secs: Option<u64>,
    },

    /// Download one day's cause lists without the web form
    Fetch {
        /// Court complex name, e.g. "Saket Court Complex"
        #[arg(long)]
        complex: String,

        /// Date as YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_is_no_subcommand() {
        let cli = Cli::parse_from(["causelist"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("causelist.toml"));
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from(["causelist", "serve", "--port", "8080"]);
        match cli.command {
            Some(Commands::Serve { host, port }) => {
                assert!(host.is_none());
                assert_eq!(port, Some(8080));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_fetch_args() {
        let cli = Cli::parse_from([
            "causelist",
            "--config",
            "/tmp/c.toml",
            "fetch",
            "--complex",
            "Saket Court Complex",
            "--date",
            "2026-10-17",
        ]);
        assert_eq!(cli.config, PathBuf::from("/tmp/c.toml"));
        match cli.command {
            Some(Commands::Fetch { complex, date }) => {
                assert_eq!(complex, "Saket Court Complex");
                assert_eq!(date.as_deref(), Some("2026-10-17"));
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_fetch_requires_complex() {
        assert!(Cli::try_parse_from(["causelist", "fetch"]).is_err());
    }
}
