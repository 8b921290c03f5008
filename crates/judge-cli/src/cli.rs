//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// judge-sync - keep a problems repository and the online judge in step
#[derive(Parser, Debug)]
#[command(name = "judge-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Repository root; discovered from the working directory when omitted
    #[arg(long, global = true, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which problems a command works on
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionArgs {
    /// Every enabled manifest problem instead of only the changed ones
    #[arg(long)]
    pub all: bool,

    /// Explicit problem directories; overrides the manifest
    #[arg(value_name = "PROBLEM")]
    pub problems: Vec<String>,
}

/// Judge endpoint and credentials
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteArgs {
    /// Judge base URL [default: from judge-sync.toml, else https://omegaup.com]
    #[arg(long, env = "OMEGAUP_URL")]
    pub url: Option<String>,

    /// API token sent as `Authorization: token <value>`
    #[arg(long, env = "OMEGAUP_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Username for password login
    #[arg(short, long, env = "OMEGAUPUSER")]
    pub username: Option<String>,

    /// Password for password login
    #[arg(short, long, env = "OMEGAUPPASS", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Package and upload problems, then reconcile admins and tags
    ///
    /// Examples:
    ///   judge-sync upload                      # problems changed in the CI range
    ///   judge-sync upload --all --can-create   # everything, creating missing problems
    ///   judge-sync upload Courses/c/a/sumas    # one problem
    Upload {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Create problems that do not exist on the judge
        #[arg(long)]
        can_create: bool,

        /// Emit GitHub Actions annotations for failures
        #[arg(long)]
        ci: bool,

        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Apply the pending course add/remove requests
    Courses {
        /// Pending-request file [default: from judge-sync.toml]
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Re-download every allowed course into the mirror
    Download {
        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Check statements and image references
    Validate {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Emit GitHub Actions annotations for issues
        #[arg(long)]
        ci: bool,
    },

    /// Print the problems a run would touch
    List {
        #[command(flatten)]
        selection: SelectionArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_upload_flags() {
        let cli = Cli::parse_from([
            "judge-sync",
            "upload",
            "--all",
            "--can-create",
            "--ci",
            "--api-token",
            "t0k",
            "p/sumas",
        ]);
        match cli.command {
            Commands::Upload {
                selection,
                can_create,
                ci,
                remote,
            } => {
                assert!(selection.all);
                assert_eq!(selection.problems, vec!["p/sumas"]);
                assert!(can_create);
                assert!(ci);
                assert_eq!(remote.api_token.as_deref(), Some("t0k"));
            }
            other => panic!("Expected Upload, got {other:?}"),
        }
    }

    #[test]
    fn parse_password_short_flags() {
        let cli = Cli::parse_from(["judge-sync", "download", "-u", "omi", "-p", "pw"]);
        match cli.command {
            Commands::Download { remote } => {
                assert_eq!(remote.username.as_deref(), Some("omi"));
                assert_eq!(remote.password.as_deref(), Some("pw"));
            }
            other => panic!("Expected Download, got {other:?}"),
        }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["judge-sync", "list", "--repo", "/tmp/r", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.repo, Some(PathBuf::from("/tmp/r")));
    }

    #[test]
    fn parse_courses_input() {
        let cli = Cli::parse_from(["judge-sync", "courses", "--input", "req.json"]);
        assert!(matches!(
            cli.command,
            Commands::Courses { input: Some(ref p), .. } if p == &PathBuf::from("req.json")
        ));
    }
}
