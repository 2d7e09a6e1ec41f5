//! CLI command definitions for the `salesdesk` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod session;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Sales inquiry assistant with persistent per-visitor sessions.
#[derive(Parser)]
#[command(name = "salesdesk", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Detailed output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API and serve the inquiry page.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Submit one inquiry and print the answer.
    Ask {
        /// The question to ask.
        inquiry: String,

        /// Company asking. Defaults to the session's last company, then the
        /// configured default.
        #[arg(short, long)]
        company: Option<String>,

        /// Session to continue. A new one is started when omitted.
        #[arg(short, long, env = "SALESDESK_SESSION")]
        session: Option<String>,
    },

    /// Print the conversation history of a session.
    History {
        /// Session id.
        session: String,
    },

    /// List stored sessions.
    #[command(alias = "ls")]
    Sessions,

    /// Issue a new session token.
    #[command(name = "new-session")]
    NewSession,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_flags() {
        let cli = Cli::try_parse_from([
            "salesdesk", "--json", "ask", "pricing?", "--company", "Acme", "-s", "s1",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Ask {
                inquiry,
                company,
                session,
            } => {
                assert_eq!(inquiry, "pricing?");
                assert_eq!(company.as_deref(), Some("Acme"));
                assert_eq!(session.as_deref(), Some("s1"));
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_new_session_and_verbosity() {
        let cli = Cli::try_parse_from(["salesdesk", "-vv", "new-session"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::NewSession));
    }
}
