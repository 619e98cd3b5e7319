// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! c4-analytics CLI - link-coverage progress for critical repositories

use anyhow::{Context, Result};
use c4_analytics::catalog::LinkFilter;
use c4_analytics::commands::{self, Invocation};
use c4_analytics::config;
use c4_analytics::fetch::AuthScheme;
use c4_analytics::report::StatusFilter;
use c4_analytics::types::LinkKind;
use clap::{CommandFactory, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "c4-analytics")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file path
    #[arg(short, long, env = "C4_ANALYTICS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(
        long,
        env = "NO_COLOR",
        global = true,
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_color: bool,

    /// GitLab access token (never stored)
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every listed repository by link coverage
    Report {
        /// Architecture document (path or URL); defaults to the configured GitLab file
        #[arg(short, long)]
        document: Option<String>,

        /// CSV repository list with a `url` column
        #[arg(short, long)]
        repos: PathBuf,

        /// Link kinds to score (repeatable or comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        links: Vec<LinkKind>,

        /// Status filter (all, complete, incomplete, not-mapped)
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,

        /// Minimum progress in percent
        #[arg(long, default_value_t = 0.0)]
        min: f64,

        /// Maximum progress in percent
        #[arg(long, default_value_t = 100.0)]
        max: f64,

        /// Repository URL contains (case-insensitive)
        #[arg(long)]
        repo_search: Option<String>,

        /// Element title contains (case-insensitive)
        #[arg(long)]
        element_search: Option<String>,

        /// Output format (table, json, csv)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Evaluate milestones as of this date (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<chrono::NaiveDate>,
    },

    /// List mapped architecture elements and their links
    Elements {
        /// Architecture document (path or URL); defaults to the configured GitLab file
        #[arg(short, long)]
        document: Option<String>,

        /// Element kinds to list
        #[arg(short, long, value_delimiter = ',')]
        kind: Vec<String>,

        /// Technologies to list
        #[arg(short, long, value_delimiter = ',')]
        technology: Vec<String>,

        /// Only elements declaring these links
        #[arg(long, value_delimiter = ',')]
        has: Vec<LinkKind>,

        /// Only elements lacking these links
        #[arg(long, value_delimiter = ',')]
        missing: Vec<LinkKind>,

        /// Per-kind link filter as KIND=any|has|missing
        #[arg(long = "link", value_parser = parse_link_filter)]
        link_filters: Vec<(LinkKind, LinkFilter)>,

        /// Output format (table, json, csv)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show where a document keeps its elements and which kinds it has
    Inspect {
        /// Architecture document (path or URL); defaults to the configured GitLab file
        #[arg(short, long)]
        document: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Download the architecture document
    Fetch {
        /// Direct URL instead of the GitLab API
        #[arg(long)]
        url: Option<String>,

        /// GitLab instance root
        #[arg(long)]
        base_url: Option<String>,

        /// GitLab project ID or path
        #[arg(short, long)]
        project: Option<String>,

        /// File path inside the project
        #[arg(long)]
        file_path: Option<String>,

        /// Branch, tag or commit
        #[arg(short, long)]
        branch: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, save or clear settings
    Settings {
        /// Action: show, save, clear, path
        #[arg(default_value = "show")]
        action: String,

        /// GitLab instance root
        #[arg(long)]
        base_url: Option<String>,

        /// GitLab project ID or path
        #[arg(long)]
        project: Option<String>,

        /// File path inside the project
        #[arg(long)]
        file_path: Option<String>,

        /// Branch, tag or commit
        #[arg(long)]
        branch: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Token header (private-token, bearer)
        #[arg(long)]
        auth_scheme: Option<AuthScheme>,

        /// Link kinds to score
        #[arg(long, value_delimiter = ',')]
        links: Vec<LinkKind>,

        /// Element kinds to extract
        #[arg(long, value_delimiter = ',')]
        kinds: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn parse_link_filter(s: &str) -> Result<(LinkKind, LinkFilter), String> {
    let (kind, filter) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected KIND=any|has|missing, got: {s}"))?;
    Ok((kind.parse()?, filter.parse()?))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Completions { shell } = cli.command {
        return commands::completions::run(shell, &mut Cli::command());
    }

    let config_path = cli.config.clone().or_else(config::default_path);
    let settings = config::load(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load settings from {}", path.display()),
        None => "Failed to load settings".to_string(),
    })?;

    let invocation = Invocation {
        settings,
        config_path,
        token: cli.token,
        color: !cli.no_color && std::io::stdout().is_terminal(),
    };

    // Execute command
    match cli.command {
        Commands::Report {
            document,
            repos,
            links,
            status,
            min,
            max,
            repo_search,
            element_search,
            format,
            output,
            as_of,
        } => commands::report::run(
            &invocation,
            commands::report::ReportOptions {
                document,
                repos,
                links,
                status,
                min,
                max,
                repo_search,
                element_search,
                format,
                output,
                as_of,
            },
        ),
        Commands::Elements {
            document,
            kind,
            technology,
            has,
            missing,
            link_filters,
            format,
            output,
        } => commands::elements::run(
            &invocation,
            commands::elements::ElementsOptions {
                document,
                kinds: kind,
                technologies: technology,
                has,
                missing,
                link_filters,
                format,
                output,
            },
        ),
        Commands::Inspect { document, format } => {
            commands::inspect::run(&invocation, document.as_deref(), &format)
        }
        Commands::Fetch {
            url,
            base_url,
            project,
            file_path,
            branch,
            output,
        } => commands::fetch::run(
            &invocation,
            commands::fetch::FetchOptions {
                url,
                base_url,
                project,
                file_path,
                branch,
                output,
            },
        ),
        Commands::Settings {
            action,
            base_url,
            project,
            file_path,
            branch,
            timeout,
            auth_scheme,
            links,
            kinds,
        } => commands::settings::run(
            &invocation,
            &action,
            commands::settings::SettingsUpdate {
                base_url,
                project,
                file_path,
                branch,
                timeout_secs: timeout,
                auth_scheme,
                links,
                kinds,
            },
        ),
        Commands::Completions { .. } => Ok(()),
    }
}
