use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rxiv_scout::assets::AssetIndex;
use rxiv_scout::config::{env_config, find_config_file, load_config, Config};
use rxiv_scout::mcp::{McpServer, ToolRegistry};
use rxiv_scout::models::SearchQuery;
use rxiv_scout::rxiv::RxivClient;
use rxiv_scout::search::SearchEngine;
use rxiv_scout::utils::{format, validate_date};

/// rxiv-scout - search bioRxiv/medRxiv preprints over MCP or the CLI
#[derive(Parser, Debug)]
#[command(name = "rxiv-scout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search bioRxiv and medRxiv preprints with relevance ranking", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server (stdio by default)
    Serve {
        /// Serve over HTTP/SSE instead of stdio
        #[arg(long)]
        http: bool,

        /// Host to bind in HTTP mode
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind in HTTP mode
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },

    /// Search preprints by query string
    #[command(alias = "s")]
    Search {
        /// Search query: keywords, a subject category, or a DOI
        query: String,

        /// Start date (YYYY-MM-DD, default: 5 years ago)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, default: today)
        #[arg(long)]
        to: Option<String>,

        /// Maximum number of results (1-100)
        #[arg(long, short, default_value_t = 10)]
        limit: usize,

        /// Pagination cursor from a previous result
        #[arg(long)]
        cursor: Option<String>,
    },

    /// Fetch full metadata for one preprint by DOI
    Get {
        /// DOI of the preprint
        identifier: String,
    },

    /// List the fixed subject categories
    Categories,

    /// List indexed local assets, or filter them by keyword
    Assets {
        /// Only show assets whose content contains this keyword
        keyword: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn load_configuration(cli: &Cli) -> Result<Config> {
    if let Some(path) = &cli.config {
        return Ok(load_config(path)?);
    }
    if let Some(path) = find_config_file() {
        tracing::info!("using config file: {}", path.display());
        return Ok(load_config(&path)?);
    }
    Ok(env_config())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    // Logs go to stderr so stdio MCP framing stays clean.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("rxiv_scout={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_configuration(&cli)?;

    let client = RxivClient::new(&config.api)?;
    let engine = Arc::new(SearchEngine::new(client));
    let assets = Arc::new(match &config.assets.directory {
        Some(dir) => AssetIndex::open(dir),
        None => AssetIndex::default(),
    });

    match cli.command {
        None
        | Some(Commands::Serve {
            http: false,
            host: _,
            port: _,
        }) => {
            let registry = ToolRegistry::new(engine, assets);
            let server = McpServer::new(registry)?;
            server.run().await?;
        }

        Some(Commands::Serve { http: true, host, port }) => {
            let registry = ToolRegistry::new(engine, assets);
            let server = McpServer::new(registry)?;
            let addr = format!("{}:{}", host, port);
            let (bound, handle) = server.run_http(&addr).await?;
            tracing::info!("listening on {}", bound);
            handle.await?;
        }

        Some(Commands::Search {
            query,
            from,
            to,
            limit,
            cursor,
        }) => {
            let mut search_query = SearchQuery::new(&query).limit(limit);
            if let Some(raw) = from {
                search_query.from_date = Some(validate_date(&raw)?);
            }
            if let Some(raw) = to {
                search_query.to_date = Some(validate_date(&raw)?);
            }
            if let Some(cursor) = cursor {
                search_query = search_query.cursor(cursor);
            }

            match engine.search(&search_query).await {
                Ok(result) => println!("{}", format::search_results(&result, &query)),
                Err(error) => {
                    eprintln!("Error: {}", error);
                    std::process::exit(1);
                }
            }
        }

        Some(Commands::Get { identifier }) => match engine.details(&identifier).await {
            Ok(Some(record)) => println!("{}", format::preprint_details(&record)),
            Ok(None) => println!("{}", format::not_found(&identifier)),
            Err(error) => {
                eprintln!("Error: {}", error);
                std::process::exit(1);
            }
        },

        Some(Commands::Categories) => {
            println!("{}", format::category_list());
        }

        Some(Commands::Assets { keyword }) => {
            let ids = match keyword {
                Some(keyword) => assets.find(&keyword),
                None => assets.ids().into_iter().map(String::from).collect(),
            };
            if ids.is_empty() {
                println!("No assets.");
            } else {
                for id in ids {
                    println!("{}", id);
                }
            }
        }

        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_is_serve() {
        let cli = Cli::parse_from(["rxiv-scout"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["rxiv-scout", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_search_command() {
        let cli = Cli::parse_from(["rxiv-scout", "search", "CRISPR", "--limit", "25"]);
        match cli.command {
            Some(Commands::Search { query, limit, .. }) => {
                assert_eq!(query, "CRISPR");
                assert_eq!(limit, 25);
            }
            _ => panic!("expected Search command"),
        }
    }

    #[test]
    fn test_cli_search_alias() {
        let cli = Cli::parse_from(["rxiv-scout", "s", "genomics"]);
        assert!(matches!(cli.command, Some(Commands::Search { .. })));
    }

    #[test]
    fn test_cli_get_command() {
        let cli = Cli::parse_from(["rxiv-scout", "get", "10.1101/2020.01.30.927871"]);
        match cli.command {
            Some(Commands::Get { identifier }) => {
                assert_eq!(identifier, "10.1101/2020.01.30.927871");
            }
            _ => panic!("expected Get command"),
        }
    }

    #[test]
    fn test_cli_serve_http() {
        let cli = Cli::parse_from(["rxiv-scout", "serve", "--http", "--port", "8080"]);
        match cli.command {
            Some(Commands::Serve { http, port, .. }) => {
                assert!(http);
                assert_eq!(port, 8080);
            }
            _ => panic!("expected Serve command"),
        }
    }
}
