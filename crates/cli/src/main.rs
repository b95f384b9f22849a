//! webrpc CLI - Command-line client for the example service

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Deserialize;
use tabled::{Table, Tabled};
use webrpc_core::domain::Headers;
use webrpc_core::WebrpcError;
use webrpc_example_schema::{ExampleClient, GetArticleArgs, GetUserArgs, User};

const DEFAULT_URL: &str = "http://127.0.0.1:3000";

#[derive(Parser)]
#[command(name = "webrpc")]
#[command(about = "Client for the webrpc example service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Server URL
    #[arg(long, env = "WEBRPC_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Base path the service is mounted under
    #[arg(long, env = "WEBRPC_PREFIX", default_value = "/rpc")]
    prefix: String,

    /// Extra request header, repeatable (e.g. -H "Authorization=Bearer x")
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,
}

#[derive(Subcommand)]
enum Commands {
    /// Call Example.Ping
    Ping,

    /// Call Example.GetUser
    GetUser {
        /// User ID (full u64 range)
        user_id: u64,
    },

    /// Call Example.GetArticle
    GetArticle {
        /// Article ID
        article_id: u64,
    },

    /// Show server health
    Status,
}

#[derive(Tabled)]
struct UserRow {
    id: u64,
    username: String,
    role: String,
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: format!("{:?}", user.role).to_uppercase(),
            created_at: user
                .created_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    status: String,
    version: String,
    request_id: String,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    // Whichever of `=` or `:` comes first separates name from value.
    let (name, value) = raw
        .split_once(|c: char| c == '=' || c == ':')
        .ok_or_else(|| format!("expected NAME=VALUE, got {:?}", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("header name must not be empty".to_string());
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn print_error(err: &WebrpcError) {
    println!(
        "{} {} (code {}, status {}): {}",
        "✗".red().bold(),
        err.name.red().bold(),
        err.code,
        err.status,
        err.message
    );
    if let Some(cause) = &err.cause {
        println!("  {} {}", "Cause:".bold(), cause);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let headers: Headers = cli.headers.iter().cloned().collect();
    let headers = (!headers.is_empty()).then_some(&headers);

    let client = ExampleClient::new(cli.url.as_str())
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?
        .with_base_path(&cli.prefix);

    let outcome = match cli.command {
        Commands::Ping => client.ping(headers).await.map(|_| {
            println!("{}", "✓ pong".green().bold());
        }),

        Commands::GetUser { user_id } => client
            .get_user(&GetUserArgs { user_id }, headers)
            .await
            .map(|out| {
                println!("{}", format!("✓ User {} (code {})", user_id, out.code).green().bold());
                println!();
                println!("{}", Table::new(vec![UserRow::from(&out.user)]));
                if !out.user.meta.is_empty() {
                    println!();
                    println!("{}", "Meta:".cyan().bold());
                    for (key, value) in &out.user.meta {
                        println!("  {} {}", format!("{}:", key).bold(), value);
                    }
                }
            }),

        Commands::GetArticle { article_id } => client
            .get_article(&GetArticleArgs { article_id }, headers)
            .await
            .map(|out| {
                println!("{}", out.title.cyan().bold());
                println!();
                println!("{}", out.content.as_deref().unwrap_or("(no content)"));
            }),

        Commands::Status => {
            println!("{}", "Server Status".cyan().bold());
            println!();
            let url = format!("{}/health", cli.url.trim_end_matches('/'));
            match fetch_health(&url).await {
                Ok(health) => {
                    println!("  {} {}", "URL:".bold(), cli.url);
                    println!("  {} {}", "Status:".bold(), health.status.to_uppercase().green());
                    println!("  {} {}", "Version:".bold(), health.version);
                    println!("  {} {}", "Request ID:".bold(), health.request_id);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {:#}", "Error:".bold(), e);
                }
            }
            Ok(())
        }
    };

    if let Err(err) = outcome {
        print_error(&err);
        std::process::exit(1);
    }

    Ok(())
}

async fn fetch_health(url: &str) -> Result<Health> {
    reqwest::get(url)
        .await
        .context("Failed to connect to server")?
        .error_for_status()
        .context("Health check failed")?
        .json()
        .await
        .context("Failed to parse health response")
}
