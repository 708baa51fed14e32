use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fbpost::config::Config;
use fbpost::http::ReqwestTransport;
use fbpost::{logging, FacebookClient, GraphError, PostClient, PostRecord};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fbpost")]
#[command(about = "Resolve public Facebook post URLs through the Graph API", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a config file (defaults to ~/.config/fbpost/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the post behind a https://www.facebook.com/<page>/posts/<id> URL
    Resolve {
        url: String,

        /// Print the full record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the config file location
    Config {
        /// Write a commented template if no config file exists yet
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match cli.command {
        Commands::Resolve { url, json } => {
            let config = Config::load(cli.config.as_deref())?;
            let credentials = config.facebook.credentials()?;
            let transport =
                ReqwestTransport::new(&config.facebook.api_base_url, config.facebook.timeout())
                    .context("failed to build HTTP client")?;
            let client = FacebookClient::new(credentials, transport);

            let post = match client.resolve_post(&url).await {
                Ok(post) => post,
                Err(e) => {
                    eprintln!("Error: could not resolve {}: {}", url, e);
                    std::process::exit(exit_code(&e));
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&post)?);
            } else {
                println!("{}", format_post(&post));
            }
        }
        Commands::Config { init } => {
            let path = match cli.config {
                Some(p) => p,
                None => Config::get_config_path()?,
            };
            if init && Config::init_file(&path)? {
                println!("Wrote {}", path.display());
            } else {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

/// 2 when the URL or post id was wrong, 1 when credentials or the API failed.
fn exit_code(err: &GraphError) -> i32 {
    if err.is_client_error() {
        2
    } else {
        1
    }
}

fn format_post(post: &PostRecord) -> String {
    let date = match (post.created_at(), post.created_time()) {
        (Some(at), _) => at.format("%Y-%m-%d %H:%M").to_string(),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => "unknown date".to_string(),
    };

    let mut out = format!(
        "{} ({})\n{}\n",
        post.name().unwrap_or("unknown author"),
        date,
        post.id()
    );
    if let Some(avatar) = post.avatar() {
        out.push_str(&format!("avatar: {}\n", avatar));
    }
    if let Some(message) = post.message() {
        out.push('\n');
        out.push_str(message);
    }
    out.trim_end().to_string()
}
