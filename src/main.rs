use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use feedmedia::client::{HttpMpxClient, ResponseFormat};
use feedmedia::config::Config;
use feedmedia::feed::{build_path, FeedMediaClient, FeedRequestConfig};
use feedmedia::util::validate_base_url;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "feedmedia", about = "Request media feeds from thePlatform")]
struct Args {
    /// Config file with feed and transport defaults
    #[arg(long, value_name = "FILE", default_value = "feedmedia.toml")]
    config: PathBuf,

    /// Root URL of the feed service
    #[arg(long)]
    base_url: Option<String>,

    /// Default response format (rss, atom, json, cjson)
    #[arg(long)]
    form: Option<ResponseFormat>,

    /// Request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    #[command(flatten)]
    request: RequestArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the request path without sending anything
    Path,
    /// Fetch the feed and print the response body
    Get,
    /// Print the number of items the feed request matches
    Count,
}

#[derive(ClapArgs, Debug)]
struct RequestArgs {
    /// Account.pid of the account that owns the feed
    #[arg(long)]
    account_pid: Option<String>,

    /// FeedConfig.pid of the feed
    #[arg(long)]
    feed_pid: Option<String>,

    /// Subfeed type
    #[arg(long)]
    feed_type: Option<String>,

    /// Force feed format for single-item responses
    #[arg(long)]
    feed: bool,

    /// Numeric item IDs (comma-separated)
    #[arg(long, value_delimiter = ',')]
    ids: Vec<String>,

    /// Owner ID qualifying the GUIDs
    #[arg(long)]
    owner_id: Option<String>,

    /// Item GUIDs (comma-separated)
    #[arg(long, value_delimiter = ',')]
    guids: Vec<String>,

    /// SEO terms (comma-separated)
    #[arg(long, value_delimiter = ',')]
    seo_terms: Vec<String>,

    /// Extra query parameter, repeatable
    #[arg(long = "query", value_name = "KEY=VALUE", value_parser = parse_query_pair)]
    query: Vec<(String, String)>,
}

fn parse_query_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

/// Layers command-line flags over the `[request]` table of the config file.
fn resolve_request(config: &Config, args: RequestArgs) -> Result<FeedRequestConfig> {
    let mut request = match &config.request {
        Some(request) => request.clone(),
        None => FeedRequestConfig::new(
            args.account_pid.clone().context(
                "No account PID given (use --account-pid or a [request] table in the config file)",
            )?,
            args.feed_pid.clone().context(
                "No feed PID given (use --feed-pid or a [request] table in the config file)",
            )?,
        ),
    };

    if let Some(account_pid) = args.account_pid {
        request.account_pid = account_pid;
    }
    if let Some(feed_pid) = args.feed_pid {
        request.feed_pid = feed_pid;
    }
    if let Some(feed_type) = args.feed_type {
        request.feed_type = Some(feed_type);
    }
    if let Some(owner_id) = args.owner_id {
        request.owner_id = Some(owner_id);
    }
    request.feed |= args.feed;
    if !args.ids.is_empty() {
        request.ids = args.ids;
    }
    if !args.guids.is_empty() {
        request.guids = args.guids;
    }
    if !args.seo_terms.is_empty() {
        request.seo_terms = args.seo_terms;
    }
    request.query_params.extend(args.query);

    Ok(request)
}

fn build_client(
    config: &Config,
    base_url: Option<String>,
    form: Option<ResponseFormat>,
    timeout_secs: Option<u64>,
    request: FeedRequestConfig,
) -> Result<FeedMediaClient<HttpMpxClient>> {
    let base_url = base_url
        .or_else(|| config.base_url.clone())
        .context("No base URL given (use --base-url or base_url in the config file)")?;
    let base_url = validate_base_url(&base_url)
        .with_context(|| format!("Invalid base URL '{base_url}'"))?;

    let http = HttpMpxClient::new(reqwest::Client::new())
        .with_form(form.unwrap_or(config.form))
        .with_timeout(Duration::from_secs(timeout_secs.unwrap_or(config.timeout_secs)));
    Ok(FeedMediaClient::new(http, base_url, request))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config.display()))?;
    let request = resolve_request(&config, args.request)?;

    match args.command {
        Command::Path => {
            let path = build_path(&request)?;
            println!("{path}");
        }
        Command::Get => {
            let client = build_client(&config, args.base_url, args.form, args.timeout_secs, request)?;
            let response = client.get().await.context("Feed request failed")?;
            tracing::info!(
                status = response.status,
                content_type = ?response.content_type,
                bytes = response.body.len(),
                "Received feed"
            );
            println!("{}", response.body);
        }
        Command::Count => {
            let client = build_client(&config, args.base_url, args.form, args.timeout_secs, request)?;
            let count = client.count().await.context("Count request failed")?;
            println!("{count}");
        }
    }

    Ok(())
}
