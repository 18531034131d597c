mod args;
mod output;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use json_requests::{Client, Method};
use serde_json::Value;

use crate::args::RequestArgs;

/// Env var consulted when `--timeout` is not given.
const TIMEOUT_ENV: &str = "JSON_REQUESTS_TIMEOUT_SECS";

#[derive(Parser)]
#[command(name = "json-requests")]
#[command(about = "Send JSON requests and print the JSON response")]
struct Cli {
    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a GET request
    Get(RequestArgs),
    /// Send a POST request
    Post(RequestArgs),
    /// Send a PATCH request
    Patch(RequestArgs),
}

impl Commands {
    fn split(&self) -> (Method, &RequestArgs) {
        match self {
            Commands::Get(args) => (Method::Get, args),
            Commands::Post(args) => (Method::Post, args),
            Commands::Patch(args) => (Method::Patch, args),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("json_requests=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let timeout = resolve_timeout(cli.timeout, std::env::var(TIMEOUT_ENV).ok())?;
    let client = build_client(timeout)?;

    let (method, args) = cli.command.split();
    check_body_allowed(method, args)?;

    let options = args.options()?;
    let body = args.body()?;
    let result = client
        .send_request::<Value, Value>(method, &args.url, body.as_ref(), Some(&options))
        .await;

    let rendered =
        output::render(result).with_context(|| format!("{:?} {} failed", method, args.url))?;
    println!("{}", rendered.stdout);
    if rendered.exit_code != 0 {
        std::process::exit(rendered.exit_code);
    }

    Ok(())
}

/// `--timeout` wins; otherwise the env value, which must be whole seconds.
fn resolve_timeout(flag: Option<u64>, env: Option<String>) -> Result<Option<Duration>> {
    if let Some(secs) = flag {
        return Ok(Some(Duration::from_secs(secs)));
    }
    let Some(raw) = env else {
        return Ok(None);
    };
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number of seconds", TIMEOUT_ENV))?;
    Ok(Some(Duration::from_secs(secs)))
}

fn check_body_allowed(method: Method, args: &RequestArgs) -> Result<()> {
    if method == Method::Get && args.data.is_some() {
        anyhow::bail!("--data is not allowed with GET");
    }
    Ok(())
}

fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let user_agent = concat!("json-requests/", env!("CARGO_PKG_VERSION"));
    let mut builder = Client::builder().user_agent(user_agent);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
