//! Request arguments shared by every subcommand.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use json_requests::Options;
use serde_json::Value;

#[derive(Args)]
pub struct RequestArgs {
    /// Absolute URL, may already carry a query string
    pub url: String,

    /// Extra header as `name:value` (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Query parameter as `key=value` (repeatable). Keys already in the URL win.
    #[arg(short = 'q', long = "query")]
    pub query: Vec<String>,

    /// JSON request body
    #[arg(short, long)]
    pub data: Option<String>,
}

impl RequestArgs {
    pub fn options(&self) -> Result<Options> {
        let mut options = Options::new();
        for raw in &self.headers {
            let (name, value) = parse_header(raw)?;
            options = options.with_header(name, value);
        }
        for raw in &self.query {
            let (key, value) = parse_query(raw)?;
            options = options.with_query(key, value);
        }
        Ok(options)
    }

    pub fn body(&self) -> Result<Option<Value>> {
        self.data
            .as_deref()
            .map(|data| serde_json::from_str(data).context("--data is not valid JSON"))
            .transpose()
    }
}

fn parse_header(raw: &str) -> Result<(&str, &str)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("header {:?} must look like name:value", raw))?;
    Ok((name.trim(), value.trim()))
}

fn parse_query(raw: &str) -> Result<(&str, &str)> {
    raw.split_once('=')
        .ok_or_else(|| anyhow!("query {:?} must look like key=value", raw))
}
