//! Writing responses and response errors to stdout.

use anyhow::Result;
use json_requests::Error;
use serde_json::Value;

/// What the process prints on stdout and the status it exits with.
#[derive(Debug, PartialEq)]
pub struct Rendered {
    pub stdout: String,
    pub exit_code: i32,
}

/// Maps a request outcome to printable output.
///
/// A success prints the response JSON and exits 0. A response error prints
/// its serialized form and exits 1. Any other error is handed back.
pub fn render(result: Result<Value, Error>) -> Result<Rendered> {
    match result {
        Ok(value) => Ok(Rendered {
            stdout: serde_json::to_string_pretty(&value)?,
            exit_code: 0,
        }),
        Err(Error::Response(err)) => Ok(Rendered {
            stdout: serde_json::to_string_pretty(&err)?,
            exit_code: 1,
        }),
        Err(err) => Err(err.into()),
    }
}
