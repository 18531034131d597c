//! Send JSON over HTTP and get typed results or typed errors back.
//!
//! ```no_run
//! # async fn run() -> Result<(), json_requests::Error> {
//! use json_requests::{get_json, Options};
//!
//! let options = Options::new().with_query("_limit", 10);
//! let todos: serde_json::Value =
//!     get_json("https://jsonplaceholder.typicode.com/todos", Some(&options)).await?;
//! # Ok(())
//! # }
//! ```
mod client;
mod errors;
mod options;
mod query;
pub use self::client::{
    get_json, patch_json, post_json, send_request, Client, ClientBuilder, Method, NO_BODY,
};
pub use self::errors::{
    as_response_error, is_http_error, is_json_error, is_response_error, Error, ErrorCode,
    ResponseBody, ResponseError,
};
pub use self::options::{Options, QueryValue};
pub use self::query::merge_query;
