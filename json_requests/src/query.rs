//! Merges option-supplied query parameters into a URL.

use url::Url;

use crate::options::QueryValue;

/// Returns `url` with `params` merged into its query string.
///
/// Pairs already in the URL keep their position and value; a key from
/// `params` is only appended when the URL does not already carry it, and a
/// key repeated in `params` takes its last value. The result is re-encoded
/// as `application/x-www-form-urlencoded`. With no params the URL is
/// returned untouched.
pub fn merge_query(url: &Url, params: &[(String, QueryValue)]) -> Url {
    if params.is_empty() {
        return url.clone();
    }

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let from_url = pairs.len();
    for (key, value) in params {
        if pairs[..from_url].iter().any(|(existing, _)| existing == key) {
            continue;
        }
        match pairs[from_url..].iter_mut().find(|(added, _)| added == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => pairs.push((key.clone(), value.to_string())),
        }
    }

    let mut url = url.clone();
    url.query_pairs_mut().clear().extend_pairs(&pairs);
    url
}
