//! Lookup command implementation

use crate::error::Result;
use crate::lookup::{render, LookupClient, LookupOutcome};
use tracing::error;

/// Look up `name` through the API at `api_url`.
///
/// Client construction errors are returned; fetch failures are part of the
/// returned result so the caller can render the failure state.
pub async fn cmd_lookup(api_url: &str, name: &str) -> Result<Result<LookupOutcome>> {
    let client = LookupClient::new(api_url)?;
    let result = client.lookup(name).await;
    if let Err(e) = &result {
        error!("Error fetching medicine data: {}", e);
    }
    Ok(result)
}

/// Print a lookup result in human-readable format
pub fn print_lookup(result: &Result<LookupOutcome>) {
    println!("{}", render(result));
}
