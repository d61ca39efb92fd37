//! Resource Fetcher
//!
//! Paginated list calls against the Compute Engine API. Both plain list
//! responses (`items` is an array) and aggregated responses (`items` is a
//! map keyed by zone or region) are flattened into one typed list.

use crate::gcp::client::GcpClient;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// HTTP verb of a list call; a few Compute list methods are POSTs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMethod {
    Get,
    Post,
}

/// Result of paginated fetch
pub struct PaginatedResult {
    pub items: Vec<Value>,
    pub next_token: Option<String>,
}

/// Fetch all pages of a list endpoint and deserialize every item
pub async fn fetch_resources<T: DeserializeOwned + Send>(
    client: &GcpClient,
    method: ListMethod,
    url: &str,
    query: &[(&str, &str)],
) -> Result<Vec<T>> {
    let mut all_items = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let result =
            fetch_resources_paginated(client, method, url, query, page_token.as_deref()).await?;
        all_items.extend(result.items);

        if result.next_token.is_none() {
            break;
        }
        page_token = result.next_token;
    }

    all_items
        .into_iter()
        .map(|item| serde_json::from_value(item).context("Failed to decode resource"))
        .collect::<Result<Vec<T>>>()
        .with_context(|| format!("Unexpected resource shape from {}", url))
}

/// Fetch one page of a list endpoint
pub async fn fetch_resources_paginated(
    client: &GcpClient,
    method: ListMethod,
    url: &str,
    query: &[(&str, &str)],
    page_token: Option<&str>,
) -> Result<PaginatedResult> {
    let mut params: Vec<(&str, &str)> = query.to_vec();
    if let Some(token) = page_token {
        params.push(("pageToken", token));
    }
    let url = add_query_params(url, &params);

    let response = match method {
        ListMethod::Get => client.get(&url).await?,
        ListMethod::Post => client.post(&url, None).await?,
    };

    let next_token = response
        .get("nextPageToken")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    Ok(PaginatedResult {
        items: extract_items(response),
        next_token,
    })
}

/// Pull the resource list out of a list or aggregated-list response
pub fn extract_items(response: Value) -> Vec<Value> {
    let Value::Object(mut map) = response else {
        return vec![];
    };

    match map.remove("items") {
        Some(Value::Array(items)) => items,
        Some(Value::Object(scopes)) => flatten_aggregated(scopes),
        _ => vec![],
    }
}

/// Flatten `{"zones/us-central1-a": {"instances": [...]}, ...}` into one list
fn flatten_aggregated(scopes: serde_json::Map<String, Value>) -> Vec<Value> {
    let mut all_items = Vec::new();

    for (_scope, scope_data) in scopes {
        let Value::Object(obj) = scope_data else {
            continue;
        };
        for (key, value) in obj {
            // Scopes without resources only carry a warning
            if key == "warning" {
                continue;
            }
            if let Value::Array(arr) = value {
                all_items.extend(arr);
            }
        }
    }

    all_items
}

/// Append URL-encoded query parameters to a URL
pub fn add_query_params(url: &str, params: &[(&str, &str)]) -> String {
    let query_parts: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect();

    if query_parts.is_empty() {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&{}", url, query_parts.join("&"))
    } else {
        format!("{}?{}", url, query_parts.join("&"))
    }
}
