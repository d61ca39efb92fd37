//! Self-link helpers
//!
//! Self-links are the join keys between resource kinds. The API is not
//! consistent about the host (`www.googleapis.com` vs `compute.googleapis.com`)
//! or API version embedded in them, so comparisons go through the
//! `projects/...` path suffix.

use anyhow::{Context, Result};
use url::Url;

/// Extract short name from GCP resource URL
/// e.g., "https://www.googleapis.com/compute/v1/projects/my-project/zones/us-central1-a" -> "us-central1-a"
pub fn short_name(link: &str) -> &str {
    link.rsplit('/').next().unwrap_or(link)
}

/// The `projects/...` part of a self-link, or the input when there is none
pub fn resource_path(link: &str) -> &str {
    let trimmed = link.trim_end_matches('/');
    if trimmed.starts_with("projects/") {
        return trimmed;
    }
    match trimmed.find("/projects/") {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// True when both links name the same resource
pub fn same_resource(a: &str, b: &str) -> bool {
    !a.is_empty() && resource_path(a) == resource_path(b)
}

/// The path below `projects/<project>/`.
///
/// Instance metadata such as `created-by` names the project by number while
/// self-links use the project id, so those links only agree on this part.
pub fn project_relative_path(link: &str) -> &str {
    let path = resource_path(link);
    match path.strip_prefix("projects/").and_then(|rest| rest.split_once('/')) {
        Some((_, relative)) => relative,
        None => path,
    }
}

/// `same_resource` over optional links; absent never matches
pub fn links_match(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_resource(a, b),
        _ => false,
    }
}

/// Location scope of a zonal or regional resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Zone(String),
    Region(String),
}

/// A parsed instance group manager self-link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLink {
    pub project: String,
    pub scope: Scope,
    pub name: String,
}

/// Split an instance group manager self-link into project, scope and name
pub fn parse_group_link(link: &str) -> Result<GroupLink> {
    let url = Url::parse(link).with_context(|| format!("Invalid self-link: {}", link))?;
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let project_idx = segments
        .iter()
        .position(|s| *s == "projects")
        .with_context(|| format!("Self-link has no project segment: {}", link))?;
    let tail = &segments[project_idx + 1..];

    match tail {
        [project, kind, location, "instanceGroupManagers", name] => {
            let scope = match *kind {
                "zones" => Scope::Zone(location.to_string()),
                "regions" => Scope::Region(location.to_string()),
                other => anyhow::bail!("Unexpected scope '{}' in self-link: {}", other, link),
            };
            Ok(GroupLink {
                project: project.to_string(),
                scope,
                name: name.to_string(),
            })
        },
        _ => anyhow::bail!("Not an instance group manager self-link: {}", link),
    }
}
