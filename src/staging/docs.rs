//! Documentation trimming and link absolutization
//!
//! Keeps only the primary section of the staged README and rewrites
//! relative resource links into absolute ones anchored at the repository
//! URL, so the trimmed document still renders on the registry page.

use crate::core::error::PublishError;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;
use std::path::Path;
use tokio::fs;

/// Documentation entry file name
pub const DOC_FILE: &str = "README.md";

/// Section boundary that ends the primary section
const SECTION_BOUNDARY: &str = "\n## ";

lazy_static! {
    static ref MARKDOWN_LINK: Regex =
        Regex::new(r"(!?)\[([^\]]*)\]\(([^)\s]+)\)").unwrap();
}

/// Trim a document to its primary section and absolutize relative links
///
/// A document with no section boundary is returned with links rewritten
/// only; a document with no relative links is returned with sections
/// trimmed only. Both passes are idempotent.
pub fn trim(doc: &str, repository_url: &str) -> String {
    let primary = match doc.find(SECTION_BOUNDARY) {
        Some(index) => &doc[..index],
        None => doc,
    };

    rewrite_links(primary, repository_url)
}

/// Rewrite every relative markdown link or image target into an absolute
/// raw-content URL on the repository's default branch
fn rewrite_links(text: &str, repository_url: &str) -> String {
    let base = repository_url.trim_end_matches('/');

    MARKDOWN_LINK
        .replace_all(text, |caps: &Captures| {
            let target = &caps[3];
            if is_absolute_target(target) {
                caps[0].to_string()
            } else {
                let path = target.trim_start_matches("./");
                format!("{}[{}]({}/raw/main/{})", &caps[1], &caps[2], base, path)
            }
        })
        .into_owned()
}

fn is_absolute_target(target: &str) -> bool {
    target.starts_with('#')
        || target.starts_with("mailto:")
        || target.starts_with("data:")
        || target.contains("://")
}

/// Extract a normalized repository URL from the manifest "repository" field
///
/// Accepts the string shorthand and the `{ "url": ... }` object form;
/// `git+` prefixes and `.git` suffixes are removed.
pub fn repository_from_manifest(manifest: &Value) -> Option<String> {
    let raw = match manifest.get("repository")? {
        Value::String(url) => url.as_str(),
        Value::Object(object) => object.get("url")?.as_str()?,
        _ => return None,
    };

    let url = raw.strip_prefix("git+").unwrap_or(raw);
    let url = url.strip_suffix(".git").unwrap_or(url);
    Some(url.trim_end_matches('/').to_string())
}

/// Trim the staged README in place, returning whether one was found
pub async fn trim_staged_docs(
    staging_dir: &Path,
    repository_url: &str,
) -> Result<bool, PublishError> {
    let path = staging_dir.join(DOC_FILE);

    if !path.exists() {
        return Ok(false);
    }

    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| PublishError::filesystem("docs", format!("{}: {}", path.display(), e)))?;

    let trimmed = trim(&content, repository_url);
    if trimmed != content {
        fs::write(&path, trimmed)
            .await
            .map_err(|e| PublishError::filesystem("docs", format!("{}: {}", path.display(), e)))?;
    }

    Ok(true)
}
