use regex::Regex;
use std::sync::LazyLock;

// A 65th hex digit disqualifies the match, so the run has to end at a non-hex character
static SHA256_DIGEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"sha256:([a-f0-9]{64})(?:[^a-f0-9]|$)").expect("digest pattern is a valid regex")
});

/// Returns the 64 hex characters following `sha256:` in an image ID such as
/// `docker.io/library/busybox@sha256:141c...7d47`.
pub fn extract_digest(image_id: &str) -> Option<&str> {
    SHA256_DIGEST
        .captures(image_id)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Returns everything after the last colon, if that is non-empty.
///
/// This is purely syntactic: `repo:latest:extra` yields `extra` and
/// `registry:5000/repo` yields `5000/repo`.
pub fn extract_tag(image: &str) -> Option<&str> {
    split_tag(image).map(|(_, tag)| tag)
}

/// Strips the `:tag` suffix found by [`extract_tag`], leaving the input as-is when there is none.
pub fn remove_tag(image: &str) -> &str {
    split_tag(image).map_or(image, |(name, _)| name)
}

fn split_tag(image: &str) -> Option<(&str, &str)> {
    let pos = image.rfind(':')?;
    let tag = &image[pos + 1..];
    if tag.is_empty() {
        return None;
    }
    Some((&image[..pos], tag))
}
