//! Human-readable job URLs of the form `<kebab-title>-<id>`.

/// Build the slug for a posting, e.g. `senior-backend-engineer-42`.
pub fn job_slug(title: &str, id: i64) -> String {
    let mut slug = String::with_capacity(title.len() + 8);
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    if !slug.is_empty() && !slug.ends_with('-') {
        slug.push('-');
    }
    slug.push_str(&id.to_string());
    slug
}

/// Recover the numeric id from a slug or a bare id.
pub fn job_id_from_slug(slug: &str) -> Option<i64> {
    let slug = slug.trim().trim_end_matches('/');
    let tail = slug.rsplit('-').next()?;
    if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    tail.parse().ok().filter(|id| *id > 0)
}
