//! Slug derivation and read-time estimation.

/// Derives a URL-safe slug: lowercase, strip non-alphanumerics, whitespace
/// and hyphen runs collapse to single hyphens, leading/trailing hyphens
/// trimmed. Titles with no usable characters fall back to `"untitled"`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut prev_hyphen = true; // swallows leading separators
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            prev_hyphen = false;
        } else if (c.is_whitespace() || c == '-') && !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// Estimated minutes to read at 200 words per minute, rounded up, never
/// below one minute.
pub fn read_time(content: &str) -> i32 {
    let words = content.split_whitespace().count();
    words.div_ceil(200).max(1) as i32
}
