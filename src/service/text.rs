//! Derived post fields: slug, excerpt, read time.

/// Words per minute used for read time.
pub const WORDS_PER_MINUTE: usize = 200;
/// Number of leading words kept in a generated excerpt.
pub const EXCERPT_WORDS: usize = 30;
/// Used when a title has no slug-safe characters at all.
pub const FALLBACK_SLUG: &str = "post";
/// Leaves room for a `-<unix_ts>-<n>` suffix inside the 200-char column.
pub const MAX_BASE_SLUG_LEN: usize = 180;

/// Lowercase, spaces to hyphens, then keep only `[a-z0-9-]`.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// `slugify`, capped at [`MAX_BASE_SLUG_LEN`], falling back to [`FALLBACK_SLUG`] when nothing survives.
pub fn base_slug(title: &str) -> String {
    let mut slug = slugify(title);
    slug.truncate(MAX_BASE_SLUG_LEN);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Candidate slugs after `base` is taken: `base-<ts>`, then `base-<ts>-2`, `base-<ts>-3`, ...
pub fn suffixed_slug(base: &str, unix_ts: i64, attempt: u32) -> String {
    if attempt <= 1 {
        format!("{}-{}", base, unix_ts)
    } else {
        format!("{}-{}-{}", base, unix_ts, attempt)
    }
}

/// `base`, then up to `max_suffixed` suffixed forms of it.
pub fn slug_candidates(base: &str, unix_ts: i64, max_suffixed: u32) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string()).chain((1..=max_suffixed).map(move |attempt| suffixed_slug(base, unix_ts, attempt)))
}

pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// max(1, words / 200), rounded down.
pub fn read_time(content: &str) -> i32 {
    let minutes = word_count(content) / WORDS_PER_MINUTE;
    i32::try_from(minutes).unwrap_or(i32::MAX).max(1)
}

/// First 30 words plus `...` when longer, otherwise the content verbatim.
pub fn excerpt(content: &str) -> String {
    let words: Vec<&str> = content.split_whitespace().collect();
    if words.len() <= EXCERPT_WORDS {
        return content.to_string();
    }
    format!("{}...", words[..EXCERPT_WORDS].join(" "))
}
