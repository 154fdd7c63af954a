//! Slug allocation for new shows.

/// Lowercase `name`, collapsing every run of non-alphanumeric characters
/// into one hyphen, with no hyphen at either end.
///
/// Non-ASCII letters are transliterated first, so `"Café"` becomes `cafe`.
pub fn slugify(name: &str) -> String {
    let ascii = deunicode::deunicode(name);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Pick a slug for `name` that `slug_exists` reports as unused.
///
/// Tries the bare slug first, then `base-1`, `base-2`, ... A name with no
/// alphanumeric characters has an empty base, so its candidates are `""`,
/// `-1`, `-2`, ...
///
/// Nothing is reserved; the caller commits the returned slug under the
/// backend's uniqueness constraint.
pub fn allocate_slug<E, F>(name: &str, mut slug_exists: F) -> Result<String, E>
where
    F: FnMut(&str) -> Result<bool, E>,
{
    let base = slugify(name);
    if !slug_exists(&base)? {
        return Ok(base);
    }

    let mut suffix: u64 = 1;
    loop {
        let candidate = format!("{}-{}", base, suffix);
        if !slug_exists(&candidate)? {
            tracing::debug!(%base, %candidate, "slug collision resolved");
            return Ok(candidate);
        }
        suffix += 1;
    }
}
