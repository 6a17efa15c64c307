use globset::{Glob, GlobSet, GlobSetBuilder};

/// Compile allow-list entries into a matcher. Entries are case-sensitive globs;
/// a plain collection name matches only itself.
pub fn build_allowlist<S: AsRef<str>>(allow: &[S]) -> Result<Option<GlobSet>, globset::Error> {
    if allow.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in allow {
        builder.add(Glob::new(pattern.as_ref())?);
    }
    builder.build().map(Some)
}

pub fn is_allowed(allow: Option<&GlobSet>, value: &str) -> bool {
    allow.map(|set| set.is_match(value)).unwrap_or(false)
}

/// Owning collection of a fully-qualified name: its first two dot-separated
/// segments. `None` when the name has fewer than two segments.
pub fn collection_of(resolved_name: &str) -> Option<&str> {
    let mut dots = resolved_name.match_indices('.').map(|(i, _)| i);
    dots.next()?;
    match dots.next() {
        Some(end) => Some(&resolved_name[..end]),
        None => Some(resolved_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_of_takes_first_two_segments() {
        assert_eq!(
            collection_of("community.general.ufw"),
            Some("community.general")
        );
        assert_eq!(
            collection_of("acme.tools.sub.module"),
            Some("acme.tools")
        );
        assert_eq!(collection_of("acme.tools"), Some("acme.tools"));
    }

    #[test]
    fn collection_of_rejects_single_segment() {
        assert_eq!(collection_of("shell"), None);
        assert_eq!(collection_of(""), None);
    }

    #[test]
    fn empty_allowlist_allows_nothing() {
        let allow = build_allowlist::<String>(&[]).unwrap();
        assert!(allow.is_none());
        assert!(!is_allowed(allow.as_ref(), "community.general"));
    }

    #[test]
    fn allowlist_matches_exact_names_and_globs() {
        let allow = build_allowlist(&["community.general", "acme.*"]).unwrap();
        assert!(is_allowed(allow.as_ref(), "community.general"));
        assert!(is_allowed(allow.as_ref(), "acme.tools"));
        assert!(!is_allowed(allow.as_ref(), "community.docker"));
        assert!(!is_allowed(allow.as_ref(), "Community.General"));
    }

    #[test]
    fn invalid_glob_is_reported() {
        assert!(build_allowlist(&["community.[general"]).is_err());
    }
}
