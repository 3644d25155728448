//! Slug derivation and tag parsing.
//!
//! The slug function is deterministic: the same title always yields the same
//! slug, and a post keeps the slug computed at creation even if the title is
//! edited later.

/// Derive a URL-safe slug from a title.
///
/// Lowercases the input, drops every character that is not an ASCII word
/// character or a space, collapses runs of spaces into a single hyphen, and
/// trims leading/trailing separators.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c == ' ' {
            pending_separator = true;
        }
    }

    slug
}

/// Split a comma-separated tag field into trimmed tags.
///
/// Duplicates are kept as submitted.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',').map(|tag| tag.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_strips_punctuation() {
        assert_eq!(slugify("Hello World!!"), "hello-world");
    }

    #[test]
    fn slugify_lowercases() {
        assert_eq!(slugify("My First POST"), "my-first-post");
    }

    #[test]
    fn slugify_collapses_space_runs() {
        assert_eq!(slugify("a   b    c"), "a-b-c");
    }

    #[test]
    fn slugify_trims_edges() {
        assert_eq!(slugify("  padded title  "), "padded-title");
        assert_eq!(slugify("!leading & trailing?"), "leading-trailing");
    }

    #[test]
    fn slugify_keeps_underscores_and_digits() {
        assert_eq!(slugify("rust_2024 edition"), "rust_2024-edition");
    }

    #[test]
    fn slugify_is_deterministic() {
        let title = "Same Title, Same Slug";
        assert_eq!(slugify(title), slugify(title));
    }

    #[test]
    fn parse_tags_trims_and_keeps_duplicates() {
        assert_eq!(
            parse_tags("rust, web , rust"),
            vec!["rust".to_string(), "web".to_string(), "rust".to_string()]
        );
    }

    #[test]
    fn parse_tags_keeps_empty_segments() {
        // Source behaviour: "a,,b" produces an empty middle tag.
        assert_eq!(parse_tags("a,,b"), vec!["a", "", "b"]);
    }
}
