//! URL slug generation for categories and products.

/// Turn a display name into a URL slug.
///
/// The name is trimmed and lowercased, then every run of characters outside
/// `[a-z0-9]` becomes a single `-`. Leading and trailing dashes are removed.
/// Non-ASCII letters are not transliterated.
///
/// # Example
///
/// ```
/// use shoop_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("  Tượng Phong Thủy  "), "t-ng-phong-th-y");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let mut slug = String::with_capacity(lower.len());
    let mut pending_dash = false;

    for ch in lower.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_slugify_vietnamese_is_not_transliterated() {
        assert_eq!(slugify("  Tượng Phong Thủy  "), "t-ng-phong-th-y");
    }

    #[test]
    fn test_slugify_collapses_runs() {
        assert_eq!(slugify("test---multiple"), "test-multiple");
        assert_eq!(slugify("--Đá Phong Thủy!--"), "phong-th-y");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!!!"), "");
    }
}
