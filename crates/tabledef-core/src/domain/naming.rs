//! Naming conventions: table name ⇄ model name, singular ⇄ plural,
//! and canonical pivot names.
//!
//! The inflection rules are intentionally tiny (`ies`/`s` suffixes only);
//! definitions that need something irregular declare `MODEL:` explicitly.

/// `"ies"` becomes `"y"`, a trailing `"s"` is dropped, everything else is
/// returned unchanged.
pub fn singular(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    if let Some(stem) = word.strip_suffix('s') {
        return stem.to_string();
    }
    word.to_string()
}

/// Inverse of [`singular`]. Words that already look plural are returned as-is.
pub fn plural(word: &str) -> String {
    if singular(word) != word {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix('y') {
        return format!("{stem}ies");
    }
    format!("{word}s")
}

/// `blog_posts` → `BlogPost`, `categories` → `Category`.
pub fn model_name(table: &str) -> String {
    let mut parts: Vec<String> = table.split('_').map(str::to_string).collect();
    if let Some(last) = parts.last_mut() {
        *last = singular(last);
    }
    parts.iter().map(|part| capitalize(&part.to_lowercase())).collect()
}

/// Alphabetically ordered `a_b` join of two singular names.
///
/// Pass plural names with `singularize = true`.
pub fn pivot_name(first: &str, second: &str, singularize: bool) -> String {
    let (a, b) = if singularize {
        (singular(first), singular(second))
    } else {
        (first.to_string(), second.to_string())
    };
    if a <= b { format!("{a}_{b}") } else { format!("{b}_{a}") }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_handles_ies_and_s() {
        assert_eq!(singular("categories"), "category");
        assert_eq!(singular("users"), "user");
        assert_eq!(singular("staff"), "staff");
    }

    #[test]
    fn plural_leaves_plurals_alone() {
        assert_eq!(plural("category"), "categories");
        assert_eq!(plural("user"), "users");
        assert_eq!(plural("users"), "users");
    }

    #[test]
    fn model_name_singularizes_only_last_segment() {
        assert_eq!(model_name("blog_posts"), "BlogPost");
        assert_eq!(model_name("users"), "User");
        assert_eq!(model_name("news_categories"), "NewsCategory");
        assert_eq!(model_name("ROLE_USER"), "RoleUser");
    }

    #[test]
    fn pivot_name_is_alphabetical() {
        assert_eq!(pivot_name("user", "role", false), "role_user");
        assert_eq!(pivot_name("roles", "users", true), "role_user");
        assert_eq!(pivot_name("a", "a", false), "a_a");
    }
}
