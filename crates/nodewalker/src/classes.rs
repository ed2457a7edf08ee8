//! Class list predicates.
//!
//! A class list is a whitespace-delimited string such as the value of a
//! `class` attribute. Tokens are compared literally.

/// Check if `token` is one of the tokens of `class_list`
pub fn has_class(class_list: &str, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    class_list.split_whitespace().any(|t| t == token)
}

/// Count how many of the whitespace-delimited `tokens` occur in `class_list`
pub fn has_classes(class_list: &str, tokens: &str) -> usize {
    tokens
        .split_whitespace()
        .filter(|token| has_class(class_list, token))
        .count()
}
