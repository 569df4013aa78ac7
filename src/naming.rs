//! Identifier case conversion.

/// Separator between words in table and column names.
pub const SEPARATOR: char = '_';

/// Convert a snake_case identifier to UpperCamelCase.
///
/// Each `_`-separated segment gets its first letter upper-cased and the rest is
/// kept as is, so `user_profile` becomes `UserProfile` and `userName` becomes
/// `UserName`. Empty segments are dropped.
pub fn to_camel(ident: &str) -> String {
    ident.split(SEPARATOR).map(upper_first).collect()
}

/// Upper-case the first character, leaving the rest unchanged.
pub fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character, leaving the rest unchanged.
pub fn lower_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Apply [`to_camel`] when `convert` is set, otherwise return `ident` verbatim.
pub fn ident_for(ident: &str, convert: bool) -> String {
    if convert {
        to_camel(ident)
    } else {
        ident.to_string()
    }
}
