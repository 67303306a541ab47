//! Role decomposition and the role/function matcher.
//!
//! A functional assignment may describe a multifunctional or fused protein
//! by joining several roles with separators (`a / b`, `a @ b`, `a; b`), and
//! may carry a trailing comment introduced by `#` or `!`. A column is
//! satisfied by an assignment when the assignment is identical to the
//! column's function, or when every role of the column function appears
//! among the roles of the assignment.

use std::sync::OnceLock;

use regex::Regex;

fn comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s*[#!].*$").expect("comment pattern is valid"))
}

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\s+[/@]\s+|\s*;\s+").expect("role separator pattern is valid")
    })
}

/// Splits a functional assignment into its constituent roles.
///
/// The comment is removed first, so `"a / b # note"` yields `["a", "b"]`.
pub fn roles_of_function(function: &str) -> Vec<String> {
    let comment_free = comment_pattern().replace(function, "");
    separator_pattern()
        .split(&comment_free)
        .map(str::to_string)
        .collect()
}

/// Returns true if `observed` satisfies a column defined by `column_function`.
pub fn function_matches(column_function: &str, observed: &str) -> bool {
    observed == column_function
        || roles_cover(&roles_of_function(column_function), observed)
}

/// Returns true if every role in `column_roles` occurs among the roles of
/// `observed`. Order and duplicates are ignored.
pub fn roles_cover(column_roles: &[String], observed: &str) -> bool {
    let observed_roles = roles_of_function(observed);
    column_roles
        .iter()
        .all(|role| observed_roles.iter().any(|o| o == role))
}
