//! Fragment assembly.
//!
//! Every statement is written as an ordered list of clauses where an
//! empty string means "this clause does not apply":
//!
//! ```rust
//! use oxide_query_gen::fragment::{join_sql_fragments, when};
//!
//! let cascade = false;
//! let sql = join_sql_fragments(["DROP TABLE", "\"users\"", when(cascade, "CASCADE")]);
//! assert_eq!(sql, "DROP TABLE \"users\"");
//! ```

/// Joins clause fragments with single spaces, skipping empty ones.
///
/// Fragments made only of whitespace count as empty, so the result never
/// has doubled or dangling spaces.
pub fn join_sql_fragments<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sql = String::new();
    for fragment in fragments {
        let fragment = fragment.as_ref();
        if fragment.trim().is_empty() {
            continue;
        }
        if !sql.is_empty() {
            sql.push(' ');
        }
        sql.push_str(fragment);
    }
    sql
}

/// Returns `fragment` when `condition` holds, the empty fragment otherwise.
#[must_use]
pub const fn when(condition: bool, fragment: &str) -> &str {
    if condition {
        fragment
    } else {
        ""
    }
}

/// Returns `fragment` when the flag is set to `true`.
#[must_use]
pub fn when_set(flag: Option<bool>, fragment: &str) -> &str {
    when(flag == Some(true), fragment)
}

/// Joins items with `", "`.
pub fn comma_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
