//! Identifier quoting and literal escaping.

use chrono::SecondsFormat;

use crate::dialect::{ArrayLiteral, BinaryLiteral, BooleanLiteral, Dialect, SpecialFloat};
use crate::fragment::comma_list;
use crate::table::TableDescriptor;
use crate::value::SqlValue;

/// Words that always need quoting when identifier quoting is relaxed.
const RESERVED_WORDS: &[&str] = &[
    "all", "and", "any", "as", "asc", "between", "by", "case", "check", "column", "constraint",
    "create", "default", "delete", "desc", "distinct", "drop", "else", "end", "false", "fetch",
    "for", "foreign", "from", "grant", "group", "having", "in", "index", "insert", "into", "is",
    "join", "key", "like", "limit", "not", "null", "offset", "on", "or", "order", "primary",
    "references", "select", "set", "table", "then", "to", "true", "union", "unique", "update",
    "user", "using", "values", "when", "where", "with",
];

/// Dialect-bound quoting and escaping.
#[derive(Debug, Clone, Copy)]
pub struct Escaper {
    dialect: &'static Dialect,
    quote_identifiers: bool,
}

impl Escaper {
    /// Creates an escaper for a dialect.
    ///
    /// With `quote_identifiers` off, plain lowercase identifiers that are
    /// not reserved words are emitted bare.
    #[must_use]
    pub const fn new(dialect: &'static Dialect, quote_identifiers: bool) -> Self {
        Self {
            dialect,
            quote_identifiers,
        }
    }

    /// Quotes an identifier, doubling embedded quote characters.
    ///
    /// `*` passes through untouched.
    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        if name == "*" {
            return String::from(name);
        }
        if !self.quote_identifiers && is_bare_identifier(name) {
            return String::from(name);
        }
        let q = self.dialect.quote_char;
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(q);
        for c in name.chars() {
            if c == q {
                quoted.push(q);
            }
            quoted.push(c);
        }
        quoted.push(q);
        quoted
    }

    /// Quotes a list of identifiers and joins them with `", "`.
    #[must_use]
    pub fn quote_identifiers<S: AsRef<str>>(&self, names: &[S]) -> String {
        comma_list(names.iter().map(|n| self.quote_identifier(n.as_ref())))
    }

    /// Renders `schema.table`, omitting the schema when the table is
    /// unscoped or the dialect has no schemas.
    #[must_use]
    pub fn quote_table(&self, table: &TableDescriptor) -> String {
        match &table.schema {
            Some(schema) if self.dialect.capabilities.schemas => format!(
                "{}.{}",
                self.quote_identifier(schema),
                self.quote_identifier(&table.table_name)
            ),
            _ => self.quote_identifier(&table.table_name),
        }
    }

    /// Quotes a schema-scoped object name such as an index.
    #[must_use]
    pub fn quote_scoped(&self, schema: Option<&str>, name: &str) -> String {
        match schema {
            Some(schema) if self.dialect.capabilities.schemas => format!(
                "{}.{}",
                self.quote_identifier(schema),
                self.quote_identifier(name)
            ),
            _ => self.quote_identifier(name),
        }
    }

    /// Escapes a string into a quoted literal.
    #[must_use]
    pub fn escape_string(&self, s: &str) -> String {
        let mut escaped = s.replace('\'', "''");
        // Postgres rejects NUL inside text values.
        if self.dialect.kind == crate::dialect::DialectKind::Postgres {
            escaped = escaped.replace('\0', "\\0");
        }
        format!("'{escaped}'")
    }

    /// Converts a value into an inline SQL literal.
    #[must_use]
    pub fn escape(&self, value: &SqlValue) -> String {
        let caps = &self.dialect.capabilities;
        match value {
            SqlValue::Null => String::from("NULL"),
            SqlValue::Default => String::from("DEFAULT"),
            SqlValue::Bool(b) => match (caps.boolean_literal, b) {
                (BooleanLiteral::Keyword, true) => String::from("TRUE"),
                (BooleanLiteral::Keyword, false) => String::from("FALSE"),
                (BooleanLiteral::Numeric, true) => String::from("1"),
                (BooleanLiteral::Numeric, false) => String::from("0"),
            },
            SqlValue::Int(n) => n.to_string(),
            SqlValue::Float(f) => self.escape_float(*f),
            SqlValue::Text(s) => self.escape_string(s),
            SqlValue::Blob(bytes) => {
                let hex: String = bytes.iter().map(|byte| format!("{byte:02X}")).collect();
                match caps.binary_literal {
                    BinaryLiteral::ByteaHex => format!("'\\x{hex}'"),
                    BinaryLiteral::HexString => format!("X'{hex}'"),
                    BinaryLiteral::BlobHex => format!("BLOB(X'{hex}')"),
                }
            }
            SqlValue::Date(d) => self.escape_string(&d.format("%Y-%m-%d").to_string()),
            SqlValue::Timestamp(ts) => {
                self.escape_string(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            SqlValue::Json(doc) => self.escape_string(&doc.to_string()),
            SqlValue::Array(items) => {
                let inner = comma_list(items.iter().map(|item| self.escape(item)));
                match caps.array_literal {
                    ArrayLiteral::Constructor => format!("ARRAY[{inner}]"),
                    ArrayLiteral::List => format!("({inner})"),
                }
            }
            SqlValue::Literal(sql) => sql.clone(),
            SqlValue::Column(name) => self.quote_identifier(name),
            SqlValue::Function { name, args } => format!(
                "{name}({})",
                comma_list(args.iter().map(|arg| self.escape(arg)))
            ),
        }
    }

    fn escape_float(&self, f: f64) -> String {
        if f.is_finite() {
            return f.to_string();
        }
        let word = if f.is_nan() {
            "NaN"
        } else if f.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        };
        match self.dialect.capabilities.special_float {
            SpecialFloat::CastDouble => format!("CAST('{word}' AS DOUBLE PRECISION)"),
            SpecialFloat::Decfloat => format!("DECFLOAT('{word}')"),
        }
    }
}

/// Reverses [`Escaper::quote_identifier`].
///
/// Input that is not wrapped in `quote` is returned unchanged.
#[must_use]
pub fn unquote_identifier(quoted: &str, quote: char) -> String {
    let inner = quoted
        .strip_prefix(quote)
        .and_then(|s| s.strip_suffix(quote));
    match inner {
        Some(inner) => {
            let doubled: String = [quote, quote].iter().collect();
            inner.replace(&doubled, &quote.to_string())
        }
        None => String::from(quoted),
    }
}

/// Lowercase identifier made of `[a-z_][a-z0-9_$]*` that is not reserved.
fn is_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_lowercase() || first == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
        && !RESERVED_WORDS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectKind;

    fn escaper(kind: DialectKind) -> Escaper {
        Escaper::new(kind.dialect(), true)
    }

    #[test]
    fn test_quote_identifier_doubles_quotes() {
        let e = escaper(DialectKind::Postgres);
        assert_eq!(e.quote_identifier("users"), "\"users\"");
        assert_eq!(e.quote_identifier("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(e.quote_identifier("*"), "*");
    }

    #[test]
    fn test_quote_unquote_round_trip() {
        let e = escaper(DialectKind::Db2);
        for name in ["plain", "a\"b", "\"\"", "x\"\"y\""] {
            let quoted = e.quote_identifier(name);
            assert_eq!(e.quote_identifier(&unquote_identifier(&quoted, '"')), quoted);
        }
    }

    #[test]
    fn test_relaxed_quoting() {
        let e = Escaper::new(DialectKind::Postgres.dialect(), false);
        assert_eq!(e.quote_identifier("users"), "users");
        assert_eq!(e.quote_identifier("firstName"), "\"firstName\"");
        assert_eq!(e.quote_identifier("user"), "\"user\"");
        assert_eq!(e.quote_identifier("1abc"), "\"1abc\"");
    }

    #[test]
    fn test_quote_table() {
        let e = escaper(DialectKind::Postgres);
        assert_eq!(e.quote_table(&TableDescriptor::new("users")), "\"users\"");
        assert_eq!(
            e.quote_table(&TableDescriptor::with_schema("app", "users")),
            "\"app\".\"users\""
        );
    }

    #[test]
    fn test_escape_strings() {
        let e = escaper(DialectKind::Generic);
        assert_eq!(e.escape(&SqlValue::Text(String::from("it's"))), "'it''s'");
        assert_eq!(
            e.escape(&SqlValue::Text(String::from("'; DROP TABLE users; --"))),
            "'''; DROP TABLE users; --'"
        );
    }

    #[test]
    fn test_escape_booleans_per_dialect() {
        assert_eq!(escaper(DialectKind::Postgres).escape(&SqlValue::Bool(true)), "TRUE");
        assert_eq!(escaper(DialectKind::Ibmi).escape(&SqlValue::Bool(true)), "1");
        assert_eq!(escaper(DialectKind::Ibmi).escape(&SqlValue::Bool(false)), "0");
    }

    #[test]
    fn test_escape_special_floats() {
        assert_eq!(
            escaper(DialectKind::Postgres).escape(&SqlValue::Float(f64::NAN)),
            "CAST('NaN' AS DOUBLE PRECISION)"
        );
        assert_eq!(
            escaper(DialectKind::Db2).escape(&SqlValue::Float(f64::NEG_INFINITY)),
            "DECFLOAT('-Infinity')"
        );
        assert_eq!(escaper(DialectKind::Db2).escape(&SqlValue::Float(1.5)), "1.5");
    }

    #[test]
    fn test_escape_arrays() {
        let values = SqlValue::Array(vec![SqlValue::Int(1), SqlValue::Text(String::from("a"))]);
        assert_eq!(escaper(DialectKind::Postgres).escape(&values), "ARRAY[1, 'a']");
        assert_eq!(escaper(DialectKind::Db2).escape(&values), "(1, 'a')");
    }

    #[test]
    fn test_escape_blobs() {
        let blob = SqlValue::Blob(vec![0x48, 0x49]);
        assert_eq!(escaper(DialectKind::Postgres).escape(&blob), "'\\x4849'");
        assert_eq!(escaper(DialectKind::Db2).escape(&blob), "BLOB(X'4849')");
        assert_eq!(escaper(DialectKind::Generic).escape(&blob), "X'4849'");
    }

    #[test]
    fn test_escape_expressions() {
        let e = escaper(DialectKind::Postgres);
        assert_eq!(e.escape(&SqlValue::literal("CURRENT_TIMESTAMP")), "CURRENT_TIMESTAMP");
        assert_eq!(e.escape(&SqlValue::column("id")), "\"id\"");
        assert_eq!(
            e.escape(&SqlValue::function(
                "COALESCE",
                vec![SqlValue::column("a"), SqlValue::Text(String::from("x"))]
            )),
            "COALESCE(\"a\", 'x')"
        );
    }

    #[test]
    fn test_postgres_nul_is_escaped() {
        assert_eq!(
            escaper(DialectKind::Postgres).escape_string("a\0b"),
            "'a\\0b'"
        );
    }
}
