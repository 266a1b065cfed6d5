//! Semantic SQL values.
//!
//! A [`SqlValue`] is what a caller hands the generator: the escaper turns
//! it into a dialect literal, or the bind collector lifts it out as a bind
//! parameter.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// A value that can appear in generated SQL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value, including NaN and the infinities.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
    /// Calendar date.
    Date(NaiveDate),
    /// Point in time, rendered in UTC.
    Timestamp(DateTime<Utc>),
    /// JSON document.
    Json(serde_json::Value),
    /// Array of values.
    Array(Vec<SqlValue>),
    /// The `DEFAULT` keyword.
    Default,
    /// Raw SQL inlined verbatim.
    ///
    /// **Warning**: this bypasses escaping. Only build it from
    /// code-authored expressions, never from end-user strings.
    Literal(String),
    /// Reference to a column, quoted as an identifier.
    Column(String),
    /// Function call whose arguments are escaped recursively.
    Function {
        /// Function name, emitted verbatim.
        name: String,
        /// Arguments.
        args: Vec<SqlValue>,
    },
}

impl SqlValue {
    /// Creates a raw SQL expression.
    #[must_use]
    pub fn literal(sql: impl Into<String>) -> Self {
        Self::Literal(sql.into())
    }

    /// Creates a column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }

    /// Creates a function call.
    #[must_use]
    pub fn function(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Function {
            name: name.into(),
            args,
        }
    }

    /// Returns whether the value is an expression that must be inlined
    /// rather than passed as a bind parameter.
    #[must_use]
    pub const fn is_expression(&self) -> bool {
        matches!(
            self,
            Self::Default | Self::Literal(_) | Self::Column(_) | Self::Function { .. }
        )
    }

    /// Converts a JSON scalar or array into a value.
    ///
    /// Objects are kept as [`SqlValue::Json`] documents.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Text(s.clone()),
            serde_json::Value::Array(items) => Self::Array(items.iter().map(Self::from_json).collect()),
            serde_json::Value::Object(_) => Self::Json(value.clone()),
        }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for NaiveDate {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Date(self)
    }
}

impl ToSqlValue for DateTime<Utc> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self)
    }
}

impl ToSqlValue for serde_json::Value {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Json(self)
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

/// Column values of one row, in insertion order.
///
/// An entry holding `None` is undefined and treated as absent. That is
/// distinct from an explicit [`SqlValue::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: Vec<(String, Option<SqlValue>)>,
}

impl ValueMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets a column value, replacing an earlier one.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl ToSqlValue) -> Self {
        self.insert(column, Some(value.to_sql_value()));
        self
    }

    /// Marks a column as undefined.
    #[must_use]
    pub fn undefined(mut self, column: impl Into<String>) -> Self {
        self.insert(column, None);
        self
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, column: impl Into<String>, value: Option<SqlValue>) {
        let column = column.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Returns the value of a defined column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Iterates over defined entries in insertion order.
    pub fn defined(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name.as_str(), v)))
    }

    /// Returns whether no entry is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defined().next().is_none()
    }

    /// Builds a map from a JSON object.
    ///
    /// Returns `None` when `value` is not an object.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut map = Self::new();
        for (column, v) in object {
            map.insert(column.clone(), Some(SqlValue::from_json(v)));
        }
        Some(map)
    }
}

impl<K: Into<String>> FromIterator<(K, SqlValue)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, SqlValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (column, value) in iter {
            map.insert(column, Some(value));
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_sql_value_conversions() {
        assert_eq!(true.to_sql_value(), SqlValue::Bool(true));
        assert_eq!(42_i32.to_sql_value(), SqlValue::Int(42));
        assert_eq!("hi".to_sql_value(), SqlValue::Text(String::from("hi")));
        assert_eq!(None::<i32>.to_sql_value(), SqlValue::Null);
    }

    #[test]
    fn test_from_json() {
        assert_eq!(SqlValue::from_json(&json!(null)), SqlValue::Null);
        assert_eq!(SqlValue::from_json(&json!(7)), SqlValue::Int(7));
        assert_eq!(SqlValue::from_json(&json!(1.5)), SqlValue::Float(1.5));
        assert_eq!(
            SqlValue::from_json(&json!(["a", 1])),
            SqlValue::Array(vec![SqlValue::Text(String::from("a")), SqlValue::Int(1)])
        );
        assert_eq!(
            SqlValue::from_json(&json!({"k": 1})),
            SqlValue::Json(json!({"k": 1}))
        );
    }

    #[test]
    fn test_expressions_are_not_bindable() {
        assert!(SqlValue::Default.is_expression());
        assert!(SqlValue::literal("NOW()").is_expression());
        assert!(!SqlValue::Int(1).is_expression());
    }

    #[test]
    fn test_value_map_skips_undefined() {
        let map = ValueMap::new()
            .set("id", SqlValue::Null)
            .undefined("name")
            .set("age", 3);
        let defined: Vec<_> = map.defined().map(|(k, _)| k).collect();
        assert_eq!(defined, vec!["id", "age"]);
        assert_eq!(map.get("id"), Some(&SqlValue::Null));
        assert_eq!(map.get("name"), None);
        assert!(ValueMap::new().undefined("x").is_empty());
    }

    #[test]
    fn test_value_map_replaces_in_place() {
        let map = ValueMap::new().set("a", 1).set("b", 2).set("a", 3);
        let entries: Vec<_> = map.defined().collect();
        assert_eq!(entries, vec![("a", &SqlValue::Int(3)), ("b", &SqlValue::Int(2))]);
    }

    #[test]
    fn test_value_map_from_json() {
        assert!(ValueMap::from_json(&json!([1, 2])).is_none());
        let map = ValueMap::from_json(&json!({"name": "x"})).unwrap();
        assert_eq!(map.get("name"), Some(&SqlValue::Text(String::from("x"))));
    }
}
