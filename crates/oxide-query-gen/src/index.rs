//! Index descriptors and deterministic index naming.

use crate::predicate::Predicate;

/// Sort direction of an index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending (default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Index storage method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMethod {
    /// B-tree index.
    BTree,
    /// Hash index.
    Hash,
    /// GiST index.
    Gist,
    /// GIN index.
    Gin,
    /// SP-GiST index.
    SpGist,
    /// BRIN index.
    Brin,
}

impl IndexMethod {
    /// Returns the method name as written after `USING`.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::BTree => "BTREE",
            Self::Hash => "HASH",
            Self::Gist => "GIST",
            Self::Gin => "GIN",
            Self::SpGist => "SPGIST",
            Self::Brin => "BRIN",
        }
    }
}

/// One field of an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexField {
    /// A column reference.
    Column {
        /// Column name.
        name: String,
        /// Explicit sort direction.
        order: Option<SortOrder>,
        /// Operator class, e.g. `varchar_pattern_ops`.
        operator_class: Option<String>,
    },
    /// A raw SQL expression, inlined verbatim.
    Expression(String),
}

impl IndexField {
    /// Creates a plain column field.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            name: name.into(),
            order: None,
            operator_class: None,
        }
    }

    /// Creates an expression field.
    #[must_use]
    pub fn expression(sql: impl Into<String>) -> Self {
        Self::Expression(sql.into())
    }

    /// Sets the sort direction of a column field.
    #[must_use]
    pub fn order(mut self, direction: SortOrder) -> Self {
        if let Self::Column { order, .. } = &mut self {
            *order = Some(direction);
        }
        self
    }

    /// Sets the operator class of a column field.
    #[must_use]
    pub fn operator_class(mut self, class: impl Into<String>) -> Self {
        if let Self::Column { operator_class, .. } = &mut self {
            *operator_class = Some(class.into());
        }
        self
    }

    /// Returns the column name, `None` for expressions.
    #[must_use]
    pub fn column_name(&self) -> Option<&str> {
        match self {
            Self::Column { name, .. } => Some(name),
            Self::Expression(_) => None,
        }
    }
}

impl From<&str> for IndexField {
    fn from(name: &str) -> Self {
        Self::column(name)
    }
}

impl From<String> for IndexField {
    fn from(name: String) -> Self {
        Self::column(name)
    }
}

/// An index to create.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDescriptor {
    /// Explicit name; derived from the table and fields when absent.
    pub name: Option<String>,
    /// Indexed fields, in order.
    pub fields: Vec<IndexField>,
    /// Whether the index is unique.
    pub unique: bool,
    /// Non-key columns stored in the index.
    pub include: Vec<String>,
    /// Storage method.
    pub using: Option<IndexMethod>,
    /// Partial index predicate.
    pub where_clause: Option<Predicate>,
}

impl IndexDescriptor {
    /// Creates a non-unique index over `fields`.
    #[must_use]
    pub fn new<I, F>(fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<IndexField>,
    {
        Self {
            name: None,
            fields: fields.into_iter().map(Into::into).collect(),
            unique: false,
            include: Vec::new(),
            using: None,
            where_clause: None,
        }
    }

    /// Sets an explicit name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Makes the index unique.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Adds INCLUDE columns.
    #[must_use]
    pub fn include<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Sets the storage method.
    #[must_use]
    pub const fn using(mut self, method: IndexMethod) -> Self {
        self.using = Some(method);
        self
    }

    /// Makes the index partial.
    #[must_use]
    pub fn where_clause(mut self, predicate: Predicate) -> Self {
        self.where_clause = Some(predicate);
        self
    }
}

/// Identifies the index to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexName {
    /// The index name.
    Name(String),
    /// The indexed columns; the name is derived as on creation.
    Fields(Vec<String>),
}

impl From<&str> for IndexName {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for IndexName {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Vec<String>> for IndexName {
    fn from(fields: Vec<String>) -> Self {
        Self::Fields(fields)
    }
}

impl From<&[&str]> for IndexName {
    fn from(fields: &[&str]) -> Self {
        Self::Fields(fields.iter().map(|f| (*f).to_string()).collect())
    }
}

/// Derives the name of an index from its table and column names.
///
/// The name is `<table>_<field1>_..._<fieldN>` in snake case, with every
/// character outside `[A-Za-z0-9_]` replaced by `_`. Add and remove both
/// go through this, so an index created without a name can be removed by
/// its fields.
#[must_use]
pub fn derive_index_name<S: AsRef<str>>(table_name: &str, fields: &[S]) -> String {
    let mut raw = String::from(table_name);
    for field in fields {
        raw.push('_');
        raw.push_str(field.as_ref());
    }

    let mut name = String::with_capacity(raw.len() + 4);
    let mut prev: Option<char> = None;
    for c in raw.chars() {
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            name.push('_');
        }
        if c.is_ascii_alphanumeric() || c == '_' {
            name.push(c.to_ascii_lowercase());
        } else {
            name.push('_');
        }
        prev = Some(c);
    }
    name
}
