//! WHERE-clause predicates.
//!
//! A small predicate tree covering what updates, deletes, selects and
//! partial indexes need. Operators without a common spelling (regular
//! expressions, case-insensitive LIKE) are rewritten per dialect.

use crate::bind::BindCollector;
use crate::dialect::{db2, generic, postgres, BooleanLiteral, DialectKind};
use crate::error::{QueryGenError, Result};
use crate::fragment::comma_list;
use crate::generator::QueryGenerator;
use crate::operation::Operation;
use crate::value::{SqlValue, ToSqlValue};

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhereOperator {
    /// `=`, or `IS NULL` against NULL.
    Eq,
    /// `<>`, or `IS NOT NULL` against NULL.
    Ne,
    /// `>`.
    Gt,
    /// `>=`.
    Gte,
    /// `<`.
    Lt,
    /// `<=`.
    Lte,
    /// `IS`, for NULL and truth values.
    Is,
    /// `IS NOT`.
    IsNot,
    /// `LIKE`.
    Like,
    /// `NOT LIKE`.
    NotLike,
    /// Case-insensitive `LIKE`.
    ILike,
    /// Case-insensitive `NOT LIKE`.
    NotILike,
    /// `IN (...)`; the value must be an array.
    In,
    /// `NOT IN (...)`; the value must be an array.
    NotIn,
    /// `BETWEEN a AND b`; the value must be a two-element array.
    Between,
    /// `NOT BETWEEN a AND b`.
    NotBetween,
    /// Regular expression match.
    Regexp,
    /// Negated regular expression match.
    NotRegexp,
    /// Case-insensitive regular expression match.
    IRegexp,
    /// Negated case-insensitive regular expression match.
    NotIRegexp,
}

/// A boolean condition over columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column <op> value`.
    Compare {
        /// Column name.
        column: String,
        /// Operator.
        operator: WhereOperator,
        /// Right-hand side.
        value: SqlValue,
    },
    /// Conjunction. Empty means "no condition".
    And(Vec<Predicate>),
    /// Disjunction. Empty never matches.
    Or(Vec<Predicate>),
    /// Negation.
    Not(Box<Predicate>),
    /// Raw SQL, inlined verbatim.
    Literal(String),
}

impl Predicate {
    /// The empty condition.
    #[must_use]
    pub const fn all() -> Self {
        Self::And(Vec::new())
    }

    /// `column <operator> value`.
    #[must_use]
    pub fn compare(column: impl Into<String>, operator: WhereOperator, value: impl ToSqlValue) -> Self {
        Self::Compare {
            column: column.into(),
            operator,
            value: value.to_sql_value(),
        }
    }

    /// `column = value`.
    #[must_use]
    pub fn eq(column: impl Into<String>, value: impl ToSqlValue) -> Self {
        Self::compare(column, WhereOperator::Eq, value)
    }

    /// `column IN (values)`.
    #[must_use]
    pub fn is_in<V: ToSqlValue>(column: impl Into<String>, values: Vec<V>) -> Self {
        Self::Compare {
            column: column.into(),
            operator: WhereOperator::In,
            value: SqlValue::Array(values.into_iter().map(ToSqlValue::to_sql_value).collect()),
        }
    }

    /// Conjunction of `predicates`.
    #[must_use]
    pub const fn and(predicates: Vec<Self>) -> Self {
        Self::And(predicates)
    }

    /// Disjunction of `predicates`.
    #[must_use]
    pub const fn or(predicates: Vec<Self>) -> Self {
        Self::Or(predicates)
    }

    /// Negation of `predicate`.
    #[must_use]
    pub fn negate(predicate: Self) -> Self {
        Self::Not(Box::new(predicate))
    }

    /// Raw SQL condition.
    #[must_use]
    pub fn literal(sql: impl Into<String>) -> Self {
        Self::Literal(sql.into())
    }

    /// Returns whether the predicate renders to nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::And(items) => items.iter().all(Self::is_empty),
            _ => false,
        }
    }

    /// Renders the predicate, binding values through `binds`.
    ///
    /// Returns the empty string for an empty predicate.
    pub(crate) fn to_sql(
        &self,
        generator: &QueryGenerator,
        operation: Operation,
        binds: &mut BindCollector,
    ) -> Result<String> {
        match self {
            Self::Compare {
                column,
                operator,
                value,
            } => compare_sql(generator, operation, binds, column, *operator, value),
            Self::And(items) => join_group(generator, operation, binds, items, " AND ", ""),
            Self::Or(items) => join_group(generator, operation, binds, items, " OR ", "0 = 1"),
            Self::Not(inner) => {
                let sql = inner.to_sql(generator, operation, binds)?;
                if sql.is_empty() {
                    return Ok(String::from("0 = 1"));
                }
                Ok(format!("NOT ({sql})"))
            }
            Self::Literal(sql) => Ok(sql.clone()),
        }
    }

    const fn is_group(&self) -> bool {
        matches!(self, Self::And(_) | Self::Or(_))
    }
}

fn join_group(
    generator: &QueryGenerator,
    operation: Operation,
    binds: &mut BindCollector,
    items: &[Predicate],
    separator: &str,
    when_empty: &str,
) -> Result<String> {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        let sql = item.to_sql(generator, operation, binds)?;
        if sql.is_empty() {
            continue;
        }
        if item.is_group() && items.len() > 1 {
            parts.push(format!("({sql})"));
        } else {
            parts.push(sql);
        }
    }
    if parts.is_empty() {
        return Ok(String::from(when_empty));
    }
    Ok(parts.join(separator))
}

fn compare_sql(
    generator: &QueryGenerator,
    operation: Operation,
    binds: &mut BindCollector,
    column: &str,
    operator: WhereOperator,
    value: &SqlValue,
) -> Result<String> {
    let lhs = generator.quote_identifier(column);
    let kind = generator.kind();
    let sql = match operator {
        WhereOperator::Eq if *value == SqlValue::Null => format!("{lhs} IS NULL"),
        WhereOperator::Ne if *value == SqlValue::Null => format!("{lhs} IS NOT NULL"),
        WhereOperator::Eq => format!("{lhs} = {}", binds.add(value)),
        WhereOperator::Ne => format!("{lhs} <> {}", binds.add(value)),
        WhereOperator::Gt => format!("{lhs} > {}", binds.add(value)),
        WhereOperator::Gte => format!("{lhs} >= {}", binds.add(value)),
        WhereOperator::Lt => format!("{lhs} < {}", binds.add(value)),
        WhereOperator::Lte => format!("{lhs} <= {}", binds.add(value)),
        WhereOperator::Is | WhereOperator::IsNot => {
            let negate = operator == WhereOperator::IsNot;
            let keyword = if negate { "IS NOT" } else { "IS" };
            let numeric =
                generator.dialect().capabilities.boolean_literal == BooleanLiteral::Numeric;
            match value {
                SqlValue::Null => format!("{lhs} {keyword} NULL"),
                // Numeric booleans have no truth test.
                SqlValue::Bool(_) if numeric => {
                    let literal = generator.escape(value);
                    if negate {
                        format!("({lhs} IS NULL OR {lhs} <> {literal})")
                    } else {
                        format!("{lhs} = {literal}")
                    }
                }
                SqlValue::Bool(true) => format!("{lhs} {keyword} TRUE"),
                SqlValue::Bool(false) => format!("{lhs} {keyword} FALSE"),
                _ => {
                    return Err(QueryGenError::invalid(
                        operation,
                        format!("IS only compares with NULL, TRUE or FALSE (column {column})"),
                    ))
                }
            }
        }
        WhereOperator::Like => format!("{lhs} LIKE {}", binds.add(value)),
        WhereOperator::NotLike => format!("{lhs} NOT LIKE {}", binds.add(value)),
        WhereOperator::ILike | WhereOperator::NotILike => {
            let negate = operator == WhereOperator::NotILike;
            let rhs = binds.add(value);
            if kind == DialectKind::Postgres {
                format!("{lhs} {}ILIKE {rhs}", if negate { "NOT " } else { "" })
            } else {
                format!("UPPER({lhs}) {}LIKE UPPER({rhs})", if negate { "NOT " } else { "" })
            }
        }
        WhereOperator::In | WhereOperator::NotIn => {
            let SqlValue::Array(items) = value else {
                return Err(QueryGenError::invalid(
                    operation,
                    format!("IN expects an array of values (column {column})"),
                ));
            };
            let keyword = if operator == WhereOperator::In { "IN" } else { "NOT IN" };
            if items.is_empty() {
                format!("{lhs} {keyword} (NULL)")
            } else {
                let list = comma_list(items.iter().map(|item| binds.add(item)));
                format!("{lhs} {keyword} ({list})")
            }
        }
        WhereOperator::Between | WhereOperator::NotBetween => {
            let bounds = match value {
                SqlValue::Array(items) if items.len() == 2 => items,
                _ => {
                    return Err(QueryGenError::invalid(
                        operation,
                        format!("BETWEEN expects exactly two bounds (column {column})"),
                    ))
                }
            };
            let keyword = if operator == WhereOperator::Between { "BETWEEN" } else { "NOT BETWEEN" };
            let low = binds.add(&bounds[0]);
            let high = binds.add(&bounds[1]);
            format!("{lhs} {keyword} {low} AND {high}")
        }
        WhereOperator::Regexp
        | WhereOperator::NotRegexp
        | WhereOperator::IRegexp
        | WhereOperator::NotIRegexp => {
            let negate = matches!(operator, WhereOperator::NotRegexp | WhereOperator::NotIRegexp);
            let insensitive = matches!(operator, WhereOperator::IRegexp | WhereOperator::NotIRegexp);
            let pattern = binds.add(value);
            match kind {
                DialectKind::Generic => generic::regexp(&lhs, &pattern, negate, insensitive),
                DialectKind::Postgres => postgres::regexp(&lhs, &pattern, negate, insensitive),
                DialectKind::Db2 | DialectKind::Ibmi => {
                    db2::regexp(&lhs, &pattern, negate, insensitive)
                }
            }
        }
    };
    Ok(sql)
}
