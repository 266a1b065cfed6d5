//! Bind parameter collection.

use crate::dialect::BindStyle;
use crate::escape::Escaper;
use crate::value::SqlValue;

/// Turns values into SQL text, either inline or as bind markers.
///
/// A positional collector replaces each value with the dialect's marker
/// and records it; expressions (`DEFAULT`, raw SQL, column references,
/// function calls) are always inlined.
#[derive(Debug, Clone)]
pub struct BindCollector {
    escaper: Escaper,
    style: Option<BindStyle>,
    parameters: Vec<SqlValue>,
}

impl BindCollector {
    /// Creates a collector that escapes every value inline.
    #[must_use]
    pub const fn inline(escaper: Escaper) -> Self {
        Self {
            escaper,
            style: None,
            parameters: Vec::new(),
        }
    }

    /// Creates a collector that emits bind markers.
    #[must_use]
    pub const fn positional(escaper: Escaper, style: BindStyle) -> Self {
        Self {
            escaper,
            style: Some(style),
            parameters: Vec::new(),
        }
    }

    /// Returns whether values are bound rather than inlined.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.style.is_some()
    }

    /// Returns the SQL text standing for `value`.
    pub fn add(&mut self, value: &SqlValue) -> String {
        let style = match self.style {
            Some(style) if !value.is_expression() => style,
            _ => return self.escaper.escape(value),
        };
        self.parameters.push(value.clone());
        match style {
            BindStyle::Dollar => format!("${}", self.parameters.len()),
            BindStyle::QuestionMark => String::from("?"),
        }
    }

    /// Returns the escaper used for inlined values.
    #[must_use]
    pub const fn escaper(&self) -> &Escaper {
        &self.escaper
    }

    /// Consumes the collector, returning the parameters in marker order.
    #[must_use]
    pub fn into_parameters(self) -> Vec<SqlValue> {
        self.parameters
    }
}
