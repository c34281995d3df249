//! Per-column filter state machines.
//!
//! A [`Filter`] is bound at creation to one column (by qualified name) and
//! one semantic type, and from then on holds a currently selected operator
//! and value. Both are validated on assignment, so a filter that exists is
//! always renderable: `render` has no error path.

use crate::error::{SiftError, SiftResult};
use crate::operators::Operator;
use crate::schema::{ColumnDef, SemanticType};

/// Operators available to numeric columns.
pub const NUMERIC_OPERATORS: [Operator; 9] = [
    Operator::Equals,
    Operator::NotEquals,
    Operator::In,
    Operator::GreaterThan,
    Operator::LessThan,
    Operator::GreaterOrEquals,
    Operator::LessOrEquals,
    Operator::IsNone,
    Operator::IsNotNone,
];

/// Operators available to text columns: the numeric set plus the
/// pattern-matching family.
pub const TEXT_OPERATORS: [Operator; 14] = [
    Operator::Equals,
    Operator::NotEquals,
    Operator::In,
    Operator::GreaterThan,
    Operator::LessThan,
    Operator::GreaterOrEquals,
    Operator::LessOrEquals,
    Operator::IsNone,
    Operator::IsNotNone,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::Contains,
    Operator::Like,
    Operator::NotLike,
];

/// A stateful predicate builder bound to one column.
///
/// Created via [`Filter::for_column`]; the variant (numeric or text) is
/// fixed at creation and controls both the supported operator subset and
/// the value validation rule.
#[derive(Debug, Clone)]
pub struct Filter {
    column: String,
    kind: SemanticType,
    operator: Operator,
    value: String,
}

impl Filter {
    /// Create a filter for the given column, dispatching on its semantic
    /// type. The filter starts with operator `Equals` and an empty value.
    pub fn for_column(column: &ColumnDef) -> Filter {
        Filter {
            column: column.full_name(),
            kind: column.semantic_type,
            operator: Operator::Equals,
            value: String::new(),
        }
    }

    /// The qualified column name this filter predicates on.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The currently selected operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The currently held value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// All the operators this filter supports.
    pub fn supported_operators(&self) -> &'static [Operator] {
        match self.kind {
            SemanticType::Numeric => &NUMERIC_OPERATORS,
            SemanticType::Text => &TEXT_OPERATORS,
        }
    }

    /// Select an operator. Fails if `operator` is outside the supported set;
    /// the previously selected operator is kept on failure.
    pub fn set_operator(&mut self, operator: Operator) -> SiftResult<()> {
        if !self.supported_operators().contains(&operator) {
            return Err(SiftError::invalid_operator(
                operator.name(),
                self.supported_operators().iter().map(|op| op.name()),
            ));
        }
        self.operator = operator;
        Ok(())
    }

    /// Assign a value, validating it against the current operator and the
    /// filter's semantic type.
    ///
    /// With a null-check operator selected the stored value is forced to the
    /// empty string and any input succeeds. The `In` operator bypasses
    /// per-value type validation since it carries a comma-separated list of
    /// raw tokens. A rejected assignment leaves the previous value in place.
    pub fn set_value(&mut self, value: &str) -> SiftResult<()> {
        if !self.operator.needs_value() {
            self.value.clear();
            return Ok(());
        }
        if value.is_empty() {
            return Err(SiftError::validation("value can't be an empty string"));
        }
        if !self.validate(value) && self.operator != Operator::In {
            return Err(SiftError::validation(format!("invalid value '{value}'")));
        }
        self.value = value.to_string();
        Ok(())
    }

    fn validate(&self, value: &str) -> bool {
        match self.kind {
            SemanticType::Numeric => value.trim().parse::<f64>().is_ok(),
            SemanticType::Text => !value.is_empty(),
        }
    }

    /// Render this filter into a SQL predicate fragment.
    pub fn render(&self, case_sensitive: bool) -> String {
        self.operator.render(&self.column, &self.value, case_sensitive)
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.value)
    }
}
