//! The comparison operator catalog.
//!
//! Operators are first-class values: each knows how to render itself against
//! a column name and a raw value into a SQL boolean-predicate fragment,
//! honoring a case-sensitivity flag. The catalog is closed — fixed at
//! compile time — and looked up by display name, so filter variants can
//! expose different subsets without duplicating rendering logic.

use serde::{Deserialize, Serialize};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// Equal (=)
    Equals,
    /// Not equal (!=)
    NotEquals,
    /// IN list; the value is a comma-separated list of raw tokens
    In,
    /// Greater than (>)
    GreaterThan,
    /// Less than (<)
    LessThan,
    /// Greater than or equal (>=)
    GreaterOrEquals,
    /// Less than or equal (<=)
    LessOrEquals,
    /// IS NULL
    IsNone,
    /// IS NOT NULL
    IsNotNone,
    /// LIKE with a trailing wildcard
    StartsWith,
    /// LIKE with a leading wildcard
    EndsWith,
    /// LIKE wrapped in wildcards on both sides
    Contains,
    /// LIKE with the value as the raw pattern
    Like,
    /// NOT LIKE with the value as the raw pattern
    NotLike,
}

/// Every operator in the catalog, in display order. `Equals` comes first;
/// new filters default to the first entry.
pub const ALL_OPERATORS: [Operator; 14] = [
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

impl Operator {
    /// The stable display name, also the key for [`Operator::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Equals => "Equals",
            Operator::NotEquals => "Not equals",
            Operator::In => "In",
            Operator::GreaterThan => "Greater than",
            Operator::LessThan => "Less than",
            Operator::GreaterOrEquals => "Greater than or equals",
            Operator::LessOrEquals => "Less than or equals",
            Operator::IsNone => "Is None",
            Operator::IsNotNone => "Is not None",
            Operator::StartsWith => "Starts with",
            Operator::EndsWith => "Ends with",
            Operator::Contains => "Contains",
            Operator::Like => "Like",
            Operator::NotLike => "Not Like",
        }
    }

    /// Look an operator up by its display name.
    pub fn from_name(name: &str) -> Option<Operator> {
        ALL_OPERATORS.iter().copied().find(|op| op.name() == name)
    }

    /// Returns true if this operator requires a value on the right side.
    /// The two null checks don't need one.
    pub fn needs_value(&self) -> bool {
        !matches!(self, Operator::IsNone | Operator::IsNotNone)
    }

    /// Render this operator into a SQL boolean-predicate fragment for the
    /// given column and raw value.
    ///
    /// Equality-family operators append `COLLATE NOCASE` when
    /// `case_sensitive` is false; LIKE-family operators leave case handling
    /// to the session-level `case_sensitive_like` pragma.
    pub fn render(&self, column: &str, value: &str, case_sensitive: bool) -> String {
        match self {
            Operator::Equals => comparison(column, "=", value, case_sensitive),
            Operator::NotEquals => comparison(column, "!=", value, case_sensitive),
            Operator::GreaterThan => comparison(column, ">", value, case_sensitive),
            Operator::LessThan => comparison(column, "<", value, case_sensitive),
            Operator::GreaterOrEquals => comparison(column, ">=", value, case_sensitive),
            Operator::LessOrEquals => comparison(column, "<=", value, case_sensitive),
            Operator::In => {
                let list = value
                    .split(',')
                    .map(|token| quote_literal(token.trim()))
                    .collect::<Vec<_>>()
                    .join(", ");
                if case_sensitive {
                    format!("{column} IN ({list})")
                } else {
                    format!("{column} COLLATE NOCASE IN ({list})")
                }
            }
            Operator::IsNone => format!("{column} IS NULL"),
            Operator::IsNotNone => format!("{column} IS NOT NULL"),
            Operator::StartsWith => like(column, &format!("{value}%")),
            Operator::EndsWith => like(column, &format!("%{value}")),
            Operator::Contains => like(column, &format!("%{value}%")),
            Operator::Like => like(column, value),
            Operator::NotLike => format!("{column} NOT LIKE {}", quote_literal(value)),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Quote a value as a SQL string literal, doubling embedded quotes.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn comparison(column: &str, symbol: &str, value: &str, case_sensitive: bool) -> String {
    let mut fragment = format!("{column} {symbol} {}", quote_literal(value));
    if !case_sensitive {
        fragment.push_str(" COLLATE NOCASE");
    }
    fragment
}

fn like(column: &str, pattern: &str) -> String {
    format!("{column} LIKE {}", quote_literal(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_equals_collation() {
        let op = Operator::Equals;
        assert_eq!(op.render("t.name", "bob", true), "t.name = 'bob'");
        assert_eq!(op.render("t.name", "bob", false), "t.name = 'bob' COLLATE NOCASE");
    }

    #[test]
    fn test_comparison_symbols() {
        assert_eq!(Operator::NotEquals.render("t.a", "1", true), "t.a != '1'");
        assert_eq!(Operator::GreaterThan.render("t.a", "1", true), "t.a > '1'");
        assert_eq!(Operator::LessOrEquals.render("t.a", "1", true), "t.a <= '1'");
    }

    #[test]
    fn test_in_list_trims_and_quotes() {
        let fragment = Operator::In.render("t.id", "1, 2,3", true);
        assert_eq!(fragment, "t.id IN ('1', '2', '3')");

        let fragment = Operator::In.render("t.id", "a,b", false);
        assert_eq!(fragment, "t.id COLLATE NOCASE IN ('a', 'b')");
    }

    #[test]
    fn test_null_checks_ignore_value() {
        assert_eq!(Operator::IsNone.render("t.a", "", false), "t.a IS NULL");
        assert_eq!(Operator::IsNotNone.render("t.a", "", true), "t.a IS NOT NULL");
    }

    #[test]
    fn test_like_wildcards() {
        assert_eq!(Operator::StartsWith.render("t.s", "ab", true), "t.s LIKE 'ab%'");
        assert_eq!(Operator::EndsWith.render("t.s", "ab", true), "t.s LIKE '%ab'");
        assert_eq!(Operator::Contains.render("t.s", "ab", true), "t.s LIKE '%ab%'");
        assert_eq!(Operator::Like.render("t.s", "a_b", true), "t.s LIKE 'a_b'");
        assert_eq!(Operator::NotLike.render("t.s", "a%", true), "t.s NOT LIKE 'a%'");
    }

    #[test]
    fn test_quote_escaping() {
        assert_eq!(
            Operator::Equals.render("t.s", "O'Brien", true),
            "t.s = 'O''Brien'"
        );
        assert_eq!(
            Operator::In.render("t.s", "O'a, b", true),
            "t.s IN ('O''a', 'b')"
        );
    }

    #[test]
    fn test_name_round_trip() {
        for op in ALL_OPERATORS {
            assert_eq!(Operator::from_name(op.name()), Some(op));
        }
        assert_eq!(Operator::from_name("Sounds like"), None);
    }
}
