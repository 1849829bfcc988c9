use std::fmt;

/// Why the next-occurrence search gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exhaustion {
    /// Every correction pass in the budget was spent without settling.
    IterationBudget(u32),
    /// The candidate left the supported year range.
    YearBound(i32),
}

impl fmt::Display for Exhaustion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IterationBudget(n) => write!(f, "no match within {n} iterations"),
            Self::YearBound(year) => write!(f, "search passed supported year bound at {year}"),
        }
    }
}

/// Shared error type used across all cronstep crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    #[error("{field}: {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("{field}: no allowed values")]
    EmptyField { field: &'static str },

    #[error("schedule is unsatisfiable: {0}")]
    Unsatisfiable(Exhaustion),
}

impl Error {
    /// Shorthand for a field-level parse failure.
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// True for the calculator's only failure mode.
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, Self::Unsatisfiable(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
