//! Built-in functions
//!
//! A closed table of unary numeric transforms. Names are resolved when a
//! call node is built, so an unknown name is a parse error.

use reckon_core::{checked_ln, checked_sqrt, MathError, ReckonError};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Metadata for a built-in function
#[derive(Debug, Clone, Serialize)]
pub struct FunctionMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub examples: &'static [&'static str],
    pub related: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Log,
    Abs,
}

static SIN_EXAMPLES: [&str; 2] = ["sin(0)", "sin(x / 2)"];
static COS_EXAMPLES: [&str; 1] = ["cos(0)"];
static TAN_EXAMPLES: [&str; 1] = ["tan(1)"];
static SQRT_EXAMPLES: [&str; 2] = ["sqrt(9)", "sqrt(x * x + y * y)"];
static LOG_EXAMPLES: [&str; 2] = ["log(1)", "log(10)"];
static ABS_EXAMPLES: [&str; 2] = ["abs(0 - 5)", "abs(3.14)"];

static TRIG_RELATED: [&str; 3] = ["sin", "cos", "tan"];
static SQRT_RELATED: [&str; 1] = ["abs"];
static LOG_RELATED: [&str; 1] = ["sqrt"];
static ABS_RELATED: [&str; 1] = ["sqrt"];

impl Builtin {
    pub const ALL: [Builtin; 6] = [
        Builtin::Sin,
        Builtin::Cos,
        Builtin::Tan,
        Builtin::Sqrt,
        Builtin::Log,
        Builtin::Abs,
    ];

    /// Resolve a function by its exact (case-sensitive) name
    pub fn from_name(name: &str) -> Result<Self, ReckonError> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == name)
            .ok_or_else(|| {
                let similar = Self::find_similar(name);
                let err = ReckonError::unknown_function(name);
                if similar.is_empty() {
                    err
                } else {
                    err.with_suggestion(format!(
                        "Similar: {}. Use 'help' for full list.",
                        similar.join(", ")
                    ))
                }
            })
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Sin => "sin",
            Builtin::Cos => "cos",
            Builtin::Tan => "tan",
            Builtin::Sqrt => "sqrt",
            Builtin::Log => "log",
            Builtin::Abs => "abs",
        }
    }

    /// Apply the function. Only sqrt and log have a guarded domain.
    pub fn apply(self, x: f64) -> Result<f64, MathError> {
        match self {
            Builtin::Sin => Ok(x.sin()),
            Builtin::Cos => Ok(x.cos()),
            Builtin::Tan => Ok(x.tan()),
            Builtin::Sqrt => checked_sqrt(x),
            Builtin::Log => checked_ln(x),
            Builtin::Abs => Ok(x.abs()),
        }
    }

    pub fn meta(self) -> FunctionMeta {
        match self {
            Builtin::Sin => FunctionMeta {
                name: "sin",
                description: "Sine of an angle in radians",
                usage: "sin(x)",
                examples: &SIN_EXAMPLES,
                related: &TRIG_RELATED,
            },
            Builtin::Cos => FunctionMeta {
                name: "cos",
                description: "Cosine of an angle in radians",
                usage: "cos(x)",
                examples: &COS_EXAMPLES,
                related: &TRIG_RELATED,
            },
            Builtin::Tan => FunctionMeta {
                name: "tan",
                description: "Tangent of an angle in radians",
                usage: "tan(x)",
                examples: &TAN_EXAMPLES,
                related: &TRIG_RELATED,
            },
            Builtin::Sqrt => FunctionMeta {
                name: "sqrt",
                description: "Square root (x must be non-negative)",
                usage: "sqrt(x)",
                examples: &SQRT_EXAMPLES,
                related: &SQRT_RELATED,
            },
            Builtin::Log => FunctionMeta {
                name: "log",
                description: "Natural logarithm (x must be positive)",
                usage: "log(x)",
                examples: &LOG_EXAMPLES,
                related: &LOG_RELATED,
            },
            Builtin::Abs => FunctionMeta {
                name: "abs",
                description: "Absolute value",
                usage: "abs(x)",
                examples: &ABS_EXAMPLES,
                related: &ABS_RELATED,
            },
        }
    }

    /// Names similar to `name`, best match first, at most three
    fn find_similar(name: &str) -> Vec<&'static str> {
        let query = name.to_lowercase();
        let mut matches: Vec<(&'static str, usize)> = Self::ALL
            .iter()
            .map(|f| (f.name(), Self::similarity_score(&query, f.name())))
            .filter(|(_, score)| *score >= 4)
            .collect();

        matches.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        matches.into_iter().take(3).map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if query == candidate {
            score += 200;
        } else if candidate.starts_with(query) || query.starts_with(candidate) {
            score += 100;
        } else if candidate.contains(query) || query.contains(candidate) {
            score += 50;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        score += query_chars.intersection(&candidate_chars).count() * 2;

        score
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reckon_core::codes;

    #[test]
    fn test_from_name() {
        for f in Builtin::ALL {
            assert_eq!(Builtin::from_name(f.name()), Ok(f));
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = Builtin::from_name("unknown").unwrap_err();
        assert!(err.is(codes::UNKNOWN_FUNCTION));
        assert!(err.message.contains("unknown"));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let err = Builtin::from_name("SIN").unwrap_err();
        assert!(err.is(codes::UNKNOWN_FUNCTION));
        // The suggestion still points at the lowercase name
        assert!(err.suggestion.unwrap().contains("sin"));
    }

    #[test]
    fn test_similar_suggestion() {
        let err = Builtin::from_name("sqr").unwrap_err();
        let suggestion = err.suggestion.unwrap();
        assert!(suggestion.starts_with("Similar: sqrt"), "got: {}", suggestion);
    }

    #[test]
    fn test_apply() {
        assert_eq!(Builtin::Sin.apply(0.0), Ok(0.0));
        assert_eq!(Builtin::Cos.apply(0.0), Ok(1.0));
        assert_eq!(Builtin::Tan.apply(0.0), Ok(0.0));
        assert_eq!(Builtin::Sqrt.apply(9.0), Ok(3.0));
        assert_eq!(Builtin::Log.apply(1.0), Ok(0.0));
        assert_eq!(Builtin::Abs.apply(-5.0), Ok(5.0));
    }

    #[test]
    fn test_domain_errors() {
        assert!(matches!(Builtin::Sqrt.apply(-4.0), Err(MathError::DomainError(_))));
        assert!(matches!(Builtin::Log.apply(-1.0), Err(MathError::DomainError(_))));
        assert!(matches!(Builtin::Log.apply(0.0), Err(MathError::DomainError(_))));
    }

    #[test]
    fn test_meta_matches_name() {
        for f in Builtin::ALL {
            let meta = f.meta();
            assert_eq!(meta.name, f.name());
            assert!(meta.usage.starts_with(f.name()));
            assert!(!meta.examples.is_empty());
        }
    }
}
