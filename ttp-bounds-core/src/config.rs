//! Configuration validation shared by both builders.

use thiserror::Error;

/// Errors raised while validating builder and solver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A strategy name is not one of the supported variants.
    #[error("unknown {kind} `{name}`")]
    UnknownStrategy {
        /// Which kind of strategy was being parsed.
        kind: &'static str,
        /// The rejected name.
        name: String,
    },
    /// The integer feasibility tolerance is not in `(0, 1e-9]`.
    #[error("integer feasibility tolerance {tolerance} must lie in (0, 1e-9]")]
    LooseTolerance {
        /// The rejected tolerance, formatted.
        tolerance: String,
    },
    /// Solvers must run on exactly one worker thread.
    #[error("solver thread count must be 1, got {threads}")]
    ThreadCount {
        /// The rejected thread count.
        threads: usize,
    },
    /// A metaheuristic that never stops on its own has no limit.
    #[error("{metaheuristic} requires a solution limit or a time limit")]
    UnboundedSearch {
        /// Name of the metaheuristic.
        metaheuristic: &'static str,
    },
    /// A limit was set to zero.
    #[error("{field} must be positive")]
    ZeroLimit {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Look up a strategy by its configuration name.
pub(crate) fn parse_name<T: Copy>(
    kind: &'static str,
    name: &str,
    table: &[(&'static str, T)],
) -> Result<T, ConfigError> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == name.trim())
        .map(|&(_, value)| value)
        .ok_or_else(|| ConfigError::UnknownStrategy {
            kind,
            name: name.to_owned(),
        })
}

/// Configuration name of `value`, falling back to `"UNKNOWN"`.
pub(crate) fn name_of<T: Copy + PartialEq>(value: T, table: &[(&'static str, T)]) -> &'static str {
    table
        .iter()
        .find(|(_, candidate)| *candidate == value)
        .map_or("UNKNOWN", |&(name, _)| name)
}

/// Implement `FromStr`, `TryFrom<String>` and `Into<String>` for an enum with
/// a `NAMES` table and a `name` method.
macro_rules! named_enum_conversions {
    ($ty:ty, $kind:literal) => {
        impl ::std::str::FromStr for $ty {
            type Err = $crate::ConfigError;

            fn from_str(name: &str) -> Result<Self, Self::Err> {
                $crate::config::parse_name($kind, name, &Self::NAMES)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = $crate::ConfigError;

            fn try_from(name: String) -> Result<Self, Self::Error> {
                name.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.name().to_owned()
            }
        }
    };
}

pub(crate) use named_enum_conversions;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TABLE: [(&str, u8); 2] = [("FIRST", 1), ("SECOND", 2)];

    #[rstest]
    #[case("FIRST", Ok(1))]
    #[case(" SECOND ", Ok(2))]
    #[case(
        "first",
        Err(ConfigError::UnknownStrategy { kind: "test strategy", name: "first".to_owned() })
    )]
    fn names_are_exact_screaming_snake_case(
        #[case] name: &str,
        #[case] expected: Result<u8, ConfigError>,
    ) {
        assert_eq!(parse_name("test strategy", name, &TABLE), expected);
    }

    #[rstest]
    fn name_of_reverses_lookup() {
        assert_eq!(name_of(2, &TABLE), "SECOND");
    }
}
