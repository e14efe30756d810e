use std::fmt;
use std::str::FromStr;

use super::model::{parse_temporal, Column, ColumnKind, Dataset, Value};
use super::store::DatasetStore;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Filter spec: column, operator, comparison text
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Contains,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Lt,
        Operator::Ge,
        Operator::Le,
        Operator::Contains,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Contains => "contains",
        }
    }

    fn is_ordering(&self) -> bool {
        matches!(self, Operator::Gt | Operator::Lt | Operator::Ge | Operator::Le)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedOperator(s.to_string()))
    }
}

/// One filter request. Not stored anywhere after it has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub column: String,
    pub operator: Operator,
    pub value: String,
}

impl FilterSpec {
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        FilterSpec {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Build a spec from the raw triple a form hands over.
    pub fn parse(column: &str, operator: &str, value: &str) -> Result<Self> {
        Ok(FilterSpec::new(column, operator.parse()?, value))
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?}", self.column, self.operator, self.value)
    }
}

// ---------------------------------------------------------------------------
// Predicate built from a spec against one concrete column
// ---------------------------------------------------------------------------

enum Predicate {
    /// `==` / `!=` against a value of the column's own kind. `None` means the
    /// comparison text has no representation in that kind.
    Equals { target: Option<Value>, negate: bool },
    Ordering { op: Operator, threshold: f64 },
    Contains { needle: String },
}

impl Predicate {
    fn build(column: &Column, spec: &FilterSpec) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidComparison {
            column: column.name.clone(),
            reason,
        };

        match spec.operator {
            Operator::Eq | Operator::Ne => Ok(Predicate::Equals {
                target: coerce(&spec.value, column.kind),
                negate: spec.operator == Operator::Ne,
            }),
            op if op.is_ordering() => {
                if column.kind != ColumnKind::Numeric {
                    return Err(invalid(format!("'{op}' needs a numeric column, found {}", column.kind)));
                }
                let threshold = spec
                    .value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| invalid(format!("'{}' is not a number", spec.value)))?;
                Ok(Predicate::Ordering { op, threshold })
            }
            _ => {
                if column.kind != ColumnKind::Text {
                    return Err(invalid(format!("'contains' needs a text column, found {}", column.kind)));
                }
                Ok(Predicate::Contains {
                    needle: spec.value.to_lowercase(),
                })
            }
        }
    }

    fn matches(&self, cell: &Value) -> bool {
        match self {
            Predicate::Equals { target, negate } => {
                let equal = match (target, cell) {
                    (_, Value::Null) | (None, _) => false,
                    (Some(t), c) => match (t.as_f64(), c.as_f64()) {
                        (Some(a), Some(b)) => a == b,
                        _ => t == c,
                    },
                };
                equal != *negate
            }
            Predicate::Ordering { op, threshold } => match cell.as_f64() {
                Some(v) => match op {
                    Operator::Gt => v > *threshold,
                    Operator::Lt => v < *threshold,
                    Operator::Ge => v >= *threshold,
                    Operator::Le => v <= *threshold,
                    _ => false,
                },
                None => false,
            },
            Predicate::Contains { needle } => match cell {
                Value::Text(s) => s.to_lowercase().contains(needle.as_str()),
                _ => false,
            },
        }
    }
}

/// Interpret comparison text as a value of the given column kind.
fn coerce(text: &str, kind: ColumnKind) -> Option<Value> {
    match kind {
        ColumnKind::Numeric => text.trim().parse::<f64>().ok().map(Value::Float),
        ColumnKind::Bool => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        ColumnKind::Temporal => parse_temporal(text).map(Value::Temporal),
        ColumnKind::Text => Some(Value::Text(text.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Applying a filter
// ---------------------------------------------------------------------------

/// What happened to one dataset during [`apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Filtered { dataset: String, before: usize, after: usize },
    /// The dataset has no column of that name and was left alone.
    Skipped { dataset: String },
}

/// Row positions of `dataset` that pass `spec`, or `None` if the dataset
/// has no such column.
pub fn matching_rows(dataset: &Dataset, spec: &FilterSpec) -> Result<Option<Vec<usize>>> {
    let Some(column) = dataset.column(&spec.column) else {
        return Ok(None);
    };
    let predicate = Predicate::build(column, spec)?;
    Ok(Some(
        column
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| predicate.matches(v))
            .map(|(i, _)| i)
            .collect(),
    ))
}

/// Filter every dataset in the store in place.
///
/// All datasets are evaluated before any is replaced, so an error leaves the
/// store untouched.
pub fn apply(store: &mut DatasetStore, spec: &FilterSpec) -> Result<Vec<FilterOutcome>> {
    let mut pending = Vec::with_capacity(store.len());
    for (name, dataset) in store.iter() {
        let rows = matching_rows(dataset, spec)?;
        pending.push((name.clone(), rows.map(|r| (dataset.len(), dataset.take_rows(&r)))));
    }

    let mut outcomes = Vec::with_capacity(pending.len());
    for (name, result) in pending {
        match result {
            Some((before, filtered)) => {
                let after = filtered.len();
                log::debug!("Filter {spec} on '{name}': {before} -> {after} rows");
                store.replace(&name, filtered);
                outcomes.push(FilterOutcome::Filtered {
                    dataset: name,
                    before,
                    after,
                });
            }
            None => {
                log::debug!("Dataset '{name}' has no column '{}', left unfiltered", spec.column);
                outcomes.push(FilterOutcome::Skipped { dataset: name });
            }
        }
    }
    log::info!("Applied filter {spec} to {} dataset(s)", outcomes.len());
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let name = Column::new(
            "name",
            ["Big", "small", "Cab", ""].iter().map(|s| Value::parse(s)).collect(),
        );
        let qty = Column::new(
            "qty",
            vec![Value::Integer(5), Value::Float(2.5), Value::Null, Value::Integer(7)],
        );
        Dataset::new("d", vec![name, qty]).unwrap()
    }

    #[test]
    fn operators_parse_from_symbols() {
        assert_eq!(">=".parse::<Operator>().unwrap(), Operator::Ge);
        assert_eq!("Contains".parse::<Operator>().unwrap(), Operator::Contains);
        assert!(matches!("=~".parse::<Operator>(), Err(Error::UnsupportedOperator(_))));
    }

    #[test]
    fn contains_ignores_case_and_nulls() {
        let rows = matching_rows(&dataset(), &FilterSpec::new("name", Operator::Contains, "B"))
            .unwrap()
            .unwrap();
        assert_eq!(rows, vec![0, 2]);
    }

    #[test]
    fn numeric_equality_parses_the_value() {
        let ds = dataset();
        let eq = matching_rows(&ds, &FilterSpec::new("qty", Operator::Eq, " 5 ")).unwrap().unwrap();
        assert_eq!(eq, vec![0]);
        let ne = matching_rows(&ds, &FilterSpec::new("qty", Operator::Ne, "5")).unwrap().unwrap();
        assert_eq!(ne, vec![1, 2, 3]);
    }

    #[test]
    fn uncoercible_equality_matches_nothing() {
        let ds = dataset();
        let eq = matching_rows(&ds, &FilterSpec::new("qty", Operator::Eq, "five")).unwrap().unwrap();
        assert!(eq.is_empty());
        let ne = matching_rows(&ds, &FilterSpec::new("qty", Operator::Ne, "five")).unwrap().unwrap();
        assert_eq!(ne.len(), ds.len());
    }

    #[test]
    fn ordering_drops_nulls() {
        let rows = matching_rows(&dataset(), &FilterSpec::new("qty", Operator::Gt, "2.5"))
            .unwrap()
            .unwrap();
        assert_eq!(rows, vec![0, 3]);
    }

    #[test]
    fn ordering_on_text_is_invalid() {
        let err = matching_rows(&dataset(), &FilterSpec::new("name", Operator::Lt, "3")).unwrap_err();
        assert!(matches!(err, Error::InvalidComparison { .. }));
        let err = matching_rows(&dataset(), &FilterSpec::new("qty", Operator::Lt, "abc")).unwrap_err();
        assert!(matches!(err, Error::InvalidComparison { .. }));
    }

    #[test]
    fn contains_on_numbers_is_invalid() {
        let err = matching_rows(&dataset(), &FilterSpec::new("qty", Operator::Contains, "5")).unwrap_err();
        assert!(matches!(err, Error::InvalidComparison { .. }));
    }

    #[test]
    fn missing_column_is_none() {
        assert_eq!(
            matching_rows(&dataset(), &FilterSpec::new("nope", Operator::Eq, "1")).unwrap(),
            None
        );
    }
}
