use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Temporal(NaiveDateTime),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Temporal(t) => {
                if t.time() == chrono::NaiveTime::MIN {
                    write!(f, "{}", t.date())
                } else {
                    write!(f, "{t}")
                }
            }
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Interpret the value as an `f64` when it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Best-effort typing of a raw text cell (CSV fields, spreadsheet strings).
    /// Surrounding whitespace is ignored and the usual missing-value markers
    /// read as [`Value::Null`].
    pub fn parse(raw: &str) -> Value {
        let s = raw.trim();
        if is_missing_marker(s) {
            return Value::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
        match s {
            "true" | "True" | "TRUE" => return Value::Bool(true),
            "false" | "False" | "FALSE" => return Value::Bool(false),
            _ => {}
        }
        if let Some(t) = parse_temporal(s) {
            return Value::Temporal(t);
        }
        Value::Text(raw.to_string())
    }
}

/// Cell texts Pandas reads as NaN by default.
const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether an already trimmed cell text stands for a missing value.
pub fn is_missing_marker(s: &str) -> bool {
    MISSING_MARKERS.contains(&s)
}

/// Parse an ISO-8601 date (`2023-01-31`) or date-time (`2023-01-31 08:00:00`,
/// `2023-01-31T08:00:00`).
pub fn parse_temporal(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// The dtype of a column, inferred from its non-null cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Bool,
    Temporal,
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Bool => "boolean",
            ColumnKind::Temporal => "temporal",
            ColumnKind::Text => "text",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Value>,
}

impl Column {
    /// Build a column, inferring its kind. Mixed columns become text and
    /// every non-null cell is rendered to a string.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let kind = infer_kind(&values);
        let values = if kind == ColumnKind::Text {
            values
                .into_iter()
                .map(|v| match v {
                    Value::Null | Value::Text(_) => v,
                    other => Value::Text(other.to_string()),
                })
                .collect()
        } else {
            values
        };
        Column {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }

    /// Numeric view of the column; `None` for null or non-finite cells.
    pub fn finite_values(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|v| v.as_f64().filter(|x| x.is_finite()))
            .collect()
    }
}

fn infer_kind(values: &[Value]) -> ColumnKind {
    let mut kind: Option<ColumnKind> = None;
    for v in values {
        let this = match v {
            Value::Null => continue,
            Value::Integer(_) | Value::Float(_) => ColumnKind::Numeric,
            Value::Bool(_) => ColumnKind::Bool,
            Value::Temporal(_) => ColumnKind::Temporal,
            Value::Text(_) => return ColumnKind::Text,
        };
        match kind {
            None => kind = Some(this),
            Some(k) if k != this => return ColumnKind::Text,
            Some(_) => {}
        }
    }
    // An all-null column reads as float NaN in Pandas.
    kind.unwrap_or(ColumnKind::Numeric)
}

// ---------------------------------------------------------------------------
// Dataset – one loaded table
// ---------------------------------------------------------------------------

/// A named table of equal-length columns.
///
/// `index` holds the original row label of every row, so that a filtered
/// dataset still plots rows at the position they had in the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub columns: Vec<Column>,
    pub index: Vec<usize>,
}

impl Dataset {
    /// Build a dataset with a fresh `0..n` index.
    ///
    /// Returns `None` when the columns disagree on their length.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Option<Self> {
        let rows = columns.first().map_or(0, Column::len);
        if columns.iter().any(|c| c.len() != rows) {
            return None;
        }
        Some(Dataset {
            name: name.into(),
            columns,
            index: (0..rows).collect(),
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric columns in declaration order.
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_numeric()).collect()
    }

    /// Row labels as plot coordinates.
    pub fn index_f64(&self) -> Vec<f64> {
        self.index.iter().map(|&i| i as f64).collect()
    }

    /// A new dataset holding only the given row positions, in order.
    /// Column kinds are kept as they were.
    pub fn take_rows(&self, rows: &[usize]) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                kind: c.kind,
                values: rows.iter().map(|&r| c.values[r].clone()).collect(),
            })
            .collect();
        Dataset {
            name: self.name.clone(),
            columns,
            index: rows.iter().map(|&r| self.index[r]).collect(),
        }
    }
}
