//! Tabular row-set exchanged between the feature source, feature transforms,
//! and predictors.
//!
//! A [`FeatureFrame`] is column-named and row-major. Every row holds exactly one
//! [`Cell`] per column; constructors enforce this so downstream code can index
//! without re-checking widths.

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A single value in a feature frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Cell {
    /// Numeric view of the cell.
    ///
    /// Text cells are parsed after trimming (drivers commonly return decimals
    /// as strings). Returns `None` for nulls and for text that is not a number.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Null => None,
            Self::Integer(v) => Some(*v as f64),
            Self::Real(v) => Some(*v),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text view of the cell, used for categorical columns.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Integer(v) => Some(v.to_string()),
            Self::Real(v) => Some(v.to_string()),
            Self::Text(s) => Some(s.clone()),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// Column-named, row-major table of [`Cell`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrame")]
pub struct FeatureFrame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

#[derive(Deserialize)]
struct RawFrame {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Cell>>,
}

impl TryFrom<RawFrame> for FeatureFrame {
    type Error = CoreError;

    fn try_from(raw: RawFrame) -> Result<Self, Self::Error> {
        Self::from_rows(raw.columns, raw.rows)
    }
}

impl FeatureFrame {
    /// Create an empty frame with the given columns.
    #[must_use]
    pub const fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a frame from columns and rows.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RowWidth`] if any row's width differs from the
    /// number of columns.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, CoreError> {
        let mut frame = Self::new(columns);
        for row in rows {
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RowWidth`] if the row's width differs from the
    /// number of columns.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), CoreError> {
        if row.len() != self.columns.len() {
            return Err(CoreError::RowWidth {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Cell at `row` in the named column.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ColumnMissing`] if the column does not exist, or
    /// [`CoreError::Validation`] if the row index is out of range.
    pub fn value(&self, row: usize, column: &str) -> Result<&Cell, CoreError> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| CoreError::ColumnMissing {
                column: column.to_string(),
            })?;
        self.rows
            .get(row)
            .map(|r| &r[idx])
            .ok_or_else(|| CoreError::Validation(format!("row {row} out of range")))
    }

    /// Numeric value at `row` in the named column. Nulls yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotNumeric`] if the cell is non-null text that does
    /// not parse as a number, plus the errors of [`Self::value`].
    pub fn number(&self, row: usize, column: &str) -> Result<Option<f64>, CoreError> {
        let cell = self.value(row, column)?;
        if cell.is_null() {
            return Ok(None);
        }
        cell.as_f64().map(Some).ok_or_else(|| CoreError::NotNumeric {
            column: column.to_string(),
            value: cell.to_string(),
        })
    }

    /// The first `n` rows.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Keep exactly `columns`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ColumnMissing`] for the first requested column that
    /// does not exist.
    pub fn select(&self, columns: &[String]) -> Result<Self, CoreError> {
        let indices = columns
            .iter()
            .map(|c| {
                self.column_index(c).ok_or_else(|| CoreError::ColumnMissing {
                    column: c.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Self {
            columns: columns.to_vec(),
            rows,
        })
    }

    /// Remove the named columns. Names not present are ignored.
    #[must_use]
    pub fn drop_columns(&self, columns: &[String]) -> Self {
        let keep: Vec<String> = self
            .columns
            .iter()
            .filter(|c| !columns.contains(c))
            .cloned()
            .collect();
        // Every kept column exists, so select cannot fail.
        self.select(&keep).unwrap_or_default()
    }

    /// Rewrite every cell of one column in place.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ColumnMissing`] if the column does not exist, or
    /// the first error returned by `f`.
    pub fn map_column<F>(&mut self, column: &str, mut f: F) -> Result<(), CoreError>
    where
        F: FnMut(&Cell) -> Result<Cell, CoreError>,
    {
        let idx = self
            .column_index(column)
            .ok_or_else(|| CoreError::ColumnMissing {
                column: column.to_string(),
            })?;
        for row in &mut self.rows {
            row[idx] = f(&row[idx])?;
        }
        Ok(())
    }

    /// Replace one column by several, computed per cell, at the same position.
    ///
    /// `f` must return exactly one cell per entry of `replacements`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ColumnMissing`] if the column does not exist, or
    /// [`CoreError::RowWidth`] if `f` returns the wrong number of cells.
    pub fn expand_column<F>(
        &self,
        column: &str,
        replacements: &[String],
        f: F,
    ) -> Result<Self, CoreError>
    where
        F: Fn(&Cell) -> Vec<Cell>,
    {
        let idx = self
            .column_index(column)
            .ok_or_else(|| CoreError::ColumnMissing {
                column: column.to_string(),
            })?;

        let mut columns = Vec::with_capacity(self.columns.len() + replacements.len());
        columns.extend_from_slice(&self.columns[..idx]);
        columns.extend_from_slice(replacements);
        columns.extend_from_slice(&self.columns[idx + 1..]);

        let mut out = Self::new(columns);
        for row in &self.rows {
            let expanded = f(&row[idx]);
            if expanded.len() != replacements.len() {
                return Err(CoreError::RowWidth {
                    expected: replacements.len(),
                    actual: expanded.len(),
                });
            }
            let mut new_row = Vec::with_capacity(out.columns.len());
            new_row.extend_from_slice(&row[..idx]);
            new_row.extend(expanded);
            new_row.extend_from_slice(&row[idx + 1..]);
            out.rows.push(new_row);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn deserializing_checks_row_width() {
        let ragged = serde_json::json!({"columns": ["a", "b"], "rows": [[1, 2], [3]]});
        let err = serde_json::from_value::<FeatureFrame>(ragged).unwrap_err();
        assert!(err.to_string().contains("row"), "{err}");

        let frame: FeatureFrame =
            serde_json::from_value(serde_json::json!({"columns": ["a"], "rows": [[1]]})).unwrap();
        assert_eq!(frame.value(0, "a").unwrap(), &Cell::Integer(1));
    }

    fn sample() -> FeatureFrame {
        FeatureFrame::from_rows(
            cols(&["sample_id", "age", "city"]),
            vec![vec![
                Cell::Integer(7),
                Cell::Real(41.5),
                Cell::Text("Oslo".into()),
            ]],
        )
        .unwrap()
    }

    #[test]
    fn rejects_rows_of_wrong_width() {
        let err = FeatureFrame::from_rows(cols(&["a", "b"]), vec![vec![Cell::Null]]).unwrap_err();
        assert_eq!(
            err,
            CoreError::RowWidth {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn number_reads_integers_reals_and_numeric_text() {
        let frame = FeatureFrame::from_rows(
            cols(&["i", "r", "t", "n"]),
            vec![vec![
                Cell::Integer(3),
                Cell::Real(0.25),
                Cell::Text(" 12.5 ".into()),
                Cell::Null,
            ]],
        )
        .unwrap();
        assert_eq!(frame.number(0, "i").unwrap(), Some(3.0));
        assert_eq!(frame.number(0, "r").unwrap(), Some(0.25));
        assert_eq!(frame.number(0, "t").unwrap(), Some(12.5));
        assert_eq!(frame.number(0, "n").unwrap(), None);
    }

    #[test]
    fn number_rejects_non_numeric_text() {
        let err = sample().number(0, "city").unwrap_err();
        assert!(matches!(err, CoreError::NotNumeric { ref column, .. } if column == "city"));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let err = sample().number(0, "height").unwrap_err();
        assert_eq!(
            err,
            CoreError::ColumnMissing {
                column: "height".into()
            }
        );
    }

    #[test]
    fn select_reorders_columns() {
        let frame = sample().select(&cols(&["city", "sample_id"])).unwrap();
        assert_eq!(frame.columns(), &cols(&["city", "sample_id"])[..]);
        assert_eq!(
            frame.rows()[0],
            vec![Cell::Text("Oslo".into()), Cell::Integer(7)]
        );
    }

    #[test]
    fn drop_ignores_unknown_columns() {
        let frame = sample().drop_columns(&cols(&["sample_id", "nope"]));
        assert_eq!(frame.columns(), &cols(&["age", "city"])[..]);
    }

    #[test]
    fn expand_column_keeps_position() {
        let frame = sample()
            .expand_column("city", &cols(&["city=Oslo", "city=Rome"]), |cell| {
                let is = |c: &str| cell.as_text().as_deref() == Some(c);
                vec![
                    Cell::Real(f64::from(u8::from(is("Oslo")))),
                    Cell::Real(f64::from(u8::from(is("Rome")))),
                ]
            })
            .unwrap();
        assert_eq!(
            frame.columns(),
            &cols(&["sample_id", "age", "city=Oslo", "city=Rome"])[..]
        );
        assert_eq!(frame.number(0, "city=Oslo").unwrap(), Some(1.0));
        assert_eq!(frame.number(0, "city=Rome").unwrap(), Some(0.0));
    }

    #[test]
    fn head_truncates_rows() {
        let mut frame = sample();
        frame
            .push_row(vec![Cell::Integer(8), Cell::Null, Cell::Null])
            .unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.head(1).len(), 1);
        assert!(frame.head(0).is_empty());
    }
}
