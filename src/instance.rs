//! Immutable row/column incidence data for a maximum coverage instance, and the
//! loader for the OR-Library set-covering text format.

use std::fs;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// ProblemInstance
// ============================================================================

/// A maximum coverage instance: `num_rows` rows, `num_columns` weighted columns.
///
/// Representation:
/// - `row_covers[r]` lists the columns containing row `r`.
/// - `col_entries[c]` lists the rows contained in column `c`.
///
/// The two lists are exact inverses of each other; every constructor builds one
/// from the other, so the invariant `Σ|row_covers| == Σ|col_entries|` holds by
/// construction. Instances are immutable once built and are shared by reference
/// between all solutions derived from them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemInstance {
    num_rows: usize,
    num_columns: usize,
    row_covers: Vec<Vec<usize>>,
    col_entries: Vec<Vec<usize>>,
    costs: Vec<u32>,
    nonzeros: usize,
}

impl ProblemInstance {
    /// Builds an instance from per-row cover lists (0-based column ids).
    ///
    /// `col_entries` is derived so that each column lists its rows in ascending order.
    ///
    /// # Errors
    /// Returns an error if there are no rows or columns, `costs` does not have one
    /// entry per column, a column id is out of range, or a row lists the same
    /// column twice.
    pub fn new(
        num_columns: usize,
        row_covers: Vec<Vec<usize>>,
        costs: Vec<u32>,
    ) -> Result<Self, InstanceError> {
        let num_rows = row_covers.len();
        if num_rows == 0 {
            return Err(InstanceError::NoRows);
        }
        if num_columns == 0 {
            return Err(InstanceError::NoColumns);
        }
        if costs.len() != num_columns {
            return Err(InstanceError::CostCountMismatch {
                expected: num_columns,
                got: costs.len(),
            });
        }

        let mut col_entries = vec![Vec::new(); num_columns];
        let mut seen_in_row = vec![usize::MAX; num_columns];
        let mut nonzeros = 0usize;
        for (row, covers) in row_covers.iter().enumerate() {
            for &column in covers {
                if column >= num_columns {
                    return Err(InstanceError::ColumnOutOfRange {
                        row,
                        column,
                        num_columns,
                    });
                }
                if seen_in_row[column] == row {
                    return Err(InstanceError::DuplicateColumn { row, column });
                }
                seen_in_row[column] = row;
                col_entries[column].push(row);
                nonzeros += 1;
            }
        }

        Ok(Self {
            num_rows,
            num_columns,
            row_covers,
            col_entries,
            costs,
            nonzeros,
        })
    }

    /// Builds a unit-cost instance from per-column row lists (0-based row ids).
    ///
    /// # Errors
    /// Returns an error if there are no rows or columns, a row id is out of range,
    /// or a column lists the same row twice.
    pub fn from_columns(num_rows: usize, columns: &[Vec<usize>]) -> Result<Self, InstanceError> {
        if num_rows == 0 {
            return Err(InstanceError::NoRows);
        }
        let mut row_covers = vec![Vec::new(); num_rows];
        let mut seen_in_column = vec![usize::MAX; num_rows];
        for (column, rows) in columns.iter().enumerate() {
            for &row in rows {
                if row >= num_rows {
                    return Err(InstanceError::RowOutOfRange {
                        column,
                        row,
                        num_rows,
                    });
                }
                if seen_in_column[row] == column {
                    return Err(InstanceError::DuplicateRow { column, row });
                }
                seen_in_column[row] = column;
                row_covers[row].push(column);
            }
        }
        Self::new(columns.len(), row_covers, vec![1; columns.len()])
    }

    /// Loads an instance from a file in OR-Library set-covering format.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or its contents are malformed.
    pub fn load_from_file(filename: impl AsRef<Path>) -> Result<Self, InstanceError> {
        let text = fs::read_to_string(filename).map_err(|e| InstanceError::Io(e.to_string()))?;
        parse_instance(&text)
    }

    /// Number of rows.
    #[inline(always)]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns.
    #[inline(always)]
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    /// Columns covering row `r`.
    #[inline(always)]
    pub fn row_covers(&self, r: usize) -> &[usize] {
        &self.row_covers[r]
    }

    /// Rows covered by column `c`.
    #[inline(always)]
    pub fn col_entries(&self, c: usize) -> &[usize] {
        &self.col_entries[c]
    }

    /// Cost of column `c`. Carried for completeness; the coverage objective ignores it.
    #[inline]
    pub fn cost(&self, c: usize) -> u32 {
        self.costs[c]
    }

    /// Number of nonzero entries of the incidence matrix.
    #[inline]
    pub fn nonzeros(&self) -> usize {
        self.nonzeros
    }

    /// Fraction of the incidence matrix that is nonzero.
    pub fn density(&self) -> f64 {
        self.nonzeros as f64 / (self.num_rows as f64 * self.num_columns as f64)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors encountered while building or parsing an instance.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InstanceError {
    /// The input contained no tokens at all.
    #[error("instance is empty")]
    Empty,
    /// The instance declares zero rows.
    #[error("instance has no rows")]
    NoRows,
    /// The instance declares zero columns.
    #[error("instance has no columns")]
    NoColumns,
    /// The input ended before a required value.
    #[error("unexpected end of input while reading {what}")]
    UnexpectedEnd {
        /// What the parser was reading.
        what: &'static str,
    },
    /// A token was not a non-negative integer.
    #[error("token {index} is not a non-negative integer: {token:?}")]
    InvalidToken {
        /// Zero-based token position in the input.
        index: usize,
        /// The offending token.
        token: String,
    },
    /// Tokens remained after the last row.
    #[error("{count} unexpected trailing token(s) after the last row")]
    TrailingTokens {
        /// Number of leftover tokens.
        count: usize,
    },
    /// The cost vector does not have one entry per column.
    #[error("expected {expected} column costs, got {got}")]
    CostCountMismatch {
        /// Number of columns.
        expected: usize,
        /// Number of costs supplied.
        got: usize,
    },
    /// A row references a column outside `[0, num_columns)`.
    #[error("row {row} references column {column}, but there are only {num_columns} columns")]
    ColumnOutOfRange {
        /// Row index.
        row: usize,
        /// Offending column id.
        column: usize,
        /// Number of columns.
        num_columns: usize,
    },
    /// A column references a row outside `[0, num_rows)`.
    #[error("column {column} references row {row}, but there are only {num_rows} rows")]
    RowOutOfRange {
        /// Column index.
        column: usize,
        /// Offending row id.
        row: usize,
        /// Number of rows.
        num_rows: usize,
    },
    /// A row lists the same column twice.
    #[error("row {row} lists column {column} more than once")]
    DuplicateColumn {
        /// Row index.
        row: usize,
        /// Repeated column.
        column: usize,
    },
    /// A column lists the same row twice.
    #[error("column {column} lists row {row} more than once")]
    DuplicateRow {
        /// Column index.
        column: usize,
        /// Repeated row.
        row: usize,
    },
    /// I/O error (file not found, etc.).
    #[error("I/O error: {0}")]
    Io(String),
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses an instance in OR-Library set-covering format.
///
/// Layout (whitespace separated, line breaks insignificant):
/// - `num_rows num_columns`
/// - `num_columns` column costs
/// - for each row: the number of columns covering it, then those column ids (1-based)
///
/// Column ids are converted to 0-based indices.
///
/// # Errors
/// Returns an error if the input is truncated, contains a non-integer token,
/// references an out-of-range column, repeats a column within a row, or has
/// tokens left over after the last row.
pub fn parse_instance(text: &str) -> Result<ProblemInstance, InstanceError> {
    let mut tokens = Tokens::new(text);
    if tokens.is_exhausted() {
        return Err(InstanceError::Empty);
    }

    let num_rows = tokens.next_usize("row count")?;
    let num_columns = tokens.next_usize("column count")?;
    if num_rows == 0 {
        return Err(InstanceError::NoRows);
    }
    if num_columns == 0 {
        return Err(InstanceError::NoColumns);
    }

    let mut costs = Vec::with_capacity(num_columns);
    for _ in 0..num_columns {
        let cost = tokens.next_usize("column costs")?;
        costs.push(u32::try_from(cost).map_err(|_| tokens.invalid_last())?);
    }

    let mut row_covers = Vec::with_capacity(num_rows);
    for row in 0..num_rows {
        let count = tokens.next_usize("row cover count")?;
        let mut covers = Vec::with_capacity(count.min(num_columns));
        for _ in 0..count {
            let id = tokens.next_usize("row cover list")?;
            if id == 0 || id > num_columns {
                return Err(InstanceError::ColumnOutOfRange {
                    row,
                    column: id,
                    num_columns,
                });
            }
            covers.push(id - 1);
        }
        row_covers.push(covers);
    }

    let leftover = tokens.remaining();
    if leftover > 0 {
        return Err(InstanceError::TrailingTokens { count: leftover });
    }

    ProblemInstance::new(num_columns, row_covers, costs)
}

/// Whitespace tokenizer that remembers positions for error messages.
struct Tokens<'a> {
    inner: std::iter::Peekable<std::str::SplitWhitespace<'a>>,
    index: usize,
    last: &'a str,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace().peekable(),
            index: 0,
            last: "",
        }
    }

    fn is_exhausted(&mut self) -> bool {
        self.inner.peek().is_none()
    }

    fn remaining(self) -> usize {
        self.inner.count()
    }

    fn next_usize(&mut self, what: &'static str) -> Result<usize, InstanceError> {
        let token = self.inner.next().ok_or(InstanceError::UnexpectedEnd { what })?;
        self.last = token;
        self.index += 1;
        token.parse::<usize>().map_err(|_| self.invalid_last())
    }

    fn invalid_last(&self) -> InstanceError {
        InstanceError::InvalidToken {
            index: self.index - 1,
            token: self.last.to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
