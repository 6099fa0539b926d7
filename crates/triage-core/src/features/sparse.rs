//! Compressed sparse row matrix for term features.

use crate::error::{Result, TriageError};

/// CSR matrix of `f64` values. Column indices within a row are sorted and
/// unique, and explicit zeros are never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<f64>,
}

/// Borrowed view of one matrix row.
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a> {
    pub indices: &'a [usize],
    pub values: &'a [f64],
}

impl SparseRow<'_> {
    /// Value at `col`, zero when not stored.
    pub fn get(&self, col: usize) -> f64 {
        self.indices
            .binary_search(&col)
            .map(|pos| self.values[pos])
            .unwrap_or(0.0)
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }
}

impl SparseMatrix {
    /// An empty matrix with `n_cols` columns and no rows.
    pub fn new(n_cols: usize) -> Self {
        Self {
            n_cols,
            indptr: vec![0],
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append a row from `(column, value)` entries in any order.
    ///
    /// Duplicate columns are summed and zeros dropped.
    pub fn push_row(&mut self, mut entries: Vec<(usize, f64)>) -> Result<()> {
        if let Some(&(col, _)) = entries.iter().find(|(col, _)| *col >= self.n_cols) {
            return Err(TriageError::DimensionMismatch {
                expected: self.n_cols,
                actual: col + 1,
            });
        }

        entries.sort_unstable_by_key(|&(col, _)| col);
        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (col, value) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == col => *acc += value,
                _ => merged.push((col, value)),
            }
        }

        for (col, value) in merged {
            if value != 0.0 {
                self.indices.push(col);
                self.values.push(value);
            }
        }
        self.indptr.push(self.indices.len());
        Ok(())
    }

    /// Build a matrix from per-row entries.
    pub fn from_rows(rows: Vec<Vec<(usize, f64)>>, n_cols: usize) -> Result<Self> {
        let mut matrix = Self::new(n_cols);
        for row in rows {
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }

    pub fn n_rows(&self) -> usize {
        self.indptr.len() - 1
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn row(&self, row: usize) -> SparseRow<'_> {
        let (start, end) = (self.indptr[row], self.indptr[row + 1]);
        SparseRow {
            indices: &self.indices[start..end],
            values: &self.values[start..end],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = SparseRow<'_>> {
        (0..self.n_rows()).map(move |i| self.row(i))
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.row(row).get(col)
    }

    /// New matrix holding the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut out = Self::new(self.n_cols);
        for &i in rows {
            let row = self.row(i);
            out.indices.extend_from_slice(row.indices);
            out.values.extend_from_slice(row.values);
            out.indptr.push(out.indices.len());
        }
        out
    }

    /// Apply `f(column, value)` to every stored value, dropping results that become zero.
    pub fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(usize, f64) -> f64,
    {
        let mut out = Self::new(self.n_cols);
        for row in self.rows() {
            for (col, value) in row.iter() {
                let mapped = f(col, value);
                if mapped != 0.0 {
                    out.indices.push(col);
                    out.values.push(mapped);
                }
            }
            out.indptr.push(out.indices.len());
        }
        out
    }

    /// Scale each row to unit Euclidean length. All-zero rows stay zero.
    pub fn normalize_rows_l2(&mut self) {
        for i in 0..self.n_rows() {
            let (start, end) = (self.indptr[i], self.indptr[i + 1]);
            let norm = self.values[start..end]
                .iter()
                .map(|v| v * v)
                .sum::<f64>()
                .sqrt();
            if norm > 0.0 {
                for v in &mut self.values[start..end] {
                    *v /= norm;
                }
            }
        }
    }

    /// Column-major view with each column's entries sorted by value.
    ///
    /// Decision stumps scan this once per boosting round.
    pub fn sorted_columns(&self) -> Vec<Vec<(f64, usize)>> {
        let mut columns: Vec<Vec<(f64, usize)>> = vec![Vec::new(); self.n_cols];
        for (i, row) in self.rows().enumerate() {
            for (col, value) in row.iter() {
                columns[col].push((value, i));
            }
        }
        for column in &mut columns {
            column.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        }
        columns
    }
}
