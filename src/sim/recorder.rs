use nalgebra::{DVector, Vector6};

use crate::sim::runner::DOF;

// ---------------------------------------------------------------------------
// State history table
// ---------------------------------------------------------------------------

/// Append-only tabular buffer of simulation samples.
///
/// One row per sample, preallocated up front so the row-count invariant is
/// explicit. Column layout, left to right:
/// `eta (6) | nu (6) | u_control (dimU) | u_actual (dimU)`.
/// This layout is the handoff contract to plotting consumers and must not
/// be reordered.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    rows: usize,
    cols: usize,
    dim_u: usize,
    data: Vec<f64>,
}

impl History {
    pub fn new(rows: usize, dim_u: usize) -> Self {
        let cols = 2 * DOF + 2 * dim_u;
        Self {
            rows,
            cols,
            dim_u,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dim_u(&self) -> usize {
        self.dim_u
    }

    /// Write the sample for step `i`.
    pub fn record(
        &mut self,
        i: usize,
        eta: &Vector6<f64>,
        nu: &Vector6<f64>,
        u_control: &DVector<f64>,
        u_actual: &DVector<f64>,
    ) {
        assert!(i < self.rows, "row {i} out of range ({} rows)", self.rows);
        assert_eq!(u_control.len(), self.dim_u);
        assert_eq!(u_actual.len(), self.dim_u);

        let row = &mut self.data[i * self.cols..(i + 1) * self.cols];
        for j in 0..DOF {
            row[j] = eta[j];
            row[DOF + j] = nu[j];
        }
        for j in 0..self.dim_u {
            row[2 * DOF + j] = u_control[j];
            row[2 * DOF + self.dim_u + j] = u_actual[j];
        }
    }

    /// Full row `i` in the documented column order.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn eta(&self, i: usize) -> &[f64] {
        &self.row(i)[..DOF]
    }

    pub fn nu(&self, i: usize) -> &[f64] {
        &self.row(i)[DOF..2 * DOF]
    }

    pub fn u_control(&self, i: usize) -> &[f64] {
        &self.row(i)[2 * DOF..2 * DOF + self.dim_u]
    }

    pub fn u_actual(&self, i: usize) -> &[f64] {
        &self.row(i)[2 * DOF + self.dim_u..]
    }

    /// Yaw angle at row `i` (rad).
    pub fn yaw(&self, i: usize) -> f64 {
        self.row(i)[5]
    }

    /// Drop rows past `rows`, keeping completed samples (used when a run
    /// stops early on divergence).
    pub(crate) fn truncate_rows(&mut self, rows: usize) {
        if rows < self.rows {
            self.rows = rows;
            self.data.truncate(rows * self.cols);
        }
    }
}
