//! Dense matrices over GF(2^8).
//!
//! Row-major byte matrices with the operations the codec needs:
//! add, transpose, vector products and Gauss-Jordan inversion. Every
//! symbol operation goes through the shared [`GaloisField`] instance;
//! nothing here does native integer arithmetic on symbols.

use rand::Rng;

use crate::error::{MdsError, Result};
use crate::field::GaloisField;

/// A dense row-major matrix of GF(2^8) symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl Matrix {
    /// All-zero matrix.
    pub fn zero(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    /// n-by-n identity matrix.
    pub fn identity(n: usize) -> Matrix {
        let mut m = Matrix::zero(n, n);
        for i in 0..n {
            m.set(i, i, 1);
        }
        m
    }

    /// Matrix with entries drawn uniformly from the whole field.
    pub fn random(rows: usize, cols: usize) -> Matrix {
        let mut rng = rand::thread_rng();
        Matrix {
            rows,
            cols,
            cells: (0..rows * cols).map(|_| rng.gen::<u8>()).collect(),
        }
    }

    /// Matrix from a fixed nested array, row by row.
    pub fn from_array<const R: usize, const C: usize>(values: [[u8; C]; R]) -> Matrix {
        let mut cells = Vec::with_capacity(R * C);
        for row in &values {
            cells.extend_from_slice(row);
        }
        Matrix {
            rows: R,
            cols: C,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, r: usize, c: usize) -> u8 {
        self.cells[r * self.cols + c]
    }

    pub fn set(&mut self, r: usize, c: usize, v: u8) {
        self.cells[r * self.cols + c] = v;
    }

    /// One row as a slice.
    pub fn row(&self, r: usize) -> &[u8] {
        &self.cells[r * self.cols..(r + 1) * self.cols]
    }

    /// One column, copied out.
    pub fn column(&self, c: usize) -> Vec<u8> {
        (0..self.rows).map(|r| self.get(r, c)).collect()
    }

    /// Overwrite one column.
    pub fn set_column(&mut self, c: usize, values: &[u8]) {
        debug_assert_eq!(values.len(), self.rows);
        for (r, &v) in values.iter().enumerate() {
            self.set(r, c, v);
        }
    }

    /// Element-wise field addition.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(MdsError::DimensionMismatch {
                op: "add",
                lhs: (self.rows, self.cols),
                rhs: (other.rows, other.cols),
            });
        }
        let gf = GaloisField::shared();
        let cells = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(&a, &b)| gf.add(a, b))
            .collect();
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            cells,
        })
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zero(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(c, r, self.get(r, c));
            }
        }
        out
    }

    /// Matrix-by-vector product `A * x`, treating `x` as a column.
    pub fn multiply(&self, x: &[u8]) -> Result<Vec<u8>> {
        if x.len() != self.cols {
            return Err(MdsError::DimensionMismatch {
                op: "multiply",
                lhs: (self.rows, self.cols),
                rhs: (x.len(), 1),
            });
        }
        let gf = GaloisField::shared();
        let mut y = vec![0u8; self.rows];
        for (r, out) in y.iter_mut().enumerate() {
            let mut acc = 0;
            for (c, &xc) in x.iter().enumerate() {
                acc = gf.add(acc, gf.multiply(self.get(r, c), xc));
            }
            *out = acc;
        }
        Ok(y)
    }

    /// Vector-by-matrix product `x * A`, treating `x` as a row.
    pub fn premultiply(&self, x: &[u8]) -> Result<Vec<u8>> {
        if x.len() != self.rows {
            return Err(MdsError::DimensionMismatch {
                op: "premultiply",
                lhs: (1, x.len()),
                rhs: (self.rows, self.cols),
            });
        }
        let gf = GaloisField::shared();
        let mut y = vec![0u8; self.cols];
        for (r, &xr) in x.iter().enumerate() {
            let row = self.row(r);
            for (out, &arc) in y.iter_mut().zip(row) {
                *out = gf.add(*out, gf.multiply(xr, arc));
            }
        }
        Ok(y)
    }

    /// Inverse by Gauss-Jordan elimination.
    ///
    /// # Errors
    ///
    /// [`MdsError::DimensionMismatch`] if the matrix is not square,
    /// [`MdsError::Singular`] if no inverse exists.
    pub fn invert(&self) -> Result<Matrix> {
        if self.rows != self.cols {
            return Err(MdsError::DimensionMismatch {
                op: "invert",
                lhs: (self.rows, self.cols),
                rhs: (self.rows, self.rows),
            });
        }
        let gf = GaloisField::shared();
        let n = self.rows;
        let mut work = self.clone();
        let mut inv = Matrix::identity(n);
        for col in 0..n {
            // pivot: first nonzero entry at or below the diagonal
            let pivot = (col..n)
                .find(|&r| work.get(r, col) != 0)
                .ok_or(MdsError::Singular)?;
            if pivot != col {
                work.swap_rows(pivot, col);
                inv.swap_rows(pivot, col);
            }
            let p = work.get(col, col);
            if p != 1 {
                let scale = gf.divide(1, p);
                work.scale_row(col, scale, gf);
                inv.scale_row(col, scale, gf);
            }
            // clear the column everywhere else
            for r in 0..n {
                let factor = work.get(r, col);
                if r != col && factor != 0 {
                    work.add_scaled_row(r, col, factor, gf);
                    inv.add_scaled_row(r, col, factor, gf);
                }
            }
        }
        Ok(inv)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for c in 0..self.cols {
            self.cells.swap(a * self.cols + c, b * self.cols + c);
        }
    }

    fn scale_row(&mut self, r: usize, factor: u8, gf: &GaloisField) {
        for c in 0..self.cols {
            let v = gf.multiply(self.get(r, c), factor);
            self.set(r, c, v);
        }
    }

    /// Row `dst` += `factor` * row `src`, in field arithmetic.
    fn add_scaled_row(&mut self, dst: usize, src: usize, factor: u8, gf: &GaloisField) {
        for c in 0..self.cols {
            let v = gf.add(self.get(dst, c), gf.multiply(factor, self.get(src, c)));
            self.set(dst, c, v);
        }
    }
}
