//! The (6,4) Long MDS erasure codec.
//!
//! Encodes 4 data blocks into 2 parity blocks (one plain XOR parity,
//! one matrix parity) and rebuilds any 1 or 2 lost blocks of a stripe
//! from the survivors. Blocks are the columns of a 4-row matrix: the
//! generator matrices act on whole 4-symbol columns.

use tracing::debug;

use crate::error::{MdsError, Result};
use crate::field::GaloisField;
use crate::generator::GeneratorTable;
use crate::matrix::Matrix;

/// Blocks per stripe: 4 data + 2 parity.
pub const STRIPE_SIZE: usize = 6;
/// Parity blocks per stripe.
pub const PARITY_SIZE: usize = 2;
/// Symbols per block, and rows in every data/stripe matrix.
pub const BLOCK_SYMBOLS: usize = 4;

/// How a validated erasure set gets repaired. Every legal set maps to
/// exactly one arm, so no pattern can slip through without a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErasurePattern {
    /// One data block: projection repair through the node's S and A.
    SingleData(usize),
    /// The XOR parity alone: refold the data columns.
    SingleXorParity,
    /// The matrix parity alone: redo encode's second pass.
    SingleMatrixParity,
    /// Any two blocks: one 8x8 linear solve over both columns.
    Double(usize, usize),
}

/// The (6,4) Long MDS codec.
///
/// Cheap to construct and free to share: it holds the code shape plus
/// `&'static` references to the shared field and generator tables.
/// All block data moves through caller-owned matrices.
pub struct LongMdsCode {
    stripe_size: usize,
    parity_size: usize,
    gf: &'static GaloisField,
    table: &'static GeneratorTable,
}

impl LongMdsCode {
    /// Build a codec for `stripe_size` total blocks, `parity_size` of
    /// them parity.
    ///
    /// # Errors
    ///
    /// [`MdsError::UnsupportedCode`] unless the shape is the (6, 2)
    /// layout this crate implements and satisfies the field bound
    /// `stripe_size + parity_size < field_size`.
    pub fn new(stripe_size: usize, parity_size: usize) -> Result<LongMdsCode> {
        let gf = GaloisField::shared();
        if stripe_size + parity_size >= gf.field_size() {
            return Err(MdsError::UnsupportedCode {
                stripe_size,
                parity_size,
            });
        }
        if stripe_size != STRIPE_SIZE || parity_size != PARITY_SIZE {
            return Err(MdsError::UnsupportedCode {
                stripe_size,
                parity_size,
            });
        }
        Ok(LongMdsCode {
            stripe_size,
            parity_size,
            gf,
            table: GeneratorTable::shared(),
        })
    }

    /// Total blocks per stripe.
    pub fn stripe_size(&self) -> usize {
        self.stripe_size
    }

    /// Parity blocks per stripe.
    pub fn parity_size(&self) -> usize {
        self.parity_size
    }

    /// Data blocks per stripe.
    pub fn data_size(&self) -> usize {
        self.stripe_size - self.parity_size
    }

    /// Compute both parity columns for `data`.
    ///
    /// `data` carries one data block per column; `parity` receives the
    /// XOR parity in column 0 and the matrix parity in column 1. Pure
    /// in `data`, writes only into `parity`.
    ///
    /// # Errors
    ///
    /// [`MdsError::DimensionMismatch`] unless `data` is 4x4 and
    /// `parity` is 4x2.
    pub fn encode(&self, data: &Matrix, parity: &mut Matrix) -> Result<()> {
        if data.rows() != BLOCK_SYMBOLS || data.cols() != self.data_size() {
            return Err(MdsError::DimensionMismatch {
                op: "encode",
                lhs: (data.rows(), data.cols()),
                rhs: (BLOCK_SYMBOLS, self.data_size()),
            });
        }
        if parity.rows() != data.rows() || parity.cols() != self.parity_size {
            return Err(MdsError::DimensionMismatch {
                op: "encode",
                lhs: (parity.rows(), parity.cols()),
                rhs: (data.rows(), self.parity_size),
            });
        }

        let xor = self.fold_columns(data, 0..self.data_size());
        let matrix_parity = self.matrix_parity_fold(data, None)?;
        parity.set_column(0, &xor);
        parity.set_column(1, &matrix_parity);

        debug!(
            data_blocks = self.data_size(),
            parity_blocks = self.parity_size,
            "encoded parity blocks"
        );
        Ok(())
    }

    /// Rebuild the blocks listed in `erased` from the rest of `stripe`.
    ///
    /// `stripe` holds all 6 columns; the erased columns' contents are
    /// never read, so they may hold anything. Column `k` of `recovered`
    /// receives the block for `erased[k]`. Nothing is written until
    /// every requested block has been computed, so on error the output
    /// is untouched. An empty erasure set is a no-op.
    ///
    /// # Errors
    ///
    /// [`MdsError::UnrecoverableErasures`] for more than 2 erasures,
    /// [`MdsError::InvalidLocation`] for an out-of-range or repeated
    /// location, [`MdsError::DimensionMismatch`] unless `stripe` is
    /// 4x6 and `recovered` has one 4-row column per erasure.
    pub fn decode(&self, stripe: &Matrix, erased: &[usize], recovered: &mut Matrix) -> Result<()> {
        if erased.is_empty() {
            return Ok(());
        }
        if erased.len() > self.parity_size {
            return Err(MdsError::UnrecoverableErasures {
                erasures: erased.len(),
                parity_size: self.parity_size,
            });
        }
        for (k, &location) in erased.iter().enumerate() {
            if location >= self.stripe_size || erased[..k].contains(&location) {
                return Err(MdsError::InvalidLocation {
                    location,
                    stripe_size: self.stripe_size,
                });
            }
        }
        if stripe.rows() != BLOCK_SYMBOLS || stripe.cols() != self.stripe_size {
            return Err(MdsError::DimensionMismatch {
                op: "decode",
                lhs: (stripe.rows(), stripe.cols()),
                rhs: (BLOCK_SYMBOLS, self.stripe_size),
            });
        }
        if recovered.rows() != stripe.rows() || recovered.cols() != erased.len() {
            return Err(MdsError::DimensionMismatch {
                op: "decode",
                lhs: (recovered.rows(), recovered.cols()),
                rhs: (stripe.rows(), erased.len()),
            });
        }

        let pattern = self.classify(erased);
        let columns = match pattern {
            ErasurePattern::SingleData(node) => vec![self.recover_data_column(stripe, node)?],
            ErasurePattern::SingleXorParity => {
                vec![self.xor_check_fold(stripe, self.data_size())]
            }
            ErasurePattern::SingleMatrixParity => vec![self.matrix_parity_fold(stripe, None)?],
            ErasurePattern::Double(x, y) => self.recover_pair(stripe, x, y)?,
        };
        for (k, column) in columns.iter().enumerate() {
            recovered.set_column(k, column);
        }

        debug!(?erased, ?pattern, "rebuilt erased blocks");
        Ok(())
    }

    fn classify(&self, erased: &[usize]) -> ErasurePattern {
        if erased.len() == 2 {
            ErasurePattern::Double(erased[0], erased[1])
        } else if erased[0] < self.data_size() {
            ErasurePattern::SingleData(erased[0])
        } else if erased[0] == self.data_size() {
            ErasurePattern::SingleXorParity
        } else {
            ErasurePattern::SingleMatrixParity
        }
    }

    /// Field fold of the given columns of `m`.
    fn fold_columns(&self, m: &Matrix, columns: impl Iterator<Item = usize>) -> Vec<u8> {
        let mut acc = vec![0u8; m.rows()];
        for c in columns {
            for (r, slot) in acc.iter_mut().enumerate() {
                *slot = self.gf.add(*slot, m.get(r, c));
            }
        }
        acc
    }

    /// Fold of every column in the XOR parity check except `skip`.
    /// Skipping the parity column recomputes the parity; skipping a
    /// data column recovers that column.
    fn xor_check_fold(&self, stripe: &Matrix, skip: usize) -> Vec<u8> {
        self.fold_columns(stripe, (0..=self.data_size()).filter(|&c| c != skip))
    }

    /// Sum of `A_j * column_j` over the data columns of `m`, minus the
    /// skipped one if asked. With no skip this is the matrix parity.
    fn matrix_parity_fold(&self, m: &Matrix, skip: Option<usize>) -> Result<Vec<u8>> {
        let mut acc = vec![0u8; m.rows()];
        for j in 0..self.data_size() {
            if Some(j) == skip {
                continue;
            }
            let contribution = self.table.a(j).multiply(&m.column(j))?;
            for (slot, v) in acc.iter_mut().zip(contribution) {
                *slot = self.gf.add(*slot, v);
            }
        }
        Ok(acc)
    }

    /// Rebuild one data column from the survivors.
    ///
    /// Both parity checks are folded over the surviving blocks, which
    /// leaves the lost column as the only unknown term in each. The
    /// repair reads only the S projections of those folds and solves
    /// the stacked `[S; S*A]` system for the full column.
    fn recover_data_column(&self, stripe: &Matrix, node: usize) -> Result<Vec<u8>> {
        let s = self.table.s(node);
        let a = self.table.a(node);

        // r1 = p1 + sum of the other data columns
        // r2 = p2 + sum of their A-multiplied columns
        let r1 = self.xor_check_fold(stripe, node);
        let mut r2 = self.matrix_parity_fold(stripe, Some(node))?;
        for (slot, v) in r2.iter_mut().zip(stripe.column(self.data_size() + 1)) {
            *slot = self.gf.add(*slot, v);
        }

        // project both folds through S, stack into one 4x4 system
        let v = s.multiply(&r1)?;
        let u = s.multiply(&r2)?;
        let mut stack = Matrix::zero(BLOCK_SYMBOLS, BLOCK_SYMBOLS);
        for r in 0..s.rows() {
            for c in 0..s.cols() {
                stack.set(r, c, s.get(r, c));
            }
            let sa = a.premultiply(s.row(r))?;
            for (c, &coeff) in sa.iter().enumerate() {
                stack.set(s.rows() + r, c, coeff);
            }
        }
        let rhs: Vec<u8> = v.into_iter().chain(u).collect();
        stack.invert()?.multiply(&rhs)
    }

    /// Rebuild two columns at once.
    ///
    /// Every node carries one coefficient block in each parity check.
    /// Folding the survivors through their blocks leaves an 8x8 system
    /// over the two lost columns, solved by a single inversion. The
    /// same path covers data/data, data/parity and parity/parity
    /// losses.
    fn recover_pair(&self, stripe: &Matrix, x: usize, y: usize) -> Result<Vec<Vec<u8>>> {
        let k = BLOCK_SYMBOLS;
        let mut system = Matrix::zero(2 * k, 2 * k);
        for (slot, &node) in [x, y].iter().enumerate() {
            let (g1, g2) = self.coefficient_blocks(node);
            write_block(&mut system, 0, slot * k, &g1);
            write_block(&mut system, k, slot * k, &g2);
        }

        let mut rhs = vec![0u8; 2 * k];
        for node in (0..self.stripe_size).filter(|&n| n != x && n != y) {
            let column = stripe.column(node);
            let (g1, g2) = self.coefficient_blocks(node);
            let c1 = g1.multiply(&column)?;
            let c2 = g2.multiply(&column)?;
            for i in 0..k {
                rhs[i] = self.gf.add(rhs[i], c1[i]);
                rhs[k + i] = self.gf.add(rhs[k + i], c2[i]);
            }
        }

        let solved = system.invert()?.multiply(&rhs)?;
        Ok(vec![solved[..k].to_vec(), solved[k..].to_vec()])
    }

    /// Coefficient blocks of `node` in the two parity checks. The XOR
    /// check counts every data column plus the XOR parity itself; the
    /// matrix check counts `A_j` per data column plus the matrix
    /// parity.
    fn coefficient_blocks(&self, node: usize) -> (Matrix, Matrix) {
        let k = BLOCK_SYMBOLS;
        if node < self.data_size() {
            (Matrix::identity(k), self.table.a(node).clone())
        } else if node == self.data_size() {
            (Matrix::identity(k), Matrix::zero(k, k))
        } else {
            (Matrix::zero(k, k), Matrix::identity(k))
        }
    }
}

/// Copy `block` into `dst` with its top-left corner at (row, col).
fn write_block(dst: &mut Matrix, row: usize, col: usize, block: &Matrix) {
    for r in 0..block.rows() {
        for c in 0..block.cols() {
            dst.set(row + r, col + c, block.get(r, c));
        }
    }
}
