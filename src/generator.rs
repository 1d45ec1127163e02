//! Fixed generator matrices for the (6,4) code.
//!
//! The construction assigns every node one 4x4 `A` matrix and one 2x4
//! `S` projection. Encode multiplies each data column by its `A` block
//! to form the matrix parity; single-block rebuild projects the folded
//! parity checks through `S` and solves the stacked `[S; S*A]` system.
//! The values are fixed by the tensor construction over GF(2^8); tests
//! pin the structure, the invertibility of every data-pair `A` sum and
//! of every repair stack.

use std::sync::OnceLock;

use crate::matrix::Matrix;

/// Per-node 4x4 `A` blocks. Even nodes tile a 2x2 block down the
/// diagonal, odd nodes interleave the same block across both offsets.
const A_CELLS: [[[u8; 4]; 4]; 6] = [
    [
        [8, 40, 0, 0],
        [0, 32, 0, 0],
        [0, 0, 8, 40],
        [0, 0, 0, 32],
    ],
    [
        [4, 0, 20, 0],
        [0, 4, 0, 20],
        [0, 0, 16, 0],
        [0, 0, 0, 16],
    ],
    [
        [8, 0, 0, 0],
        [40, 32, 0, 0],
        [0, 0, 8, 0],
        [0, 0, 40, 32],
    ],
    [
        [4, 0, 0, 0],
        [0, 4, 0, 0],
        [20, 0, 16, 0],
        [0, 20, 0, 16],
    ],
    [
        [8, 0, 0, 0],
        [0, 2, 0, 0],
        [0, 0, 8, 0],
        [0, 0, 0, 2],
    ],
    [
        [4, 0, 0, 0],
        [0, 4, 0, 0],
        [0, 0, 1, 0],
        [0, 0, 0, 1],
    ],
];

/// Per-node 2x4 `S` projections.
const S_CELLS: [[[u8; 4]; 2]; 6] = [
    [[1, 0, 0, 0], [0, 0, 1, 0]],
    [[1, 0, 0, 0], [0, 1, 0, 0]],
    [[0, 1, 0, 0], [0, 0, 0, 1]],
    [[0, 0, 1, 0], [0, 0, 0, 1]],
    [[1, 1, 0, 0], [0, 0, 1, 1]],
    [[1, 0, 1, 0], [0, 1, 0, 1]],
];

/// The shared generator tables, one `(A, S)` pair per node.
///
/// Decode works with the data-node entries (0..=3); the parity-node
/// entries complete the construction's table and stay pinned with it.
pub struct GeneratorTable {
    a: [Matrix; 6],
    s: [Matrix; 6],
}

impl GeneratorTable {
    /// The process-wide table, built on first use.
    pub fn shared() -> &'static GeneratorTable {
        static SHARED: OnceLock<GeneratorTable> = OnceLock::new();
        SHARED.get_or_init(GeneratorTable::build)
    }

    fn build() -> GeneratorTable {
        GeneratorTable {
            a: A_CELLS.map(Matrix::from_array),
            s: S_CELLS.map(Matrix::from_array),
        }
    }

    /// `A` block for `node`. For a data node this multiplies the
    /// node's column in the matrix parity.
    pub fn a(&self, node: usize) -> &Matrix {
        &self.a[node]
    }

    /// `S` projection for `node`.
    pub fn s(&self, node: usize) -> &Matrix {
        &self.s[node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_is_one_instance() {
        assert!(std::ptr::eq(
            GeneratorTable::shared(),
            GeneratorTable::shared()
        ));
    }

    #[test]
    fn test_table_shapes() {
        let t = GeneratorTable::shared();
        for node in 0..6 {
            assert_eq!((t.a(node).rows(), t.a(node).cols()), (4, 4));
            assert_eq!((t.s(node).rows(), t.s(node).cols()), (2, 4));
        }
    }

    #[test]
    fn test_a_spot_values() {
        let t = GeneratorTable::shared();
        assert_eq!(t.a(0).get(0, 1), 40);
        assert_eq!(t.a(1).get(0, 2), 20);
        assert_eq!(t.a(2).get(1, 0), 40);
        assert_eq!(t.a(2).get(1, 1), 32);
        assert_eq!(t.a(3).get(2, 0), 20);
        assert_eq!(t.a(4).get(1, 1), 2);
        assert_eq!(t.a(5).get(2, 2), 1);
    }

    #[test]
    fn test_s_spot_values() {
        let t = GeneratorTable::shared();
        assert_eq!(t.s(0).row(0), &[1, 0, 0, 0]);
        assert_eq!(t.s(0).row(1), &[0, 0, 1, 0]);
        assert_eq!(t.s(2).row(1), &[0, 0, 0, 1]);
        assert_eq!(t.s(4).row(0), &[1, 1, 0, 0]);
        assert_eq!(t.s(5).row(1), &[0, 1, 0, 1]);
    }

    #[test]
    fn test_block_structure() {
        let t = GeneratorTable::shared();
        // even nodes: one 2x2 block repeated down the diagonal
        for node in [0usize, 2, 4] {
            let a = t.a(node);
            for r in 0..2 {
                for c in 0..2 {
                    assert_eq!(a.get(r, c), a.get(r + 2, c + 2), "node {}", node);
                    assert_eq!(a.get(r, c + 2), 0, "node {}", node);
                    assert_eq!(a.get(r + 2, c), 0, "node {}", node);
                }
            }
        }
        // odd nodes: the same block interleaved across both offsets
        for node in [1usize, 3, 5] {
            let a = t.a(node);
            for r in 0..2 {
                for c in 0..2 {
                    assert_eq!(
                        a.get(2 * r, 2 * c),
                        a.get(2 * r + 1, 2 * c + 1),
                        "node {}",
                        node
                    );
                    assert_eq!(a.get(2 * r, 2 * c + 1), 0, "node {}", node);
                    assert_eq!(a.get(2 * r + 1, 2 * c), 0, "node {}", node);
                }
            }
        }
    }

    #[test]
    fn test_data_pair_sums_invertible() {
        // losing data nodes i and j reduces to solving (A_i + A_j);
        // every pair must stay invertible for the code to be MDS
        let t = GeneratorTable::shared();
        for i in 0..4 {
            for j in (i + 1)..4 {
                let sum = t.a(i).add(t.a(j)).unwrap();
                assert!(sum.invert().is_ok(), "pair ({}, {})", i, j);
            }
        }
    }

    #[test]
    fn test_repair_stacks_invertible() {
        // single-block rebuild solves [S; S*A] for the lost column
        let t = GeneratorTable::shared();
        for node in 0..4 {
            let s = t.s(node);
            let a = t.a(node);
            let mut stack = Matrix::zero(4, 4);
            for r in 0..2 {
                for c in 0..4 {
                    stack.set(r, c, s.get(r, c));
                }
                let sa = a.premultiply(s.row(r)).unwrap();
                for (c, &v) in sa.iter().enumerate() {
                    stack.set(2 + r, c, v);
                }
            }
            assert!(stack.invert().is_ok(), "node {}", node);
        }
    }
}
