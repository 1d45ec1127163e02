//! long-mds: a (6,4) Long MDS erasure code over GF(2^8)
//!
//! This library provides the pieces of the code and the codec itself:
//! - `field`: GF(2^8) symbol arithmetic behind one shared instance
//! - `matrix`: dense byte matrices with vector products and inversion
//! - `generator`: the fixed A/S generator tables of the construction
//! - `codec`: encode 4 data blocks into 2 parity blocks, rebuild any
//!   1 or 2 lost blocks of a stripe from the survivors
//!
//! # Example
//!
//! ```
//! use long_mds::{LongMdsCode, Matrix};
//!
//! let code = LongMdsCode::new(6, 2)?;
//!
//! // four data blocks, one per column
//! let data = Matrix::from_array([
//!     [1, 2, 3, 4],
//!     [5, 6, 7, 8],
//!     [9, 10, 11, 12],
//!     [13, 14, 15, 16],
//! ]);
//! let mut parity = Matrix::zero(4, 2);
//! code.encode(&data, &mut parity)?;
//!
//! // lay out the full stripe, then lose two blocks
//! let mut stripe = Matrix::zero(4, 6);
//! for c in 0..4 {
//!     stripe.set_column(c, &data.column(c));
//! }
//! for c in 0..2 {
//!     stripe.set_column(4 + c, &parity.column(c));
//! }
//! stripe.set_column(0, &[0; 4]);
//! stripe.set_column(5, &[0; 4]);
//!
//! let mut recovered = Matrix::zero(4, 2);
//! code.decode(&stripe, &[0, 5], &mut recovered)?;
//! assert_eq!(recovered.column(0), data.column(0));
//! assert_eq!(recovered.column(1), parity.column(1));
//! # Ok::<(), long_mds::MdsError>(())
//! ```

pub mod codec;
pub mod error;
pub mod field;
pub mod generator;
pub mod matrix;

// Re-exports for convenient access
pub use codec::{LongMdsCode, BLOCK_SYMBOLS, PARITY_SIZE, STRIPE_SIZE};
pub use error::{MdsError, Result};
pub use field::GaloisField;
pub use generator::GeneratorTable;
pub use matrix::Matrix;
