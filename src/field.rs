//! GF(2^8) symbol arithmetic.
//!
//! Symbols are bytes. Addition is XOR; multiplication and division run
//! through log/exp tables built once per process. The reduction
//! polynomial is x^8 + x^4 + x^3 + x^2 + 1 (0x11D) with generator 2.

use std::sync::OnceLock;

/// Reduction polynomial for the field, as a bit pattern.
const REDUCING_POLY: u16 = 0x11D;

/// Table-driven GF(2^8) arithmetic.
///
/// Built lazily behind [`GaloisField::shared`] and handed out as a
/// `&'static` reference; every matrix and codec operation in the crate
/// routes symbol arithmetic through one shared instance.
pub struct GaloisField {
    /// log[v] for v in 1..=255; log[0] is unused.
    log: [u8; 256],
    /// exp table, doubled so a sum of two logs indexes without a modulo.
    exp: [u8; 512],
}

impl GaloisField {
    /// The process-wide field instance, built on first use.
    pub fn shared() -> &'static GaloisField {
        static SHARED: OnceLock<GaloisField> = OnceLock::new();
        SHARED.get_or_init(GaloisField::build)
    }

    fn build() -> GaloisField {
        let mut log = [0u8; 256];
        let mut exp = [0u8; 512];
        let mut x: u16 = 1;
        for i in 0..255 {
            exp[i] = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= REDUCING_POLY;
            }
        }
        for i in 255..512 {
            exp[i] = exp[i - 255];
        }
        GaloisField { log, exp }
    }

    /// Number of elements in the field.
    pub fn field_size(&self) -> usize {
        256
    }

    /// Field addition. Characteristic 2, so this is also subtraction
    /// and every element is its own additive inverse.
    pub fn add(&self, a: u8, b: u8) -> u8 {
        a ^ b
    }

    /// Field multiplication.
    pub fn multiply(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        self.exp[self.log[a as usize] as usize + self.log[b as usize] as usize]
    }

    /// Field division.
    ///
    /// # Panics
    ///
    /// Panics if `b` is zero, like native integer division.
    pub fn divide(&self, a: u8, b: u8) -> u8 {
        assert!(b != 0, "division by zero in GF(2^8)");
        if a == 0 {
            return 0;
        }
        self.exp[self.log[a as usize] as usize + 255 - self.log[b as usize] as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_is_one_instance() {
        assert!(std::ptr::eq(GaloisField::shared(), GaloisField::shared()));
    }

    #[test]
    fn test_field_size() {
        assert_eq!(GaloisField::shared().field_size(), 256);
    }

    #[test]
    fn test_add_is_xor() {
        let gf = GaloisField::shared();
        assert_eq!(gf.add(0b1010, 0b0110), 0b1100);
        assert_eq!(gf.add(0, 0xFF), 0xFF);
    }

    #[test]
    fn test_add_self_inverse() {
        let gf = GaloisField::shared();
        for v in 0..=255u8 {
            assert_eq!(gf.add(v, v), 0);
        }
    }

    #[test]
    fn test_multiply_identities() {
        let gf = GaloisField::shared();
        for v in 0..=255u8 {
            assert_eq!(gf.multiply(v, 0), 0);
            assert_eq!(gf.multiply(0, v), 0);
            assert_eq!(gf.multiply(v, 1), v);
            assert_eq!(gf.multiply(1, v), v);
        }
    }

    #[test]
    fn test_multiply_fixtures() {
        let gf = GaloisField::shared();
        // 2*128 wraps past x^8 and picks up the reduction polynomial
        assert_eq!(gf.multiply(2, 128), 29);
        assert_eq!(gf.multiply(16, 16), 29);
        assert_eq!(gf.multiply(40, 5), 136);
        assert_eq!(gf.multiply(20, 10), 136);
        assert_eq!(gf.multiply(7, 9), 63);
        assert_eq!(gf.multiply(255, 255), 226);
    }

    #[test]
    fn test_multiply_commutes() {
        let gf = GaloisField::shared();
        for a in [3u8, 29, 40, 129, 255] {
            for b in [1u8, 2, 77, 200, 254] {
                assert_eq!(gf.multiply(a, b), gf.multiply(b, a));
            }
        }
    }

    #[test]
    fn test_divide_fixtures() {
        let gf = GaloisField::shared();
        assert_eq!(gf.divide(136, 5), 40);
        assert_eq!(gf.divide(29, 128), 2);
        assert_eq!(gf.divide(1, 2), 142);
        assert_eq!(gf.divide(1, 255), 253);
        assert_eq!(gf.divide(0, 7), 0);
    }

    #[test]
    fn test_divide_undoes_multiply() {
        let gf = GaloisField::shared();
        for a in 0..=255u8 {
            for b in [1u8, 2, 5, 142, 255] {
                assert_eq!(gf.divide(gf.multiply(a, b), b), a);
            }
        }
    }

    #[test]
    fn test_every_nonzero_element_has_inverse() {
        let gf = GaloisField::shared();
        for v in 1..=255u8 {
            let inv = gf.divide(1, v);
            assert_eq!(gf.multiply(v, inv), 1, "v={}", v);
        }
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn test_divide_by_zero_panics() {
        GaloisField::shared().divide(5, 0);
    }
}
