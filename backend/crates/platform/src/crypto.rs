//! Cryptographic Utilities

use rand::{Rng, rngs::OsRng};

/// Generate a zero-padded numeric code of `digits` length
///
/// Draws uniformly from `[0, 10^digits - 1]` using the operating system CSPRNG,
/// so every code of the given width is equally likely (leading zeros included).
/// Widths outside `1..=9` are clamped.
pub fn random_numeric_code(digits: u32) -> String {
    let digits = digits.clamp(1, 9);
    let upper = 10u32.pow(digits);
    let value = OsRng.gen_range(0..upper);
    format!("{:0width$}", value, width = digits as usize)
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_code_shape() {
        for _ in 0..200 {
            let code = random_numeric_code(6);
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_numeric_code_varies() {
        let codes: std::collections::HashSet<String> =
            (0..50).map(|_| random_numeric_code(6)).collect();
        // 50 draws from a million values colliding down to a handful is not plausible
        assert!(codes.len() > 40);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"123456", b"123456"));
        assert!(!constant_time_eq(b"123456", b"123457"));
        assert!(!constant_time_eq(b"123456", b"12345"));
    }

    #[test]
    fn test_numeric_code_width_is_clamped() {
        assert_eq!(random_numeric_code(0).len(), 1);
        assert_eq!(random_numeric_code(12).len(), 9);
    }
}
