//! Random strings over a fixed alphabet.
//!
//! Despite feeding the `unique_id` rule, nothing here guarantees uniqueness:
//! characters are drawn independently with replacement and repeated strings
//! across calls are expected.

use rand::{Rng, RngCore};
use rowsmith_core::Charset;

const NUMBERS: &[u8] = b"0123456789";
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const ALL: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Symbols a charset draws from.
pub fn alphabet(charset: Charset) -> &'static [u8] {
    match charset {
        Charset::Numbers => NUMBERS,
        Charset::Alphanumeric => ALPHANUMERIC,
        Charset::All => ALL,
    }
}

/// Draw `length` characters uniformly from the charset's alphabet.
///
/// A non-positive length yields an empty string.
pub fn generate_id(length: i64, charset: Charset, rng: &mut dyn RngCore) -> String {
    let symbols = alphabet(charset);
    let length = usize::try_from(length).unwrap_or(0);
    let mut value = String::with_capacity(length);
    for _ in 0..length {
        let idx = rng.random_range(0..symbols.len());
        value.push(char::from(symbols[idx]));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn alphabets_have_expected_sizes() {
        assert_eq!(alphabet(Charset::Numbers).len(), 10);
        assert_eq!(alphabet(Charset::Alphanumeric).len(), 62);
        assert!(alphabet(Charset::All).len() > 62);
        assert!(alphabet(Charset::All).starts_with(ALPHANUMERIC));
    }

    #[test]
    fn non_positive_length_is_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(generate_id(0, Charset::All, &mut rng), "");
        assert_eq!(generate_id(-3, Charset::Numbers, &mut rng), "");
    }

    #[test]
    fn numbers_are_digits_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let value = generate_id(32, Charset::Numbers, &mut rng);
        assert_eq!(value.len(), 32);
        assert!(value.chars().all(|ch| ch.is_ascii_digit()));
    }
}
