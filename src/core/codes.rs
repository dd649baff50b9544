//! Confirmation code and access PIN generation

use uuid::Uuid;

/// Length of a confirmation code in characters
pub const CONFIRMATION_CODE_LEN: usize = 8;

/// Generate a confirmation code not rejected by `is_taken`
///
/// Codes are the first eight hex digits of a random UUID, uppercased.
/// Collisions are retried until `is_taken` returns `false`.
pub fn generate_confirmation_code(is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let mut code = Uuid::new_v4().simple().to_string();
        code.truncate(CONFIRMATION_CODE_LEN);
        code.make_ascii_uppercase();

        if !is_taken(&code) {
            return code;
        }
    }
}

/// Generate a four digit access PIN
pub fn generate_pin() -> String {
    format!("{:04}", Uuid::new_v4().as_u128() % 10_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashSet;

    #[test]
    fn test_code_shape() {
        let code = generate_confirmation_code(|_| false);
        assert_eq!(code.len(), CONFIRMATION_CODE_LEN);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn test_taken_codes_are_regenerated() {
        let attempts = Cell::new(0);
        let code = generate_confirmation_code(|_| {
            attempts.set(attempts.get() + 1);
            attempts.get() < 3
        });

        assert_eq!(attempts.get(), 3);
        assert_eq!(code.len(), CONFIRMATION_CODE_LEN);
    }

    #[test]
    fn test_codes_avoid_existing_set() {
        let mut issued = HashSet::new();
        for _ in 0..500 {
            let code = generate_confirmation_code(|c| issued.contains(c));
            assert!(issued.insert(code));
        }
    }

    #[test]
    fn test_pin_is_four_digits() {
        for _ in 0..100 {
            let pin = generate_pin();
            assert_eq!(pin.len(), 4);
            assert!(pin.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
