//! Small shared helpers

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a human-readable booking reference, e.g. "PLZ-7K2M9QDX".
///
/// Alphabet excludes 0/O/1/I to keep the code readable over the phone.
pub fn reference_code() -> String {
    use rand::Rng;
    const ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    let code: String = (0..8)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("PLZ-{code}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_code_shape() {
        let code = reference_code();
        assert!(code.starts_with("PLZ-"));
        assert_eq!(code.len(), 12);
        assert!(!code.contains('0'));
        assert!(!code.contains('O'));
    }
}
