//! Primary key generation.

use uuid::Uuid;

/// Source of fresh primary keys for created records.
pub trait KeyGenerator: Send + Sync {
    /// Produce the key for the next created record.
    fn next_key(&self) -> Uuid;
}

/// Random (v4) UUID keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn next_key(&self) -> Uuid {
        Uuid::new_v4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_keys_are_distinct() {
        let keys = RandomKeyGenerator;
        let a = keys.next_key();
        let b = keys.next_key();
        assert_ne!(a, b);
        assert!(!a.is_nil());
    }
}
