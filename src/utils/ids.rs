//! Timer identifier generation

use uuid::Uuid;

/// Produces unique, creation-time-ordered string tokens
pub trait IdGenerator: Send + Sync + 'static {
    fn new_id(&self) -> String;
}

/// UUIDv7 ids: a millisecond timestamp prefix followed by random bits
///
/// The hyphenated lowercase form sorts lexicographically by creation time.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn new_id(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let ids = UuidV7Generator;
        let a = ids.new_id();
        let b = ids.new_id();
        assert_ne!(a, b);
    }

    #[test]
    fn ids_sort_by_creation() {
        let ids = UuidV7Generator;
        let earlier = ids.new_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let later = ids.new_id();
        assert!(earlier < later);
    }
}
