use uuid::Uuid;

/// Generate an opaque identifier for a newly persisted entity.
///
/// v7 UUIDs sort roughly by creation time, which keeps id-ordered listings
/// stable for records inserted in the same import batch.
pub fn new_entity_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_parseable() {
        let a = new_entity_id();
        let b = new_entity_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn ids_sort_by_creation_order() {
        let ids: Vec<String> = (0..16).map(|_| new_entity_id()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
