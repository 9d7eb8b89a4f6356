//! Property tests for kind parsing and field validation

use proptest::prelude::*;
use vaultkeeper::backend::store::{KindSchema, StoreError};
use vaultkeeper::shared::record::{validate_entry_id, MAX_ENTRY_ID_LEN, RESERVED_COLUMNS};
use vaultkeeper::shared::RecordKind;

fn kind_strategy() -> impl Strategy<Value = RecordKind> {
    prop::sample::select(RecordKind::ALL.to_vec())
}

fn full_schema(kind: RecordKind) -> KindSchema {
    let mut columns: Vec<String> = RESERVED_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend(kind.writable_columns().map(String::from));
    KindSchema::from_columns(kind, &columns).unwrap()
}

fn is_known_kind_name(name: &str) -> bool {
    RecordKind::ALL
        .iter()
        .any(|k| k.as_str() == name || k.table() == name)
}

proptest! {
    #[test]
    fn test_kind_names_round_trip(kind in kind_strategy()) {
        prop_assert_eq!(kind.as_str().parse::<RecordKind>().unwrap(), kind);
        prop_assert_eq!(kind.table().parse::<RecordKind>().unwrap(), kind);
    }

    #[test]
    fn test_unknown_kind_rejected(name in "[a-zA-Z_]{0,16}") {
        prop_assume!(!is_known_kind_name(&name));
        prop_assert!(name.parse::<RecordKind>().is_err());
    }

    #[test]
    fn test_writable_fields_resolve_to_themselves(kind in kind_strategy(), index in any::<prop::sample::Index>()) {
        let schema = full_schema(kind);
        let column = index.get(schema.writable());
        prop_assert_eq!(schema.resolve(column).unwrap(), *column);
    }

    #[test]
    fn test_unknown_fields_rejected(kind in kind_strategy(), field in "\\PC{0,24}") {
        let schema = full_schema(kind);
        prop_assume!(!schema.writable().contains(&field.as_str()));
        let result = schema.resolve(&field);
        prop_assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_reserved_fields_rejected(kind in kind_strategy(), index in any::<prop::sample::Index>()) {
        let schema = full_schema(kind);
        let reserved = index.get(&RESERVED_COLUMNS);
        prop_assert!(matches!(schema.resolve(reserved), Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_entry_id_length_bound(id in "[a-z0-9-]{1,300}") {
        let accepted = validate_entry_id(&id).is_ok();
        prop_assert_eq!(accepted, id.len() <= MAX_ENTRY_ID_LEN);
    }
}
