//! Tests for the plan model

use super::*;

fn full_scan(table: &str) -> PlanRow {
    PlanRow::new(1, "SIMPLE", Some(table), "ALL")
}

mod plan_row_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_scan_detection_ignores_case() {
        assert!(full_scan("orders").is_full_scan());
        assert!(PlanRow::new(1, "SIMPLE", Some("t"), "all").is_full_scan());
        assert!(!PlanRow::new(1, "SIMPLE", Some("t"), "ref").is_full_scan());
        assert!(!PlanRow::new(1, "SIMPLE", Some("t"), "index").is_full_scan());
    }

    #[test]
    fn test_lacks_usable_index() {
        assert!(full_scan("t").lacks_usable_index());
        assert!(
            full_scan("t")
                .with_possible_keys(Vec::<String>::new())
                .with_key("idx_a")
                .lacks_usable_index()
        );
        assert!(
            full_scan("t")
                .with_possible_keys(["idx_a"])
                .lacks_usable_index()
        );
        assert!(
            !full_scan("t")
                .with_possible_keys(["idx_a"])
                .with_key("idx_a")
                .lacks_usable_index()
        );
    }

    #[test]
    fn test_unindexed_full_scan_requires_both_conditions() {
        assert!(full_scan("t").is_unindexed_full_scan());
        assert!(
            !PlanRow::new(1, "SIMPLE", Some("t"), "ref").is_unindexed_full_scan(),
            "a ref lookup is never a full scan"
        );
        assert!(
            !full_scan("t")
                .with_possible_keys(["idx_customer"])
                .with_key("idx_customer")
                .is_unindexed_full_scan()
        );
    }

    #[test]
    fn test_table_label_for_derived_rows() {
        assert_eq!(full_scan("orders").table_label(), "orders");
        assert_eq!(
            PlanRow::new(1, "DERIVED", None, "ALL").table_label(),
            DERIVED_TABLE_LABEL
        );
    }

    #[test]
    fn test_builder_sets_optional_fields() {
        let row = PlanRow::new(2, "SUBQUERY", Some("items"), "ref")
            .with_id(None)
            .with_possible_keys(["idx_order", "idx_sku"])
            .with_key("idx_order")
            .with_key_len("4")
            .with_ref("shop.orders.id")
            .with_rows(12)
            .with_extra("Using index");

        assert_eq!(row.id, None);
        assert_eq!(
            row.possible_keys,
            Some(vec!["idx_order".to_string(), "idx_sku".to_string()])
        );
        assert_eq!(row.key.as_deref(), Some("idx_order"));
        assert_eq!(row.key_len.as_deref(), Some("4"));
        assert_eq!(row.ref_cols.as_deref(), Some("shop.orders.id"));
        assert_eq!(row.rows, 12);
        assert_eq!(row.extra, "Using index");
    }
}

mod plan_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unindexed_full_scans_filters_rows() {
        let plan: Plan = vec![
            full_scan("orders").with_rows(1000),
            PlanRow::new(1, "SIMPLE", Some("customers"), "eq_ref")
                .with_key("PRIMARY")
                .with_rows(1),
            full_scan("audit")
                .with_possible_keys(["idx_ts"])
                .with_key("idx_ts"),
        ]
        .into_iter()
        .collect();

        let tables: Vec<&str> = plan
            .unindexed_full_scans()
            .map(|row| row.table_label())
            .collect();
        assert_eq!(tables, vec!["orders"]);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.total_rows_estimate(), 1001);
    }

    #[test]
    fn test_empty_plan() {
        let plan = Plan::default();
        assert!(plan.is_empty());
        assert_eq!(plan.unindexed_full_scans().count(), 0);
    }

    #[test]
    fn test_serialization_roundtrip_keeps_nulls() {
        let plan = Plan::new(vec![full_scan("orders")]);
        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.contains("\"possible_keys\":null"));

        let parsed: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, plan);
    }
}
