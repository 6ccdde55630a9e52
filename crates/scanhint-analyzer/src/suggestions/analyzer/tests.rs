//! Tests for the plan analyzer

use super::*;
use crate::explain::DERIVED_TABLE_LABEL;

const ORDERS_QUERY: &str = "SELECT * FROM orders WHERE customer_id = 42";

fn full_scan(table: &str) -> PlanRow {
    PlanRow::new(1, "SIMPLE", Some(table), "ALL").with_rows(5000)
}

mod message_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_index_message_joins_columns() {
        assert_eq!(
            index_message("orders", &["customer_id".to_string(), "status".to_string()]),
            "Consider adding an index on table 'orders' for columns: customer_id, status."
        );
    }

    #[test]
    fn test_review_message() {
        assert_eq!(
            review_message("orders"),
            "Review the WHERE clause for table 'orders' and consider adding appropriate indexes."
        );
    }
}

mod analyze_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_scan_without_keys_suggests_filter_columns() {
        let plan = Plan::new(vec![full_scan("orders")]);
        let suggestions = suggest_indexes(&plan, ORDERS_QUERY);

        let expected: IndexSuggestions = [(
            "orders",
            "Consider adding an index on table 'orders' for columns: customer_id.",
        )]
        .into_iter()
        .collect();
        assert_eq!(suggestions, expected);
    }

    #[test]
    fn test_no_filter_columns_falls_back_to_review() {
        let plan = Plan::new(vec![full_scan("orders")]);
        let suggestions = suggest_indexes(&plan, "SELECT * FROM orders");

        assert_eq!(
            suggestions.get("orders"),
            Some("Review the WHERE clause for table 'orders' and consider adding appropriate indexes.")
        );
    }

    #[test]
    fn test_full_scan_with_chosen_key_is_ignored() {
        let plan = Plan::new(vec![
            full_scan("orders")
                .with_possible_keys(["idx_customer"])
                .with_key("idx_customer"),
        ]);
        assert!(suggest_indexes(&plan, ORDERS_QUERY).is_empty());
    }

    #[test]
    fn test_possible_keys_without_chosen_key_is_flagged() {
        let plan = Plan::new(vec![full_scan("orders").with_possible_keys(["idx_customer"])]);
        assert_eq!(suggest_indexes(&plan, ORDERS_QUERY).len(), 1);
    }

    #[test]
    fn test_non_full_scan_access_types_are_ignored() {
        let plan = Plan::new(vec![
            PlanRow::new(1, "SIMPLE", Some("orders"), "ref"),
            PlanRow::new(1, "SIMPLE", Some("customers"), "index"),
            PlanRow::new(1, "SIMPLE", Some("items"), "range").with_key("idx_sku"),
        ]);
        assert!(suggest_indexes(&plan, ORDERS_QUERY).is_empty());
    }

    #[test]
    fn test_access_type_is_case_insensitive() {
        let plan = Plan::new(vec![PlanRow::new(1, "SIMPLE", Some("orders"), "all")]);
        assert_eq!(suggest_indexes(&plan, ORDERS_QUERY).len(), 1);
    }

    #[test]
    fn test_later_row_overwrites_same_table() {
        let plan = Plan::new(vec![
            full_scan("orders"),
            full_scan("customers"),
            full_scan("orders").with_possible_keys(Vec::<String>::new()),
        ]);
        let analyzer = PlanAnalyzer::new();
        let first = analyzer.analyze(&plan, "SELECT * FROM orders");
        assert_eq!(first.len(), 2);

        let mut expected = IndexSuggestions::new();
        expected.insert("orders", review_message("orders"));
        expected.insert("customers", review_message("customers"));
        assert_eq!(first, expected);
        assert_eq!(first.tables().collect::<Vec<_>>(), vec!["orders", "customers"]);
    }

    #[test]
    fn test_table_names_are_not_normalized() {
        let plan = Plan::new(vec![full_scan("Orders"), full_scan("orders")]);
        let suggestions = suggest_indexes(&plan, ORDERS_QUERY);
        assert_eq!(suggestions.tables().collect::<Vec<_>>(), vec!["Orders", "orders"]);
    }

    #[test]
    fn test_derived_rows_use_label() {
        let plan = Plan::new(vec![PlanRow::new(2, "DERIVED", None, "ALL")]);
        let suggestions = suggest_indexes(&plan, "SELECT * FROM (SELECT 1) d");
        assert_eq!(
            suggestions.get(DERIVED_TABLE_LABEL),
            Some(review_message(DERIVED_TABLE_LABEL).as_str())
        );
    }

    #[test]
    fn test_same_candidates_apply_to_every_table() {
        let plan = Plan::new(vec![full_scan("orders"), full_scan("customers")]);
        let query = "SELECT * FROM orders o JOIN customers c ON o.cid = c.id WHERE status = 'open' AND region = 'eu'";
        let suggestions = suggest_indexes(&plan, query);

        assert_eq!(
            suggestions.get("customers"),
            Some("Consider adding an index on table 'customers' for columns: status, region.")
        );
        assert_eq!(
            suggestions.get("orders"),
            Some("Consider adding an index on table 'orders' for columns: status, region.")
        );
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let plan = Plan::new(vec![full_scan("orders"), full_scan("audit")]);
        let analyzer = PlanAnalyzer::new();
        assert_eq!(
            analyzer.analyze(&plan, ORDERS_QUERY),
            analyzer.analyze(&plan, ORDERS_QUERY)
        );
    }

    #[test]
    fn test_empty_plan_yields_nothing() {
        assert!(suggest_indexes(&Plan::default(), ORDERS_QUERY).is_empty());
    }
}

mod extractor_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FixedColumns(Vec<&'static str>);

    impl ConditionColumnExtractor for FixedColumns {
        fn extract_columns(&self, _query: &str) -> Vec<String> {
            self.0.iter().map(|c| c.to_string()).collect()
        }
    }

    #[test]
    fn test_custom_extractor_is_used() {
        let analyzer = PlanAnalyzer::with_extractor(FixedColumns(vec!["tenant_id", "created_at"]));
        let plan = Plan::new(vec![full_scan("events")]);

        assert_eq!(
            analyzer.analyze(&plan, "anything").get("events"),
            Some("Consider adding an index on table 'events' for columns: tenant_id, created_at.")
        );
    }
}

mod serialization_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serializes_as_ordered_object() {
        let mut suggestions = IndexSuggestions::new();
        suggestions.insert("b", "second");
        suggestions.insert("a", "first");

        let json = serde_json::to_string(&suggestions).unwrap();
        assert_eq!(json, r#"{"b":"second","a":"first"}"#);
    }
}
