//! Tests for query timing

use super::*;
use crate::test_support::MockConnection;

mod time_query_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test(start_paused = true)]
    async fn test_select_is_fetched_and_timed() {
        let conn = MockConnection::new().with_delay(Duration::from_millis(250));

        let elapsed = time_query(&conn, "  select * from orders").await.unwrap();

        assert_eq!(elapsed, Duration::from_millis(250));
        assert_eq!(conn.query_log(), vec!["  select * from orders".to_string()]);
        assert!(conn.execute_log().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_statements_are_executed() {
        let conn = MockConnection::new().with_delay(Duration::from_secs(2));

        let elapsed = time_query(&conn, "UPDATE orders SET status = 'x'")
            .await
            .unwrap();

        assert_eq!(elapsed, Duration::from_secs(2));
        assert!(conn.query_log().is_empty());
        assert_eq!(conn.execute_log().len(), 1);
    }

    #[tokio::test]
    async fn test_statement_text_is_sent_verbatim() {
        let conn = MockConnection::new();
        let sql = "UPDATE orders SET note = 'why?' WHERE id = 1";

        time_query(&conn, sql).await.unwrap();

        assert_eq!(conn.execute_log(), vec![sql.to_string()]);
    }

    #[tokio::test]
    async fn test_errors_propagate() {
        let conn = MockConnection::new().with_failure();
        assert!(time_query(&conn, "SELECT 1").await.is_err());
    }

    #[test]
    fn test_is_select() {
        assert!(is_select("SELECT 1"));
        assert!(is_select("\n  Select 1"));
        assert!(!is_select("WITH x AS (SELECT 1) SELECT * FROM x"));
        assert!(!is_select("SEL"));
        assert!(!is_select(""));
    }
}

mod improvement_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_faster_rewrite() {
        let pct = improvement_percent(Duration::from_millis(200), Duration::from_millis(50));
        assert!((pct - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_slower_rewrite_is_negative() {
        let pct = improvement_percent(Duration::from_millis(100), Duration::from_millis(150));
        assert!((pct + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_baseline() {
        assert_eq!(improvement_percent(Duration::ZERO, Duration::from_secs(1)), 0.0);
    }

    #[test]
    fn test_comparison_delegates() {
        let comparison = TimingComparison::new(Duration::from_secs(4), Duration::from_secs(1));
        assert!((comparison.improvement() - 75.0).abs() < 1e-9);
    }
}
