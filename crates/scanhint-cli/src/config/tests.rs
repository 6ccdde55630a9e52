//! Tests for configuration loading

use super::*;
use indoc::indoc;

mod parse_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_is_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.maintenance.interval_secs, 60);
        assert_eq!(config.maintenance.table, "users");
        assert_eq!(config.connection.port, 3306);
    }

    #[test]
    fn test_full_file() {
        let config = Config::from_toml_str(indoc! {r#"
            [connection]
            host = "db.internal"
            port = 3307
            user = "report"
            password = "s3cret"
            database = "shop"

            [maintenance]
            interval_secs = 300
            table = "orders"

            [logging]
            filter = "debug"
            json_file = true
            log_dir = "/var/log/scanhint"
        "#})
        .unwrap();

        assert_eq!(config.connection.host, "db.internal");
        assert_eq!(config.connection.port, 3307);
        assert_eq!(config.connection.user.as_deref(), Some("report"));
        assert_eq!(config.connection.database.as_deref(), Some("shop"));
        assert_eq!(config.maintenance.interval_secs, 300);
        assert_eq!(config.maintenance.table, "orders");
        assert_eq!(config.logging.filter, "debug");
        assert!(config.logging.json_file);
        assert_eq!(
            config.logging.log_dir,
            Some(PathBuf::from("/var/log/scanhint"))
        );
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = Config::from_toml_str(indoc! {r#"
            [maintenance]
            table = "sessions"
        "#})
        .unwrap();
        assert_eq!(config.maintenance.interval_secs, DEFAULT_INTERVAL_SECS);
        assert_eq!(config.connection.host, "localhost");
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err = Config::from_toml_str("[maintenance]\ninterval_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("interval_secs"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::from_toml_str("[connection\nhost = 1").is_err());
    }
}

mod load_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[connection]\nhost = \"10.0.0.5\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.connection.host, "10.0.0.5");
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "port = [").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("broken.toml"));
    }
}

mod override_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_connection_args_override_file() {
        let mut config = Config::default();
        config.connection.user = Some("file_user".into());
        config.connection.database = Some("file_db".into());

        config.apply_connection_args(&ConnectionArgs {
            host: Some("cli-host".into()),
            port: Some(3310),
            user: None,
            password: Some("pw".into()),
            database: Some("cli_db".into()),
        });

        assert_eq!(config.connection.host, "cli-host");
        assert_eq!(config.connection.port, 3310);
        assert_eq!(config.connection.user.as_deref(), Some("file_user"));
        assert_eq!(config.connection.password.as_deref(), Some("pw"));
        assert_eq!(config.connection.database.as_deref(), Some("cli_db"));
    }

    #[test]
    fn test_maintain_args_override_file() {
        let mut config = Config::default();
        config
            .apply_maintain_args(&MaintainArgs {
                interval_secs: Some(5),
                table: Some("events".into()),
            })
            .unwrap();

        assert_eq!(config.maintenance.interval_secs, 5);
        assert_eq!(config.maintenance.table, "events");
    }

    #[test]
    fn test_maintain_args_are_validated() {
        let mut config = Config::default();
        assert!(
            config
                .apply_maintain_args(&MaintainArgs {
                    interval_secs: Some(0),
                    table: None,
                })
                .is_err()
        );
    }
}
