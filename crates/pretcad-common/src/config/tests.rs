#[cfg(test)]
mod tests {
    use super::super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_point_at_hosted_service() {
        let config = ScreenerConfig::default();
        assert_eq!(config.service.base_url, "https://pre-tcad-app.onrender.com");
        assert!(config.service.request_timeout_secs.is_none());
        assert_eq!(config.page.results_page, "result.html");
    }

    #[test]
    fn test_service_base_gets_trailing_slash() {
        let mut config = ScreenerConfig::default();
        config.service.base_url = "http://127.0.0.1:9000/api".to_string();
        let base = config.service_base().unwrap();
        assert_eq!(base.as_str(), "http://127.0.0.1:9000/api/");
        assert_eq!(base.join("screen").unwrap().as_str(), "http://127.0.0.1:9000/api/screen");
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = ScreenerConfig::from_toml_str(
            "[service]\nbase_url = \"http://localhost:8080\"\nrequest_timeout_secs = 30\n",
        ).unwrap();
        assert_eq!(config.service.base_url, "http://localhost:8080");
        assert_eq!(config.service.request_timeout_secs, Some(30));
        assert_eq!(config.page.current_page, "http://localhost:8000/index.html");
        assert_eq!(config.storage.path, std::path::PathBuf::from("pretcad_storage.json"));
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let mut config = ScreenerConfig::default();
        config.page.current_page = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ScreenerError::Config(_))));
    }

    #[test]
    fn test_page_that_cannot_be_a_base_is_rejected() {
        let mut config = ScreenerConfig::default();
        config.page.current_page = "about:blank".to_string();
        assert!(matches!(config.validate(), Err(ScreenerError::Config(_))));
        config.page.current_page = "file:///srv/screener/index.html".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_env_config_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var(CONFIG_ENV, dir.path().join("absent.toml"));
        let config = ScreenerConfig::load(None);
        std::env::remove_var(CONFIG_ENV);
        assert_eq!(config.unwrap().page.results_page, "result.html");
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(ScreenerConfig::load_from(&missing), Err(ScreenerError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[storage]\npath = \"/tmp/exchange.json\"").unwrap();
        let config = ScreenerConfig::load_from(file.path()).unwrap();
        assert_eq!(config.storage.path, std::path::PathBuf::from("/tmp/exchange.json"));
    }
}
