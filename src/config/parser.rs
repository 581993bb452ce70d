use crate::config::types::{Config, FailurePolicy, SearchMethod, StopPolicy};
use crate::config::validation::{validate, validate_depth, validate_time};
use crate::ConfigError;
use std::path::Path;

/// Crawl parameters given on the command line
///
/// Unset values leave the file (or default) configuration untouched.
#[derive(Debug, Clone, Default)]
pub struct CrawlOverrides {
    pub method: Option<String>,
    pub max_time: Option<i64>,
    pub max_depth: Option<i64>,
    pub full_graph: bool,
    pub hard_stop: bool,
    pub strict: bool,
    pub non_interactive: bool,
    pub proxy_server: Option<String>,
    pub proxy_username: Option<String>,
    pub proxy_password: Option<String>,
    pub output_dir: Option<String>,
}

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use crawly::config::load_config;
///
/// let config = load_config(Path::new("crawly.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates TOML configuration content
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Builds the effective configuration for a run
///
/// Reads the optional file, applies the command-line overrides on top and
/// validates the result.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &CrawlOverrides,
) -> Result<Config, ConfigError> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    apply_overrides(config, overrides)
}

/// Applies command-line overrides to a configuration and re-validates it
pub fn apply_overrides(
    mut config: Config,
    overrides: &CrawlOverrides,
) -> Result<Config, ConfigError> {
    if let Some(method) = &overrides.method {
        config.crawler.method = method.parse::<SearchMethod>()?;
    }

    if let Some(seconds) = overrides.max_time {
        config.crawler.max_time = validate_time(seconds)?;
    }

    if let Some(depth) = overrides.max_depth {
        config.crawler.max_depth = validate_depth(depth)?;
    }

    if overrides.full_graph {
        config.crawler.full_graph = true;
    }

    if overrides.hard_stop {
        config.crawler.stop_policy = StopPolicy::HardStop;
    }

    if overrides.strict {
        config.crawler.failure_policy = FailurePolicy::Strict;
    }

    if overrides.non_interactive {
        config.navigator.interactive = false;
    }

    if overrides.proxy_server.is_some() {
        config.proxy.server = overrides.proxy_server.clone();
    }

    if overrides.proxy_username.is_some() {
        config.proxy.username = overrides.proxy_username.clone();
    }

    if overrides.proxy_password.is_some() {
        config.proxy.password = overrides.proxy_password.clone();
    }

    if let Some(dir) = &overrides.output_dir {
        config.output.directory = dir.clone();
    }

    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
method = "dfs"
max-time = 30
max-depth = 3
full-graph = true
stop-policy = "hard-stop"
failure-policy = "strict"

[navigator]
user-agents = ["TestAgent/1.0"]
consent-wait-min-ms = 0
consent-wait-max-ms = 10
slow-mo-max-ms = 0

[proxy]
server = "http://proxy.local:3128"

[output]
directory = "/tmp/crawly"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.method, SearchMethod::DepthFirst);
        assert_eq!(config.crawler.max_time, 30);
        assert_eq!(config.crawler.max_depth, 3);
        assert!(config.crawler.full_graph);
        assert_eq!(config.crawler.stop_policy, StopPolicy::HardStop);
        assert_eq!(config.crawler.failure_policy, FailurePolicy::Strict);
        assert_eq!(config.navigator.user_agents, vec!["TestAgent/1.0"]);
        assert_eq!(config.navigator.slow_mo_max_ms, 0);
        // untouched keys keep their defaults
        assert_eq!(config.navigator.captcha_wait_secs, 120);
        assert_eq!(
            config.proxy.server.as_deref(),
            Some("http://proxy.local:3128")
        );
        assert_eq!(config.output.directory, "/tmp/crawly");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.crawler.method, SearchMethod::BreadthFirst);
        assert_eq!(config.crawler.max_time, 60);
        assert_eq!(config.crawler.max_depth, 10);
        assert!(!config.crawler.full_graph);
        assert_eq!(config.crawler.failure_policy, FailurePolicy::Resilient);
        assert_eq!(config.output.directory, ".");
    }

    #[test]
    fn test_method_is_case_insensitive_in_file() {
        let config = parse_config("[crawler]\nmethod = \"Dfs\"\n").unwrap();
        assert_eq!(config.crawler.method, SearchMethod::DepthFirst);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/crawly.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_method_in_file_rejected() {
        assert!(parse_config("[crawler]\nmethod = \"astar\"\n").is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let overrides = CrawlOverrides {
            method: Some("DFS".to_string()),
            max_time: Some(5),
            max_depth: Some(2),
            full_graph: true,
            strict: true,
            proxy_server: Some("http://127.0.0.1:8080".to_string()),
            proxy_username: Some("user".to_string()),
            proxy_password: Some("pass".to_string()),
            ..Default::default()
        };

        let config = resolve_config(None, &overrides).unwrap();
        assert_eq!(config.crawler.method, SearchMethod::DepthFirst);
        assert_eq!(config.crawler.max_time, 5);
        assert_eq!(config.crawler.max_depth, 2);
        assert!(config.crawler.full_graph);
        assert_eq!(config.crawler.failure_policy, FailurePolicy::Strict);
        assert_eq!(config.crawler.stop_policy, StopPolicy::Drain);
        assert_eq!(config.proxy.username.as_deref(), Some("user"));
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let bad_method = CrawlOverrides {
            method: Some("random".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_config(None, &bad_method),
            Err(ConfigError::InvalidMethod(_))
        ));

        let bad_time = CrawlOverrides {
            max_time: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            resolve_config(None, &bad_time),
            Err(ConfigError::InvalidTime(0))
        ));

        let bad_depth = CrawlOverrides {
            max_depth: Some(-1),
            ..Default::default()
        };
        assert!(matches!(
            resolve_config(None, &bad_depth),
            Err(ConfigError::InvalidDepth(-1))
        ));
    }
}
