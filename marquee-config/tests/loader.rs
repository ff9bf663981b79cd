use std::{fs, path::Path, time::Duration};

use marquee_config::{ConfigLoadError, ConfigLoader, EnvConfig};
use tempfile::TempDir;

fn write_config(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("marquee.toml");
    fs::write(&path, contents).expect("write config");
    path
}

fn env(vars: &[(&str, &str)]) -> EnvConfig {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EnvConfig::from_lookup(move |name| {
        vars.iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    })
}

const FULL_FILE: &str = r#"
[upstream]
base_url = "https://tmdb.example.test/3"
api_key = "file-key"
request_timeout = "2s"

[pool]
capacity = 4

[enrichment]
trailer_site = "YouTube"
max_enriched_members = 25
"#;

#[test]
fn file_values_are_used() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), FULL_FILE);

    let load = ConfigLoader::new()
        .with_config_path(&path)
        .load_from(EnvConfig::default())
        .unwrap();
    let config = load.config;

    assert_eq!(config.upstream.base_url.as_str(), "https://tmdb.example.test/3");
    assert_eq!(config.upstream.api_key, "file-key");
    assert_eq!(config.upstream.request_timeout, Duration::from_secs(2));
    assert_eq!(config.pool.capacity, 4);
    assert_eq!(config.enrichment.max_enriched_members, Some(25));
    assert_eq!(config.metadata.config_path.as_deref(), Some(path.as_path()));
    assert!(load.warnings.is_empty(), "{:?}", load.warnings);
}

#[test]
fn environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), FULL_FILE);

    let config = ConfigLoader::new()
        .with_config_path(&path)
        .load_from(env(&[
            ("TMDB_API_KEY", "env-key"),
            ("TMDB_REQUEST_TIMEOUT", "750ms"),
            ("MARQUEE_POOL_CAPACITY", "2"),
            ("MARQUEE_MAX_ENRICHED_MEMBERS", "5"),
        ]))
        .unwrap()
        .config;

    assert_eq!(config.upstream.api_key, "env-key");
    assert_eq!(config.upstream.request_timeout, Duration::from_millis(750));
    assert_eq!(config.pool.capacity, 2);
    assert_eq!(config.enrichment.max_enriched_members, Some(5));
    // Untouched keys still come from the file.
    assert_eq!(config.upstream.base_url.as_str(), "https://tmdb.example.test/3");
}

#[test]
fn config_path_can_come_from_environment() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), FULL_FILE);
    let path_str = path.to_str().unwrap();

    let config = ConfigLoader::new()
        .load_from(env(&[("MARQUEE_CONFIG", path_str)]))
        .unwrap()
        .config;

    assert_eq!(config.upstream.api_key, "file-key");
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = ConfigLoader::new()
        .with_config_path(&missing)
        .load_from(env(&[("TMDB_API_KEY", "k")]))
        .unwrap_err();

    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
    assert_eq!(err.path(), Some(missing.as_path()));
}

#[test]
fn invalid_toml_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "[pool\ncapacity = ");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_from(EnvConfig::default())
        .unwrap_err();

    assert!(matches!(err, ConfigLoadError::Parse { .. }));
}

#[test]
fn api_key_is_required() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "[pool]\ncapacity = 3\n");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_from(env(&[("TMDB_API_KEY", "   ")]))
        .unwrap_err();

    assert!(matches!(err, ConfigLoadError::MissingApiKey));
}

#[test]
fn zero_pool_capacity_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        "[upstream]\napi_key = \"k\"\n[pool]\ncapacity = 0\n",
    );

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_from(EnvConfig::default())
        .unwrap_err();

    assert!(matches!(err, ConfigLoadError::ZeroPoolCapacity));
}

#[test]
fn bad_environment_values_name_the_variable() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "[upstream]\napi_key = \"k\"\n");
    let loader = ConfigLoader::new().with_config_path(&path);

    let err = loader
        .load_from(env(&[("MARQUEE_POOL_CAPACITY", "many")]))
        .unwrap_err();
    assert!(err.to_string().contains("MARQUEE_POOL_CAPACITY"), "{err}");

    let err = loader
        .load_from(env(&[("TMDB_REQUEST_TIMEOUT", "eventually")]))
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::InvalidDuration { .. }));

    let err = loader
        .load_from(env(&[("TMDB_BASE_URL", "not a url")]))
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::InvalidBaseUrl { .. }));
}

#[test]
fn questionable_settings_produce_warnings() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[upstream]
base_url = "http://localhost:8080/3"
api_key = "k"

[pool]
capacity = 64

[enrichment]
trailer_site = "Vimeo"
max_enriched_members = 0
"#,
    );

    let load = ConfigLoader::new()
        .with_config_path(&path)
        .load_from(EnvConfig::default())
        .unwrap();

    assert_eq!(load.warnings.len(), 4, "{:?}", load.warnings);
    assert!(
        load.warnings
            .iter()
            .any(|w| w.message.contains("not HTTPS"))
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), FULL_FILE);

    let config = ConfigLoader::new()
        .with_config_path(&path)
        .load_from(EnvConfig::default())
        .unwrap()
        .config;

    assert!(!format!("{config:?}").contains("file-key"));
}

#[derive(Clone, Default)]
struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn loading_a_file_is_logged_to_an_installed_subscriber() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), FULL_FILE);
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        ConfigLoader::new()
            .with_config_path(&path)
            .load_from(EnvConfig::default())
            .unwrap();
    });

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("loaded configuration file"), "{output}");
}
