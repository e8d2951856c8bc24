use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable holding the service URL.
pub const ENV_URL: &str = "LIVEKIT_URL";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "LIVEKIT_API_KEY";
/// Environment variable holding the API secret.
pub const ENV_API_SECRET: &str = "LIVEKIT_API_SECRET";

/// Connection parameters for a [`RoomController`](crate::RoomController).
///
/// Defaults match a local development server.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub url: String,
    pub api_key: String,
    pub api_secret: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:7880".to_string(),
            api_key: "devkey".to_string(),
            api_secret: "secret".to_string(),
        }
    }
}

impl std::fmt::Debug for ControllerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl ControllerConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Build from process environment variables, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var(ENV_URL).unwrap_or(defaults.url),
            api_key: std::env::var(ENV_API_KEY).unwrap_or(defaults.api_key),
            api_secret: std::env::var(ENV_API_SECRET).unwrap_or(defaults.api_secret),
        }
    }

    /// Build from an env file without touching the process environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let env = EnvFile::load(path)?;
        let defaults = Self::default();
        Ok(Self {
            url: env.get(ENV_URL).map_or(defaults.url, str::to_owned),
            api_key: env.get(ENV_API_KEY).map_or(defaults.api_key, str::to_owned),
            api_secret: env
                .get(ENV_API_SECRET)
                .map_or(defaults.api_secret, str::to_owned),
        })
    }
}

/// A parsed `KEY=VALUE` env file.
///
/// Blank lines and `#` comment lines are skipped. Values are trimmed and a
/// single matching pair of surrounding quotes (`"` or `'`) is stripped.
/// A later assignment to the same key wins. Parsing stops at the first
/// malformed line, so a failed load applies nothing.
///
/// The file is parsed into a mapping; writing into the process environment
/// is a separate, explicit step ([`EnvFile::export`]) for callers whose
/// deployment requires that injection point.
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    vars: IndexMap<String, String>,
}

impl EnvFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut vars = IndexMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(Error::Parse {
                    path: path.to_path_buf(),
                    line: idx + 1,
                });
            };
            vars.insert(key.to_owned(), unquote(value.trim()).to_owned());
        }
        Ok(Self { vars })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Parsed assignments in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Set every parsed assignment as a process-wide environment variable.
    pub fn export(&self) {
        for (key, value) in &self.vars {
            std::env::set_var(key, value);
        }
    }
}

/// Strip one matching pair of surrounding quotes, if present.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_env_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn test_parse_plain_assignment() {
        let file = write_env_file("FOO=bar\n");
        let env = EnvFile::load(file.path()).unwrap();
        assert_eq!(env.get("FOO"), Some("bar"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_quotes_stripped_once() {
        let file = write_env_file("A=\"bar baz\"\nB='s3cret'\nC=\"'nested'\"\n");
        let env = EnvFile::load(file.path()).unwrap();
        assert_eq!(env.get("A"), Some("bar baz"));
        assert_eq!(env.get("B"), Some("s3cret"));
        // Only one matching pair comes off.
        assert_eq!(env.get("C"), Some("'nested'"));
    }

    #[test]
    fn test_unmatched_quote_kept() {
        let file = write_env_file("A=\"open\nB='\n");
        let env = EnvFile::load(file.path()).unwrap();
        assert_eq!(env.get("A"), Some("\"open"));
        assert_eq!(env.get("B"), Some("'"));
    }

    #[test]
    fn test_comments_and_blanks_skipped() {
        let file = write_env_file("# leading comment\n\n   # indented comment\nFOO=bar\n\n");
        let env = EnvFile::load(file.path()).unwrap();
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("FOO"), Some("bar"));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let file = write_env_file("URL=http://localhost:7880?a=b\n");
        let env = EnvFile::load(file.path()).unwrap();
        assert_eq!(env.get("URL"), Some("http://localhost:7880?a=b"));
    }

    #[test]
    fn test_malformed_line_fails_with_line_number() {
        let file = write_env_file("FOO=bar\n# ok\nnot an assignment\nBAZ=qux\n");
        let err = EnvFile::load(file.path()).unwrap_err();
        match err {
            Error::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EnvFile::load("/nonexistent/starcast.env").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_later_assignment_wins() {
        let file = write_env_file("FOO=first\nFOO=second\n");
        let env = EnvFile::load(file.path()).unwrap();
        assert_eq!(env.get("FOO"), Some("second"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_credentials_scenario() {
        let file = write_env_file("API_KEY=abc123\n#comment\n\nAPI_SECRET='s3cret'\n");
        let env = EnvFile::load(file.path()).unwrap();
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("API_KEY"), Some("abc123"));
        assert_eq!(env.get("API_SECRET"), Some("s3cret"));
    }

    #[test]
    fn test_iter_preserves_file_order() {
        let file = write_env_file("B=2\nA=1\nC=3\n");
        let env = EnvFile::load(file.path()).unwrap();
        let keys: Vec<_> = env.iter().map(|(k, _)| k.to_owned()).collect();
        assert_eq!(keys, ["B", "A", "C"]);
    }

    #[test]
    fn test_export_sets_process_env() {
        let file = write_env_file("STARCAST_EXPORT_TEST=from-file\n");
        let env = EnvFile::load(file.path()).unwrap();
        env.export();
        assert_eq!(
            std::env::var("STARCAST_EXPORT_TEST").as_deref(),
            Ok("from-file")
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.url, "http://localhost:7880");
        assert_eq!(config.api_key, "devkey");
        assert_eq!(config.api_secret, "secret");
    }

    #[test]
    fn test_config_from_env_file() {
        let file = write_env_file(
            "LIVEKIT_URL=https://rooms.example.com\nLIVEKIT_API_KEY=key1\nLIVEKIT_API_SECRET=sec1\n",
        );
        let config = ControllerConfig::from_env_file(file.path()).unwrap();
        assert_eq!(config.url, "https://rooms.example.com");
        assert_eq!(config.api_key, "key1");
        assert_eq!(config.api_secret, "sec1");
    }

    #[test]
    fn test_config_from_env_file_defaults_fill_missing() {
        let file = write_env_file("LIVEKIT_API_KEY=key1\n");
        let config = ControllerConfig::from_env_file(file.path()).unwrap();
        assert_eq!(config.url, "http://localhost:7880");
        assert_eq!(config.api_key, "key1");
        assert_eq!(config.api_secret, "secret");
    }

    #[test]
    fn test_config_from_env_reads_process_env() {
        std::env::set_var(ENV_URL, "https://env.example.com");
        std::env::remove_var(ENV_API_KEY);
        let config = ControllerConfig::from_env();
        assert_eq!(config.url, "https://env.example.com");
        // Unset variables fall back to defaults.
        assert_eq!(config.api_key, "devkey");
        std::env::remove_var(ENV_URL);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ControllerConfig::new("http://localhost:7880", "devkey", "hunter2");
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
