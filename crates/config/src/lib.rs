//! Configuration loading and validation.
//!
//! Values are layered with [`figment`]: built-in defaults, then a
//! configuration file (JSON, TOML or YAML, chosen by extension), then
//! environment variables prefixed with `ALBUMSYNC_`. The result is read-only
//! for the rest of the run.

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "ALBUMSYNC_";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub api_secret: String,
    pub oauth_token: String,
    pub oauth_token_secret: String,
    /// Root of the local photo library. Files directly inside it are never
    /// uploaded; each sub-directory maps to an album named after it.
    pub photo_library_path: Option<PathBuf>,
    /// Directory names pruned from the walk, wherever they appear.
    pub skip_dirs: Vec<String>,
    /// Allowed file extensions, case-insensitive, with or without the dot.
    pub extensions: Vec<String>,
    pub delete_dupes: bool,
    pub log_level: String,
    /// Append logs to this file instead of writing them to stderr.
    pub log_output: Option<PathBuf>,
    /// Retries after a failed upload (total tries are one more).
    pub upload_attempts: u32,
    /// Seconds between upload retries.
    pub upload_interval: u64,
    /// Retries after an empty page while listing an album.
    pub retrieve_attempts: u32,
    /// Seconds between page retries.
    pub retrieve_interval: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            oauth_token: String::new(),
            oauth_token_secret: String::new(),
            photo_library_path: None,
            // Synology thumbnail/index directories.
            skip_dirs: vec!["@eaDir".to_string()],
            extensions: vec![".png".to_string(), ".jpg".to_string(), ".jpeg".to_string()],
            delete_dupes: false,
            log_level: "info".to_string(),
            log_output: None,
            upload_attempts: 5,
            upload_interval: 30,
            retrieve_attempts: 5,
            retrieve_interval: 5,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key)
            .field("photo_library_path", &self.photo_library_path)
            .field("skip_dirs", &self.skip_dirs)
            .field("extensions", &self.extensions)
            .field("delete_dupes", &self.delete_dupes)
            .field("log_level", &self.log_level)
            .field("log_output", &self.log_output)
            .field("upload_attempts", &self.upload_attempts)
            .field("upload_interval", &self.upload_interval)
            .field("retrieve_attempts", &self.retrieve_attempts)
            .field("retrieve_interval", &self.retrieve_interval)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Location used when no configuration file is given on the command
    /// line: `config.toml` in the platform's configuration directory.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "albumsync").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load configuration from `path` (or the default location), layered
    /// over defaults and under `ALBUMSYNC_*` environment variables.
    ///
    /// An explicit `path` must exist; a missing default file is not an
    /// error, since everything can also come from the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(path)?)
    }

    /// Build the layered [`Figment`] without extracting it.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match path {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => figment = Self::merge_file(figment, path)?,
            None => {
                if let Some(default) = Self::default_path().filter(|p| p.is_file()) {
                    tracing::debug!(path = %default.display(), "Using default configuration file");
                    figment = Self::merge_file(figment, &default)?;
                }
            },
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Extract and normalise a configuration from any [`Figment`].
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let mut config: Config = figment.extract().map_err(|e| exn::Exn::from(ErrorKind::Parse(e.to_string())))?;
        config.extensions = config.extensions.iter().map(|e| normalize_extension(e)).filter(|e| !e.is_empty()).collect();
        Ok(config)
    }

    fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
        let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        Ok(match extension.as_deref() {
            Some("json") => figment.merge(Json::file(path)),
            Some("toml") => figment.merge(Toml::file(path)),
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
        })
    }

    /// Check everything a run cannot do without.
    pub fn validate(&self) -> Result<()> {
        let credentials = [&self.api_key, &self.api_secret, &self.oauth_token, &self.oauth_token_secret];
        if credentials.iter().any(|value| value.trim().is_empty()) {
            exn::bail!(ErrorKind::MissingCredentials);
        }
        let root = self.library_path()?;
        let metadata = std::fs::metadata(root).or_raise(|| match root.try_exists() {
            Ok(false) => ErrorKind::LibraryPathNotFound(root.to_path_buf()),
            _ => ErrorKind::LibraryPathInaccessible(root.to_path_buf()),
        })?;
        if !metadata.is_dir() {
            exn::bail!(ErrorKind::LibraryPathInaccessible(root.to_path_buf()));
        }
        Ok(())
    }

    pub fn library_path(&self) -> Result<&Path> {
        match self.photo_library_path.as_deref() {
            Some(path) if !path.as_os_str().is_empty() => Ok(path),
            _ => exn::bail!(ErrorKind::MissingLibraryPath),
        }
    }

    pub fn skip_dir_set(&self) -> HashSet<String> {
        self.skip_dirs.iter().cloned().collect()
    }

    /// Allowed extensions, lowercase and without a leading dot.
    pub fn extension_set(&self) -> HashSet<String> {
        self.extensions.iter().map(|e| normalize_extension(e)).filter(|e| !e.is_empty()).collect()
    }

    pub fn upload_interval(&self) -> Duration {
        Duration::from_secs(self.upload_interval)
    }

    pub fn retrieve_interval(&self) -> Duration {
        Duration::from_secs(self.retrieve_interval)
    }
}

/// `".JPG"` and `"jpg"` both become `"jpg"`.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    const CREDENTIALS_JSON: &str =
        r#"{"api_key": "k", "api_secret": "s", "oauth_token": "t", "oauth_token_secret": "ts"}"#;

    fn complete(root: &Path) -> Config {
        Config {
            api_key: "k".into(),
            api_secret: "s".into(),
            oauth_token: "t".into(),
            oauth_token_secret: "ts".into(),
            photo_library_path: Some(root.to_path_buf()),
            ..Config::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.skip_dirs, vec!["@eaDir"]);
        assert_eq!(config.extension_set(), HashSet::from(["png".to_string(), "jpg".to_string(), "jpeg".to_string()]));
        assert!(!config.delete_dupes);
        assert_eq!(config.upload_attempts, 5);
        assert_eq!(config.upload_interval(), Duration::from_secs(30));
        assert_eq!(config.retrieve_attempts, 5);
        assert_eq!(config.retrieve_interval(), Duration::from_secs(5));
    }

    #[rstest]
    #[case(".JPG", "jpg")]
    #[case("png", "png")]
    #[case(" .Jpeg ", "jpeg")]
    #[case(".", "")]
    fn test_normalize_extension(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_extension(input), expected);
    }

    #[test]
    fn test_load_json_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("albumsync.json");
        fs::write(&path, CREDENTIALS_JSON).unwrap();
        let config = Config::from_figment(Config::figment(Some(&path)).unwrap()).unwrap();
        assert_eq!(config.api_secret, "s");
        assert_eq!(config.oauth_token_secret, "ts");
        assert_eq!(config.skip_dirs, vec!["@eaDir"]);
        assert_eq!(config.extensions, vec!["png", "jpg", "jpeg"]);
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("albumsync.toml");
        fs::write(
            &path,
            "photo_library_path = \"/srv/photos\"\nextensions = [\".HEIC\", \"jpg\"]\ndelete_dupes = true\nupload_attempts = 2\n",
        )
        .unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.photo_library_path, Some(PathBuf::from("/srv/photos")));
        assert_eq!(config.extensions, vec!["heic", "jpg"]);
        assert!(config.delete_dupes);
        assert_eq!(config.upload_attempts, 2);
        assert_eq!(config.retrieve_attempts, 5);
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("albumsync.yml");
        fs::write(&path, "skip_dirs:\n  - \"@eaDir\"\n  - \".thumbnails\"\nretrieve_interval: 1\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.skip_dir_set(), HashSet::from(["@eaDir".to_string(), ".thumbnails".to_string()]));
        assert_eq!(config.retrieve_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("this_file_does_not_exist.json"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_load_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("albumsync.ini");
        fs::write(&path, "api_key = k").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_wrong_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("albumsync.json");
        fs::write(&path, r#"{"upload_attempts": "many"}"#).unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Parse(_)));
    }

    #[test]
    fn test_environment_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("albumsync.json", CREDENTIALS_JSON)?;
            jail.set_env("ALBUMSYNC_API_KEY", "from-env");
            jail.set_env("ALBUMSYNC_DELETE_DUPES", "true");
            let config = Config::load(Some(Path::new("albumsync.json"))).unwrap();
            assert_eq!(config.api_key, "from-env");
            assert_eq!(config.api_secret, "s");
            assert!(config.delete_dupes);
            Ok(())
        });
    }

    #[test]
    fn test_validate_complete() {
        let dir = tempfile::tempdir().unwrap();
        assert!(complete(dir.path()).validate().is_ok());
    }

    #[rstest]
    #[case::api_key(|c: &mut Config| c.api_key.clear())]
    #[case::api_secret(|c: &mut Config| c.api_secret.clear())]
    #[case::oauth_token(|c: &mut Config| c.oauth_token.clear())]
    #[case::oauth_token_secret(|c: &mut Config| c.oauth_token_secret = "  ".into())]
    fn test_validate_missing_credentials(#[case] strip: fn(&mut Config)) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = complete(dir.path());
        strip(&mut config);
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::MissingCredentials));
    }

    #[test]
    fn test_validate_library_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = complete(dir.path());

        config.photo_library_path = None;
        assert!(matches!(&*config.validate().unwrap_err(), ErrorKind::MissingLibraryPath));

        config.photo_library_path = Some(dir.path().join("missing"));
        assert!(matches!(&*config.validate().unwrap_err(), ErrorKind::LibraryPathNotFound(_)));

        let file = dir.path().join("file.jpg");
        fs::write(&file, b"not a directory").unwrap();
        config.photo_library_path = Some(file);
        assert!(matches!(&*config.validate().unwrap_err(), ErrorKind::LibraryPathInaccessible(_)));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut config = Config::default();
        config.api_secret = "very-secret-value".into();
        config.oauth_token_secret = "another-secret-value".into();
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret-value"));
        assert!(!debug.contains("another-secret-value"));
    }
}
