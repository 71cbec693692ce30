use crate::error::{ReviewError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// 解析サービスのURLを上書きする環境変数
pub const API_URL_ENV: &str = "POSTURE_API_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            // 動画処理はサーバー側で時間がかかる
            timeout_seconds: 300,
        }
    }
}

impl Config {
    /// `.env` を読み込んでから設定ファイルを読む
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReviewError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("posture-review").join("config.json"))
    }

    /// 実際に使うベースURL
    ///
    /// 優先順位: コマンドライン引数 > 環境変数 > 設定ファイル > 既定値。空白だけの値は無視する。
    pub fn effective_base_url(&self, cli_override: Option<&str>) -> String {
        let env = std::env::var(API_URL_ENV).ok();
        self.pick_base_url(cli_override, env.as_deref())
    }

    fn pick_base_url(&self, cli_override: Option<&str>, env: Option<&str>) -> String {
        [cli_override, env, Some(self.api_base_url.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .to_string()
    }

    pub fn set_api_base_url(&mut self, url: String) -> Result<()> {
        Url::parse(&url)?;
        self.api_base_url = url;
        Ok(())
    }

    pub fn set_timeout_seconds(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(ReviewError::Config("タイムアウトは1秒以上にしてください".into()));
        }
        self.timeout_seconds = seconds;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // 環境変数はプロセス全体で共有されるので、触るテストは直列にする
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env<F: FnOnce()>(value: Option<&str>, f: F) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        match value {
            Some(v) => std::env::set_var(API_URL_ENV, v),
            None => std::env::remove_var(API_URL_ENV),
        }
        f();
        std::env::remove_var(API_URL_ENV);
    }

    fn file_config(url: &str) -> Config {
        Config {
            api_base_url: url.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.timeout_seconds, 300);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_base_url": "https://posture.example.com"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, "https://posture.example.com");
        assert_eq!(config.timeout_seconds, 300);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set_api_base_url("http://10.0.0.5:9000".into()).unwrap();
        config.set_timeout_seconds(60).unwrap();
        config.save_to(&path).expect("設定保存失敗");

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_base_url, "http://10.0.0.5:9000");
        assert_eq!(loaded.timeout_seconds, 60);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut config = Config::default();
        let result = config.set_api_base_url("not a url".into());
        assert!(matches!(result, Err(ReviewError::InvalidUrl(_))));
        assert_eq!(config.api_base_url, "http://localhost:8000");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        assert!(matches!(config.set_timeout_seconds(0), Err(ReviewError::Config(_))));
    }

    #[test]
    fn test_broken_file_is_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ReviewError::JsonParse(_))));
    }

    #[test]
    fn test_cli_override_beats_env_and_file() {
        let config = file_config("http://file:1");
        with_env(Some("http://env:2"), || {
            assert_eq!(config.effective_base_url(Some(" http://cli:3 ")), "http://cli:3");
        });
    }

    #[test]
    fn test_env_beats_file() {
        let config = file_config("http://file:1");
        with_env(Some("  http://env:2  "), || {
            assert_eq!(config.effective_base_url(None), "http://env:2");
        });
    }

    #[test]
    fn test_blank_env_falls_back_to_file() {
        let config = file_config("http://file:1");
        with_env(Some("   "), || {
            assert_eq!(config.effective_base_url(None), "http://file:1");
        });
    }

    #[test]
    fn test_blank_cli_override_is_ignored() {
        let config = file_config("http://file:1");
        with_env(None, || {
            assert_eq!(config.effective_base_url(Some("")), "http://file:1");
        });
    }

    #[test]
    fn test_no_env_uses_default() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        with_env(None, || {
            assert_eq!(config.effective_base_url(None), "http://localhost:8000");
        });
    }

    #[test]
    fn test_blank_file_url_uses_default() {
        assert_eq!(
            file_config("  ").pick_base_url(None, None),
            "http://localhost:8000"
        );
    }
}
