use crate::error::{ReconError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const TOKEN_ENV: &str = "RECON_ACCESS_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 台帳の主シート
    pub sheet_name: String,
    pub track_column: String,
    pub cover_column: String,
    /// リリースの判定に使う列（先に空でない値が見つかった列を採用）
    pub group_columns: Vec<String>,
    /// レポートの出力先
    pub results_dir: PathBuf,
    pub access_token: Option<String>,
    /// 照合の並列実行
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_name: "Лист1".into(),
            track_column: "track (titel)".into(),
            cover_column: "cover (titel)".into(),
            group_columns: vec!["upc".into(), "name".into()],
            results_dir: PathBuf::from("results"),
            access_token: None,
            parallel: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReconError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("manifest-recon").join("config.json"))
    }

    /// アクセストークン（環境変数を優先）
    pub fn access_token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.access_token.clone())
    }

    pub fn set_access_token(&mut self, token: String) -> Result<()> {
        self.access_token = Some(token);
        self.save()
    }
}

/// 表示用に伏せ字にする（先頭4文字のみ残す）
pub fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    if token.chars().count() <= 4 {
        return "****".into();
    }
    format!("{}****", visible)
}
