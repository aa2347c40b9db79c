use crate::error::{BugakariError, Result};
use bugakari_common::matcher::DEFAULT_THRESHOLD;
use bugakari_common::{CategoryFilter, MatchOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 0-100（読み込み時点では範囲外もあり得る）
    pub threshold: i64,
    pub category_filter: CategoryFilter,
    /// 歩掛カテゴリ辞書CSV
    pub keyword_map: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: i64::from(DEFAULT_THRESHOLD),
            category_filter: CategoryFilter::Both,
            keyword_map: None,
        }
    }
}

impl Config {
    /// 検証済みの設定を読み込む（照合系コマンド用）
    pub fn load() -> Result<Self> {
        let config = Self::read_from(&Self::config_path()?)?;
        config.validate()?;
        Ok(config)
    }

    /// 編集用に読み込む
    ///
    /// 値が不正でもそのまま返す。ファイル自体が読めなければ既定値から始める。
    pub fn load_for_edit() -> Result<Self> {
        let config_path = Self::config_path()?;
        match Self::read_from(&config_path) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "config unreadable, starting from defaults");
                println!("⚠ 設定ファイルを読み込めないため既定値から編集します: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// ファイルがなければ既定値
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
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
            .ok_or_else(|| BugakariError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("bugakari").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        MatchOptions::new(self.category_filter, self.threshold).map_err(|e| {
            BugakariError::Config(format!(
                "{} (`bugakari config --set-threshold N` で修正してください)",
                e
            ))
        })?;
        Ok(())
    }

    /// CLI指定で上書きした照合オプション
    pub fn match_options(&self, filter: Option<CategoryFilter>, threshold: Option<u8>) -> Result<MatchOptions> {
        let filter = filter.unwrap_or(self.category_filter);
        let threshold = threshold.map(i64::from).unwrap_or(self.threshold);
        Ok(MatchOptions::new(filter, threshold)?)
    }

    /// 閾値を検証して反映（保存はしない）
    pub fn apply_threshold(&mut self, threshold: i64) -> Result<()> {
        let options = MatchOptions::new(self.category_filter, threshold)?;
        self.threshold = i64::from(options.threshold);
        Ok(())
    }

    pub fn set_threshold(&mut self, threshold: i64) -> Result<()> {
        self.apply_threshold(threshold)?;
        self.save()
    }

    pub fn set_filter(&mut self, mode: &str) -> Result<()> {
        self.category_filter = mode.parse()?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.threshold, 85);
        assert_eq!(config.category_filter, CategoryFilter::Both);
        assert!(config.keyword_map.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"category_filter":"borkind"}"#).unwrap();
        assert_eq!(config.threshold, 85);
        assert_eq!(config.category_filter, CategoryFilter::Borkind);
    }

    #[test]
    fn test_filter_mode_is_case_insensitive_in_json() {
        let config: Config = serde_json::from_str(r#"{"category_filter":"Both"}"#).unwrap();
        assert_eq!(config.category_filter, CategoryFilter::Both);

        let saved = serde_json::to_string(&config).unwrap();
        assert!(saved.contains(r#""category_filter":"both""#));
    }

    #[test]
    fn test_match_options_override() {
        let config = Config::default();
        let options = config.match_options(Some(CategoryFilter::Either), Some(70)).unwrap();
        assert_eq!(options.filter, CategoryFilter::Either);
        assert_eq!(options.threshold, 70);

        let options = config.match_options(None, None).unwrap();
        assert_eq!(options.filter, CategoryFilter::Both);
        assert_eq!(options.threshold, 85);
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let config = Config {
            threshold: 150,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(BugakariError::Config(_))));
        assert!(config.match_options(None, None).is_err());
        // CLI指定があれば設定値は使わない
        assert!(config.match_options(None, Some(90)).is_ok());
    }

    /// 範囲外の閾値が保存されていても読み込んで修正できる
    #[test]
    fn test_invalid_saved_threshold_can_be_repaired() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bugakari").join("config.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"threshold":150,"category_filter":"Either"}"#).unwrap();

        let mut config = Config::read_from(&path).unwrap();
        assert_eq!(config.threshold, 150);
        assert!(config.validate().is_err());

        assert!(config.apply_threshold(300).is_err());
        assert_eq!(config.threshold, 150);
        config.apply_threshold(85).unwrap();
        config.save_to(&path).unwrap();

        let reloaded = Config::read_from(&path).unwrap();
        assert!(reloaded.validate().is_ok());
        assert_eq!(reloaded.threshold, 85);
        assert_eq!(reloaded.category_filter, CategoryFilter::Either);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::read_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, Config::default());
    }
}
