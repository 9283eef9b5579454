use crate::error::{MealScanError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const API_URL_ENV: &str = "MEALSCAN_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub max_image_size: u32,
    /// 한글 TTF 폰트 (없으면 PDF는 영문 라벨)
    pub font_path: Option<PathBuf>,
    pub report_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".into(),
            timeout_seconds: 60,
            max_image_size: 1280,
            font_path: None,
            report_title: "한끼스캔 분석 결과".into(),
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
            .ok_or_else(|| MealScanError::Config("홈 디렉터리를 찾을 수 없습니다".into()))?;
        Ok(home.join(".config").join("mealscan").join("config.json"))
    }

    /// 환경 변수를 우선
    pub fn api_base_url(&self) -> String {
        self.resolve_api_base_url(std::env::var(API_URL_ENV).ok().as_deref())
    }

    fn resolve_api_base_url(&self, env_url: Option<&str>) -> String {
        match env_url.map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => self.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn set_api_base_url(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(MealScanError::Config(format!(
                "API 주소는 http:// 또는 https:// 로 시작해야 합니다: {}",
                url
            )));
        }
        self.api_base_url = url;
        self.save()
    }

    pub fn set_font_path(&mut self, path: PathBuf) -> Result<()> {
        if !path.exists() {
            return Err(MealScanError::FileNotFound(path.display().to_string()));
        }
        self.font_path = Some(path);
        self.save()
    }
}
