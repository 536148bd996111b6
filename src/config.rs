use std::time::Duration;

use crate::error::ScraperError;

pub const DEFAULT_BASE_URL: &str = "https://github.com";

/// ページ送りの上限（無限ループ防止）
pub const DEFAULT_MAX_PAGES: u32 = 50;
pub const DEFAULT_CLICK_RETRIES: u32 = 3;

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub headless: bool,
    /// Chrome 実行ファイル（未指定なら chromiumoxide の自動検出）
    pub chrome_path: Option<String>,
    pub max_pages: u32,
    pub click_retries: u32,
    pub retry_delay: Duration,
    /// 「次へ」クリック後のナビゲーション待機上限
    pub navigation_timeout: Duration,
    /// リポジトリ一覧の途中で失敗しても取得済み分を返す
    pub keep_partial_on_error: bool,
    pub debug: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            chrome_path: None,
            max_pages: DEFAULT_MAX_PAGES,
            click_retries: DEFAULT_CLICK_RETRIES,
            retry_delay: Duration::from_secs(2),
            navigation_timeout: Duration::from_secs(15),
            keep_partial_on_error: false,
            debug: false,
        }
    }
}

impl ScraperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 環境変数から設定を読み込む
    ///
    /// - `HEADLESS` (`false` でヘッド付き)
    /// - `CHROME_PATH` / `CHROMIUM_PATH`
    /// - `MAX_PAGES`
    /// - `SCRAPER_DEBUG` (`true` でデバッグ)
    pub fn from_env() -> Result<Self, ScraperError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ScraperError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(headless) = lookup("HEADLESS") {
            config.headless = headless != "false";
        }

        config.chrome_path = lookup("CHROME_PATH").or_else(|| lookup("CHROMIUM_PATH"));

        if let Some(max_pages) = lookup("MAX_PAGES") {
            config.max_pages = max_pages.trim().parse().map_err(|_| {
                ScraperError::Config(format!("MAX_PAGES が数値ではありません: {}", max_pages))
            })?;
        }

        if let Some(debug) = lookup("SCRAPER_DEBUG") {
            config.debug = debug == "true";
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_chrome_path(mut self, path: impl Into<String>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_click_retries(mut self, retries: u32) -> Self {
        self.click_retries = retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn with_keep_partial_on_error(mut self, keep: bool) -> Self {
        self.keep_partial_on_error = keep;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
