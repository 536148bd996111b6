//! chromiumoxide によるブラウザ操作

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::traits::PageDriver;

/// ネットワークアイドル待機のタイムアウト（ミリ秒）
const NETWORK_IDLE_TIMEOUT_MS: u64 = 30000;
/// ネットワークアイドル判定のインターバル（ミリ秒）
const NETWORK_IDLE_CHECK_INTERVAL_MS: u64 = 500;
/// ページ安定待機のタイムアウト（ミリ秒）
const PAGE_STABLE_TIMEOUT_MS: u64 = 10000;
const PAGE_STABLE_CHECK_INTERVAL_MS: u64 = 300;

/// 連続何回アイドル・安定と判定されたら完了とするか
const REQUIRED_IDLE_CHECKS: u32 = 3;
const REQUIRED_STABLE_CHECKS: u32 = 3;

/// 直近500ms以内に開始して未完了のリソースが無ければアイドル
const NETWORK_IDLE_SCRIPT: &str = r#"
    (() => {
        const entries = performance.getEntriesByType('resource');
        const now = performance.now();
        const recentRequests = entries.filter(e => {
            return (now - e.startTime) < 500 && e.duration === 0;
        });
        return recentRequests.length === 0;
    })()
"#;

/// 起動中のブラウザ
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    pub async fn launch(config: &ScraperConfig) -> Result<Self, ScraperError> {
        info!("Launching browser (headless={})...", config.headless);

        let mut builder = BrowserConfig::builder()
            .window_size(1280, 800)
            .no_sandbox()
            .request_timeout(Duration::from_secs(60))
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu");

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(path) = &config.chrome_path {
            builder = builder.chrome_executable(path);
        }

        if config.debug {
            builder = builder.arg("--enable-logging=stderr").arg("--v=1");
        }

        let browser_config = builder
            .build()
            .map_err(|e| ScraperError::BrowserInit(format!("ブラウザ設定エラー: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // ブラウザイベントハンドラをバックグラウンドで実行
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        info!("Browser launched");
        Ok(Self { browser, handler })
    }

    pub async fn new_page(&self, debug: bool) -> Result<ChromePage, ScraperError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;
        Ok(ChromePage { page, debug })
    }

    pub async fn close(mut self) -> Result<(), ScraperError> {
        info!("Closing browser...");
        if let Err(e) = self.browser.close().await {
            debug!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();
        info!("Browser closed");
        Ok(())
    }
}

/// chromiumoxide のページ
pub struct ChromePage {
    page: Page,
    debug: bool,
}

impl ChromePage {
    pub async fn close(self) {
        if let Err(e) = self.page.close().await {
            debug!("Failed to close page: {}", e);
        }
    }

    /// ネットワークリクエストがアイドル状態になるまで待機
    async fn wait_request_idle(&self) -> Result<(), ScraperError> {
        debug!("Waiting for network to become idle...");
        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(NETWORK_IDLE_TIMEOUT_MS);
        let mut idle_count = 0;

        while start.elapsed() < timeout {
            match self.page.evaluate(NETWORK_IDLE_SCRIPT).await {
                Ok(val) => {
                    if val.into_value::<bool>().unwrap_or(false) {
                        idle_count += 1;
                        if idle_count >= REQUIRED_IDLE_CHECKS {
                            debug!(
                                "Network idle after {:?} ({} consecutive checks)",
                                start.elapsed(),
                                idle_count
                            );
                            return Ok(());
                        }
                    } else {
                        idle_count = 0;
                    }
                }
                Err(e) => {
                    debug!("Network idle check error: {}", e);
                    idle_count = 0;
                }
            }

            sleep(Duration::from_millis(NETWORK_IDLE_CHECK_INTERVAL_MS)).await;
        }

        warn!(
            "Network idle timeout after {:?}, proceeding anyway",
            start.elapsed()
        );
        Ok(())
    }

    /// DOM が安定するまで待機（outerHTML の長さが連続で変わらない）
    async fn wait_stable(&self) -> Result<(), ScraperError> {
        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(PAGE_STABLE_TIMEOUT_MS);
        let mut last_html_len: Option<usize> = None;
        let mut stable_count = 0;

        while start.elapsed() < timeout {
            match self
                .page
                .evaluate("document.documentElement.outerHTML.length")
                .await
            {
                Ok(val) => {
                    let current_len = val.into_value::<usize>().unwrap_or(0);
                    match last_html_len {
                        Some(last) if last == current_len => {
                            stable_count += 1;
                            if stable_count >= REQUIRED_STABLE_CHECKS {
                                debug!("Page stable after {:?}", start.elapsed());
                                return Ok(());
                            }
                        }
                        _ => stable_count = 0,
                    }
                    last_html_len = Some(current_len);
                }
                Err(e) => {
                    debug!("Page stable check error: {}", e);
                    stable_count = 0;
                }
            }

            sleep(Duration::from_millis(PAGE_STABLE_CHECK_INTERVAL_MS)).await;
        }

        warn!(
            "Page stable timeout after {:?}, proceeding anyway",
            start.elapsed()
        );
        Ok(())
    }
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn goto(&self, url: &str) -> Result<(), ScraperError> {
        debug!("Navigating to {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| ScraperError::Navigation(format!("{}: {}", url, e)))?;

        self.wait_request_idle().await?;
        self.wait_stable().await
    }

    async fn content(&self) -> Result<String, ScraperError> {
        self.page
            .content()
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))
    }

    async fn has_element(&self, selector: &str) -> Result<bool, ScraperError> {
        let script = format!(
            "document.querySelector({}) !== null",
            serde_json::to_string(selector)?
        );
        let found = self
            .page
            .evaluate(script.as_str())
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        Ok(found.into_value::<bool>().unwrap_or(false))
    }

    async fn click_and_wait(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScraperError> {
        let navigation = async {
            self.page
                .find_element(selector)
                .await
                .map_err(|e| ScraperError::ElementNotFound(format!("{}: {}", selector, e)))?
                .click()
                .await
                .map_err(|e| ScraperError::Navigation(format!("{} のクリック: {}", selector, e)))?;

            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| ScraperError::Navigation(e.to_string()))?;
            Ok::<(), ScraperError>(())
        };

        tokio::time::timeout(timeout, navigation)
            .await
            .map_err(|_| {
                ScraperError::Timeout(format!(
                    "{} クリック後のナビゲーションが{:?}以内に完了しませんでした",
                    selector, timeout
                ))
            })?
    }

    /// フルページのスクリーンショットを base64 でログ出力（debug 設定時のみ）
    async fn debug_screenshot(&self, label: &str) {
        if !self.debug {
            return;
        }
        match self
            .page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
        {
            Ok(screenshot) => {
                use base64::Engine;
                let encoded = base64::engine::general_purpose::STANDARD.encode(&screenshot);
                debug!("{} screenshot: data:image/png;base64,{}", label, encoded);
            }
            Err(e) => debug!("Failed to capture screenshot: {}", e),
        }
    }
}
