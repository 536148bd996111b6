use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScraperError;
use crate::service::ScrapeRequest;
use crate::types::ScrapeReport;

/// スクレイパーが使うページ操作
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// URLへ遷移し、ネットワークが落ち着くまで待機
    async fn goto(&self, url: &str) -> Result<(), ScraperError>;

    /// 現在のレンダリング済みHTML
    async fn content(&self) -> Result<String, ScraperError>;

    /// セレクタに一致する要素があるか
    async fn has_element(&self, selector: &str) -> Result<bool, ScraperError>;

    /// 要素をクリックしてナビゲーション完了を待つ
    async fn click_and_wait(&self, selector: &str, timeout: Duration)
        -> Result<(), ScraperError>;

    /// 現在のページのスクリーンショットを残す（デバッグ用、既定では何もしない）
    async fn debug_screenshot(&self, _label: &str) {}
}

#[async_trait]
pub trait Scraper: Send + Sync {
    /// ブラウザ初期化
    async fn initialize(&mut self) -> Result<(), ScraperError>;

    /// プロフィール（と必要ならリポジトリ一覧）を取得
    async fn scrape(&mut self, request: &ScrapeRequest) -> Result<ScrapeReport, ScraperError>;

    /// リソース解放
    async fn close(&mut self) -> Result<(), ScraperError>;

    /// 一括実行（initialize → scrape → close）
    ///
    /// scrape が失敗してもブラウザは閉じる
    async fn execute(&mut self, request: &ScrapeRequest) -> Result<ScrapeReport, ScraperError> {
        self.initialize().await?;
        let result = self.scrape(request).await;
        self.close().await?;
        result
    }
}
