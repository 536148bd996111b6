//! GitHub プロフィールスクレイパー
//!
//! 実行方法:
//! ```
//! PERMALINK=rust-lang WITH_REPOS=true cargo run --example scrape_profile
//! ```
//!
//! `HEADLESS=false` でブラウザを表示、`SCRAPER_DEBUG=true` でデバッグログ。

use github_scraper::{ScrapeRequest, ScraperConfig, ScraperService};
use tower::Service;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // .envがあれば読み込む
    let _ = dotenvy::dotenv();

    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let result = async {
        let config = ScraperConfig::from_env()?;
        let request = ScrapeRequest::from_env()?;
        let mut service = ScraperService::new(config);
        service.call(request).await
    }
    .await;

    match result {
        Ok(report) => match report.to_json_pretty() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                tracing::error!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            tracing::error!("Error scraping GitHub: {}", e);
            std::process::exit(1);
        }
    }
}
