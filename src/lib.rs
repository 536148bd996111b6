//! GitHub プロフィールスクレイパー
//!
//! - ヘッドレス Chromium でプロフィールページを開き、Organization / ユーザーを判定
//! - レンダリング済みHTMLから CSS セレクタでプロフィール情報を抽出
//! - 必要に応じてリポジトリ一覧をページ送りしながら取得
//!
//! # 使用例
//!
//! ```rust,ignore
//! use github_scraper::{ScrapeRequest, ScraperConfig, ScraperService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = ScraperService::new(ScraperConfig::default());
//!
//!     let request = ScrapeRequest::new("rust-lang").with_repositories(true);
//!
//!     let report = service.call(request).await.unwrap();
//!     println!("{}", report.to_json_pretty().unwrap());
//! }
//! ```

pub mod browser;
pub mod config;
pub mod error;
pub mod github;
pub mod html;
pub mod organization;
pub mod repositories;
pub mod service;
pub mod traits;
pub mod types;
pub mod user;

// 主要な型をリエクスポート
pub use config::ScraperConfig;
pub use error::ScraperError;
pub use github::{scrape_profile, GithubScraper};
pub use service::{ScrapeRequest, ScraperService};
pub use traits::{PageDriver, Scraper};
pub use types::{OrgInfo, OrganizationLink, Profile, ProfileKind, RepoInfo, ScrapeReport, UserInfo};
