use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::github::GithubScraper;
use crate::traits::Scraper;
use crate::types::{ProfileKind, ScrapeReport};

/// スクレイピングリクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    /// `https://github.com/{permalink}` のユーザー名 / Organization 名
    pub permalink: String,
    pub with_repositories: bool,
    /// 種別を固定する（`None` ならページから判定）
    pub kind: Option<ProfileKind>,
}

impl ScrapeRequest {
    pub fn new(permalink: impl Into<String>) -> Self {
        Self {
            permalink: permalink.into(),
            with_repositories: false,
            kind: None,
        }
    }

    /// `PERMALINK` と `WITH_REPOS` からリクエストを作る
    pub fn from_env() -> Result<Self, ScraperError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ScraperError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let permalink = lookup("PERMALINK")
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                ScraperError::Config("PERMALINK 環境変数が設定されていません".into())
            })?;
        let with_repositories = lookup("WITH_REPOS").as_deref() == Some("true");

        Ok(Self::new(permalink.trim()).with_repositories(with_repositories))
    }

    pub fn with_repositories(mut self, with_repositories: bool) -> Self {
        self.with_repositories = with_repositories;
        self
    }

    pub fn with_kind(mut self, kind: ProfileKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// tower::Serviceを実装したスクレイパーサービス
///
/// リクエストごとにブラウザを起動し、終了後に閉じる。
#[derive(Debug, Clone, Default)]
pub struct ScraperService {
    config: ScraperConfig,
}

impl ScraperService {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }
}

impl Service<ScrapeRequest> for ScraperService {
    type Response = ScrapeReport;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ScrapeRequest) -> Self::Future {
        info!(
            "Scrape request received: permalink={}, with_repositories={}",
            req.permalink, req.with_repositories
        );
        let config = self.config.clone();

        Box::pin(async move {
            let mut scraper = GithubScraper::new(config);
            let report = scraper.execute(&req).await?;

            info!(
                "Scrape completed: permalink={}, kind={:?}, repositories={}",
                report.permalink,
                report.profile.kind(),
                report.profile.repositories().map_or(0, <[_]>::len)
            );

            Ok(report)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_scrape_request_builder() {
        let req = ScrapeRequest::new("rust-lang")
            .with_repositories(true)
            .with_kind(ProfileKind::Organization);

        assert_eq!(req.permalink, "rust-lang");
        assert!(req.with_repositories);
        assert_eq!(req.kind, Some(ProfileKind::Organization));
    }

    #[test]
    fn test_scrape_request_from_lookup() {
        let env: HashMap<&str, &str> = [("PERMALINK", " octocat "), ("WITH_REPOS", "true")]
            .into_iter()
            .collect();
        let req = ScrapeRequest::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(req, ScrapeRequest::new("octocat").with_repositories(true));
    }

    #[test]
    fn test_with_repos_requires_literal_true() {
        let req = ScrapeRequest::from_lookup(|k| match k {
            "PERMALINK" => Some("octocat".into()),
            "WITH_REPOS" => Some("1".into()),
            _ => None,
        })
        .unwrap();
        assert!(!req.with_repositories);
    }

    #[test]
    fn test_missing_permalink() {
        let result = ScrapeRequest::from_lookup(|_| None);
        assert!(matches!(result, Err(ScraperError::Config(_))));
    }
}
