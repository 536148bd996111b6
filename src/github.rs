use async_trait::async_trait;
use tracing::{info, warn};

use crate::browser::{BrowserSession, ChromePage};
use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::organization::{extract_org_info, is_organization_page, ORG_REPO_LISTING};
use crate::repositories::scrape_all_repos;
use crate::service::ScrapeRequest;
use crate::traits::{PageDriver, Scraper};
use crate::types::{Profile, ProfileKind, ScrapeReport};
use crate::user::{extract_user_info, USER_REPO_LISTING};

/// プロフィールページを開いて種別判定・抽出し、必要ならリポジトリ一覧を辿る
pub async fn scrape_profile<D>(
    driver: &D,
    config: &ScraperConfig,
    request: &ScrapeRequest,
) -> Result<ScrapeReport, ScraperError>
where
    D: PageDriver + ?Sized,
{
    let permalink = request.permalink.trim();
    if permalink.is_empty() {
        return Err(ScraperError::Config("permalink が空です".into()));
    }

    let url = format!("{}/{}", config.base_url, permalink);
    info!("Scraping profile {}", url);
    driver.goto(&url).await?;

    let page_html = driver.content().await?;
    let kind = match request.kind {
        Some(kind) => kind,
        None if is_organization_page(&page_html)? => ProfileKind::Organization,
        None => ProfileKind::User,
    };
    info!("Profile kind: {:?}", kind);

    let (mut profile, listing) = match kind {
        ProfileKind::Organization => (
            Profile::Organization(extract_org_info(&page_html)?),
            &ORG_REPO_LISTING,
        ),
        ProfileKind::User => (
            Profile::User(extract_user_info(&page_html)?),
            &USER_REPO_LISTING,
        ),
    };

    if profile.name().is_empty() {
        warn!("Profile name not found on {}, markup may have changed", url);
        driver.debug_screenshot("Empty profile").await;
    }

    if request.with_repositories {
        let repos = scrape_all_repos(driver, listing, permalink, config).await?;
        profile.attach_repositories(repos);
    }

    Ok(ScrapeReport::new(permalink, profile))
}

/// ヘッドレス Chromium で GitHub をスクレイプする
pub struct GithubScraper {
    config: ScraperConfig,
    session: Option<BrowserSession>,
    page: Option<ChromePage>,
}

impl GithubScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config,
            session: None,
            page: None,
        }
    }

    fn get_page(&self) -> Result<&ChromePage, ScraperError> {
        self.page
            .as_ref()
            .ok_or_else(|| ScraperError::BrowserInit("ブラウザが初期化されていません".into()))
    }
}

#[async_trait]
impl Scraper for GithubScraper {
    async fn initialize(&mut self) -> Result<(), ScraperError> {
        let session = BrowserSession::launch(&self.config).await?;
        let page = session.new_page(self.config.debug).await?;

        self.session = Some(session);
        self.page = Some(page);
        Ok(())
    }

    async fn scrape(&mut self, request: &ScrapeRequest) -> Result<ScrapeReport, ScraperError> {
        let page = self.get_page()?;
        scrape_profile(page, &self.config, request).await
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        if let Some(page) = self.page.take() {
            page.close().await;
        }
        if let Some(session) = self.session.take() {
            session.close().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::tests::FakeDriver;
    use std::time::Duration;

    const BASE: &str = "https://gh.test";

    fn config() -> ScraperConfig {
        ScraperConfig::new()
            .with_base_url(BASE)
            .with_retry_delay(Duration::ZERO)
    }

    fn org_profile() -> String {
        r#"<div class="application-main"><main>
            <div itemtype="http://schema.org/Organization">
              <header><img src="/acme.png"><h1>Acme</h1><div><div>Tools</div></div></header>
            </div>
          </main></div>"#
            .to_string()
    }

    fn org_repos() -> String {
        r#"<ul data-listview-component="items-list">
             <li><h4><a href="/acme/anvil">anvil</a></h4></li>
             <li><h4><a href="/acme/rocket">rocket</a></h4></li>
           </ul>"#
            .to_string()
    }

    fn user_profile() -> String {
        r#"<div class="application-main"><main>
             <h1 class="vcard-names"><span class="p-name">Mona</span>
             <span class="p-nickname">mona</span></h1>
           </main></div>"#
            .to_string()
    }

    #[tokio::test]
    async fn test_scrape_organization_with_repositories() {
        let driver = FakeDriver::new(vec![
            (format!("{}/acme", BASE), org_profile()),
            (format!("{}/orgs/acme/repositories", BASE), org_repos()),
        ]);
        let request = ScrapeRequest::new("acme").with_repositories(true);

        let report = scrape_profile(&driver, &config(), &request).await.unwrap();

        assert_eq!(report.permalink, "acme");
        match report.profile {
            Profile::Organization(org) => {
                assert_eq!(org.name, "Acme");
                assert_eq!(org.description, "Tools");
                assert_eq!(org.total_repositories_count, Some(2));
                assert_eq!(org.repositories.unwrap()[1].name, "rocket");
            }
            Profile::User(_) => panic!("expected organization"),
        }
    }

    #[tokio::test]
    async fn test_scrape_user_without_repositories() {
        let driver = FakeDriver::new(vec![(format!("{}/mona", BASE), user_profile())]);
        let request = ScrapeRequest::new("mona");

        let report = scrape_profile(&driver, &config(), &request).await.unwrap();

        assert_eq!(report.profile.kind(), ProfileKind::User);
        assert_eq!(report.profile.name(), "Mona");
        assert!(report.profile.repositories().is_none());
        // 一覧ページには遷移しない
        assert_eq!(driver.visited.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_name_screenshot_taken_on_profile_page() {
        let profile_url = format!("{}/acme", BASE);
        let driver = FakeDriver::new(vec![
            (
                profile_url.clone(),
                r#"<div class="application-main"><main>
                     <div itemtype="http://schema.org/Organization"><header></header></div>
                   </main></div>"#
                    .to_string(),
            ),
            (format!("{}/orgs/acme/repositories", BASE), org_repos()),
        ]);
        let request = ScrapeRequest::new("acme").with_repositories(true);

        let report = scrape_profile(&driver, &config(), &request).await.unwrap();

        assert_eq!(report.profile.name(), "");
        assert_eq!(report.profile.repositories().map(<[_]>::len), Some(2));
        // 一覧ページへ移る前のプロフィールページで撮る
        assert_eq!(
            *driver.screenshots.lock().unwrap(),
            [("Empty profile".to_string(), profile_url)]
        );
    }

    #[tokio::test]
    async fn test_no_screenshot_when_name_found() {
        let driver = FakeDriver::new(vec![(format!("{}/mona", BASE), user_profile())]);

        scrape_profile(&driver, &config(), &ScrapeRequest::new("mona"))
            .await
            .unwrap();

        assert!(driver.screenshots.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_forced_kind_overrides_detection() {
        let driver = FakeDriver::new(vec![(format!("{}/acme", BASE), org_profile())]);
        let request = ScrapeRequest::new("acme").with_kind(ProfileKind::User);

        let report = scrape_profile(&driver, &config(), &request).await.unwrap();

        assert_eq!(report.profile.kind(), ProfileKind::User);
    }

    #[tokio::test]
    async fn test_empty_permalink_is_rejected() {
        let driver = FakeDriver::new(Vec::new());
        let result = scrape_profile(&driver, &config(), &ScrapeRequest::new("  ")).await;
        assert!(matches!(result, Err(ScraperError::Config(_))));
    }

    #[tokio::test]
    async fn test_navigation_error_propagates() {
        let driver = FakeDriver::new(Vec::new());
        let result = scrape_profile(&driver, &config(), &ScrapeRequest::new("ghost")).await;
        assert!(matches!(result, Err(ScraperError::Navigation(_))));
    }

    #[test]
    fn test_github_scraper_new() {
        let scraper = GithubScraper::new(ScraperConfig::default());
        assert!(scraper.session.is_none());
        assert!(scraper.page.is_none());
        assert!(scraper.get_page().is_err());
    }

    #[tokio::test]
    #[ignore] // 実環境テスト用: PERMALINK=rust-lang cargo test test_live_scrape -- --ignored --nocapture
    async fn test_live_scrape() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info,github_scraper=debug")
            .try_init();

        let request = ScrapeRequest::from_env().expect("PERMALINK not set");
        let mut scraper = GithubScraper::new(ScraperConfig::from_env().unwrap());

        let report = scraper.execute(&request).await.expect("scrape failed");
        println!("{}", report.to_json_pretty().unwrap());
        assert!(!report.profile.name().is_empty());
    }
}
