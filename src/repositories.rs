//! リポジトリ一覧のページ送り
//!
//! 各ページは正規のURLで開き直し、「次へ」リンクのクリックでページが
//! 進むことを確認してから次のページ番号へ進む。

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::html;
use crate::traits::PageDriver;
use crate::types::{ProfileKind, RepoInfo};

/// リポジトリ一覧ページのレイアウト
#[derive(Debug, Clone, Copy)]
pub struct RepoListing {
    pub kind: ProfileKind,
    pub item: &'static str,
    pub name_link: &'static str,
    pub description: &'static str,
    pub docs_pulls: Option<&'static str>,
    pub next_page: &'static str,
}

const LANGUAGE_SELECTOR: &str = r#"span[itemprop="programmingLanguage"]"#;
const STARS_SELECTOR: &str = r#"a[href$="/stargazers"]"#;
const FORKS_SELECTOR: &str = r#"a[href$="/forks"]"#;

impl RepoListing {
    pub fn page_url(&self, base_url: &str, owner: &str, page: u32) -> String {
        match (self.kind, page) {
            (ProfileKind::Organization, 1) => format!("{}/orgs/{}/repositories", base_url, owner),
            (ProfileKind::Organization, n) => {
                format!("{}/orgs/{}/repositories?page={}", base_url, owner, n)
            }
            (ProfileKind::User, 1) => format!("{}/{}?tab=repositories", base_url, owner),
            (ProfileKind::User, n) => {
                format!("{}/{}?page={}&tab=repositories", base_url, owner, n)
            }
        }
    }
}

/// 1ページ分のリポジトリを抽出（名前が空のものは除外）
pub fn parse_repositories(
    page_html: &str,
    listing: &RepoListing,
) -> Result<Vec<RepoInfo>, ScraperError> {
    let doc = html::parse_document(page_html);
    let items = html::all(doc.root_element(), listing.item)?;

    let mut repos = Vec::with_capacity(items.len());
    for item in items {
        let name = html::select_clean_text(item, listing.name_link)?.unwrap_or_default();
        if name.is_empty() {
            continue;
        }

        let docs_pulls = match listing.docs_pulls {
            Some(selector) => html::select_clean_text(item, selector)?,
            None => None,
        };

        repos.push(RepoInfo {
            name,
            link: html::select_attr(item, listing.name_link, "href")?,
            description: html::select_clean_text(item, listing.description)?,
            programming_language: html::select_clean_text(item, LANGUAGE_SELECTOR)?,
            stars: html::select_clean_text(item, STARS_SELECTOR)?,
            forks: html::select_clean_text(item, FORKS_SELECTOR)?,
            docs_pulls,
        });
    }

    Ok(repos)
}

/// 全ページのリポジトリを取得
pub async fn scrape_all_repos<D>(
    driver: &D,
    listing: &RepoListing,
    owner: &str,
    config: &ScraperConfig,
) -> Result<Vec<RepoInfo>, ScraperError>
where
    D: PageDriver + ?Sized,
{
    let mut repos = Vec::new();

    if let Err(e) = collect_pages(driver, listing, owner, config, &mut repos).await {
        if !config.keep_partial_on_error {
            return Err(e);
        }
        warn!(
            "Repository pagination interrupted, keeping {} repositories: {}",
            repos.len(),
            e
        );
    }

    info!("Total repositories scraped: {}", repos.len());
    Ok(repos)
}

async fn collect_pages<D>(
    driver: &D,
    listing: &RepoListing,
    owner: &str,
    config: &ScraperConfig,
    repos: &mut Vec<RepoInfo>,
) -> Result<(), ScraperError>
where
    D: PageDriver + ?Sized,
{
    let mut page_number = 1;

    while page_number <= config.max_pages {
        let url = listing.page_url(&config.base_url, owner, page_number);
        driver.goto(&url).await?;
        info!("Scraping repositories with page {}...", page_number);

        let page_html = driver.content().await?;
        let page_repos = parse_repositories(&page_html, listing)?;
        debug!("Page {}: {} repositories", page_number, page_repos.len());
        repos.extend(page_repos);

        if !driver.has_element(listing.next_page).await? {
            debug!("No next page link on page {}", page_number);
            break;
        }

        click_next_with_retry(driver, listing.next_page, config).await?;
        page_number += 1;
    }

    if page_number > config.max_pages {
        warn!("Reached page limit ({}), stopping", config.max_pages);
    }

    Ok(())
}

/// 「次へ」をクリック（エラーの種類を問わず固定間隔でリトライ）
async fn click_next_with_retry<D>(
    driver: &D,
    selector: &str,
    config: &ScraperConfig,
) -> Result<(), ScraperError>
where
    D: PageDriver + ?Sized,
{
    let attempts = config.click_retries.max(1);
    let mut attempt = 1;

    loop {
        match driver
            .click_and_wait(selector, config.navigation_timeout)
            .await
        {
            Ok(()) => return Ok(()),
            Err(e) if attempt < attempts => {
                warn!(
                    "Next page click attempt {}/{} failed, retrying in {:?}: {}",
                    attempt, attempts, config.retry_delay, e
                );
                sleep(config.retry_delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
