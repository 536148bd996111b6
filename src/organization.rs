//! Organization プロフィールの抽出

use crate::error::ScraperError;
use crate::html;
use crate::repositories::RepoListing;
use crate::types::{OrgInfo, ProfileKind};

/// プロフィールページが Organization かどうかの目印
pub const ORG_MARKER_SELECTOR: &str =
    "div.application-main main div[itemtype='http://schema.org/Organization']";

pub const ORG_REPO_LISTING: RepoListing = RepoListing {
    kind: ProfileKind::Organization,
    item: "ul[data-listview-component='items-list'] li",
    name_link: "h4 a",
    description: r#"div[class^="Description-"]"#,
    docs_pulls: Some(r#"a[href$="/docs/pulls"]"#),
    next_page: r#"a[rel="next"]:not([aria-disabled="true"])"#,
};

/// レンダリング済みHTMLが Organization のページか
pub fn is_organization_page(page_html: &str) -> Result<bool, ScraperError> {
    let doc = html::parse_document(page_html);
    Ok(html::first(doc.root_element(), ORG_MARKER_SELECTOR)?.is_some())
}

/// Organization の基本情報を抽出
pub fn extract_org_info(page_html: &str) -> Result<OrgInfo, ScraperError> {
    let doc = html::parse_document(page_html);
    let root = doc.root_element();

    let top_languages = html::all(root, "a > span > span[itemprop='programmingLanguage']")?
        .into_iter()
        .map(html::text)
        .filter(|lang| !lang.is_empty())
        .collect();

    // 外部SNSリンクのみ（github.com 内のリンクは除外）
    let social_links = html::all(
        root,
        r#"a[href^="http"].Link--primary:not([itemprop="url"])"#,
    )?
    .into_iter()
    .filter_map(|link| link.value().attr("href"))
    .filter(|href| !href.is_empty() && !href.contains("github.com"))
    .map(str::to_string)
    .collect();

    Ok(OrgInfo {
        name: html::select_text(root, "div.application-main main header h1")?,
        pic_image_url: html::select_attr(root, "div.application-main main header img", "src")?,
        description: html::select_text(root, "div.application-main main header h1 + div div")?,
        top_languages,
        people_count: html::select_count(root, r#"a[href$="/people"]"#)?,
        followers: html::select_count(root, r#"a[href$="/followers"]"#)?,
        location: html::select_text(root, r#"li span[itemprop="location"]"#)?,
        website: html::select_attr(root, r#"li a[href^="http"][itemprop="url"]"#, "href")?,
        social_links,
        repositories: None,
        total_repositories_count: None,
    })
}
