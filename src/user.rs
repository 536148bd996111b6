//! ユーザープロフィールの抽出

use crate::error::ScraperError;
use crate::html;
use crate::repositories::RepoListing;
use crate::types::{OrganizationLink, ProfileKind, UserInfo};

pub const USER_REPO_LISTING: RepoListing = RepoListing {
    kind: ProfileKind::User,
    item: "li[itemtype='http://schema.org/Code']",
    name_link: "h3 a",
    description: r#"p[itemprop="description"]"#,
    docs_pulls: None,
    next_page: r#"a[rel="next"]"#,
};

/// ユーザーの基本情報を抽出
pub fn extract_user_info(page_html: &str) -> Result<UserInfo, ScraperError> {
    let doc = html::parse_document(page_html);
    let root = doc.root_element();

    let mut organizations = Vec::new();
    for org in html::all(root, "div.border-top a[data-hovercard-type='organization']")? {
        organizations.push(OrganizationLink {
            name: org.value().attr("aria-label").unwrap_or_default().to_string(),
            link: org.value().attr("href").unwrap_or_default().to_string(),
            org_image_url: html::select_attr(org, "img", "src")?,
        });
    }

    Ok(UserInfo {
        name: html::select_text(
            root,
            "div.application-main main h1.vcard-names span.p-name",
        )?,
        nickname: html::select_text(
            root,
            "div.application-main main h1.vcard-names span.p-nickname",
        )?,
        pic_image_url: html::select_attr(
            root,
            "div.application-main main a img.avatar-user",
            "src",
        )?,
        followers: html::select_count(root, r#"a[href$="tab=followers"] span"#)?,
        following: html::select_count(root, r#"a[href$="tab=following"] span"#)?,
        location: html::select_text(root, r#"li[itemprop="homeLocation"]"#)?,
        website: html::select_attr(root, r#"li[itemprop="url"] a"#, "href")?,
        current_company: html::select_text(root, r#"li[itemprop="worksFor"]"#)?,
        position: html::select_text(root, "div.user-profile-bio > div")?,
        organizations,
        repositories: None,
        total_repositories_count: None,
    })
}
