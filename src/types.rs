//! プロフィール・リポジトリの型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// プロフィール種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Organization,
    User,
}

/// リポジトリ一覧の1件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoInfo {
    pub name: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programming_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_pulls: Option<String>,
}

/// Organization プロフィール
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgInfo {
    pub name: String,
    #[serde(rename = "picImageURL")]
    pub pic_image_url: String,
    pub description: String,
    pub top_languages: Vec<String>,
    pub people_count: u64,
    pub followers: u64,
    pub location: String,
    pub website: String,
    pub social_links: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repositories: Option<Vec<RepoInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_repositories_count: Option<usize>,
}

/// ユーザーが所属する Organization へのリンク
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationLink {
    pub name: String,
    pub link: String,
    #[serde(rename = "orgImageURL")]
    pub org_image_url: String,
}

/// ユーザープロフィール
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub name: String,
    pub nickname: String,
    #[serde(rename = "picImageURL")]
    pub pic_image_url: String,
    pub followers: u64,
    pub following: u64,
    pub location: String,
    pub website: String,
    pub current_company: String,
    pub position: String,
    pub organizations: Vec<OrganizationLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repositories: Option<Vec<RepoInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_repositories_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Profile {
    Organization(OrgInfo),
    User(UserInfo),
}

impl Profile {
    pub fn kind(&self) -> ProfileKind {
        match self {
            Profile::Organization(_) => ProfileKind::Organization,
            Profile::User(_) => ProfileKind::User,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Profile::Organization(org) => &org.name,
            Profile::User(user) => &user.name,
        }
    }

    pub fn repositories(&self) -> Option<&[RepoInfo]> {
        match self {
            Profile::Organization(org) => org.repositories.as_deref(),
            Profile::User(user) => user.repositories.as_deref(),
        }
    }

    /// リポジトリ一覧を付与し、件数も同時に設定する
    pub fn attach_repositories(&mut self, repos: Vec<RepoInfo>) {
        let count = repos.len();
        let (repositories, total) = match self {
            Profile::Organization(org) => {
                (&mut org.repositories, &mut org.total_repositories_count)
            }
            Profile::User(user) => (&mut user.repositories, &mut user.total_repositories_count),
        };
        *repositories = Some(repos);
        *total = Some(count);
    }
}

/// スクレイプ結果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeReport {
    pub permalink: String,
    pub profile: Profile,
    pub scraped_at: DateTime<Utc>,
}

impl ScrapeReport {
    pub fn new(permalink: impl Into<String>, profile: Profile) -> Self {
        Self {
            permalink: permalink.into(),
            profile,
            scraped_at: Utc::now(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
