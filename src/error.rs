use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("ブラウザ初期化エラー: {0}")]
    BrowserInit(String),

    #[error("ナビゲーションエラー: {0}")]
    Navigation(String),

    #[error("タイムアウト: {0}")]
    Timeout(String),

    #[error("要素が見つかりません: {0}")]
    ElementNotFound(String),

    #[error("JavaScript実行エラー: {0}")]
    JavaScript(String),

    #[error("不正なセレクタ: {0}")]
    InvalidSelector(String),

    #[error("JSONエラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("設定エラー: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScraperError::Navigation("net::ERR_NAME_NOT_RESOLVED".into());
        assert_eq!(
            err.to_string(),
            "ナビゲーションエラー: net::ERR_NAME_NOT_RESOLVED"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ScraperError::Config("PERMALINK 環境変数が設定されていません".into());
        assert!(err.to_string().starts_with("設定エラー: "));
    }
}
