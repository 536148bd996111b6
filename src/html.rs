//! レンダリング済みHTMLからの値取り出し
//!
//! 要素が無い場合は空文字・空リスト・`None` に倒す。セレクタ自体の
//! 構文エラーだけを [`ScraperError::InvalidSelector`] として返す。

use html_scraper::{ElementRef, Html, Selector};

use crate::error::ScraperError;

pub fn parse_selector(selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector)
        .map_err(|e| ScraperError::InvalidSelector(format!("{}: {:?}", selector, e)))
}

pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// textContent を trim したもの
pub fn text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// 連続する空白を1つにまとめて trim したもの
pub fn clean_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn first<'a>(
    scope: ElementRef<'a>,
    selector: &str,
) -> Result<Option<ElementRef<'a>>, ScraperError> {
    let sel = parse_selector(selector)?;
    Ok(scope.select(&sel).next())
}

pub fn all<'a>(scope: ElementRef<'a>, selector: &str) -> Result<Vec<ElementRef<'a>>, ScraperError> {
    let sel = parse_selector(selector)?;
    Ok(scope.select(&sel).collect())
}

/// 最初の一致要素の trim 済みテキスト（無ければ空文字）
pub fn select_text(scope: ElementRef<'_>, selector: &str) -> Result<String, ScraperError> {
    Ok(first(scope, selector)?.map(text).unwrap_or_default())
}

/// 最初の一致要素の clean text（無い・空なら `None`）
pub fn select_clean_text(
    scope: ElementRef<'_>,
    selector: &str,
) -> Result<Option<String>, ScraperError> {
    Ok(first(scope, selector)?
        .map(clean_text)
        .filter(|s| !s.is_empty()))
}

/// 最初の一致要素の属性値（無ければ空文字）
pub fn select_attr(
    scope: ElementRef<'_>,
    selector: &str,
    attr: &str,
) -> Result<String, ScraperError> {
    Ok(first(scope, selector)?
        .and_then(|el| el.value().attr(attr))
        .unwrap_or_default()
        .to_string())
}

/// 件数表記を数値にする
///
/// `1,234` / `1.2k` / `3m` のような GitHub の表記を受け付ける。
/// 読めなければ 0。
pub fn parse_count(text: &str) -> u64 {
    let Some(start) = text.find(|c: char| c.is_ascii_digit()) else {
        return 0;
    };
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
        .unwrap_or(rest.len());
    let number: String = rest[..end].chars().filter(|c| *c != ',').collect();

    let multiplier = match rest[end..].chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('k') => 1_000.0,
        Some('m') => 1_000_000.0,
        Some('b') => 1_000_000_000.0,
        _ => 1.0,
    };

    number
        .trim_end_matches('.')
        .parse::<f64>()
        .map(|n| (n * multiplier).round() as u64)
        .unwrap_or(0)
}

/// 最初の一致要素のテキストを件数として読む（無ければ 0）
pub fn select_count(scope: ElementRef<'_>, selector: &str) -> Result<u64, ScraperError> {
    Ok(first(scope, selector)?
        .map(|el| parse_count(&text(el)))
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("42"), 42);
        assert_eq!(parse_count("1,234 followers"), 1234);
        assert_eq!(parse_count("1.2k"), 1200);
        assert_eq!(parse_count("  3m "), 3_000_000);
        assert_eq!(parse_count("People 17"), 17);
        assert_eq!(parse_count("12 members"), 12);
        assert_eq!(parse_count("none"), 0);
        assert_eq!(parse_count(""), 0);
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        let doc = parse_document("<p id='d'>\n  A   fast\n\t  tool  </p>");
        let el = first(doc.root_element(), "#d").unwrap().unwrap();
        assert_eq!(clean_text(el), "A fast tool");
        assert_eq!(text(el), "A   fast\n\t  tool");
    }

    #[test]
    fn test_missing_elements_fall_back() {
        let doc = parse_document("<div><a href='/x'>x</a></div>");
        let root = doc.root_element();
        assert_eq!(select_text(root, "span.missing").unwrap(), "");
        assert_eq!(select_attr(root, "img", "src").unwrap(), "");
        assert_eq!(select_clean_text(root, "p").unwrap(), None);
        assert_eq!(select_count(root, "a[href$='/people']").unwrap(), 0);
        assert_eq!(select_attr(root, "a", "href").unwrap(), "/x");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = parse_document("<div></div>");
        let result = select_text(doc.root_element(), "div[");
        assert!(matches!(result, Err(ScraperError::InvalidSelector(_))));
    }
}
