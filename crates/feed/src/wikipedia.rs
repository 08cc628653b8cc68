use crate::http::status_error;
use async_trait::async_trait;
use radar_core::market::error::MarketError;
use radar_core::market::port::ConstituentSource;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

/// # Summary
/// 从 Wikipedia 的 "List of S&P 500 companies" 页面抓取成分股代码。
pub struct WikipediaConstituents {
    client: Client,
    url: String,
}

impl WikipediaConstituents {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

/// # Summary
/// 从页面 HTML 中提取成分股表第一列的代码。
///
/// # Logic
/// 1. 定位 `id="constituents"` 的表格。
/// 2. 逐行取第一个 `td` 的文本并去除空白；表头行没有 `td`，自然跳过。
///
/// # Returns
/// 原始代码列表；找不到表格或表格为空时返回 `MarketError::Parse`。
pub fn parse_constituents(html: &str) -> Result<Vec<String>, MarketError> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("table#constituents tbody tr")
        .map_err(|e| MarketError::Parse(format!("Invalid selector: {:?}", e)))?;
    let cell_selector =
        Selector::parse("td").map_err(|e| MarketError::Parse(format!("Invalid selector: {:?}", e)))?;

    let symbols: Vec<String> = document
        .select(&row_selector)
        .filter_map(|row| row.select(&cell_selector).next())
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if symbols.is_empty() {
        return Err(MarketError::Parse("Constituents table not found".into()));
    }
    Ok(symbols)
}

#[async_trait]
impl ConstituentSource for WikipediaConstituents {
    async fn fetch_symbols(&self) -> Result<Vec<String>, MarketError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let html = resp
            .text()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;
        // Html 不是 Send，解析必须在 await 之后同步完成
        let symbols = parse_constituents(&html)?;
        debug!(count = symbols.len(), "Index constituents fetched");
        Ok(symbols)
    }
}
