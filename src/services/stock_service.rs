use log::debug;

use crate::error::LookupError;
use crate::models::{QuoteInfo, QuoteSummary, TickerSymbol};
use crate::services::stock::QuoteProvider;

/// 查询股票行情摘要
///
/// 1. 规范化代码
/// 2. 从数据源获取元数据
/// 3. 校验 regularMarketPrice 是否存在
/// 4. 挑选 longName / regularMarketPrice / dividendYield
pub async fn get_quote_summary(
    provider: &dyn QuoteProvider,
    raw_symbol: &str,
) -> Result<QuoteSummary, LookupError> {
    let symbol = TickerSymbol::parse(raw_symbol)?;
    let info = provider.fetch_info(&symbol).await?;
    debug!("{} 元数据字段数: {}", symbol, info.len());

    if !has_market_price(&info) {
        return Err(LookupError::SymbolNotFound(symbol.to_string()));
    }

    Ok(QuoteSummary::from_info(&symbol, &info))
}

/// 判断元数据是否有效
///
/// Yahoo 对无效代码常返回不完整的数据，缺少 regularMarketPrice 键。
/// 这是观察到的行为而非文档约定，若数据源改变格式需要同步调整。
/// 只检查键是否存在，值为 null 时由摘要投影为 null。
pub fn has_market_price(info: &QuoteInfo) -> bool {
    info.contains_key("regularMarketPrice")
}
