//! 股票数据服务模块
//!
//! 定义行情数据源抽象，当前实现为 Yahoo Finance

pub mod yahoo;

use async_trait::async_trait;

use crate::error::LookupError;
use crate::models::{QuoteInfo, TickerSymbol};

pub use yahoo::YahooQuoteProvider;

/// 行情数据源
///
/// 给定规范化的股票代码，返回该标的的扁平化元数据
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_info(&self, symbol: &TickerSymbol) -> Result<QuoteInfo, LookupError>;
}
