//! 股票数据模型
//!
//! 定义股票代码与行情摘要的数据结构

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LookupError;

/// 允许的代码字符：字母数字以及 Yahoo 使用的 . - ^ = _
static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9.\-^=_]{1,32}$").expect("symbol regex"));

/// 数据源返回的扁平化元数据
pub type QuoteInfo = Map<String, Value>;

/// 规范化后的股票代码（去除首尾空白并转为大写）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerSymbol(String);

impl TickerSymbol {
    /// 从原始输入构造股票代码
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let normalized = raw.trim().to_uppercase();
        if !SYMBOL_RE.is_match(&normalized) {
            return Err(LookupError::InvalidSymbol(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 股票行情摘要
///
/// 字段缺失时序列化为 null，而不是省略
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    /// 股票代码（大写）
    pub symbol: String,
    /// 公司全称
    pub long_name: Option<String>,
    /// 当前市价
    pub regular_market_price: Option<f64>,
    /// 股息率
    pub dividend_yield: Option<f64>,
}

impl QuoteSummary {
    /// 从元数据中挑选需要的字段，类型不符的字段视为缺失
    pub fn from_info(symbol: &TickerSymbol, info: &QuoteInfo) -> Self {
        Self {
            symbol: symbol.to_string(),
            long_name: info
                .get("longName")
                .and_then(Value::as_str)
                .map(str::to_string),
            regular_market_price: info.get("regularMarketPrice").and_then(Value::as_f64),
            dividend_yield: info.get("dividendYield").and_then(Value::as_f64),
        }
    }
}
