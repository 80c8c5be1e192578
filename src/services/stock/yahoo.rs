//! Yahoo Finance 行情接口实现
//!
//! 对接 quoteSummary 接口: https://query1.finance.yahoo.com/v10/finance/quoteSummary/<symbol>
//! 请求前需要先建立会话 Cookie 并获取 crumb

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use url::Url;

use super::QuoteProvider;
use crate::config::{ApiConfig, ProviderConfig};
use crate::error::LookupError;
use crate::models::{QuoteInfo, TickerSymbol};

/// 请求的模块，顺序即合并优先级（先出现的字段优先）
const MODULES: [&str; 3] = ["price", "summaryDetail", "quoteType"];

/// quoteSummary 响应外层结构
#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryBody,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    result: Option<Vec<Map<String, Value>>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: Option<String>,
    description: Option<String>,
}

impl YahooError {
    fn is_not_found(&self) -> bool {
        self.code.as_deref() == Some("Not Found")
    }

    fn describe(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "未知错误".to_string())
    }
}

/// Yahoo Finance 数据源
pub struct YahooQuoteProvider {
    client: Client,
    base_url: Url,
    crumb_url: String,
    cookie_url: String,
    // crumb 与会话 Cookie 绑定，收到 401/403 时清空
    crumb: Mutex<Option<String>>,
}

impl YahooQuoteProvider {
    pub fn new(provider: &ProviderConfig, api: &ApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(provider.user_agent.as_str())
            .cookie_store(true)
            .gzip(true)
            .timeout(api.timeout())
            .connect_timeout(api.connect_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: provider.base_url()?,
            crumb_url: provider.crumb_url.clone(),
            cookie_url: provider.cookie_url.clone(),
            crumb: Mutex::new(None),
        })
    }

    /// 获取 crumb，已缓存则直接返回
    async fn crumb(&self) -> Result<String, LookupError> {
        let mut cached = self.crumb.lock().await;
        if let Some(ref crumb) = *cached {
            return Ok(crumb.clone());
        }

        // 只为拿到 Set-Cookie，状态码通常是 404，忽略
        debug!("请求会话 Cookie URL: {}", self.cookie_url);
        self.client.get(&self.cookie_url).send().await?;

        debug!("请求 crumb URL: {}", self.crumb_url);
        let response = self.client.get(&self.crumb_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::UpstreamUnavailable(format!(
                "获取 crumb 失败: {}",
                status
            )));
        }

        let crumb = response.text().await?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(LookupError::UpstreamUnavailable("crumb 响应无效".to_string()));
        }

        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    fn summary_url(&self, symbol: &TickerSymbol, crumb: &str) -> Result<Url, LookupError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::UpstreamUnavailable("base_url 无效".to_string()))?
            .pop_if_empty()
            .extend(["v10", "finance", "quoteSummary", symbol.as_str()]);
        url.query_pairs_mut()
            .append_pair("modules", &MODULES.join(","))
            .append_pair("crumb", crumb);
        Ok(url)
    }
}

#[async_trait]
impl QuoteProvider for YahooQuoteProvider {
    async fn fetch_info(&self, symbol: &TickerSymbol) -> Result<QuoteInfo, LookupError> {
        let crumb = self.crumb().await?;
        let url = self.summary_url(symbol, &crumb)?;

        debug!("请求 quoteSummary URL: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("Yahoo 拒绝请求 ({})，清空 crumb 缓存", status);
            self.crumb.lock().await.take();
            return Err(LookupError::UpstreamUnavailable(format!(
                "数据源拒绝请求: {}",
                status
            )));
        }

        let body = response.bytes().await?;
        parse_quote_summary(symbol, status, &body)
    }
}

/// 解析 quoteSummary 响应并合并为扁平元数据
fn parse_quote_summary(
    symbol: &TickerSymbol,
    status: StatusCode,
    body: &[u8],
) -> Result<QuoteInfo, LookupError> {
    if status == StatusCode::NOT_FOUND {
        return Err(LookupError::SymbolNotFound(symbol.to_string()));
    }

    if !status.is_success() {
        let detail = serde_json::from_slice::<SummaryEnvelope>(body)
            .ok()
            .and_then(|e| e.quote_summary.error)
            .map(|e| e.describe());
        return Err(LookupError::UpstreamUnavailable(match detail {
            Some(detail) => format!("HTTP {}: {}", status, detail),
            None => format!("HTTP {}", status),
        }));
    }

    let envelope: SummaryEnvelope = serde_json::from_slice(body)?;

    if let Some(error) = envelope.quote_summary.error {
        if error.is_not_found() {
            return Err(LookupError::SymbolNotFound(symbol.to_string()));
        }
        return Err(LookupError::UpstreamUnavailable(error.describe()));
    }

    let result = envelope
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| LookupError::MalformedResponse("缺少 quoteSummary.result".to_string()))?;

    Ok(flatten_modules(result))
}

/// 将各模块字段合并到同一层级
fn flatten_modules(result: Map<String, Value>) -> QuoteInfo {
    let mut info = QuoteInfo::new();

    for module in MODULES {
        let Some(Value::Object(fields)) = result.get(module) else {
            continue;
        };
        for (key, value) in fields {
            if info.contains_key(key) {
                continue;
            }
            if let Some(value) = flatten_value(value) {
                info.insert(key.clone(), value);
            }
        }
    }

    info
}

/// {"raw": x, "fmt": ".."} 取 raw；null 与空对象视为缺失
fn flatten_value(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(obj) if obj.is_empty() => None,
        Value::Object(obj) if obj.contains_key("raw") => match obj.get("raw") {
            Some(Value::Null) | None => None,
            Some(raw) => Some(raw.clone()),
        },
        other => Some(other.clone()),
    }
}
