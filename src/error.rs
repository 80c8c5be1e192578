//! 错误类型定义
//!
//! 股票查询过程中可能出现的所有失败情况

use thiserror::Error;

/// 股票摘要查询错误
///
/// 对外统一映射为 404，但内部按原因区分，便于日志和排查
#[derive(Error, Debug)]
pub enum LookupError {
    /// 输入的股票代码格式不合法，未请求数据源
    #[error("股票代码格式无效: {0:?}")]
    InvalidSymbol(String),

    /// 数据源未识别该股票代码（或返回数据缺少 regularMarketPrice）
    #[error("股票代码 {0} 无效或未找到关键数据")]
    SymbolNotFound(String),

    /// 网络错误、超时、非成功状态码或 crumb 获取失败
    #[error("数据源不可用: {0}")]
    UpstreamUnavailable(String),

    /// 响应体无法解析或结构不符合预期
    #[error("数据源返回格式错误: {0}")]
    MalformedResponse(String),
}

impl LookupError {
    /// 错误类别标识，写入响应体的 kind 字段
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::InvalidSymbol(_) => "invalid_symbol",
            LookupError::SymbolNotFound(_) => "symbol_not_found",
            LookupError::UpstreamUnavailable(_) => "upstream_unavailable",
            LookupError::MalformedResponse(_) => "malformed_response",
        }
    }

    /// 是否属于调用方输入问题（而非数据源故障）
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            LookupError::InvalidSymbol(_) | LookupError::SymbolNotFound(_)
        )
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::MalformedResponse(err.to_string())
        } else {
            LookupError::UpstreamUnavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(LookupError::InvalidSymbol("".into()).kind(), "invalid_symbol");
        assert_eq!(LookupError::SymbolNotFound("X".into()).kind(), "symbol_not_found");
        assert_eq!(
            LookupError::UpstreamUnavailable("timeout".into()).kind(),
            "upstream_unavailable"
        );
        assert_eq!(
            LookupError::MalformedResponse("eof".into()).kind(),
            "malformed_response"
        );
    }

    #[test]
    fn test_client_side_errors() {
        assert!(LookupError::SymbolNotFound("ZZZZZZ".into()).is_client_side());
        assert!(!LookupError::UpstreamUnavailable("reset".into()).is_client_side());
    }

    #[test]
    fn test_json_error_is_malformed() {
        let err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let lookup: LookupError = err.into();
        assert_eq!(lookup.kind(), "malformed_response");
    }

    #[test]
    fn test_not_found_message_contains_symbol() {
        let msg = LookupError::SymbolNotFound("ZZZZZZ".into()).to_string();
        assert!(msg.contains("ZZZZZZ"));
    }
}
