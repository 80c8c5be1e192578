//! 通用 API 响应模型
//!
//! 定义健康检查与错误响应格式

use serde::{Deserialize, Serialize};
use chrono::Utc;

use crate::error::LookupError;

/// 统一 API 响应结构（健康检查等辅助接口使用）
///
/// - success: 请求是否成功
/// - data: 响应数据（成功时有值）
/// - message: 响应消息
/// - timestamp: 响应时间戳（UTC）
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 请求是否成功
    pub success: bool,
    /// 响应数据
    pub data: Option<T>,
    /// 响应消息
    pub message: String,
    /// 响应时间戳（ISO 8601 格式）
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// 股票查询失败时的响应体
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    /// 错误信息（包含用户输入的代码和失败原因）
    pub error: String,
    /// 错误类别
    pub kind: String,
}

impl ErrorBody {
    /// 根据原始输入和查询错误构造响应体
    pub fn lookup_failed(raw_symbol: &str, err: &LookupError) -> Self {
        Self {
            error: format!("无法获取 {} 的数据: {}", raw_symbol, err),
            kind: err.kind().to_string(),
        }
    }
}
