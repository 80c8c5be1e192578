//! 业务逻辑服务模块
//!
//! 封装数据获取和处理逻辑

pub mod stock;          // 行情数据源
pub mod stock_service;  // 股票摘要服务
