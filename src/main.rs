//! 股票摘要后端服务
//!
//! 提供按股票代码查询名称、价格、股息率的 RESTful API
//! 数据来源：Yahoo Finance

mod config;     // 配置加载
mod error;      // 错误类型
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use std::sync::Arc;

use actix_web::{web, App, HttpServer, middleware::Logger};
use anyhow::Context;
use env_logger::Env;

use crate::config::{AppConfig, ConfigOrigin};
use crate::middleware::ApiKeyMiddleware;
use crate::services::stock::{QuoteProvider, YahooQuoteProvider};

/// 应用程序入口
///
/// 加载配置后启动 HTTP 服务器，默认监听 0.0.0.0:8080
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let (mut config, origin) = AppConfig::load();
    config.apply_env();

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    match origin {
        ConfigOrigin::File(path) => log::info!("从 {} 加载配置成功", path),
        ConfigOrigin::Invalid(path, e) => log::warn!("加载配置文件 {} 失败: {}，使用默认配置", path, e),
        ConfigOrigin::Default => log::info!("使用默认配置"),
    }

    if config.api.api_key.is_empty() {
        log::warn!("未设置 API Key，接口不做认证");
    }

    let provider: Arc<dyn QuoteProvider> = Arc::new(
        YahooQuoteProvider::new(&config.provider, &config.api)
            .context("创建 Yahoo Finance 数据源失败")?,
    );
    let provider = web::Data::from(provider);

    let bind_addr = config.bind_addr();
    let api_key = config.api.api_key.clone();
    log::info!("启动股票摘要服务，监听 {}", bind_addr);

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(ApiKeyMiddleware::new(api_key.clone()))  // API Key 认证
            .wrap(Logger::default())  // 添加请求日志中间件
            .app_data(provider.clone())
            .configure(handlers::config)  // 配置路由
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_addr)
        .with_context(|| format!("绑定地址 {} 失败", bind_addr))?
        .run()
        .await?;

    Ok(())
}
