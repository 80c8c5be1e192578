//! 股票接口处理器
//!
//! - GET /api/v1/stocks/{symbol} - 获取股票摘要
//! - GET /stock/{symbol}/ - 旧版路径，行为相同

use actix_web::{web, HttpResponse, Result};
use log::{error, info, warn};

use crate::models::ErrorBody;
use crate::services::stock::QuoteProvider;
use crate::services::stock_service;

/// 获取股票摘要
///
/// 成功返回 200 和 {symbol, longName, regularMarketPrice, dividendYield}，
/// 任何失败都返回 404 和 {error, kind}
pub async fn get_stock_summary(
    path: web::Path<String>,
    provider: web::Data<dyn QuoteProvider>,
) -> Result<HttpResponse> {
    let symbol = path.into_inner();

    match stock_service::get_quote_summary(provider.get_ref(), &symbol).await {
        Ok(summary) => {
            info!("{} 查询成功", summary.symbol);
            Ok(HttpResponse::Ok().json(summary))
        }
        Err(e) => {
            if e.is_client_side() {
                warn!("{} 查询失败 [{}]: {}", symbol, e.kind(), e);
            } else {
                error!("{} 查询失败 [{}]: {}", symbol, e.kind(), e);
            }
            Ok(HttpResponse::NotFound().json(ErrorBody::lookup_failed(&symbol, &e)))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/stocks/{symbol}", web::get().to(get_stock_summary));
}

/// 旧版路径（不带 /api/v1 前缀，末尾斜杠可选）
pub fn legacy_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/stock/{symbol}", web::get().to(get_stock_summary))
        .route("/stock/{symbol}/", web::get().to(get_stock_summary));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::services::stock_service::tests::MockProvider;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    async fn call(provider: MockProvider, uri: &str) -> (StatusCode, Value) {
        let provider: Arc<dyn QuoteProvider> = Arc::new(provider);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(provider))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_valid_symbol_returns_summary() {
        let provider = MockProvider::with_info(json!({
            "regularMarketPrice": 150.0,
            "longName": "Apple Inc.",
        }));

        let (status, body) = call(provider, "/api/v1/stocks/aapl").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "symbol": "AAPL",
                "longName": "Apple Inc.",
                "regularMarketPrice": 150.0,
                "dividendYield": null,
            })
        );
    }

    #[actix_web::test]
    async fn test_unknown_symbol_returns_404() {
        let provider = MockProvider::with_info(json!({ "symbol": "ZZZZZZ" }));

        let (status, body) = call(provider, "/api/v1/stocks/zzzzzz").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("zzzzzz"));
        assert_eq!(body["kind"], "symbol_not_found");
    }

    #[actix_web::test]
    async fn test_upstream_failure_returns_404() {
        let provider =
            MockProvider::failing(|_| LookupError::UpstreamUnavailable("timed out".into()));

        let (status, body) = call(provider, "/api/v1/stocks/MSFT").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "upstream_unavailable");
        assert!(body["error"].as_str().unwrap().contains("MSFT"));
    }

    #[actix_web::test]
    async fn test_malformed_response_returns_404() {
        let provider = MockProvider::failing(|_| LookupError::MalformedResponse("eof".into()));

        let (status, body) = call(provider, "/api/v1/stocks/MSFT").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "malformed_response");
    }

    #[actix_web::test]
    async fn test_legacy_path_with_trailing_slash() {
        let provider = MockProvider::with_info(json!({
            "regularMarketPrice": 410.5,
            "longName": "Microsoft Corporation",
            "dividendYield": 0.0072,
        }));

        let (status, body) = call(provider, "/stock/msft/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "MSFT");
        assert_eq!(body["dividendYield"], 0.0072);
    }

    #[actix_web::test]
    async fn test_null_price_returns_200() {
        let provider = MockProvider::with_info(json!({
            "regularMarketPrice": null,
            "longName": "Halted Corp",
        }));

        let (status, body) = call(provider, "/api/v1/stocks/halt").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "symbol": "HALT",
                "longName": "Halted Corp",
                "regularMarketPrice": null,
                "dividendYield": null,
            })
        );
    }

    #[actix_web::test]
    async fn test_invalid_symbol_returns_404() {
        let provider = MockProvider::with_info(json!({ "regularMarketPrice": 1.0 }));

        let (status, body) = call(provider, "/api/v1/stocks/%3Cscript%3E").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "invalid_symbol");
        assert!(body["error"].as_str().unwrap().contains("<script>"));
    }

    #[actix_web::test]
    async fn test_legacy_path_without_trailing_slash() {
        let provider = MockProvider::with_info(json!({
            "regularMarketPrice": 410.5,
            "longName": "Microsoft Corporation",
        }));

        let (status, body) = call(provider, "/stock/msft").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "MSFT");
        assert_eq!(body["regularMarketPrice"], 410.5);
    }
}
