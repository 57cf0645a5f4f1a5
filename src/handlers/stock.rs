use actix_web::{web, HttpResponse, Result};

use crate::handlers::AppState;
use crate::models::{ApiResponse, ExplainRequest, ExplainResponse};
use crate::services::stock_service::{self, ExplainError};
use crate::services::formatter;

/// 股票解读接口
///
/// 请求体提供股票代码，返回行情摘要 + AI 解读。
/// 代码在进入装配流程前完成去空白与大写化，空代码直接拒绝；
/// NotFound 与内部错误在此映射为 404 / 500
pub async fn explain_stock(
    state: web::Data<AppState>,
    body: web::Json<ExplainRequest>,
) -> Result<HttpResponse> {
    let ticker = body.ticker.trim().to_uppercase();

    if ticker.is_empty() {
        let response =
            ApiResponse::<ExplainResponse>::error("Please provide a stock ticker".to_string());
        return Ok(HttpResponse::BadRequest().json(response));
    }

    match stock_service::get_stock_data(&state.quotes, &ticker).await {
        Ok(stock) => {
            let explanation = state.narrative.explain(&stock).await;
            let document = formatter::build_response(stock, explanation);
            Ok(HttpResponse::Ok().json(ApiResponse::success(document)))
        }
        Err(ExplainError::NotFound(ticker)) => {
            let response = ApiResponse::<ExplainResponse>::error(format!(
                "Unable to find data for ticker '{}'. Please check the ticker symbol and try again.",
                ticker
            ));
            Ok(HttpResponse::NotFound().json(response))
        }
        Err(e) => {
            log::error!("处理 {} 解读请求失败: {:#}", ticker, anyhow::Error::from(e));
            let response = ApiResponse::<ExplainResponse>::error(
                "An error occurred while processing your request".to_string(),
            );
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stocks")
            .route("/explain", web::post().to(explain_stock))
    );
}
