//! 股票分析接口处理器
//!
//! POST /analyze，接收表单字段 stock_code，返回综合分析结果
//!
//! 错误统一以 `{"error": "..."}` 返回，HTTP 状态码保持 200

use actix_web::{web, HttpResponse, Result};

use crate::models::{AnalyzeRequest, ErrorResponse};
use crate::services::analysis_service;
use crate::AppState;

/// 分析单只股票
///
/// 股票代码缺失时直接返回错误，不会请求数据源
pub async fn analyze(
    state: web::Data<AppState>,
    form: web::Form<AnalyzeRequest>,
) -> Result<HttpResponse> {
    let stock_code = form.stock_code.as_deref().map(str::trim).unwrap_or("");

    if stock_code.is_empty() {
        return Ok(HttpResponse::Ok().json(ErrorResponse::new("请输入股票代码")));
    }

    match analysis_service::analyze_stock(&state.client, &state.data, stock_code).await {
        Ok(Some(result)) => Ok(HttpResponse::Ok().json(result)),
        Ok(None) => Ok(HttpResponse::Ok().json(ErrorResponse::new(format!(
            "未找到股票代码: {}。请确认格式正确（例如：000001.SZ, 600000.SH）",
            stock_code
        )))),
        Err(e) => {
            log::error!("分析 {} 过程中出现未预期错误: {:?}", stock_code, e);
            Ok(HttpResponse::Ok().json(ErrorResponse::new(format!(
                "分析过程中出现错误: {}。请检查Tushare Token是否正确配置。",
                e
            ))))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/analyze", web::post().to(analyze));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataConfig;
    use crate::services::tushare::TushareClient;
    use actix_web::{test, App};

    fn test_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            client: TushareClient::new("test-token".to_string(), 30, 10).unwrap(),
            data: DataConfig::default(),
        })
    }

    /// 缺少 stock_code 字段时返回提示错误，且不会触发任何数据源请求
    #[actix_web::test]
    async fn test_analyze_missing_stock_code() {
        let app = test::init_service(
            App::new().app_data(test_state()).configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/analyze")
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload("")
            .to_request();

        let body: ErrorResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.error, "请输入股票代码");
    }

    /// 空白的 stock_code 同样视为缺失
    #[actix_web::test]
    async fn test_analyze_blank_stock_code() {
        let app = test::init_service(
            App::new().app_data(test_state()).configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/analyze")
            .set_form([("stock_code", "   ")])
            .to_request();

        let body: ErrorResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.error, "请输入股票代码");
    }
}
