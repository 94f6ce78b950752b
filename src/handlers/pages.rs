//! 页面处理器
//!
//! 提供前端静态页面

use actix_web::{web, HttpResponse, Result};

/// 首页静态壳，编译时打包进二进制
const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn index() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index));
}
