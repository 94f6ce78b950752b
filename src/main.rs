//! Tushare 股票分析后端服务
//!
//! 提供单只股票的基本面 + 行情综合分析 API
//! 数据来源：Tushare Pro

mod config;   // 配置加载
mod handlers; // HTTP 请求处理器
mod models;   // 数据模型定义
mod services; // 业务逻辑服务

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::config::{AppConfig, DataConfig};
use crate::services::tushare::TushareClient;

/// 各处理器共享的应用状态，进程启动时构建一次
pub struct AppState {
    /// Tushare 客户端
    pub client: TushareClient,
    /// 数据获取参数
    pub data: DataConfig,
}

/// 应用程序入口
///
/// 加载配置、初始化日志和 Tushare 客户端，启动 HTTP 服务器
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let app_config = AppConfig::load();

    // 初始化日志系统，RUST_LOG 环境变量可覆盖配置中的级别
    env_logger::init_from_env(Env::default().default_filter_or(app_config.log.level.as_str()));

    log::info!("启动 Tushare 股票分析后端服务");

    let token = app_config.api.resolve_token();
    let client = TushareClient::new(
        token,
        app_config.api.timeout_secs,
        app_config.api.connect_timeout_secs,
    )?;

    let state = web::Data::new(AppState {
        client,
        data: app_config.data.clone(),
    });

    let bind_addr = app_config.bind_addr();
    log::info!("监听地址: {}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())      // 请求日志中间件
            .app_data(state.clone())
            .configure(handlers::config)  // 配置路由
    })
    .bind(&bind_addr)?;

    if app_config.server.workers > 0 {
        server = server.workers(app_config.server.workers);
    }

    server.run().await?;
    Ok(())
}
