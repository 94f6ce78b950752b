//! 业务逻辑服务模块
//!
//! 封装数据获取和分析逻辑

pub mod analysis_service; // 指标计算与趋势判定
pub mod tushare;          // Tushare 数据服务
