//! 分析结果模型
//!
//! 定义分析接口的请求和响应格式

use serde::{Deserialize, Serialize};

use super::stock::{
    BalanceSheetSnapshot, IncomeRecord, PricePoint, StockBasicInfo, ValuationSnapshot,
};

/// 分析请求表单
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// 股票代码（如 000001.SZ）
    pub stock_code: Option<String>,
}

/// 趋势预测结果
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrendPrediction {
    /// 趋势标签: strong_bullish / bullish / bearish / neutral
    pub trend: String,
    /// 置信度: high / medium / low
    pub confidence: String,
    /// 解释说明
    pub explanation: String,
    /// 营收增长率（%，保留两位小数）
    pub revenue_growth: f64,
    /// 股价趋势（%，保留两位小数）
    pub price_trend: f64,
    /// 下期营收预测（元），无利润表数据时为 None
    pub next_quarter_prediction: Option<f64>,
}

/// 综合分析结果
///
/// 各字段独立降级：对应数据源获取失败时为 None 或空列表
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalysisResult {
    /// 股票基本信息
    pub stock_basic: StockBasicInfo,
    /// 利润表记录（最近报告期在前）
    pub income_data: Vec<IncomeRecord>,
    /// 当日估值指标
    pub daily_basic: Option<ValuationSnapshot>,
    /// 资产负债表快照
    pub balance_sheet: Option<BalanceSheetSnapshot>,
    /// 净资产收益率（%）
    pub roe: Option<f64>,
    /// 历史日线行情（按日期升序）
    pub historical_prices: Vec<PricePoint>,
    /// 趋势预测
    pub trend_prediction: Option<TrendPrediction>,
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误信息
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
