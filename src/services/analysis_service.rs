//! 股票分析服务
//!
//! 基于已获取的财务和行情数据计算衍生指标，并按固定阈值生成趋势判断

use anyhow::Result;

use crate::config::DataConfig;
use crate::models::{
    AnalysisResult, BalanceSheetSnapshot, IncomeRecord, PricePoint, TrendPrediction,
};
use crate::services::tushare::TushareClient;

/// 计算营收增长率（%）
///
/// 取最近两期营收：（最近一期 − 上一期）/ 上一期 × 100
/// 不足两期、营收缺失或上一期为 0 时返回 0
pub fn revenue_growth(income_data: &[IncomeRecord]) -> f64 {
    let recent: Vec<f64> = income_data
        .iter()
        .take(2)
        .filter_map(|r| r.revenue)
        .collect();

    if recent.len() >= 2 && recent[1] != 0.0 {
        (recent[0] - recent[1]) / recent[1] * 100.0
    } else {
        0.0
    }
}

/// 计算股价趋势（%）
///
/// 取最近 30 个交易日的收盘价，（末值 − 首值）/ 首值 × 100
/// 有效收盘价不足 10 个或首值为 0 时返回 0
pub fn price_trend(prices: &[PricePoint]) -> f64 {
    let start = prices.len().saturating_sub(30);
    let recent: Vec<f64> = prices[start..].iter().filter_map(|p| p.close).collect();

    if recent.len() >= 10 {
        let first = recent[0];
        let last = recent[recent.len() - 1];
        if first != 0.0 {
            return (last - first) / first * 100.0;
        }
    }
    0.0
}

/// 计算净资产收益率 ROE（%）
///
/// 最近一期净利润 / 所有者权益合计 × 100
/// 任一数据缺失或权益非正时不计算
pub fn compute_roe(
    income_data: &[IncomeRecord],
    balance_sheet: &BalanceSheetSnapshot,
) -> Option<f64> {
    let net_income = income_data.first().and_then(|r| r.n_income)?;
    let total_equity = balance_sheet.total_equity?;

    if total_equity > 0.0 {
        Some(net_income / total_equity * 100.0)
    } else {
        None
    }
}

/// 按固定阈值判定趋势，分支按顺序评估，首个命中的生效
///
/// 返回（标签, 置信度, 解释说明）
pub fn classify(revenue_growth: f64, price_trend: f64) -> (&'static str, &'static str, &'static str) {
    if revenue_growth > 20.0 && price_trend > 10.0 {
        (
            "strong_bullish",
            "high",
            "公司业绩增长强劲，股价趋势向上，预计未来表现良好",
        )
    } else if revenue_growth > 10.0 && price_trend > 0.0 {
        ("bullish", "medium", "业绩稳定增长，股价有上升趋势，未来可期")
    } else if revenue_growth < -10.0 && price_trend < -5.0 {
        ("bearish", "medium", "业绩下滑，股价走弱，需谨慎投资")
    } else {
        ("neutral", "low", "业绩和股价表现平稳，建议观望")
    }
}

/// 保留两位小数
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 生成趋势预测
///
/// 利润表或行情数据完全缺失时不生成预测
/// 下期营收预测 = 最近一期营收 ×（1 + 增长率/100）
pub fn predict_trend(
    income_data: &[IncomeRecord],
    prices: &[PricePoint],
) -> Option<TrendPrediction> {
    if income_data.is_empty() || prices.is_empty() {
        return None;
    }

    let growth = revenue_growth(income_data);
    let trend = price_trend(prices);
    let (label, confidence, explanation) = classify(growth, trend);

    let next_quarter_prediction = income_data
        .first()
        .and_then(|r| r.revenue)
        .map(|revenue| round2(revenue * (1.0 + growth / 100.0)));

    Some(TrendPrediction {
        trend: label.to_string(),
        confidence: confidence.to_string(),
        explanation: explanation.to_string(),
        revenue_growth: round2(growth),
        price_trend: round2(trend),
        next_quarter_prediction,
    })
}

/// 执行单只股票的完整分析流程
///
/// 基本信息查不到时返回 Ok(None)，由调用方转为"未找到"响应；
/// 其余数据源按顺序获取并独立降级，单个失败不会中断整个请求
pub async fn analyze_stock(
    client: &TushareClient,
    data_cfg: &DataConfig,
    ts_code: &str,
) -> Result<Option<AnalysisResult>> {
    log::info!("开始分析股票: {}", ts_code);

    let stock_basic = match client.fetch_basic_info(ts_code).await {
        Some(info) => info,
        None => return Ok(None),
    };

    let income_data = client
        .fetch_income_history(ts_code, data_cfg.income_years)
        .await;
    let daily_basic = client.fetch_valuation_snapshot(ts_code).await;
    let balance_sheet = client.fetch_balance_sheet(ts_code).await;
    let historical_prices = client.fetch_price_history(ts_code, data_cfg.price_days).await;

    let trend_prediction = predict_trend(&income_data, &historical_prices);
    let roe = balance_sheet
        .as_ref()
        .and_then(|bs| compute_roe(&income_data, bs));

    log::info!(
        "{} 分析完成: 利润表 {} 期，行情 {} 条",
        ts_code,
        income_data.len(),
        historical_prices.len()
    );

    Ok(Some(AnalysisResult {
        stock_basic,
        income_data,
        daily_basic,
        balance_sheet,
        roe,
        historical_prices,
        trend_prediction,
    }))
}
