//! 股票数据模型
//!
//! 定义 Tushare 各接口返回的数据结构
//! 字段名与 Tushare 返回的列名保持一致，接口未返回的值为 None

use serde::{Deserialize, Serialize};

/// 股票基本信息
///
/// 对应 Tushare 的 stock_basic 接口
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StockBasicInfo {
    /// TS 代码（如 000001.SZ）
    pub ts_code: String,
    /// 股票代码
    pub symbol: Option<String>,
    /// 股票名称
    pub name: Option<String>,
    /// 地域
    pub area: Option<String>,
    /// 所属行业
    pub industry: Option<String>,
    /// 市场类型（主板/创业板/科创板等）
    pub market: Option<String>,
    /// 上市日期（YYYYMMDD）
    pub list_date: Option<String>,
}

/// 利润表记录
///
/// 对应 Tushare 的 income 接口，单位：元
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IncomeRecord {
    /// 报告期结束日期（YYYYMMDD）
    pub end_date: String,
    /// 营业收入
    pub revenue: Option<f64>,
    /// 营业利润
    pub operate_profit: Option<f64>,
    /// 利润总额
    pub total_profit: Option<f64>,
    /// 净利润
    pub n_income: Option<f64>,
}

/// 每日指标快照
///
/// 对应 Tushare 的 daily_basic 接口，包含当日估值数据
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ValuationSnapshot {
    /// TS 代码
    pub ts_code: String,
    /// 交易日期（YYYYMMDD）
    pub trade_date: String,
    /// 当日收盘价
    pub close: Option<f64>,
    /// 换手率（%）
    pub turnover_rate: Option<f64>,
    /// 量比
    pub volume_ratio: Option<f64>,
    /// 市盈率
    pub pe: Option<f64>,
    /// 市盈率 TTM
    pub pe_ttm: Option<f64>,
    /// 市净率
    pub pb: Option<f64>,
    /// 市销率
    pub ps: Option<f64>,
    /// 市销率 TTM
    pub ps_ttm: Option<f64>,
    /// 总市值（万元）
    pub total_mv: Option<f64>,
}

/// 资产负债表快照
///
/// 对应 Tushare 的 balancesheet 接口，单位：元
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BalanceSheetSnapshot {
    /// 报告期结束日期（YYYYMMDD）
    pub end_date: String,
    /// 资产总计
    pub total_assets: Option<f64>,
    /// 负债合计
    pub total_liab: Option<f64>,
    /// 所有者权益合计
    pub total_equity: Option<f64>,
}

/// 日线行情
///
/// 对应 Tushare 的 daily 接口
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PricePoint {
    /// 交易日期（YYYYMMDD）
    pub trade_date: String,
    /// 开盘价
    pub open: Option<f64>,
    /// 最高价
    pub high: Option<f64>,
    /// 最低价
    pub low: Option<f64>,
    /// 收盘价
    pub close: Option<f64>,
    /// 成交量（手）
    pub vol: Option<f64>,
}
