//! Tushare Pro 数据服务
//!
//! 对接 https://tushare.pro 的 HTTP 接口
//! 所有接口共用单一入口 POST http://api.tushare.pro，通过 api_name 区分，
//! 返回"列名 + 行数组"形式的表格数据
//!
//! 获取类方法（fetch_*）内部吞掉错误并记录日志，失败时返回 None 或空列表，
//! 单个数据源失败不会影响同一请求中的其他数据源

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Asia::Shanghai;
use chrono_tz::Tz;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    BalanceSheetSnapshot, IncomeRecord, PricePoint, StockBasicInfo, ValuationSnapshot,
};

/// Tushare Pro API 入口
const TUSHARE_API_URL: &str = "http://api.tushare.pro";

/// 获取北京时间
fn beijing_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&Shanghai)
}

/// 北京时间当天日期（YYYYMMDD）
fn today_str() -> String {
    beijing_now().format("%Y%m%d").to_string()
}

/// 北京时间 N 天前的日期（YYYYMMDD）
fn days_ago_str(days: i64) -> String {
    (beijing_now() - chrono::Duration::days(days))
        .format("%Y%m%d")
        .to_string()
}

/// Tushare 请求体
#[derive(Debug, Serialize)]
struct TushareRequest<'a> {
    api_name: &'a str,
    token: &'a str,
    params: HashMap<&'a str, String>,
    fields: &'a str,
}

/// Tushare 响应外层
#[derive(Debug, Deserialize)]
struct TushareResponse {
    /// 返回码，0 表示成功
    code: i64,
    /// 错误信息
    msg: Option<String>,
    /// 表格数据
    data: Option<TushareTable>,
}

/// Tushare 表格数据：列名列表 + 按位置对应的行数组
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TushareTable {
    pub fields: Vec<String>,
    pub items: Vec<Vec<Value>>,
}

impl TushareTable {
    /// 列名对应的下标
    fn col(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// 按列名取字符串值，数字列也转为字符串
    pub fn str_at(&self, row: &[Value], name: &str) -> Option<String> {
        match row.get(self.col(name)?)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// 按列名取数值，兼容数字和数字字符串
    pub fn f64_at(&self, row: &[Value], name: &str) -> Option<f64> {
        match row.get(self.col(name)?)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// 将 stock_basic 表格的首行转为基本信息
fn basic_info_from_table(table: &TushareTable, ts_code: &str) -> Option<StockBasicInfo> {
    let row = table.items.first()?;
    Some(StockBasicInfo {
        ts_code: table
            .str_at(row, "ts_code")
            .unwrap_or_else(|| ts_code.to_string()),
        symbol: table.str_at(row, "symbol"),
        name: table.str_at(row, "name"),
        area: table.str_at(row, "area"),
        industry: table.str_at(row, "industry"),
        market: table.str_at(row, "market"),
        list_date: table.str_at(row, "list_date"),
    })
}

/// 将 income 表格转为利润表记录，按报告期倒序并截断到 years 期
fn income_from_table(table: &TushareTable, years: u32) -> Vec<IncomeRecord> {
    let mut records: Vec<IncomeRecord> = table
        .items
        .iter()
        .map(|row| IncomeRecord {
            end_date: table.str_at(row, "end_date").unwrap_or_default(),
            revenue: table.f64_at(row, "revenue"),
            operate_profit: table.f64_at(row, "operate_profit"),
            total_profit: table.f64_at(row, "total_profit"),
            n_income: table.f64_at(row, "n_income"),
        })
        .collect();

    records.sort_by(|a, b| b.end_date.cmp(&a.end_date));
    records.truncate(years as usize);
    records
}

/// 将 daily_basic 表格的首行转为估值快照
fn valuation_from_table(table: &TushareTable, ts_code: &str) -> Option<ValuationSnapshot> {
    let row = table.items.first()?;
    Some(ValuationSnapshot {
        ts_code: table
            .str_at(row, "ts_code")
            .unwrap_or_else(|| ts_code.to_string()),
        trade_date: table.str_at(row, "trade_date").unwrap_or_default(),
        close: table.f64_at(row, "close"),
        turnover_rate: table.f64_at(row, "turnover_rate"),
        volume_ratio: table.f64_at(row, "volume_ratio"),
        pe: table.f64_at(row, "pe"),
        pe_ttm: table.f64_at(row, "pe_ttm"),
        pb: table.f64_at(row, "pb"),
        ps: table.f64_at(row, "ps"),
        ps_ttm: table.f64_at(row, "ps_ttm"),
        total_mv: table.f64_at(row, "total_mv"),
    })
}

/// 将 balancesheet 表格的首行转为资产负债表快照
fn balance_from_table(table: &TushareTable) -> Option<BalanceSheetSnapshot> {
    let row = table.items.first()?;
    Some(BalanceSheetSnapshot {
        end_date: table.str_at(row, "end_date").unwrap_or_default(),
        total_assets: table.f64_at(row, "total_assets"),
        total_liab: table.f64_at(row, "total_liab"),
        total_equity: table.f64_at(row, "total_equity"),
    })
}

/// 将 daily 表格转为日线行情，按交易日期升序
fn prices_from_table(table: &TushareTable) -> Vec<PricePoint> {
    let mut prices: Vec<PricePoint> = table
        .items
        .iter()
        .map(|row| PricePoint {
            trade_date: table.str_at(row, "trade_date").unwrap_or_default(),
            open: table.f64_at(row, "open"),
            high: table.f64_at(row, "high"),
            low: table.f64_at(row, "low"),
            close: table.f64_at(row, "close"),
            vol: table.f64_at(row, "vol"),
        })
        .collect();

    prices.sort_by(|a, b| a.trade_date.cmp(&b.trade_date));
    prices
}

/// Tushare 数据服务
pub struct TushareClient {
    client: Client,
    token: String,
}

impl TushareClient {
    /// 创建客户端，超时参数来自配置
    pub fn new(token: String, timeout_secs: u64, connect_timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .build()?;

        Ok(Self { client, token })
    }

    /// 通用查询入口
    ///
    /// code != 0 视为接口错误，HTTP 非 2xx 视为传输错误
    async fn query(
        &self,
        api_name: &str,
        params: HashMap<&str, String>,
        fields: &str,
    ) -> Result<TushareTable> {
        let request = TushareRequest {
            api_name,
            token: &self.token,
            params,
            fields,
        };

        let response = self
            .client
            .post(TUSHARE_API_URL)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Tushare 接口返回 HTTP {}", response.status()));
        }

        let body: TushareResponse = response.json().await?;
        if body.code != 0 {
            return Err(anyhow!(
                "Tushare 接口错误（code={}）: {}",
                body.code,
                body.msg.unwrap_or_default()
            ));
        }

        Ok(body.data.unwrap_or_default())
    }

    /// 获取股票基本信息
    ///
    /// 接口出错或查不到记录时返回 None
    pub async fn fetch_basic_info(&self, ts_code: &str) -> Option<StockBasicInfo> {
        match self.query_basic_info(ts_code).await {
            Ok(Some(info)) => {
                log::info!(
                    "获取 {} 基本信息成功: {}",
                    ts_code,
                    info.name.as_deref().unwrap_or("-")
                );
                Some(info)
            }
            Ok(None) => {
                log::warn!("未查询到 {} 的基本信息", ts_code);
                None
            }
            Err(e) => {
                log::warn!("获取 {} 基本信息失败: {}", ts_code, e);
                None
            }
        }
    }

    async fn query_basic_info(&self, ts_code: &str) -> Result<Option<StockBasicInfo>> {
        let mut params = HashMap::new();
        params.insert("ts_code", ts_code.to_string());

        let table = self
            .query(
                "stock_basic",
                params,
                "ts_code,symbol,name,area,industry,market,list_date",
            )
            .await?;

        Ok(basic_info_from_table(&table, ts_code))
    }

    /// 获取最近 years 年的利润表记录
    ///
    /// 出错时返回空列表
    pub async fn fetch_income_history(&self, ts_code: &str, years: u32) -> Vec<IncomeRecord> {
        match self.query_income(ts_code, years).await {
            Ok(records) => {
                log::info!("获取 {} 利润表成功，共 {} 期", ts_code, records.len());
                records
            }
            Err(e) => {
                log::warn!("获取 {} 利润表失败: {}", ts_code, e);
                Vec::new()
            }
        }
    }

    async fn query_income(&self, ts_code: &str, years: u32) -> Result<Vec<IncomeRecord>> {
        let mut params = HashMap::new();
        params.insert("ts_code", ts_code.to_string());
        params.insert("start_date", days_ago_str(years as i64 * 365));
        params.insert("end_date", today_str());

        let table = self
            .query(
                "income",
                params,
                "end_date,revenue,operate_profit,total_profit,n_income",
            )
            .await?;

        Ok(income_from_table(&table, years))
    }

    /// 获取当日估值指标
    ///
    /// 非交易日没有数据，返回 None
    pub async fn fetch_valuation_snapshot(&self, ts_code: &str) -> Option<ValuationSnapshot> {
        match self.query_valuation(ts_code).await {
            Ok(Some(snapshot)) => {
                log::info!("获取 {} 当日估值成功（{}）", ts_code, snapshot.trade_date);
                Some(snapshot)
            }
            Ok(None) => {
                log::warn!("{} 当日无估值数据（可能为非交易日）", ts_code);
                None
            }
            Err(e) => {
                log::warn!("获取 {} 当日估值失败: {}", ts_code, e);
                None
            }
        }
    }

    async fn query_valuation(&self, ts_code: &str) -> Result<Option<ValuationSnapshot>> {
        let mut params = HashMap::new();
        params.insert("ts_code", ts_code.to_string());
        params.insert("trade_date", today_str());

        let table = self
            .query(
                "daily_basic",
                params,
                "ts_code,trade_date,close,turnover_rate,volume_ratio,pe,pe_ttm,pb,ps,ps_ttm,total_mv",
            )
            .await?;

        Ok(valuation_from_table(&table, ts_code))
    }

    /// 获取资产负债表快照
    ///
    /// 出错或无数据时返回 None
    pub async fn fetch_balance_sheet(&self, ts_code: &str) -> Option<BalanceSheetSnapshot> {
        match self.query_balance_sheet(ts_code).await {
            Ok(Some(snapshot)) => {
                log::info!("获取 {} 资产负债表成功（{}）", ts_code, snapshot.end_date);
                Some(snapshot)
            }
            Ok(None) => {
                log::warn!("未查询到 {} 的资产负债表数据", ts_code);
                None
            }
            Err(e) => {
                log::warn!("获取 {} 资产负债表失败: {}", ts_code, e);
                None
            }
        }
    }

    async fn query_balance_sheet(&self, ts_code: &str) -> Result<Option<BalanceSheetSnapshot>> {
        let mut params = HashMap::new();
        params.insert("ts_code", ts_code.to_string());
        params.insert("end_date", today_str());

        let table = self
            .query(
                "balancesheet",
                params,
                "end_date,total_assets,total_liab,total_equity",
            )
            .await?;

        Ok(balance_from_table(&table))
    }

    /// 获取最近 days 天的日线行情，按日期升序
    ///
    /// 出错时返回空列表
    pub async fn fetch_price_history(&self, ts_code: &str, days: i64) -> Vec<PricePoint> {
        match self.query_price_history(ts_code, days).await {
            Ok(prices) => {
                log::info!("获取 {} 历史行情成功，共 {} 条", ts_code, prices.len());
                prices
            }
            Err(e) => {
                log::warn!("获取 {} 历史行情失败: {}", ts_code, e);
                Vec::new()
            }
        }
    }

    async fn query_price_history(&self, ts_code: &str, days: i64) -> Result<Vec<PricePoint>> {
        let mut params = HashMap::new();
        params.insert("ts_code", ts_code.to_string());
        params.insert("start_date", days_ago_str(days));
        params.insert("end_date", today_str());

        let table = self
            .query("daily", params, "trade_date,open,high,low,close,vol")
            .await?;

        Ok(prices_from_table(&table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(value: Value) -> TushareTable {
        serde_json::from_value(value).unwrap()
    }

    /// 测试按列名提取数值，兼容数字、数字字符串和 null
    #[test]
    fn test_table_value_extraction() {
        let table = table(json!({
            "fields": ["ts_code", "close", "pe"],
            "items": [["000001.SZ", "10.5", null], ["000002.SZ", 11.2, 8.3]]
        }));

        assert_eq!(table.str_at(&table.items[0], "ts_code").unwrap(), "000001.SZ");
        assert_eq!(table.f64_at(&table.items[0], "close").unwrap(), 10.5);
        assert!(table.f64_at(&table.items[0], "pe").is_none());
        assert_eq!(table.f64_at(&table.items[1], "close").unwrap(), 11.2);
        // 不存在的列
        assert!(table.f64_at(&table.items[0], "pb").is_none());
    }

    /// 测试利润表按报告期倒序并截断
    #[test]
    fn test_income_from_table_sorts_and_truncates() {
        let table = table(json!({
            "fields": ["end_date", "revenue", "operate_profit", "total_profit", "n_income"],
            "items": [
                ["20221231", 100.0, 10.0, 12.0, 8.0],
                ["20241231", 140.0, 20.0, 22.0, 15.0],
                ["20231231", 120.0, 15.0, 17.0, 11.0],
                ["20211231", 90.0, 8.0, 9.0, 6.0]
            ]
        }));

        let records = income_from_table(&table, 3);
        println!("利润表解析结果: {:?}", records);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].end_date, "20241231");
        assert_eq!(records[1].end_date, "20231231");
        assert_eq!(records[2].end_date, "20221231");
        assert_eq!(records[0].revenue.unwrap(), 140.0);
    }

    /// 测试日线行情按交易日期升序
    #[test]
    fn test_prices_from_table_sorts_ascending() {
        let table = table(json!({
            "fields": ["trade_date", "open", "high", "low", "close", "vol"],
            "items": [
                ["20240105", 10.2, 10.6, 10.1, 10.5, 80000.0],
                ["20240103", 10.0, 10.3, 9.9, 10.1, 120000.0],
                ["20240104", 10.1, 10.4, 10.0, 10.2, 90000.0]
            ]
        }));

        let prices = prices_from_table(&table);

        assert_eq!(prices.len(), 3);
        assert_eq!(prices[0].trade_date, "20240103");
        assert_eq!(prices[2].trade_date, "20240105");
        assert_eq!(prices[2].close.unwrap(), 10.5);
    }

    /// 测试空结果集返回 None
    #[test]
    fn test_basic_info_from_empty_table() {
        let table = table(json!({
            "fields": ["ts_code", "symbol", "name", "area", "industry", "market", "list_date"],
            "items": []
        }));

        assert!(basic_info_from_table(&table, "999999.SZ").is_none());
    }

    /// 测试基本信息解析，缺失列回填查询代码
    #[test]
    fn test_basic_info_from_table() {
        let table = table(json!({
            "fields": ["ts_code", "symbol", "name", "area", "industry", "market", "list_date"],
            "items": [["000001.SZ", "000001", "平安银行", "深圳", "银行", "主板", "19910403"]]
        }));

        let info = basic_info_from_table(&table, "000001.SZ").unwrap();
        assert_eq!(info.ts_code, "000001.SZ");
        assert_eq!(info.name.as_deref(), Some("平安银行"));
        assert_eq!(info.industry.as_deref(), Some("银行"));
    }

    /// 测试资产负债表解析，null 字段保持 None
    #[test]
    fn test_balance_from_table_with_nulls() {
        let table = table(json!({
            "fields": ["end_date", "total_assets", "total_liab", "total_equity"],
            "items": [["20240630", 5000000.0, null, 2000000.0]]
        }));

        let snapshot = balance_from_table(&table).unwrap();
        assert_eq!(snapshot.end_date, "20240630");
        assert!(snapshot.total_liab.is_none());
        assert_eq!(snapshot.total_equity.unwrap(), 2000000.0);
    }

    /// 测试 Tushare 响应外层解析（含错误码）
    #[test]
    fn test_response_envelope_decoding() {
        let ok: TushareResponse = serde_json::from_str(
            r#"{"request_id": "1", "code": 0, "msg": null,
                "data": {"fields": ["ts_code"], "items": [["000001.SZ"]], "has_more": false}}"#,
        )
        .unwrap();
        assert_eq!(ok.code, 0);
        assert_eq!(ok.data.unwrap().items.len(), 1);

        let err: TushareResponse = serde_json::from_str(
            r#"{"request_id": "2", "code": 40001, "msg": "token无效", "data": null}"#,
        )
        .unwrap();
        assert_eq!(err.code, 40001);
        assert_eq!(err.msg.as_deref(), Some("token无效"));
        assert!(err.data.is_none());
    }

    /// 测试日期窗口格式
    #[test]
    fn test_date_window_format() {
        let today = today_str();
        let earlier = days_ago_str(365);

        assert_eq!(today.len(), 8);
        assert_eq!(earlier.len(), 8);
        assert!(today.chars().all(|c| c.is_ascii_digit()));
        // 一年前的日期字符串必然小于今天
        assert!(earlier < today);
    }
}
