//! 發票日期與會計期間

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// 發票日期欄位的「不適用」字面值
pub const NOT_APPLICABLE: &str = "Not Applicable";

/// 發票日期格式（dd-mm-yyyy）
pub const INVOICE_DATE_FORMAT: &str = "%d-%m-%Y";

/// 會計年度起始月份（4 月，四月至隔年三月）
pub const FISCAL_YEAR_START_MONTH: u32 = 4;

/// 由發票日期推導出的月份、季度、半年度
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePeriod {
    pub month_name: String,
    pub quarter: String,
    pub half_year: String,
}

impl InvoicePeriod {
    /// 從發票日期欄位推導期間
    ///
    /// - `Not Applicable` 原樣帶入三個欄位
    /// - 空白或無法解析的日期得到空白期間
    pub fn from_invoice_date(raw: &str) -> Self {
        let trimmed = raw.trim();

        if trimmed.eq_ignore_ascii_case(NOT_APPLICABLE) {
            return Self::not_applicable();
        }

        match parse_invoice_date(trimmed) {
            Some(date) => Self::from_date(date),
            None => Self::default(),
        }
    }

    /// 從日期推導期間
    pub fn from_date(date: NaiveDate) -> Self {
        let month = date.month();
        Self {
            month_name: date.format("%B").to_string(),
            quarter: fiscal_quarter(month).to_string(),
            half_year: fiscal_half(month).to_string(),
        }
    }

    /// 三個欄位皆為 `Not Applicable`
    pub fn not_applicable() -> Self {
        Self {
            month_name: NOT_APPLICABLE.to_string(),
            quarter: NOT_APPLICABLE.to_string(),
            half_year: NOT_APPLICABLE.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.month_name.is_empty() && self.quarter.is_empty() && self.half_year.is_empty()
    }
}

/// 解析 dd-mm-yyyy 發票日期
pub fn parse_invoice_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), INVOICE_DATE_FORMAT).ok()
}

/// 會計季度：4–6 月 Q1、7–9 月 Q2、10–12 月 Q3、1–3 月 Q4
pub fn fiscal_quarter(month: u32) -> &'static str {
    match month {
        4..=6 => "Q1",
        7..=9 => "Q2",
        10..=12 => "Q3",
        _ => "Q4",
    }
}

/// 會計半年度：4–9 月 H1，其餘 H2
pub fn fiscal_half(month: u32) -> &'static str {
    if (FISCAL_YEAR_START_MONTH..FISCAL_YEAR_START_MONTH + 6).contains(&month) {
        "H1"
    } else {
        "H2"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "Q4", "H2")]
    #[case(3, "Q4", "H2")]
    #[case(4, "Q1", "H1")]
    #[case(6, "Q1", "H1")]
    #[case(7, "Q2", "H1")]
    #[case(9, "Q2", "H1")]
    #[case(10, "Q3", "H2")]
    #[case(12, "Q3", "H2")]
    fn test_fiscal_buckets(#[case] month: u32, #[case] quarter: &str, #[case] half: &str) {
        assert_eq!(fiscal_quarter(month), quarter);
        assert_eq!(fiscal_half(month), half);
    }

    #[test]
    fn test_period_from_invoice_date() {
        let period = InvoicePeriod::from_invoice_date("15-08-2024");
        assert_eq!(period.month_name, "August");
        assert_eq!(period.quarter, "Q2");
        assert_eq!(period.half_year, "H1");
    }

    #[test]
    fn test_not_applicable_propagates_verbatim() {
        let period = InvoicePeriod::from_invoice_date("Not Applicable");
        assert_eq!(period, InvoicePeriod::not_applicable());
        assert_eq!(period.quarter, "Not Applicable");
    }

    #[test]
    fn test_unparseable_date_gives_empty_period() {
        assert!(InvoicePeriod::from_invoice_date("").is_empty());
        assert!(InvoicePeriod::from_invoice_date("2024-08-15").is_empty());
        assert!(InvoicePeriod::from_invoice_date("31-02-2024").is_empty());
    }
}
