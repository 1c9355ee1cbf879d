//! Vendor symbology: contract-code parsing and expiry inference.
//!
//! Derives a root/month/year from CME-style codes ("ESZ25", "SR3H5") by
//! scanning for the last month-code letter followed by a 1–2 digit year,
//! and infers a third-Wednesday expiry when a vendor feed carries no
//! explicit metadata. Approximations by design: products with exchange-
//! specific expiry rules should ship real metadata instead.

use anyhow::{anyhow, Context};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use curve_lib::contracts::calendar::sub_weekdays;
use curve_lib::{ContractId, ContractMeta, MetaTable, PricePanel};

/// CME month-code letters, January through December.
pub const MONTH_CODES: [char; 12] = ['F', 'G', 'H', 'J', 'K', 'M', 'N', 'Q', 'U', 'V', 'X', 'Z'];

#[inline]
pub fn month_from_code(c: char) -> Option<u32> {
    MONTH_CODES
        .iter()
        .position(|&m| m == c)
        .map(|i| i as u32 + 1)
}

/// Parsed components of a futures contract code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCode {
    pub root: String,
    pub month: u32,
    /// 1- or 2-digit year as written, undisambiguated.
    pub year_digits: u32,
    pub year_digit_count: usize,
}

/// Split a code like "ESZ25" or "SR3H5" into root, month, and year digits.
/// Scans from the right for a month-code letter with 1–2 trailing digits;
/// everything before it is the root.
pub fn parse_contract_code(code: &str) -> Option<ContractCode> {
    let s: String = code
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_uppercase();
    let chars: Vec<char> = s.chars().collect();

    let mut i = chars.len();
    let mut digits = 0usize;
    while i > 0 && chars[i - 1].is_ascii_digit() && digits < 2 {
        i -= 1;
        digits += 1;
    }
    if digits == 0 || i == 0 {
        return None;
    }
    let month = month_from_code(chars[i - 1])?;
    let root: String = chars[..i - 1].iter().collect();
    if root.is_empty() {
        return None;
    }
    let year_digits: u32 = chars[i..].iter().collect::<String>().parse().ok()?;
    Some(ContractCode { root, month, year_digits, year_digit_count: digits })
}

/// Third Wednesday of the given month/year.
pub fn third_wednesday(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let days_to_wed =
        (Weekday::Wed.num_days_from_monday() + 7 - first.weekday().num_days_from_monday()) % 7;
    Some(first + Duration::days(days_to_wed as i64 + 14))
}

/// Infer a contract's expiry from its code and the last date it was seen
/// trading.
///
/// Expiry is taken as the third Wednesday of the coded month. Single-digit
/// years are decade-ambiguous; the smallest candidate year whose expiry is
/// on or after `last_seen` wins (e.g. SR3H5 last seen 2024-12-01 → Mar
/// 2025; last seen 2025-04-01 → Mar 2035). Two-digit years pivot at 2000.
pub fn infer_expiry(code: &str, last_seen: NaiveDate) -> anyhow::Result<NaiveDate> {
    let parsed =
        parse_contract_code(code).ok_or_else(|| anyhow!("unparsable contract code {code:?}"))?;

    if parsed.year_digit_count == 2 {
        let year = 2000 + parsed.year_digits as i32;
        return third_wednesday(year, parsed.month)
            .ok_or_else(|| anyhow!("no expiry date for {code:?}"));
    }

    let mut year = 2010 + parsed.year_digits as i32;
    loop {
        let expiry = third_wednesday(year, parsed.month)
            .ok_or_else(|| anyhow!("no expiry date for {code:?}"))?;
        if expiry >= last_seen {
            return Ok(expiry);
        }
        year += 10;
    }
}

/// Build a metadata table from a panel alone: per contract, the last
/// observed `ts` anchors expiry inference, and `last_trade_date` is set two
/// business days before the inferred expiry. Rows come out sorted by
/// expiry.
pub fn build_meta_from_panel(panel: &PricePanel) -> anyhow::Result<MetaTable> {
    let mut last_seen: ahash::AHashMap<ContractId, NaiveDate> = ahash::AHashMap::new();
    for row in panel.iter() {
        let date = row.ts.date();
        last_seen
            .entry(row.contract.clone())
            .and_modify(|d| {
                if date > *d {
                    *d = date;
                }
            })
            .or_insert(date);
    }

    let mut rows = Vec::with_capacity(last_seen.len());
    for (contract, seen) in last_seen {
        let expiry = infer_expiry(contract.as_str(), seen)
            .with_context(|| format!("infer expiry for {contract}"))?;
        rows.push(
            ContractMeta::new(contract, expiry).with_last_trade_date(sub_weekdays(expiry, 2)),
        );
    }
    rows.sort_by_key(|m| m.expiry);
    Ok(MetaTable::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn parses_one_and_two_digit_years() {
        let sr3 = parse_contract_code("SR3H5").unwrap();
        assert_eq!(sr3.root, "SR3");
        assert_eq!(sr3.month, 3);
        assert_eq!(sr3.year_digits, 5);

        let es = parse_contract_code("ESZ25").unwrap();
        assert_eq!(es.root, "ES");
        assert_eq!(es.month, 12);
        assert_eq!(es.year_digits, 25);
        assert_eq!(es.year_digit_count, 2);

        assert!(parse_contract_code("SPY").is_none());
        assert!(parse_contract_code("Z5").is_none()); // no root
    }

    #[test]
    fn third_wednesday_is_correct() {
        assert_eq!(third_wednesday(2024, 3).unwrap(), d("2024-03-20"));
        assert_eq!(third_wednesday(2025, 3).unwrap(), d("2025-03-19"));
        assert_eq!(third_wednesday(2024, 12).unwrap(), d("2024-12-18"));
    }

    #[test]
    fn single_digit_year_resolves_by_last_seen() {
        // SR3H5 seen in Dec 2024 is the March 2025 contract...
        assert_eq!(
            infer_expiry("SR3H5", d("2024-12-01")).unwrap(),
            d("2025-03-19")
        );
        // ...seen after that expiry it must be 2035.
        assert_eq!(
            infer_expiry("SR3H5", d("2025-04-01")).unwrap(),
            third_wednesday(2035, 3).unwrap()
        );
    }

    #[test]
    fn two_digit_year_pivots_at_2000() {
        assert_eq!(
            infer_expiry("ESZ25", d("2024-01-01")).unwrap(),
            third_wednesday(2025, 12).unwrap()
        );
    }

    #[test]
    fn meta_from_panel_sorts_by_expiry() {
        use chrono::NaiveDateTime;
        use curve_lib::schema::PanelRow;

        let ts = |s: &str| -> NaiveDateTime { format!("{s}T00:00:00").parse().unwrap() };
        let row = |t: &str, c: &str| PanelRow {
            ts: ts(t),
            contract: ContractId::from(c),
            price: Some(1.0),
            volume: None,
        };
        let panel = PricePanel::from_rows(vec![
            row("2024-11-29", "SR3M5"),
            row("2024-12-02", "SR3H5"),
            row("2024-11-29", "SR3H5"),
        ]);
        let meta = build_meta_from_panel(&panel).unwrap();
        let rows: Vec<_> = meta.iter().collect();
        assert_eq!(rows[0].contract, ContractId::from("SR3H5"));
        assert_eq!(rows[0].expiry, d("2025-03-19"));
        assert_eq!(
            rows[0].last_trade_date,
            Some(sub_weekdays(d("2025-03-19"), 2))
        );
        assert_eq!(rows[1].contract, ContractId::from("SR3M5"));
    }
}
