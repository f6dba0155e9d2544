//! Cash flow arithmetic
//!
//! Income is sales revenue; outflow is purchase spend plus expenses.
//! All figures are in the business currency (Rupiah by default).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Expense, Purchase, Sale};
use crate::types::DateRange;

/// Days covered by the weekly summary and the daily series
pub const CASH_FLOW_WINDOW_DAYS: u32 = 7;

/// Opening capital used when none is configured
pub const DEFAULT_OPENING_CAPITAL: i64 = 50_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowStatus {
    /// Untung
    Profit,
    /// Rugi
    Loss,
    /// BEP
    BreakEven,
}

impl CashFlowStatus {
    pub fn from_net(net_flow: Decimal) -> Self {
        if net_flow > Decimal::ZERO {
            CashFlowStatus::Profit
        } else if net_flow < Decimal::ZERO {
            CashFlowStatus::Loss
        } else {
            CashFlowStatus::BreakEven
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CashFlowStatus::Profit => "profit",
            CashFlowStatus::Loss => "loss",
            CashFlowStatus::BreakEven => "break_even",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowSummary {
    pub period: DateRange,
    pub opening_capital: Decimal,
    pub income: Decimal,
    pub outflow: Decimal,
    pub closing_balance: Decimal,
    pub net_flow: Decimal,
    pub status: CashFlowStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyCashFlow {
    pub date: NaiveDate,
    pub income: Decimal,
    pub outflow: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowReport {
    pub summary: CashFlowSummary,
    pub daily: Vec<DailyCashFlow>,
}

fn total(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn income_within(sales: &[Sale], range: &DateRange) -> Decimal {
    total(
        sales
            .iter()
            .filter(|s| range.contains(s.date))
            .map(|s| s.total_price),
    )
}

fn outflow_within(purchases: &[Purchase], expenses: &[Expense], range: &DateRange) -> Decimal {
    let spent = total(
        purchases
            .iter()
            .filter(|p| range.contains(p.date))
            .map(|p| p.total_price),
    );
    let expensed = total(
        expenses
            .iter()
            .filter(|e| range.contains(e.date))
            .map(|e| e.amount),
    );
    spent.saturating_add(expensed)
}

/// Summary over the trailing week ending at `today`
pub fn weekly_summary(
    today: NaiveDate,
    opening_capital: Decimal,
    sales: &[Sale],
    purchases: &[Purchase],
    expenses: &[Expense],
) -> CashFlowSummary {
    let period = DateRange::trailing_days(today, CASH_FLOW_WINDOW_DAYS);
    let income = income_within(sales, &period);
    let outflow = outflow_within(purchases, expenses, &period);
    let net_flow = income.saturating_sub(outflow);

    CashFlowSummary {
        period,
        opening_capital,
        income,
        outflow,
        closing_balance: opening_capital.saturating_add(net_flow),
        net_flow,
        status: CashFlowStatus::from_net(net_flow),
    }
}

/// One entry per day for the trailing week, oldest first
pub fn daily_series(
    today: NaiveDate,
    sales: &[Sale],
    purchases: &[Purchase],
    expenses: &[Expense],
) -> Vec<DailyCashFlow> {
    DateRange::trailing_days(today, CASH_FLOW_WINDOW_DAYS)
        .start
        .iter_days()
        .take(CASH_FLOW_WINDOW_DAYS as usize)
        .map(|date| {
            let day = DateRange::day(date);
            let income = income_within(sales, &day);
            let outflow = outflow_within(purchases, expenses, &day);
            DailyCashFlow {
                date,
                income,
                outflow,
                net: income.saturating_sub(outflow),
            }
        })
        .collect()
}

pub fn cash_flow_report(
    today: NaiveDate,
    opening_capital: Decimal,
    sales: &[Sale],
    purchases: &[Purchase],
    expenses: &[Expense],
) -> CashFlowReport {
    CashFlowReport {
        summary: weekly_summary(today, opening_capital, sales, purchases, expenses),
        daily: daily_series(today, sales, purchases, expenses),
    }
}

/// Format an amount with Indonesian thousand separators, e.g. `Rp 4.500.000`.
/// Fractions are rounded away.
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = amount.round();
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded < Decimal::ZERO {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewExpense, NewPurchase, NewSale, PaymentStatus, ProductKind};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn sale(day: u32, qty: Decimal, price: Decimal) -> Sale {
        Sale::from_new(
            Uuid::new_v4(),
            NewSale {
                date: d(day),
                buyer: "Toko Sari".to_string(),
                product_kind: ProductKind::Beras,
                quantity_kg: qty,
                unit_price: price,
                payment_status: PaymentStatus::Paid,
                due_date: None,
                settled_date: None,
                note: None,
            },
            Utc::now(),
        )
    }

    fn purchase(day: u32, weight: Decimal, price: Decimal) -> Purchase {
        Purchase::from_new(
            Uuid::new_v4(),
            NewPurchase {
                date: d(day),
                supplier: "Pak Budi".to_string(),
                product_kind: ProductKind::Gabah,
                status: None,
                weight_kg: weight,
                unit_price: price,
                note: None,
            },
            Utc::now(),
        )
    }

    fn expense(day: u32, amount: Decimal) -> Expense {
        Expense::from_new(
            Uuid::new_v4(),
            NewExpense {
                date: d(day),
                category: "Solar".to_string(),
                amount,
                note: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_weekly_summary_profit() {
        let sales = vec![sale(16, dec!(300), dec!(15000))];
        let purchases = vec![purchase(15, dec!(100), dec!(8000))];
        let expenses = vec![expense(14, dec!(200000))];

        let summary = weekly_summary(d(16), dec!(50000000), &sales, &purchases, &expenses);
        assert_eq!(summary.income, dec!(4500000));
        assert_eq!(summary.outflow, dec!(1000000));
        assert_eq!(summary.net_flow, dec!(3500000));
        assert_eq!(summary.closing_balance, dec!(53500000));
        assert_eq!(summary.status, CashFlowStatus::Profit);
    }

    #[test]
    fn test_weekly_summary_ignores_older_entries() {
        let purchases = vec![purchase(9, dec!(1000), dec!(8000))];
        let summary = weekly_summary(d(16), dec!(0), &[], &purchases, &[]);

        assert_eq!(summary.outflow, Decimal::ZERO);
        assert_eq!(summary.status, CashFlowStatus::BreakEven);
        assert_eq!(summary.period.start, d(10));
    }

    #[test]
    fn test_weekly_summary_excludes_future_entries() {
        let sales = vec![sale(16, dec!(100), dec!(15000)), sale(17, dec!(100), dec!(15000))];
        let expenses = vec![expense(20, dec!(750000))];
        let summary = weekly_summary(d(16), dec!(0), &sales, &[], &expenses);

        assert_eq!(summary.income, dec!(1500000));
        assert_eq!(summary.outflow, Decimal::ZERO);
        assert_eq!(summary.period.end, d(16));
    }

    #[test]
    fn test_summary_saturates_instead_of_overflowing() {
        let purchases = vec![
            purchase(15, Decimal::MAX, dec!(2)),
            purchase(16, Decimal::MAX, dec!(2)),
        ];
        let summary = weekly_summary(d(16), Decimal::MIN, &[], &purchases, &[]);

        assert_eq!(summary.outflow, Decimal::MAX);
        assert_eq!(summary.net_flow, Decimal::MIN);
        assert_eq!(summary.closing_balance, Decimal::MIN);
        assert_eq!(summary.status, CashFlowStatus::Loss);
    }

    #[test]
    fn test_daily_series_covers_week() {
        let purchases = vec![purchase(10, dec!(10), dec!(8000))];
        let series = daily_series(d(16), &[], &purchases, &[]);

        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, d(10));
        assert_eq!(series[0].net, dec!(-80000));
        assert_eq!(series[6].date, d(16));
        assert_eq!(series[6].net, Decimal::ZERO);
    }

    #[test]
    fn test_status_from_net() {
        assert_eq!(CashFlowStatus::from_net(dec!(-1)), CashFlowStatus::Loss);
        assert_eq!(CashFlowStatus::from_net(Decimal::ZERO), CashFlowStatus::BreakEven);
    }

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(dec!(4500000)), "Rp 4.500.000");
        assert_eq!(format_rupiah(dec!(950)), "Rp 950");
        assert_eq!(format_rupiah(dec!(-1234.6)), "-Rp 1.235");
        assert_eq!(format_rupiah(Decimal::ZERO), "Rp 0");
    }
}
