//! Revenue aggregation over a charge stream.
//!
//! The aggregation is pure over any `Iterator<Item = Result<Charge>>`, which
//! keeps it testable without a live Stripe account: production wires in
//! `StripeClient::charges_since`, tests wire in fixture vectors.

use crate::stripe::Charge;
use anyhow::Result;

/// Aggregated totals for one reporting window. All money fields are integer
/// minor units (cents); conversion to dollars happens only at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueSummary {
    pub window_days: u32,
    /// Whole-dollar amount filter; 0 means disabled.
    pub filter_amount_usd: i64,
    pub charge_count: u64,
    pub gross_minor: i64,
    pub refunded_minor: i64,
}

impl RevenueSummary {
    /// Net revenue. Negative when refunds in the window exceed gross (e.g.
    /// refunds issued for charges created before the window); reported
    /// faithfully, never clamped.
    pub fn net_minor(&self) -> i64 {
        self.gross_minor - self.refunded_minor
    }

    /// Renders the fixed-order, line-oriented summary.
    ///
    /// The `filter_amount_usd` line appears only when the filter is active.
    pub fn render(&self) -> String {
        let mut out = String::from("Stripe Revenue Snapshot\n");
        out.push_str(&format!("window_days: {}\n", self.window_days));
        if self.filter_amount_usd > 0 {
            out.push_str(&format!("filter_amount_usd: {}\n", self.filter_amount_usd));
        }
        out.push_str(&format!("charge_count: {}\n", self.charge_count));
        out.push_str(&format!("gross_usd: {}\n", format_usd(self.gross_minor)));
        out.push_str(&format!(
            "refunded_usd: {}\n",
            format_usd(self.refunded_minor)
        ));
        out.push_str(&format!("net_usd: {}\n", format_usd(self.net_minor())));
        out
    }
}

fn format_usd(minor: i64) -> String {
    format!("{:.2}", minor as f64 / 100.0)
}

/// Folds a charge stream into a `RevenueSummary`.
///
/// A charge counts only when `paid` and `status == "succeeded"`. When
/// `filter_amount_usd` is positive, the charge must additionally match the
/// derived minor-unit amount exactly. The first upstream error aborts the
/// whole aggregation; there is no partial-result reporting.
pub fn aggregate_charges<I>(
    charges: I,
    window_days: u32,
    filter_amount_usd: i64,
) -> Result<RevenueSummary>
where
    I: IntoIterator<Item = Result<Charge>>,
{
    let target_minor = if filter_amount_usd > 0 {
        filter_amount_usd * 100
    } else {
        0
    };

    let mut summary = RevenueSummary {
        window_days,
        filter_amount_usd: filter_amount_usd.max(0),
        charge_count: 0,
        gross_minor: 0,
        refunded_minor: 0,
    };

    for charge in charges {
        let charge = charge?;
        if !charge.paid {
            continue;
        }
        if charge.status != "succeeded" {
            continue;
        }
        if target_minor != 0 && charge.amount != target_minor {
            continue;
        }
        summary.charge_count += 1;
        summary.gross_minor += charge.amount;
        summary.refunded_minor += charge.amount_refunded;
    }

    Ok(summary)
}
