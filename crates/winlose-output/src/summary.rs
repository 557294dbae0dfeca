//! Per-share totals over a performance report.
//!
//! Monthly percentages are summed, not compounded, matching how residuals are
//! accumulated during portfolio construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use winlose_data::Month;
use winlose_engine::{MarketReturn, PerformanceReport, ShareRole};

/// Totals for one selected share.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShareSummary {
    /// Share code.
    pub share: String,

    /// Side of the portfolio.
    pub role: ShareRole,

    /// Cumulative residual at portfolio formation.
    pub formation_residual: Option<f64>,

    /// Sum of monthly percent returns over the report.
    pub total_return: f64,

    /// Sum of monthly residuals over the report.
    pub total_residual: f64,

    /// Months whose price was carried forward.
    pub carried_forward_months: usize,
}

/// Summary of a whole report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceSummary {
    /// Month the portfolio was formed for.
    pub start_month: Month,

    /// Last reported month, if any.
    pub end_month: Option<Month>,

    /// Number of reported months.
    pub months: usize,

    /// Estimator residuals were measured against.
    pub market_return: MarketReturn,

    /// Sum of monthly market average returns.
    pub market_average_return: f64,

    /// Sum of monthly market total returns.
    pub market_total_return: f64,

    /// Winners then losers, in selection order.
    pub shares: Vec<ShareSummary>,
}

impl PerformanceSummary {
    /// Aggregate a report.
    ///
    /// # Examples
    ///
    /// ```
    /// use winlose_data::Month;
    /// use winlose_engine::{MarketReturn, PerformanceReport, Selection};
    /// use winlose_output::PerformanceSummary;
    ///
    /// let report = PerformanceReport {
    ///     selection: Selection::from_ranking(Month::new(2009, 8).unwrap(), vec![], 0),
    ///     market_return: MarketReturn::Average,
    ///     rows: vec![],
    /// };
    ///
    /// let summary = PerformanceSummary::from_report(&report);
    /// assert_eq!(summary.months, 0);
    /// assert_eq!(summary.spread(), None);
    /// ```
    pub fn from_report(report: &PerformanceReport) -> Self {
        let mut shares: Vec<ShareSummary> = report
            .selection
            .shares()
            .map(|(role, share)| ShareSummary {
                share: share.to_string(),
                role,
                formation_residual: report.selection.cumulative_residual(share),
                total_return: 0.0,
                total_residual: 0.0,
                carried_forward_months: 0,
            })
            .collect();

        let mut market_average_return = 0.0;
        let mut market_total_return = 0.0;
        for row in &report.rows {
            market_average_return += row.market_average_return;
            market_total_return += row.market_total_return;
            for (summary, performance) in shares.iter_mut().zip(&row.shares) {
                summary.total_return += performance.percent_return;
                summary.total_residual += performance.residual;
                if performance.carried_forward {
                    summary.carried_forward_months += 1;
                }
            }
        }

        Self {
            start_month: report.start_month(),
            end_month: report.rows.last().map(|row| row.month),
            months: report.rows.len(),
            market_return: report.market_return,
            market_average_return,
            market_total_return,
            shares,
        }
    }

    /// Mean total residual of the shares on one side.
    pub fn mean_residual(&self, role: ShareRole) -> Option<f64> {
        let residuals: Vec<f64> = self
            .shares
            .iter()
            .filter(|s| s.role == role)
            .map(|s| s.total_residual)
            .collect();
        if residuals.is_empty() {
            return None;
        }
        Some(residuals.iter().sum::<f64>() / residuals.len() as f64)
    }

    /// Mean winner residual minus mean loser residual.
    ///
    /// `None` unless both sides have at least one share.
    pub fn spread(&self) -> Option<f64> {
        Some(self.mean_residual(ShareRole::Winner)? - self.mean_residual(ShareRole::Loser)?)
    }

    fn period(&self) -> String {
        match self.end_month {
            Some(end) => format!("{} to {}", self.start_month, end),
            None => format!("{} (no months reported)", self.start_month),
        }
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\nWinners and Losers\n");
        output.push_str(&format!("Period: {} ({} months)\n", self.period(), self.months));
        output.push_str(&format!("Residuals against: {}\n", self.market_return));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str(&format!(
            "  Market average return:    {:.2}%\n",
            self.market_average_return
        ));
        output.push_str(&format!(
            "  Market total return:      {:.2}%\n",
            self.market_total_return
        ));
        if let Some(spread) = self.spread() {
            output.push_str(&format!("  Winner - loser spread:    {spread:.2}%\n"));
        }

        if !self.shares.is_empty() {
            output.push('\n');
            output.push_str(&format!(
                "{:<8} {:<12} {:>14} {:>12} {:>12} {:>8}\n",
                "Side", "Share", "Formation", "Return", "Residual", "Carried"
            ));
            output.push_str(&"-".repeat(80));
            output.push('\n');

            for share in &self.shares {
                output.push_str(&format!(
                    "{:<8} {:<12} {:>14} {:>11.2}% {:>11.2}% {:>8}\n",
                    share.role,
                    share.share,
                    share
                        .formation_residual
                        .map(|r| format!("{r:.2}%"))
                        .unwrap_or_default(),
                    share.total_return,
                    share.total_residual,
                    share.carried_forward_months
                ));
            }
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Winners and Losers\n\n");
        output.push_str(&format!(
            "**Period:** {} ({} months)\n\n",
            self.period(),
            self.months
        ));

        output.push_str("## Market\n\n");
        output.push_str(&format!(
            "- **Market average return:** {:.2}%\n",
            self.market_average_return
        ));
        output.push_str(&format!(
            "- **Market total return:** {:.2}%\n",
            self.market_total_return
        ));
        output.push_str(&format!(
            "- **Residuals against:** {}\n",
            self.market_return
        ));
        if let Some(spread) = self.spread() {
            output.push_str(&format!("- **Winner - loser spread:** {spread:.2}%\n"));
        }
        output.push('\n');

        if !self.shares.is_empty() {
            output.push_str("## Shares\n\n");
            output.push_str("| Side | Share | Formation | Return | Residual | Carried |\n");
            output.push_str("|------|-------|-----------|--------|----------|---------|\n");

            for share in &self.shares {
                output.push_str(&format!(
                    "| {} | {} | {} | {:.2}% | {:.2}% | {} |\n",
                    share.role,
                    share.share,
                    share
                        .formation_residual
                        .map(|r| format!("{r:.2}%"))
                        .unwrap_or_default(),
                    share.total_return,
                    share.total_residual,
                    share.carried_forward_months
                ));
            }
        }

        output
    }
}

impl fmt::Display for PerformanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Winners and Losers: {}", self.period())?;
        writeln!(f, "  Market average return: {:.2}%", self.market_average_return)?;
        writeln!(f, "  Market total return: {:.2}%", self.market_total_return)?;
        if let Some(spread) = self.spread() {
            writeln!(f, "  Winner - loser spread: {spread:.2}%")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use winlose_engine::{PerformanceRow, RankedShare, Selection, SharePerformance};

    fn month(m: u32) -> Month {
        Month::new(2009, m).unwrap()
    }

    fn performance(share: &str, role: ShareRole, percent: f64, rm: f64) -> SharePerformance {
        SharePerformance {
            share: share.to_string(),
            role,
            absolute_return: percent,
            percent_return: percent,
            residual: percent - rm,
            carried_forward: percent == 0.0,
        }
    }

    fn report() -> PerformanceReport {
        let selection = Selection::from_ranking(
            month(3),
            vec![
                RankedShare {
                    share: "L".to_string(),
                    cumulative_residual: -8.0,
                },
                RankedShare {
                    share: "W".to_string(),
                    cumulative_residual: 12.0,
                },
            ],
            1,
        );
        let row = |m, rm, w, l| PerformanceRow {
            month: month(m),
            market_average_return: rm,
            market_total_return: rm / 2.0,
            shares: vec![
                performance("W", ShareRole::Winner, w, rm),
                performance("L", ShareRole::Loser, l, rm),
            ],
        };

        PerformanceReport {
            selection,
            market_return: MarketReturn::Average,
            rows: vec![row(3, 1.0, 5.0, 0.0), row(4, 2.0, -1.0, 4.0)],
        }
    }

    #[test]
    fn test_summary_totals() {
        let summary = PerformanceSummary::from_report(&report());

        assert_eq!(summary.months, 2);
        assert_eq!(summary.start_month, month(3));
        assert_eq!(summary.end_month, Some(month(4)));
        assert_relative_eq!(summary.market_average_return, 3.0);
        assert_relative_eq!(summary.market_total_return, 1.5);

        let winner = &summary.shares[0];
        assert_eq!(winner.share, "W");
        assert_eq!(winner.formation_residual, Some(12.0));
        assert_relative_eq!(winner.total_return, 4.0);
        // (5 - 1) + (-1 - 2)
        assert_relative_eq!(winner.total_residual, 1.0);

        let loser = &summary.shares[1];
        assert_relative_eq!(loser.total_residual, 1.0);
        assert_eq!(loser.carried_forward_months, 1);
    }

    #[test]
    fn test_spread() {
        let summary = PerformanceSummary::from_report(&report());
        assert_relative_eq!(summary.spread().unwrap(), 0.0);
        assert_relative_eq!(summary.mean_residual(ShareRole::Winner).unwrap(), 1.0);
    }

    #[test]
    fn test_ascii_table() {
        let table = PerformanceSummary::from_report(&report()).to_ascii_table();
        assert!(table.contains("Winners and Losers"));
        assert!(table.contains("Mar-2009 to Apr-2009"));
        assert!(table.contains("Winner"));
        assert!(table.contains("12.00%"));
        assert!(table.contains("market average return"));
    }

    #[test]
    fn test_markdown() {
        let markdown = PerformanceSummary::from_report(&report()).to_markdown();
        assert!(markdown.contains("# Winners and Losers"));
        assert!(markdown.contains("| Side | Share |"));
        assert!(markdown.contains("| Loser | L | -8.00% |"));
    }

    #[test]
    fn test_display() {
        let text = PerformanceSummary::from_report(&report()).to_string();
        assert!(text.contains("Winner - loser spread: 0.00%"));
    }
}
