//! Report rendering
//!
//! Formats a [`SettlementReport`] for people (aligned text tables) or for
//! other programs (JSON with participant names in place of indices).

use crate::{
    config::{ReportConfig, ReportFormat},
    types::SettlementReport,
    Result,
};
use ledger_core::{Amount, DebtMatrix, ParticipantRegistry};
use serde::Serialize;

/// Heading printed above the debt matrix
pub const MATRIX_CAPTION: &str = "Person in the row should pay the person in the column";

/// Report renderer
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    config: ReportConfig,
}

/// Named settlement for JSON output
#[derive(Debug, Serialize)]
struct NamedSettlement<'a> {
    receiver: &'a str,
    payer: &'a str,
    amount: &'a Amount,
}

/// Named position for JSON output
#[derive(Debug, Serialize)]
struct NamedPosition<'a> {
    participant: &'a str,
    total_owed: &'a Amount,
    total_receivable: &'a Amount,
    net_position: &'a Amount,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    participants: Vec<&'a str>,
    debt_matrix: &'a DebtMatrix,
    positions: Vec<NamedPosition<'a>>,
    settlements: Vec<NamedSettlement<'a>>,
    total_transferred: Amount,
}

impl ReportRenderer {
    /// Create a renderer
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Render in the configured format
    pub fn render<A>(
        &self,
        participants: &ParticipantRegistry<A>,
        report: &SettlementReport,
    ) -> Result<String> {
        match self.config.format {
            ReportFormat::Text => Ok(self.render_text(participants, report)),
            ReportFormat::Json => self.render_json(participants, report),
        }
    }

    /// Format one amount for display
    ///
    /// Without configured decimal places the amount is shown in whole minor
    /// units, truncated toward zero.
    pub fn format_amount(&self, amount: &Amount) -> String {
        match self.config.decimal_places {
            None => amount.to_minor_units().to_string(),
            Some(dp) => amount
                .round_dp(dp)
                .map(|d| format!("{:.*}", dp as usize, d))
                .unwrap_or_else(|| amount.to_string()),
        }
    }

    /// Both tables as text
    pub fn render_text<A>(
        &self,
        participants: &ParticipantRegistry<A>,
        report: &SettlementReport,
    ) -> String {
        format!(
            "{}\n{}",
            self.matrix_table(participants, &report.debt_matrix),
            self.settlement_table(participants, report)
        )
    }

    /// Debt matrix table, zero cells left blank
    pub fn matrix_table<A>(
        &self,
        participants: &ParticipantRegistry<A>,
        matrix: &DebtMatrix,
    ) -> String {
        let width = self.config.column_width;
        let mut lines = vec![MATRIX_CAPTION.to_string()];

        let header: String = participants
            .iter()
            .map(|p| format!(" {:>width$}", clip(&p.display_name, width)))
            .collect();
        lines.push(format!("{:width$}{}", "", header).trim_end().to_string());

        for debtor in participants.iter() {
            let cells: String = participants
                .iter()
                .map(|creditor| {
                    let amount = matrix.get(debtor.id, creditor.id);
                    let cell = if amount.is_zero() {
                        String::new()
                    } else {
                        self.format_amount(&amount)
                    };
                    format!(" {:>width$}", cell)
                })
                .collect();
            let line = format!("{:width$}{}", clip(&debtor.display_name, width), cells);
            lines.push(line.trim_end().to_string());
        }

        lines.join("\n") + "\n"
    }

    /// Settlement table with Receiver, Payer and Amount columns
    pub fn settlement_table<A>(
        &self,
        participants: &ParticipantRegistry<A>,
        report: &SettlementReport,
    ) -> String {
        let width = self.config.column_width;
        let mut lines = vec![format!(
            "{:width$} {:width$} {:>width$}",
            "Receiver", "Payer", "Amount"
        )];

        if report.is_settled() {
            lines.push("All settled".to_string());
        }
        lines.extend(report.settlements.iter().map(|settlement| {
            format!(
                "{:width$} {:width$} {:>width$}",
                clip(participants.name_of(settlement.receiver), width),
                clip(participants.name_of(settlement.payer), width),
                self.format_amount(&settlement.amount)
            )
        }));

        lines.join("\n") + "\n"
    }

    /// JSON document with names resolved
    pub fn render_json<A>(
        &self,
        participants: &ParticipantRegistry<A>,
        report: &SettlementReport,
    ) -> Result<String> {
        let document = JsonReport {
            participants: participants.iter().map(|p| p.display_name.as_str()).collect(),
            debt_matrix: &report.debt_matrix,
            positions: report
                .positions
                .iter()
                .map(|p| NamedPosition {
                    participant: participants.name_of(p.participant),
                    total_owed: &p.total_owed,
                    total_receivable: &p.total_receivable,
                    net_position: &p.net_position,
                })
                .collect(),
            settlements: report
                .settlements
                .iter()
                .map(|s| NamedSettlement {
                    receiver: participants.name_of(s.receiver),
                    payer: participants.name_of(s.payer),
                    amount: &s.amount,
                })
                .collect(),
            total_transferred: report.total_transferred(),
        };

        Ok(serde_json::to_string_pretty(&document)?)
    }
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}

fn clip(text: &str, width: usize) -> &str {
    match text.char_indices().nth(width) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::SettlementEngine, Config};
    use ledger_core::{Expense, ParticipantId, Share};

    fn id(i: usize) -> ParticipantId {
        ParticipantId::new(i)
    }

    fn sample() -> (ParticipantRegistry, SettlementReport) {
        let registry =
            ParticipantRegistry::from_entries([("Alice", ()), ("Bob", ()), ("Carol", ())])
                .unwrap();
        let expenses = vec![Expense::new(
            id(0),
            Amount::from(100),
            vec![Share::new(id(0), 1), Share::new(id(1), 1), Share::new(id(2), 1)],
        )];
        let report = SettlementEngine::new(&Config::default())
            .run(&registry, None, &expenses, &[])
            .unwrap();
        (registry, report)
    }

    fn renderer(decimal_places: Option<u32>, format: ReportFormat) -> ReportRenderer {
        ReportRenderer::new(ReportConfig {
            format,
            decimal_places,
            column_width: 8,
        })
    }

    #[test]
    fn test_format_amount() {
        let third = Amount::from(100) / 3;
        assert_eq!(renderer(None, ReportFormat::Text).format_amount(&third), "33");
        assert_eq!(renderer(None, ReportFormat::Text).format_amount(&-&third), "-33");
        assert_eq!(
            renderer(Some(2), ReportFormat::Text).format_amount(&third),
            "33.33"
        );
        assert_eq!(
            renderer(Some(2), ReportFormat::Text).format_amount(&Amount::from(5)),
            "5.00"
        );
    }

    #[test]
    fn test_matrix_table() {
        let (registry, report) = sample();
        let text = renderer(None, ReportFormat::Text).matrix_table(&registry, &report.debt_matrix);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], MATRIX_CAPTION);
        assert_eq!(lines[1], "            Alice      Bob    Carol");
        assert_eq!(lines[2], "Alice");
        assert_eq!(lines[3], "Bob            33");
        assert_eq!(lines[4], "Carol          33");
    }

    #[test]
    fn test_settlement_table() {
        let (registry, report) = sample();
        let text = renderer(Some(2), ReportFormat::Text).settlement_table(&registry, &report);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Receiver Payer      Amount");
        assert_eq!(lines[1], "Alice    Bob         33.33");
        assert_eq!(lines[2], "Alice    Carol       33.33");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_settled_table() {
        let registry = ParticipantRegistry::from_entries([("Alice", ()), ("Bob", ())]).unwrap();
        let report = SettlementEngine::default()
            .run(&registry, None, &[], &[])
            .unwrap();
        let text = ReportRenderer::default().settlement_table(&registry, &report);
        assert!(text.contains("All settled"));
    }

    #[test]
    fn test_render_json() {
        let (registry, report) = sample();
        let json = renderer(None, ReportFormat::Json)
            .render(&registry, &report)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["participants"][1], "Bob");
        assert_eq!(value["debt_matrix"][1][0], "100/3");
        assert_eq!(value["settlements"][0]["receiver"], "Alice");
        assert_eq!(value["settlements"][0]["payer"], "Bob");
        assert_eq!(value["settlements"][0]["amount"], "100/3");
        assert_eq!(value["total_transferred"], "200/3");
    }
}
