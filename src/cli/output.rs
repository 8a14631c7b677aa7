//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::{Mode, ValidationResult};
use crate::planner::{Command, CommandPlan, Layout, Piece, Template};
use crate::reconciler::RunOutcome;
use crate::resources::ResourceKind;
use crate::tree::Value;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Resource row for table display.
#[derive(Tabled, serde::Serialize)]
struct ResourceRow {
    #[tabled(rename = "Resource")]
    name: &'static str,
    #[tabled(rename = "Config")]
    layout: &'static str,
    #[tabled(rename = "Block")]
    block: String,
    #[tabled(rename = "Description")]
    description: &'static str,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the outcome of a run.
    #[must_use]
    pub fn format_outcome(&self, outcome: &RunOutcome) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(outcome).unwrap_or_default(),
            OutputFormat::Text => match &outcome.structured {
                Some(structured) => Self::format_structured_text(structured),
                None => {
                    let mut output = Self::format_plan_text(&outcome.plan);
                    if outcome.plan.mode != Mode::Rendered {
                        let changed = if outcome.changed {
                            "changed".yellow().to_string()
                        } else {
                            "unchanged".green().to_string()
                        };
                        let _ = writeln!(output, "Device: {changed}");
                    }
                    output
                }
            },
        }
    }

    /// Formats a command plan as text.
    fn format_plan_text(plan: &CommandPlan) -> String {
        if plan.is_empty() {
            return format!(
                "{} No changes required for {} ({}).\n",
                "✓".green(),
                plan.resource,
                plan.mode
            );
        }

        let mut output = String::new();
        let _ = writeln!(output, "{} {}:", plan.resource.to_string().bold(), plan.mode);
        for command in &plan.commands {
            let _ = writeln!(output, "  {}", Self::format_command(command));
        }

        let _ = write!(
            output,
            "\nPlan: {} commands, {} negations, {} prompted\n",
            plan.len(),
            plan.negation_count().to_string().red(),
            plan.prompted_count().to_string().yellow()
        );
        output
    }

    /// Colors one command line by its effect.
    fn format_command(command: &Command) -> String {
        let line = command.to_string();
        if command.is_prompted() {
            line.yellow().to_string()
        } else if command.is_negation() {
            line.red().to_string()
        } else if command.is_exit() {
            line.dimmed().to_string()
        } else {
            line.green().to_string()
        }
    }

    /// Formats structured configuration read from device text.
    #[must_use]
    pub fn format_structured(&self, structured: &Value) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(structured).unwrap_or_default(),
            OutputFormat::Text => Self::format_structured_text(structured),
        }
    }

    fn format_structured_text(structured: &Value) -> String {
        if structured.is_empty() {
            return "No configuration found.\n".to_string();
        }
        serde_yaml::to_string(structured).unwrap_or_default()
    }

    /// Formats the table of supported resources.
    #[must_use]
    pub fn format_resources(&self) -> String {
        let rows: Vec<ResourceRow> = ResourceKind::ALL
            .iter()
            .map(|kind| {
                let resource = kind.resource();
                ResourceRow {
                    name: kind.as_str(),
                    layout: match resource.layout {
                        Layout::Single(_) => "dict",
                        Layout::Keyed(_) => "list",
                    },
                    block: pattern(&resource.layout.block().enter),
                    description: resource.description,
                }
            })
            .collect();

        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&rows).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = Table::new(rows).to_string();
                output.push('\n');
                output
            }
        }
    }

    /// Formats a document validation result.
    #[must_use]
    pub fn format_validation(
        &self,
        resource: ResourceKind,
        state: Mode,
        result: &ValidationResult,
        show_warnings: bool,
    ) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "resource": resource,
                "state": state,
                "valid": result.is_valid(),
                "warnings": result.warnings,
            }))
            .unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = format!(
                    "{} Task document is valid ({resource}, state {state}).\n",
                    "✓".green()
                );
                if show_warnings && !result.warnings.is_empty() {
                    output.push_str("\nWarnings:\n");
                    for warning in &result.warnings {
                        let _ = writeln!(output, "  {} {warning}", "⚠".yellow());
                    }
                }
                output
            }
        }
    }

    /// Formats an error message.
    #[must_use]
    pub fn format_error(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "status": "error", "message": message });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!("{} {message}", "✗".red()),
        }
    }
}

/// Renders a template with `{field}` markers in place of slots.
fn pattern(template: &Template) -> String {
    let mut output = String::new();
    push_pieces(&mut output, template.pieces);
    output
}

fn push_pieces(output: &mut String, pieces: &[Piece]) {
    for piece in pieces {
        match piece {
            Piece::Text(text) => output.push_str(text),
            Piece::Slot(path) => {
                let _ = write!(output, "{{{}}}", path.join("."));
            }
            Piece::IfAll { then, .. } => {
                output.push('[');
                push_pieces(output, then);
                output.push(']');
            }
            Piece::Flag { text, .. } => {
                let _ = write!(output, "[{text}]");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaskDocument;
    use crate::reconciler::Reconciler;
    use pretty_assertions::assert_eq;

    fn outcome(state: Mode, device: Option<&str>) -> RunOutcome {
        let document = TaskDocument::new(ResourceKind::L2vpnEvpnPtp, state)
            .with_config(serde_json::json!([{"instance": "10", "rd": "1:1"}]));
        Reconciler::for_kind(ResourceKind::L2vpnEvpnPtp)
            .run(&document, device)
            .unwrap()
    }

    #[test]
    fn test_block_patterns() {
        colored::control::set_override(false);
        let table = OutputFormatter::new(OutputFormat::Text).format_resources();
        assert!(table.contains("l2vpn evpn instance {instance} point-to-point"));
        assert!(table.contains("vlan configuration {vlan}"));
        assert!(table.contains("vlan_configuration"));
    }

    #[test]
    fn test_resources_as_json() {
        let json = OutputFormatter::new(OutputFormat::Json).format_resources();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(rows.as_array().map(Vec::len), Some(ResourceKind::ALL.len()));
        assert_eq!(rows[0]["name"], "l2vpn");
        assert_eq!(rows[0]["layout"], "dict");
    }

    #[test]
    fn test_outcome_text() {
        colored::control::set_override(false);
        let text = OutputFormatter::new(OutputFormat::Text).format_outcome(&outcome(Mode::Merged, None));
        assert!(text.contains("l2vpn evpn instance 10 point-to-point\n"));
        assert!(text.contains("  rd 1:1\n"));
        assert!(text.contains("Plan: 3 commands, 0 negations, 0 prompted"));
        assert!(text.contains("Device: changed"));
    }

    #[test]
    fn test_outcome_json_carries_records() {
        let device = "l2vpn evpn instance 10 point-to-point\n rd 1:1\n";
        let document = TaskDocument::new(ResourceKind::L2vpnEvpnPtp, Mode::Deleted)
            .with_config(serde_json::json!([]));
        let outcome = Reconciler::for_kind(ResourceKind::L2vpnEvpnPtp)
            .run(&document, Some(device))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(
            &OutputFormatter::new(OutputFormat::Json).format_outcome(&outcome),
        )
        .unwrap();
        assert_eq!(json["changed"], true);
        assert_eq!(
            json["commands"][0],
            serde_json::json!({
                "command": "no l2vpn evpn instance 10 point-to-point",
                "prompt": "yes/no",
                "answer": "yes",
            })
        );
    }

    #[test]
    fn test_unchanged_outcome() {
        colored::control::set_override(false);
        let device = "l2vpn evpn instance 10 point-to-point\n rd 1:1\n";
        let text =
            OutputFormatter::new(OutputFormat::Text).format_outcome(&outcome(Mode::Merged, Some(device)));
        assert!(text.contains("No changes required for l2vpn_evpn_ptp (merged)"));
        assert!(text.contains("Device: unchanged"));
    }

    #[test]
    fn test_structured_text_is_yaml() {
        let structured = Reconciler::for_kind(ResourceKind::L2vpn)
            .parse("l2vpn\n router-id 1.1.1.1\n")
            .map(crate::planner::normalize::denormalize)
            .unwrap();
        let text = OutputFormatter::new(OutputFormat::Text).format_structured(&structured);
        assert!(text.starts_with("router_id:"));
        assert!(text.contains("1.1.1.1"));
    }
}
