//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::registrar::{ArtifactRef, InstallBatch};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Color, ContentArrangement, Table};

/// Observed state of one managed artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactState {
    Present,
    Terminating,
    Absent,
}

#[derive(Debug, Clone)]
pub struct ArtifactStatus {
    pub artifact: ArtifactRef,
    pub state: ArtifactState,
}

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Install batches in apply order, one row per artifact
    pub fn render_install_plan(&self, namespace: &str, batches: &[InstallBatch]) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("#").set_alignment(CellAlignment::Right),
                Cell::new("BATCH").set_alignment(CellAlignment::Left),
                Cell::new("KIND").set_alignment(CellAlignment::Left),
                Cell::new("NAME").set_alignment(CellAlignment::Left),
                Cell::new("MANIFEST").set_alignment(CellAlignment::Left),
            ]);

        let mut count = 0;
        for (index, batch) in batches.iter().enumerate() {
            for step in &batch.steps {
                count += 1;
                let kind = step.artifact.kind;
                table.add_row(vec![
                    Cell::new(index + 1).set_alignment(CellAlignment::Right),
                    Cell::new(batch.name),
                    Cell::new(kind).fg(self.theme.get_scope_color(kind.is_namespaced())),
                    Cell::new(&step.artifact.name),
                    Cell::new(step.path).fg(Color::DarkGrey),
                ]);
            }
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Install plan for {} {} ─╮\n",
            namespace,
            format!("[{} batches, {} artifacts]", batches.len(), count).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    /// Teardown steps in deletion order
    pub fn render_teardown_plan(&self, steps: &[ArtifactRef]) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("STEP").set_alignment(CellAlignment::Right),
                Cell::new("KIND").set_alignment(CellAlignment::Left),
                Cell::new("NAME").set_alignment(CellAlignment::Left),
                Cell::new("NAMESPACE").set_alignment(CellAlignment::Left),
            ]);

        for (index, artifact) in steps.iter().enumerate() {
            table.add_row(vec![
                Cell::new(index + 1).set_alignment(CellAlignment::Right),
                Cell::new(artifact.kind)
                    .fg(self.theme.get_scope_color(artifact.kind.is_namespaced())),
                Cell::new(&artifact.name),
                Cell::new(artifact.namespace().unwrap_or("-")),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Teardown order {} ─╮\n",
            format!("[{} steps]", steps.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    /// Present/absent per managed artifact, with an overall summary line
    pub fn render_artifact_status(&self, namespace: &str, statuses: &[ArtifactStatus]) -> String {
        let present = statuses
            .iter()
            .filter(|s| s.state != ArtifactState::Absent)
            .count();
        let total = statuses.len();

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("KIND").set_alignment(CellAlignment::Left),
                Cell::new("NAME").set_alignment(CellAlignment::Left),
                Cell::new("STATE").set_alignment(CellAlignment::Center),
            ]);

        for status in statuses {
            let (icon, text, color) = match status.state {
                ArtifactState::Present => (StatusIcon::SUCCESS, "Present", self.theme.success),
                ArtifactState::Terminating => {
                    (StatusIcon::PENDING, "Terminating", self.theme.warning)
                }
                ArtifactState::Absent => (StatusIcon::ERROR, "Absent", self.theme.error),
            };
            table.add_row(vec![
                Cell::new(status.artifact.kind),
                Cell::new(&status.artifact.name),
                Cell::new(format!("{} {}", icon, text)).fg(color),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "Namespace: {} | Status: {} {} ({}/{})\n",
            namespace,
            StatusIcon::get_ratio_icon(present, total),
            StatusIcon::get_install_text(present, total),
            present,
            total
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "Legend: {} Present  {} Terminating  {} Absent\n",
            StatusIcon::SUCCESS.green(),
            StatusIcon::PENDING.yellow(),
            StatusIcon::ERROR.red()
        ));
        output
    }
}
