//! Table output for agent listings using comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use super::truncate;
use crate::domain::models::{Agent, AgentRecord, AgentStatus};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// One row per agent display row.
    pub fn format_agents(&self, agents: &[Agent]) -> String {
        let mut table = self.create_base_table();
        table.set_header(
            ["ID", "Name", "Type", "Voice", "Created", "Updated"]
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

        for agent in agents {
            let name = truncate(&agent.name, 32);
            let name_cell = if self.use_colors {
                Cell::new(name).fg(Color::Cyan)
            } else {
                Cell::new(name)
            };
            table.add_row(vec![
                Cell::new(truncate(&agent.id, 12)),
                name_cell,
                Cell::new(&agent.agent_type),
                Cell::new(&agent.voice),
                Cell::new(agent.created_at.format(TIMESTAMP_FORMAT)),
                Cell::new(agent.updated_at.format(TIMESTAMP_FORMAT)),
            ]);
        }

        table.to_string()
    }

    /// Field/value table for a single agent's configuration.
    pub fn format_agent_detail(&self, record: &AgentRecord) -> String {
        let row = Agent::from(record);
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("Field").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        let status = if self.use_colors {
            Cell::new(record.agent_status.to_string()).fg(status_color(record.agent_status))
        } else {
            Cell::new(record.agent_status.to_string())
        };

        table.add_row(vec![Cell::new("ID"), Cell::new(&record.ai_agent_id)]);
        table.add_row(vec![Cell::new("Name"), Cell::new(&record.agent_name)]);
        table.add_row(vec![Cell::new("Status"), status]);
        table.add_row(vec![Cell::new("Type"), Cell::new(&row.agent_type)]);
        table.add_row(vec![Cell::new("Model"), Cell::new(&record.llm.model_name)]);
        table.add_row(vec![Cell::new("Voice"), Cell::new(&row.voice)]);
        table.add_row(vec![
            Cell::new("Speech-to-text"),
            Cell::new(format!("{} {}", record.stt.provider, record.stt.model).trim()),
        ]);
        table.add_row(vec![
            Cell::new("Welcome message"),
            Cell::new(truncate(&record.welcome_message, 80)),
        ]);
        table.add_row(vec![
            Cell::new("System prompt"),
            Cell::new(truncate(&record.llm.system_prompt, 200)),
        ]);
        table.add_row(vec![
            Cell::new("Created"),
            Cell::new(row.created_at.format(TIMESTAMP_FORMAT)),
        ]);
        table.add_row(vec![
            Cell::new("Updated"),
            Cell::new(row.updated_at.format(TIMESTAMP_FORMAT)),
        ]);

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn supports_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    console::colors_enabled()
}

const fn status_color(status: AgentStatus) -> Color {
    match status {
        AgentStatus::Active => Color::Green,
        AgentStatus::Inactive => Color::DarkGrey,
    }
}
