//! Renderer module
//!
//! Renders query results to the supported output formats: table, json, jsonl, md

use std::io::Write;

use crate::core::model::{
    ConditionBreakdown, OverviewLine, Record, Rounding, AMOUNT, CONDITION, ID, NAME, TYPE,
};

/// Displayed columns and their minimum widths
pub const COLUMNS: [(&str, usize); 5] = [(ID, 5), (NAME, 20), (TYPE, 15), (CONDITION, 10), (AMOUNT, 7)];

/// Printed instead of a table when nothing was selected
pub const NO_ITEMS: &str = "No items to display for the given criteria.";

/// Printed instead of percentages when no record matched
pub const NO_CONDITIONS: &str = "No items found matching the filter.";

const SEPARATOR: &str = " | ";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Jsonl,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
    pub rounding: Rounding,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }
}

/// Left-justify `value` to `width` characters; longer values are kept whole.
fn pad(value: &str, width: usize) -> String {
    format!("{:<width$}", value, width = width)
}

/// Header line of the fixed-width table
pub fn table_header() -> String {
    COLUMNS
        .iter()
        .map(|(column, width)| pad(column, *width))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Rule under the header, as long as the header itself
pub fn table_rule() -> String {
    "-".repeat(table_header().chars().count())
}

/// One fixed-width table row; missing cells render empty
pub fn table_row(record: &Record) -> String {
    COLUMNS
        .iter()
        .map(|(column, width)| pad(record.get_or(column, ""), *width))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Lines of the fixed-width table, or the single notice line when empty
pub fn table_lines(records: &[&Record]) -> Vec<String> {
    if records.is_empty() {
        return vec![NO_ITEMS.to_string()];
    }

    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(table_header());
    lines.push(table_rule());
    lines.extend(records.iter().map(|r| table_row(r)));
    lines
}

/// Write the fixed-width table to a writer, one line per row
pub fn write_table<W: Write>(records: &[&Record], mut writer: W) -> std::io::Result<()> {
    for line in table_lines(records) {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

/// Format a percentage the way the text outputs show it
pub fn format_percent(percent: f64, rounding: Rounding) -> String {
    match rounding {
        Rounding::Exact => format!("{:.2}%", percent),
        Rounding::Decimals(places) => format!("{:.*}%", places as usize, percent),
    }
}

/// Renderer for query results
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    fn to_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> String {
        let result = if self.config.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        result.unwrap_or_else(|_| "null".to_string())
    }

    fn to_jsonl<T: serde::Serialize>(&self, values: &[T]) -> String {
        values
            .iter()
            .map(|v| self.to_json(v))
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render records; `empty_notice` replaces an empty text/markdown table
    pub fn render_records(&self, records: &[&Record], empty_notice: &str) -> String {
        match self.config.format {
            OutputFormat::Table => {
                if records.is_empty() {
                    empty_notice.to_string()
                } else {
                    table_lines(records).join("\n")
                }
            }
            OutputFormat::Json => self.to_json(records),
            OutputFormat::Jsonl => self.to_jsonl(records),
            OutputFormat::Markdown => {
                if records.is_empty() {
                    return format!("_{}_\n", empty_notice);
                }
                let mut output = String::new();
                let header: Vec<&str> = COLUMNS.iter().map(|(c, _)| *c).collect();
                output.push_str(&format!("| {} |\n", header.join(" | ")));
                output.push_str(&format!("|{}\n", "---|".repeat(COLUMNS.len())));
                for record in records {
                    let cells: Vec<String> = COLUMNS
                        .iter()
                        .map(|(c, _)| escape_md(record.get_or(c, "")))
                        .collect();
                    output.push_str(&format!("| {} |\n", cells.join(" | ")));
                }
                output
            }
        }
    }

    /// Render a condition distribution
    pub fn render_breakdown(&self, breakdown: &ConditionBreakdown) -> String {
        match self.config.format {
            OutputFormat::Table => {
                if breakdown.is_empty() {
                    return NO_CONDITIONS.to_string();
                }
                breakdown
                    .shares
                    .iter()
                    .map(|s| {
                        format!(
                            "{}: {}",
                            s.condition,
                            format_percent(s.percent, self.config.rounding)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            OutputFormat::Json => self.to_json(breakdown),
            OutputFormat::Jsonl => self.to_jsonl(&breakdown.shares),
            OutputFormat::Markdown => {
                if breakdown.is_empty() {
                    return format!("_{}_\n", NO_CONDITIONS);
                }
                let mut output = String::from("| Condition | Count | Percent |\n|---|---|---|\n");
                for s in &breakdown.shares {
                    output.push_str(&format!(
                        "| {} | {} | {} |\n",
                        escape_md(&s.condition),
                        s.count,
                        format_percent(s.percent, self.config.rounding)
                    ));
                }
                output
            }
        }
    }

    /// Render the per-item overview
    pub fn render_overview(&self, lines: &[OverviewLine]) -> String {
        match self.config.format {
            OutputFormat::Table => {
                if lines.is_empty() {
                    return NO_ITEMS.to_string();
                }
                lines
                    .iter()
                    .map(|l| overview_text(l, self.config.rounding))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            OutputFormat::Json => self.to_json(lines),
            OutputFormat::Jsonl => self.to_jsonl(lines),
            OutputFormat::Markdown => {
                if lines.is_empty() {
                    return format!("_{}_\n", NO_ITEMS);
                }
                let mut output =
                    String::from("| Name | Condition | Amount | Percent |\n|---|---|---|---|\n");
                for l in lines {
                    output.push_str(&format!(
                        "| {} | {} | {} | {} |\n",
                        escape_md(&l.name),
                        escape_md(&l.condition),
                        escape_md(&l.amount),
                        format_percent(l.percent, self.config.rounding)
                    ));
                }
                output
            }
        }
    }
}

/// Text form of one overview line
pub fn overview_text(line: &OverviewLine, rounding: Rounding) -> String {
    format!(
        "{} (Condition: {}, Amount: {}): {}: {}",
        line.name,
        line.condition,
        line.amount,
        line.condition,
        format_percent(line.percent, rounding)
    )
}

fn escape_md(value: &str) -> String {
    value.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ConditionShare;

    fn record(id: &str, name: &str, kind: &str, condition: &str, amount: &str) -> Record {
        Record::from_pairs([
            (ID, id),
            (NAME, name),
            (TYPE, kind),
            (CONDITION, condition),
            (AMOUNT, amount),
        ])
    }

    fn breakdown() -> ConditionBreakdown {
        ConditionBreakdown {
            total: 3,
            shares: vec![
                ConditionShare {
                    condition: "Good".to_string(),
                    count: 2,
                    percent: 200.0 / 3.0,
                },
                ConditionShare {
                    condition: "Rotten".to_string(),
                    count: 1,
                    percent: 100.0 / 3.0,
                },
            ],
        }
    }

    #[test]
    fn test_table_header_layout() {
        let header = table_header();
        assert_eq!(
            header,
            "ID    | Name                 | Type            | Condition  | Amount "
        );
        assert_eq!(header.len(), 69);
    }

    #[test]
    fn test_table_rule_matches_header_length() {
        assert_eq!(table_rule(), "-".repeat(69));
    }

    #[test]
    fn test_table_row_pads_cells() {
        let row = table_row(&record("1", "Axe", "Weapon", "Good", "1"));
        assert_eq!(
            row,
            "1     | Axe                  | Weapon          | Good       | 1      "
        );
    }

    #[test]
    fn test_table_row_keeps_long_values() {
        let long = "A very long item name that overflows";
        let row = table_row(&record("1", long, "Tool", "Good", "1"));
        assert!(row.contains(long));
    }

    #[test]
    fn test_table_row_missing_cells_render_empty() {
        let row = table_row(&Record::from_pairs([(ID, "9")]));
        assert!(row.starts_with("9     | "));
        assert_eq!(row.chars().count(), 69);
    }

    #[test]
    fn test_table_row_pads_by_characters() {
        let row = table_row(&record("1", "Café", "Food", "Good", "1"));
        assert_eq!(row.chars().count(), 69);
    }

    #[test]
    fn test_table_lines_empty() {
        assert_eq!(table_lines(&[]), vec![NO_ITEMS.to_string()]);
    }

    #[test]
    fn test_write_table() {
        let axe = record("1", "Axe", "Weapon", "Good", "1");
        let mut buffer = Vec::new();
        write_table(&[&axe], &mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].starts_with("1 "));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("MARKDOWN".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
    }

    #[test]
    fn test_output_format_parse_invalid() {
        let result = "yaml".parse::<OutputFormat>();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Unknown format"));
    }

    #[test]
    fn test_render_config_builders() {
        let config = RenderConfig::new(OutputFormat::Json)
            .with_pretty(true)
            .with_rounding(Rounding::Decimals(2));
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.pretty);
        assert_eq!(config.rounding, Rounding::Decimals(2));
    }

    #[test]
    fn test_render_records_empty_notice() {
        let renderer = Renderer::new(OutputFormat::Table);
        assert_eq!(renderer.render_records(&[], "Nothing here."), "Nothing here.");
    }

    #[test]
    fn test_render_records_json() {
        let axe = record("1", "Axe", "Weapon", "Good", "1");
        let renderer = Renderer::new(OutputFormat::Json);
        let output = renderer.render_records(&[&axe], NO_ITEMS);
        assert!(output.starts_with('['));
        assert!(output.contains(r#""Name":"Axe""#));
    }

    #[test]
    fn test_render_records_jsonl() {
        let axe = record("1", "Axe", "Weapon", "Good", "1");
        let apple = record("2", "Apple", "Food", "Rotten", "3");
        let renderer = Renderer::new(OutputFormat::Jsonl);
        let output = renderer.render_records(&[&axe, &apple], NO_ITEMS);
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_render_records_markdown() {
        let pipe = record("1", "Rope | Twine", "Tool", "Good", "1");
        let renderer = Renderer::new(OutputFormat::Markdown);
        let output = renderer.render_records(&[&pipe], NO_ITEMS);
        assert!(output.starts_with("| ID | Name | Type | Condition | Amount |"));
        assert!(output.contains("Rope \\| Twine"));
    }

    #[test]
    fn test_render_breakdown_table() {
        let renderer = Renderer::new(OutputFormat::Table);
        let output = renderer.render_breakdown(&breakdown());
        assert_eq!(output, "Good: 66.67%\nRotten: 33.33%");
    }

    #[test]
    fn test_render_breakdown_custom_precision() {
        let config = RenderConfig::new(OutputFormat::Table).with_rounding(Rounding::Decimals(1));
        let output = Renderer::with_config(config).render_breakdown(&breakdown());
        assert_eq!(output, "Good: 66.7%\nRotten: 33.3%");
    }

    #[test]
    fn test_render_breakdown_empty() {
        let renderer = Renderer::new(OutputFormat::Table);
        let output = renderer.render_breakdown(&ConditionBreakdown::default());
        assert_eq!(output, NO_CONDITIONS);
    }

    #[test]
    fn test_render_breakdown_json() {
        let renderer = Renderer::new(OutputFormat::Json);
        let value: serde_json::Value =
            serde_json::from_str(&renderer.render_breakdown(&breakdown())).unwrap();
        assert_eq!(value["total"], 3);
        assert_eq!(value["shares"][0]["condition"], "Good");
        assert_eq!(value["shares"][1]["count"], 1);
    }

    #[test]
    fn test_render_overview_table() {
        let line = OverviewLine {
            name: "Axe".to_string(),
            condition: "Good".to_string(),
            amount: "1".to_string(),
            percent: 50.0,
        };
        let renderer = Renderer::new(OutputFormat::Table);
        assert_eq!(
            renderer.render_overview(&[line]),
            "Axe (Condition: Good, Amount: 1): Good: 50.00%"
        );
    }

    #[test]
    fn test_render_json_pretty() {
        let axe = record("1", "Axe", "Weapon", "Good", "1");
        let config = RenderConfig::new(OutputFormat::Json).with_pretty(true);
        let output = Renderer::with_config(config).render_records(&[&axe], NO_ITEMS);
        assert!(output.contains("\n  "));
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(50.0, Rounding::Exact), "50.00%");
        assert_eq!(format_percent(33.3333, Rounding::Decimals(3)), "33.333%");
        assert_eq!(format_percent(12.0, Rounding::Decimals(0)), "12%");
    }
}
