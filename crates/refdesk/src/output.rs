//! Output formatting: table, JSON, YAML, plain.
//!
//! Tables are built from the core `Column` descriptors, so the same column
//! list drives `list`, `browse` and header-click sorting.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use refdesk_core::{Cell, Column, row_cells};
use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Table columns whose custom cells are pre-rendered text.
pub type TextColumn<T> = Column<T, String>;

// ── Color ────────────────────────────────────────────────────────────

pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Status line on stderr.
pub fn success(message: &str, color: bool) {
    if color {
        eprintln!("{} {message}", "✓".green());
    } else {
        eprintln!("✓ {message}");
    }
}

pub fn failure(message: &str, color: bool) {
    if color {
        eprintln!("{} {}", "✗".red(), message.red());
    } else {
        eprintln!("✗ {message}");
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render rows in the chosen format. `plain` prints one id per line.
pub fn render_rows<T: Serialize>(
    format: OutputFormat,
    rows: &[T],
    columns: &[TextColumn<T>],
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(render_table(rows, columns)),
        OutputFormat::Json => render_json(rows, false),
        OutputFormat::JsonCompact => render_json(rows, true),
        OutputFormat::Yaml => render_yaml(rows),
        OutputFormat::Plain => Ok(rows.iter().map(id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render one record. The table form lists its fields one per line.
pub fn render_single<T: Serialize>(
    format: OutputFormat,
    data: &T,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => render_detail(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<T: Serialize>(rows: &[T], columns: &[TextColumn<T>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(header));
    for row in rows {
        builder.push_record(row_cells(columns, row).into_iter().map(cell_text));
    }
    builder.build().with(Style::rounded()).to_string()
}

fn header<T>(column: &TextColumn<T>) -> String {
    if column.sortable {
        format!("{} ↕", column.title)
    } else {
        column.title.clone()
    }
}

fn cell_text(cell: Cell<String>) -> String {
    match cell {
        Cell::Text(text) | Cell::Custom(text) => text,
        Cell::Boolean(true) => "yes".into(),
        Cell::Boolean(false) => "no".into(),
    }
}

fn render_detail<T: Serialize>(data: &T) -> Result<String, CliError> {
    let Value::Object(fields) = serde_json::to_value(data)? else {
        return render_json(data, false);
    };
    let width = fields.keys().map(String::len).max().unwrap_or(0) + 1;
    let lines: Vec<String> = fields
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Null => String::new(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let label = format!("{key}:");
            format!("{label:<width$} {value}")
        })
        .collect();
    Ok(lines.join("\n"))
}

fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Internal(format!("YAML output failed: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Row {
        id: u64,
        name: String,
        active: bool,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: 1,
                name: "North".into(),
                active: true,
            },
            Row {
                id: 2,
                name: "South".into(),
                active: false,
            },
        ]
    }

    fn columns() -> Vec<TextColumn<Row>> {
        vec![
            Column::text("id", "ID").sortable(),
            Column::text("name", "Name"),
            Column::boolean("active", "Active"),
            Column::custom("label", "Label", |r: &Row| format!("#{}", r.id)),
        ]
    }

    #[test]
    fn table_renders_headers_and_cells() {
        let out = render_rows(OutputFormat::Table, &rows(), &columns(), |r| r.id.to_string())
            .unwrap();
        assert!(out.contains("ID ↕"));
        assert!(out.contains("North"));
        assert!(out.contains("yes"));
        assert!(out.contains("#2"));
    }

    #[test]
    fn plain_prints_ids() {
        let out = render_rows(OutputFormat::Plain, &rows(), &columns(), |r| r.id.to_string())
            .unwrap();
        assert_eq!(out, "1\n2");
    }

    #[test]
    fn compact_json_is_one_line() {
        let out = render_rows(OutputFormat::JsonCompact, &rows(), &columns(), |r| {
            r.id.to_string()
        })
        .unwrap();
        assert!(!out.contains('\n'));
        assert!(out.starts_with("[{\"id\":1"));
    }

    #[test]
    fn detail_lists_fields() {
        let out = render_single(OutputFormat::Table, &rows()[0], |r| r.id.to_string()).unwrap();
        assert!(out.contains("name:"));
        assert!(out.contains("North"));
    }
}
