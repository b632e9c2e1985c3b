//! Rendering of analysis results and notifications.

use std::io;

use colored::{ColoredString, Colorize};
use inferview::{
    AnalysisResult, Notification, NotificationLevel, ResultHeader, ResultView, SemanticCategory,
    present, present_preview,
};

use crate::cli::{DisplayArgs, OutputFormat};

/// Widest a table cell may grow before it is truncated.
const MAX_CELL_WIDTH: usize = 32;

/// Print transient notifications to stderr so stdout stays machine-readable.
pub fn print_notifications(notifications: &[Notification]) {
    for note in notifications {
        match note.level {
            NotificationLevel::Success => eprintln!("{} {}", "✓".green().bold(), note.text),
            NotificationLevel::Error => eprintln!("{} {}", "✗".red().bold(), note.text),
        }
    }
}

/// Render a result in the requested format.
pub fn render_result(
    result: &AnalysisResult,
    display: &DisplayArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let header = ResultHeader::from_result(result);
    let view = match display.row_limit() {
        Some(limit) => present_preview(result, limit),
        None => present(result),
    };

    match display.format {
        OutputFormat::Table => print_table(&header, &view),
        OutputFormat::Csv => write_csv(&view, io::stdout())?,
        OutputFormat::Json => {
            let output = serde_json::json!({
                "header": header,
                "columns": view.columns,
                "rows": view.rows,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Write the view as CSV: column names, then formatted cells.
pub fn write_csv<W: io::Write>(view: &ResultView, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(view.column_names())?;
    for row in &view.rows {
        wtr.write_record(view.cells(row))?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_table(header: &ResultHeader, view: &ResultView) {
    println!(
        "{} {}",
        "Analysis results for".cyan().bold(),
        header.file_name.white()
    );
    println!();
    if !header.id.is_empty() {
        println!("  Id:       {}", header.id);
    }
    println!("  Uploaded: {}", header.upload_time);
    println!("  Columns:  {}", header.column_count);
    println!("  Rows:     {}", header.row_count);
    println!();

    if view.columns.is_empty() {
        println!("{}", "No columns to display.".yellow());
        return;
    }

    let widths: Vec<usize> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let cells = view
                .rows
                .iter()
                .map(|row| view.cells(row)[i].chars().count());
            cells
                .chain([col.column_name.chars().count(), col.label.chars().count()])
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let names: Vec<String> = view
        .columns
        .iter()
        .zip(&widths)
        .map(|(col, w)| pad(&col.column_name, *w).bold().to_string())
        .collect();
    println!("  {}", names.join("  "));

    let labels: Vec<String> = view
        .columns
        .iter()
        .zip(&widths)
        .map(|(col, w)| category_color(col.category, &pad(&col.label, *w)).to_string())
        .collect();
    println!("  {}", labels.join("  "));

    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    println!("  {}", rule.join("  ").dimmed());

    for row in &view.rows {
        let cells: Vec<String> = view
            .cells(row)
            .into_iter()
            .zip(view.columns.iter().zip(&widths))
            .map(|(cell, (col, w))| {
                if col.category.is_numeric() {
                    pad_left(cell, *w)
                } else {
                    pad(cell, *w)
                }
            })
            .collect();
        println!("  {}", cells.join("  "));
    }

    println!();
    if view.rows.len() < header.row_count {
        println!(
            "Showing {} of {} rows. Use {} to see every row.",
            view.rows.len().to_string().white().bold(),
            header.row_count,
            "--all".cyan().bold()
        );
    } else {
        println!("Showing all {} rows.", header.row_count);
    }
}

/// Pad or truncate to exactly `width` characters.
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len > width {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Like [`pad`], but right-aligned.
fn pad_left(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len > width {
        pad(text, width)
    } else {
        format!("{}{}", " ".repeat(width - len), text)
    }
}

fn category_color(category: SemanticCategory, text: &str) -> ColoredString {
    match category {
        SemanticCategory::Text => text.white(),
        SemanticCategory::Integer | SemanticCategory::Decimal => text.blue(),
        SemanticCategory::Boolean => text.magenta(),
        SemanticCategory::DateTime => text.green(),
        SemanticCategory::Category => text.yellow(),
        SemanticCategory::ComplexNumber => text.cyan(),
        SemanticCategory::Unknown => text.dimmed(),
    }
}
