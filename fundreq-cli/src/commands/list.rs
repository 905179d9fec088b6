use super::GlobalOptions;
use crate::error::CliError;
use fundreq_agents::RequestStore;
use shared_types::Request;

const HEADERS: [&str; 6] = [
    "Timestamp",
    "Number",
    "Project Name",
    "Amount",
    "Reason",
    "Original Text",
];
const MAX_WIDTHS: [usize; 6] = [19, 12, 24, 12, 32, 40];

/// Print every saved request, newest first
pub async fn list_requests(options: &GlobalOptions) -> Result<(), CliError> {
    let ctx = options.load()?;
    let store = ctx.open_store()?;

    let requests = tokio::task::spawn_blocking(move || store.list_all())
        .await
        .map_err(|e| CliError::Command(format!("Listing task failed: {e}")))??;

    print!("{}", format_requests_table(&requests));
    Ok(())
}

pub fn format_requests_table(requests: &[Request]) -> String {
    if requests.is_empty() {
        return "No requests saved yet.\n".to_string();
    }

    let rows: Vec<[String; 6]> = requests
        .iter()
        .map(|request| {
            let cells = [
                request
                    .timestamp
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
                request.project_number.clone(),
                request.project_name.clone(),
                request.amount.to_string(),
                request.reason.clone(),
                request.original_text.clone(),
            ];
            let mut row: [String; 6] = Default::default();
            for (i, cell) in cells.iter().enumerate() {
                row[i] = truncate(cell, MAX_WIDTHS[i]);
            }
            row
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut table = String::new();
    push_line(&mut table, &HEADERS.map(String::from), &widths);
    push_line(&mut table, &widths.map(|w| "-".repeat(w)), &widths);
    for row in &rows {
        push_line(&mut table, row, &widths);
    }
    table.push_str(&format!("{} request(s)\n", rows.len()));
    table
}

fn push_line(table: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect::<Vec<_>>()
        .join(" | ");
    table.push_str(line.trim_end());
    table.push('\n');
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

/// Cut to `max` characters, ending in "..." when shortened
fn truncate(text: &str, max: usize) -> String {
    let text = text.replace('\n', " ");
    if text.chars().count() <= max {
        return text;
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
