//! Session browsing commands: `history` and `sessions`.
//!
//! Both read the store directly and need no provider key.

use anyhow::{Result, anyhow};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use salesdesk_core::session::store::SessionStore;
use salesdesk_types::session::SessionId;

/// Print one session's history, visitor lines and bot lines styled apart.
pub async fn history<S: SessionStore>(store: &S, session: &str, json: bool) -> Result<()> {
    let id: SessionId = session.parse().map_err(|e: String| anyhow!(e))?;
    let session = store.load(id.as_str()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    if session.history.is_empty() {
        println!();
        println!(
            "  {} No history for session '{}'. Start one with: {}",
            style("i").blue().bold(),
            style(&id).cyan(),
            style(format!("salesdesk ask --session {id} \"...\"")).yellow()
        );
        println!();
        return Ok(());
    }

    println!();
    for (i, line) in session.history.iter().enumerate() {
        if i % 2 == 0 {
            println!("  {}", style(line).cyan());
        } else {
            println!("  {line}");
            println!();
        }
    }
    println!(
        "  {} turn{}",
        style(session.turn_count()).bold(),
        if session.turn_count() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// List every stored session in a table.
pub async fn list_sessions<S: SessionStore>(store: &S, json: bool) -> Result<()> {
    let sessions = store.list_sessions().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!(
            "  {} No sessions stored yet. Start one with: {}",
            style("i").blue().bold(),
            style("salesdesk ask \"...\"").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Session").fg(Color::White),
        Cell::new("Turns").fg(Color::White),
        Cell::new("Last company").fg(Color::White),
    ]);

    for summary in &sessions {
        table.add_row(vec![
            Cell::new(&summary.session_id).fg(Color::Cyan),
            Cell::new((summary.history_len / 2).to_string()).fg(Color::White),
            Cell::new(summary.last_company.as_deref().unwrap_or("-")).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
