//! `salesdesk ask` and `salesdesk new-session`.

use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use salesdesk_types::inquiry::Inquiry;
use salesdesk_types::session::SessionId;

use crate::state::AppState;

/// Submit one inquiry through the full pipeline and print the answer.
///
/// # Examples
///
/// ```bash
/// salesdesk ask "Do you reconcile airline invoices?" --company Acme
/// salesdesk ask "And pricing?" --session 6f1c... --json
/// ```
pub async fn ask(
    state: &AppState,
    inquiry: String,
    company: Option<String>,
    session: Option<String>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let session_id = session.unwrap_or_else(|| SessionId::generate().0);

    let company = match company {
        Some(company) => company,
        None => {
            let current = state.controller.session(&session_id).await?;
            state.controller.form_defaults(&current).company
        }
    };

    let spinner = if json || quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Asking the {} team...", state.config.assistant.company_name));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = state
        .controller
        .handle_inquiry(&session_id, &Inquiry::new(company, inquiry))
        .await;
    spinner.finish_and_clear();
    let outcome = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if quiet {
        println!("{}", outcome.response);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style(&state.config.assistant.bot_name).cyan().bold(),
        style(format!("({})", outcome.timestamp)).dim()
    );
    println!();
    for line in outcome.response.lines() {
        println!("  {line}");
    }
    println!();
    if !outcome.follow_up.is_empty() {
        println!("  {}", style(&outcome.follow_up).dim());
    }
    println!(
        "  {} {}",
        style("Continue with:").dim(),
        style(format!("salesdesk ask --session {} \"...\"", outcome.session_id)).yellow()
    );
    println!();

    Ok(())
}

/// Print a freshly issued session token.
pub fn new_session(json: bool) -> Result<()> {
    let session_id = SessionId::generate();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "session_id": session_id }))?
        );
    } else {
        println!("{session_id}");
    }
    Ok(())
}
