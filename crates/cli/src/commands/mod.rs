//! Command implementations.
//!
//! Every command talks to the backend through the shared [`ApiClient`] and
//! writes its result through [`Output`], either as an aligned table or as
//! JSON.

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod orders;

use std::io::{self, Write};

use bookshelf_admin::{ApiClient, ApiError, Listing};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// No token is stored; `bookshelf login` first.
    #[error("Not logged in. Run `bookshelf login` first")]
    NotLoggedIn,

    /// The backend rejected the stored token.
    #[error("Session expired. Run `bookshelf login` again")]
    SessionExpired,

    /// Backend call failed.
    #[error(transparent)]
    Api(ApiError),

    /// Writing the output failed.
    #[error("Output error: {0}")]
    Io(#[from] io::Error),

    /// Encoding JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ApiError> for CliError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Redirected(_) => Self::SessionExpired,
            other => Self::Api(other),
        }
    }
}

/// State shared by every command.
pub struct Context {
    pub client: ApiClient,
    pub output: Output,
}

impl Context {
    pub const fn new(client: ApiClient, output: Output) -> Self {
        Self { client, output }
    }

    /// Fail early when there is no token to send.
    pub fn require_login(&self) -> Result<(), CliError> {
        if self.client.session().is_authenticated() {
            Ok(())
        } else {
            Err(CliError::NotLoggedIn)
        }
    }
}

/// Where and how results are printed.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print one record: JSON, or `label: value` lines.
    pub fn record<T: Serialize>(&self, value: &T, fields: &[(&str, String)]) -> Result<(), CliError> {
        let mut out = io::stdout().lock();
        if self.json {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
            return Ok(());
        }

        let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in fields {
            writeln!(out, "{label:<width$}  {value}")?;
        }
        Ok(())
    }

    /// Print a listing: JSON (page fields included), or a table plus a page
    /// footer.
    pub fn listing<T: Serialize>(
        &self,
        listing: &Listing<T>,
        headers: &[&str],
        row: impl Fn(&T) -> Vec<String>,
    ) -> Result<(), CliError> {
        if self.json {
            let mut out = io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, listing)?;
            writeln!(out)?;
            return Ok(());
        }

        let rows: Vec<Vec<String>> = listing.items().iter().map(row).collect();
        self.table(headers, &rows)?;

        let mut out = io::stdout().lock();
        if listing.is_paginated() {
            writeln!(
                out,
                "page {}/{}, {} total",
                listing.page_number() + 1,
                listing.total_pages().max(1),
                listing.total_elements()
            )?;
        } else {
            writeln!(out, "{} total", listing.len())?;
        }
        Ok(())
    }

    /// Print rows under `headers`, columns padded to their widest cell.
    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) -> Result<(), CliError> {
        let mut out = io::stdout().lock();
        write!(out, "{}", render_table(headers, rows))?;
        Ok(())
    }

    /// Print a one-line confirmation, or `{"ok": true}` in JSON mode.
    pub fn done(&self, message: &str) -> Result<(), CliError> {
        let mut out = io::stdout().lock();
        if self.json {
            writeln!(out, "{}", serde_json::json!({ "ok": true, "message": message }))?;
        } else {
            writeln!(out, "{message}")?;
        }
        Ok(())
    }

    pub const fn is_json(&self) -> bool {
        self.json
    }
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = render_row(headers.iter().copied(), &widths);
    for row in rows {
        table.push_str(&render_row(row.iter().map(String::as_str), &widths));
    }
    table
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

/// `-` for absent optional values.
pub fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_pads_columns() {
        let table = render_table(
            &["ID", "TITLE"],
            &[
                vec!["1".to_string(), "Nedjma".to_string()],
                vec!["12".to_string(), "L'Étranger".to_string()],
            ],
        );
        assert_eq!(table, "ID  TITLE\n1   Nedjma\n12  L'Étranger\n");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("Oran")), "Oran");
    }

    #[test]
    fn test_redirect_becomes_session_expired() {
        let error = CliError::from(ApiError::Redirected("/admin/login".to_string()));
        assert!(matches!(error, CliError::SessionExpired));

        let error = CliError::from(ApiError::NotFound("book".to_string()));
        assert!(matches!(error, CliError::Api(ApiError::NotFound(_))));
    }
}
