//! Terminal output

use colored::Colorize;
use serde::Serialize;

use crate::errors::SeedError;
use crate::models::status::{StatusCategory, StatusReport};
use crate::stores::theme::ThemeMode;

/// How results are printed
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub theme: ThemeMode,
}

impl Output {
    /// Configure the output. `color` toggles ANSI codes globally.
    pub fn new(json: bool, color: bool, theme: ThemeMode) -> Self {
        colored::control::set_override(color);
        Self { json, theme }
    }

    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), SeedError> {
        let json = serde_json::to_string_pretty(value)?;
        println!("{}", json);
        Ok(())
    }

    pub fn heading(&self, text: &str) {
        if !self.json {
            println!("{}", text.color(self.theme.accent()).bold());
        }
    }

    pub fn field(&self, name: &str, value: impl std::fmt::Display) {
        println!("{:<14} {}", name.color(self.theme.muted()), value);
    }

    pub fn success(&self, text: &str) {
        if self.json {
            let _ = self.print_json(&serde_json::json!({ "ok": true, "message": text }));
        } else {
            println!("{} {}", "✔".green(), text);
        }
    }

    /// The wizard's "alert"
    pub fn alert(&self, text: &str) {
        eprintln!("{} {}", "!".yellow().bold(), text);
    }

    pub fn print_table(&self, headers: &[&str], rows: Vec<Vec<String>>) {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row: Vec<String> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect();
        println!("{}", header_row.join("  ").color(self.theme.accent()));

        let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        println!("{}", sep.join("  "));

        for row in &rows {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let w = widths.get(i).copied().unwrap_or(0);
                    format!("{:width$}", cell, width = w)
                })
                .collect();
            println!("{}", cells.join("  "));
        }
    }

    /// One status line with a progress bar
    pub fn status_line(&self, report: &StatusReport) {
        if self.json {
            let _ = self.print_json(&serde_json::json!({
                "status": report.code,
                "message": report.status.info().message,
                "progress": report.status.info().progress,
                "category": report.status.info().category,
                "terminal": report.status.is_terminal(),
                "buildLoading": report.status.is_build_loading(),
                "httpsLoading": report.status.is_https_loading(),
                "isServerLive": report.is_server_live,
            }));
            return;
        }

        let info = report.status.info();
        let tag = match info.category {
            StatusCategory::Build => "build",
            StatusCategory::Https => "https",
            StatusCategory::Ai => "ai",
        };
        let live = if report.is_server_live {
            "live".green()
        } else {
            "down".red()
        };
        println!(
            "[{}] {} {:>3}% {} ({}, server {})",
            tag.color(self.theme.accent()),
            progress_bar(info.progress),
            info.progress,
            info.message,
            report.code.color(self.theme.muted()),
            live
        );
    }
}

fn progress_bar(progress: u8) -> String {
    const WIDTH: usize = 20;
    let filled = usize::from(progress.min(100)) * WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0), format!("[{}]", ".".repeat(20)));
        assert_eq!(progress_bar(50), format!("[{}{}]", "#".repeat(10), ".".repeat(10)));
        assert_eq!(progress_bar(150), format!("[{}]", "#".repeat(20)));
    }
}
