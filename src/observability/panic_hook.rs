//! Panic hook printing a crash report with the site and check in flight.

use super::context::{get_current_context, get_progress, SiteContext};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 76;

/// Install the crash-report hook. Call once, early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();
    let (processed, total) = get_progress();

    eprintln!();
    for line in crash_report_lines(&extract_panic_message(info), info, &context, processed, total) {
        eprintln!("{}", line);
    }
    if std::env::var("RUST_BACKTRACE").is_ok() {
        eprintln!();
        eprintln!("{}", std::backtrace::Backtrace::capture());
    }
}

fn crash_report_lines(
    message: &str,
    info: &PanicHookInfo<'_>,
    context: &SiteContext,
    processed: usize,
    total: usize,
) -> Vec<String> {
    let mut rows = vec![
        "SITERATE CRASH REPORT".to_string(),
        format!("Version: {}", VERSION),
        format!("Platform: {}", std::env::consts::OS),
        format!("Time: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
        String::new(),
        format!("PANIC: {}", message),
    ];
    if let Some(location) = info.location() {
        rows.push(format!(
            "Location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        ));
    }
    rows.push(String::new());
    rows.extend(context_rows(context, processed, total));
    if let Some(metadata) = Span::current().metadata() {
        rows.push(format!("  Span: {}", metadata.name()));
    }
    if std::env::var("RUST_BACKTRACE").is_err() {
        rows.push(String::new());
        rows.push("Run with RUST_BACKTRACE=1 for stack trace".to_string());
    }
    boxed(&rows)
}

fn context_rows(context: &SiteContext, processed: usize, total: usize) -> Vec<String> {
    let mut rows = vec!["CONTEXT:".to_string()];
    match context.phase {
        Some(phase) => rows.push(format!("  Phase: {}", phase)),
        None => rows.push("  Phase: (not set)".to_string()),
    }
    if let Some(site) = &context.site {
        rows.push(format!("  Site: {}", site));
    }
    if let Some(check) = context.check {
        rows.push(format!("  Check: {}", check));
    }
    if total > 0 {
        rows.push(format!("  Progress: {} / {} sites", processed, total));
    }
    rows
}

fn boxed(rows: &[String]) -> Vec<String> {
    let border = "═".repeat(WIDTH + 2);
    let mut lines = vec![format!("╔{}╗", border)];
    for row in rows {
        lines.push(format!("║ {:<width$} ║", truncate(row, WIDTH), width = WIDTH));
    }
    lines.push(format!("╚{}╝", border));
    lines
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::context::Phase;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("grüne", 10), "grüne");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }

    #[test]
    fn test_context_rows_include_site_and_check() {
        let context = SiteContext {
            phase: Some(Phase::Checking),
            site: Some("https://example.com/".into()),
            check: Some(crate::results::CheckName::Charset),
        };
        let rows = context_rows(&context, 3, 10);
        assert!(rows.contains(&"  Site: https://example.com/".to_string()));
        assert!(rows.contains(&"  Check: charset".to_string()));
        assert!(rows.contains(&"  Progress: 3 / 10 sites".to_string()));
    }

    #[test]
    fn test_boxed_rows_have_equal_width() {
        let lines = boxed(&["short".to_string(), "x".repeat(200)]);
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }
}
