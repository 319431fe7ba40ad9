use std::error::Error;

use crate::api::HealthReport;
use crate::core::conversation::describe_error;
use crate::core::transport::HttpTransport;

pub async fn run_health(transport: &HttpTransport) -> Result<(), Box<dyn Error>> {
    match transport.health().await {
        Ok(report) => {
            for line in health_lines(transport.base_url(), &report) {
                println!("{line}");
            }
            if !report.is_healthy() {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ {}: {}", transport.base_url(), describe_error(&err));
            std::process::exit(1);
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

pub fn health_lines(base_url: &str, report: &HealthReport) -> Vec<String> {
    let marker = if report.is_healthy() { "✅" } else { "⚠️ " };
    let status = if report.status.is_empty() {
        "unknown"
    } else {
        report.status.as_str()
    };
    let tools = if report.tools.is_empty() {
        "(none reported)".to_string()
    } else {
        report.tools.join(", ")
    };
    vec![
        format!("{marker} {base_url}: {status}"),
        format!("  tools: {tools}"),
        format!("  openrouter configured: {}", yes_no(report.openrouter_configured)),
        format!("  newsdata configured: {}", yes_no(report.newsdata_configured)),
    ]
}
