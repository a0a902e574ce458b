//! Tests command: the router's recorded connectivity checks.

use owo_colors::OwoColorize;
use tabled::Tabled;

use netdeck_core::{NetworkTest, TestStatus};

use super::Context;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct TestRow {
    #[tabled(rename = "Test")]
    name: String,
    #[tabled(rename = "Result")]
    status: String,
    #[tabled(rename = "When")]
    timestamp: String,
}

impl TestRow {
    fn new(t: &NetworkTest, color: bool) -> Self {
        let label = t.status.to_string();
        let status = match (color, t.status) {
            (false, _) => label,
            (true, TestStatus::Passed) => label.green().to_string(),
            (true, TestStatus::Failed) => label.red().to_string(),
            (true, TestStatus::Running) => label.yellow().to_string(),
        };
        Self {
            name: t.name.clone(),
            status,
            timestamp: t.timestamp.clone(),
        }
    }
}

pub fn handle(ctx: &Context) -> Result<(), CliError> {
    let network = ctx.config.network_info()?;
    let out = output::render_list(
        ctx.format,
        &network.tests,
        |t| TestRow::new(t, ctx.color),
        |t| format!("{}\t{}", t.name, t.status),
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}
