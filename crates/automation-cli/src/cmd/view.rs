use crate::config::CliConfig;
use crate::output::print_json;
use crate::session::Session;
use anyhow::Context;

pub fn run(config: &CliConfig, screen_id: &str, json: bool) -> anyhow::Result<()> {
    let session = Session::open(config)?;
    session
        .runtime
        .block_on(session.engine.report_screen_view(screen_id))
        .with_context(|| format!("failed to report view of screen {screen_id}"))?;

    if json {
        print_json(&serde_json::json!({ "reported": screen_id }))
    } else {
        println!("screen view reported: {screen_id}");
        Ok(())
    }
}
