use crate::config::CliConfig;
use crate::output::print_json;
use crate::session::Session;
use anyhow::Context;

pub fn run(config: &CliConfig, token: &str, json: bool) -> anyhow::Result<()> {
    let session = Session::open(config)?;
    let registered = session
        .runtime
        .block_on(session.engine.register_push_token(token))
        .context("push token registration failed")?;

    if json {
        return print_json(&serde_json::json!({
            "registered": registered,
            "token": session.engine.push_token(),
        }));
    }
    if registered {
        println!("push token registered");
    } else {
        println!("push token unchanged");
    }
    Ok(())
}
