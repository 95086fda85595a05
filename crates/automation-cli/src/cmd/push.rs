use crate::config::CliConfig;
use crate::output::{print_events, print_json};
use crate::session::Session;
use anyhow::bail;
use automation_core::{PushFlowOutcome, PushPayload};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize)]
struct PushReport {
    flagged: bool,
    outcome: Option<String>,
    delivered: bool,
    events: Vec<crate::host::HostEvent>,
}

pub fn run(config: &CliConfig, entries: &[String], json: bool) -> anyhow::Result<()> {
    let data = parse_entries(entries)?;
    let session = Session::open(config)?;

    let outcome: Option<PushFlowOutcome> = if PushPayload::from_map(&data).pick_screen {
        Some(session.runtime.block_on(session.engine.run_push_flow()))
    } else {
        session.engine.on_push_received(&data);
        None
    };
    let events = session.host.events();

    if json {
        return print_json(&PushReport {
            flagged: outcome.is_some(),
            delivered: outcome.as_ref().is_some_and(PushFlowOutcome::is_delivered),
            outcome: outcome.as_ref().map(ToString::to_string),
            events,
        });
    }

    match outcome {
        Some(outcome) => println!("{outcome}"),
        None => println!("ignored: payload does not request a screen"),
    }
    print_events(&events);
    Ok(())
}

fn parse_entries(entries: &[String]) -> anyhow::Result<HashMap<String, String>> {
    let mut data = HashMap::new();
    for entry in entries {
        let Some((key, value)) = entry.split_once('=') else {
            bail!("invalid payload entry '{entry}': expected KEY=VALUE");
        };
        data.insert(key.to_string(), value.to_string());
    }
    Ok(data)
}
