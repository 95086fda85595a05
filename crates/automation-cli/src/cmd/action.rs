use crate::cmd::parse::describe;
use crate::config::CliConfig;
use crate::output::{print_events, print_json};
use crate::session::Session;
use anyhow::bail;
use automation_core::{action, ActionType, Command};
use serde::Serialize;

#[derive(Serialize)]
struct ActionReport {
    command: Option<Command>,
    events: Vec<crate::host::HostEvent>,
}

pub fn run(config: &CliConfig, uri: &str, json: bool) -> anyhow::Result<()> {
    let Some(action) = action::parse(uri) else {
        bail!("not an automation uri: {uri}");
    };
    if action.kind == ActionType::Unknown {
        bail!("unrecognized automation action in {uri}");
    }

    let command = action.command();
    if let Some(command) = &command {
        let session = Session::open(config)?;
        session
            .runtime
            .block_on(session.engine.perform(command.clone()));
        // Anything but navigation ends the flow on the host side.
        if !matches!(command, Command::Navigate(_)) {
            session.engine.on_action_flow_finished(&action);
        }
        let events = session.host.events();
        if json {
            return print_json(&ActionReport {
                command: Some(command.clone()),
                events,
            });
        }
        println!("{}", describe(command));
        print_events(&events);
        return Ok(());
    }

    if json {
        return print_json(&ActionReport {
            command: None,
            events: Vec::new(),
        });
    }
    println!("dropped: {} action has no data", action.kind);
    Ok(())
}
