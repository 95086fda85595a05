use serde::Serialize;

use crate::host::HostEvent;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// One line per delegate event, html bodies summarized by size.
pub fn print_events(events: &[HostEvent]) {
    for event in events {
        println!("{}", event.describe());
    }
}
