use crate::output::print_json;
use automation_core::{action, Action, Command};
use serde::Serialize;

#[derive(Serialize)]
struct ParseReport<'a> {
    uri: &'a str,
    eligible: bool,
    action: Option<&'a Action>,
    command: Option<Command>,
}

pub fn run(uri: &str, json: bool) -> anyhow::Result<()> {
    let parsed = action::parse(uri);
    let command = parsed.as_ref().and_then(Action::command);

    if json {
        return print_json(&ParseReport {
            uri,
            eligible: parsed.is_some(),
            action: parsed.as_ref(),
            command,
        });
    }

    let Some(action) = parsed else {
        println!("not an automation uri");
        return Ok(());
    };
    println!("action:  {}", action.kind);
    println!("data:    {}", action.value.as_deref().unwrap_or("-"));
    match command {
        Some(command) => println!("command: {}", describe(&command)),
        None => println!("command: none"),
    }
    Ok(())
}

pub fn describe(command: &Command) -> String {
    match command {
        Command::OpenLink(url) => format!("open link {url}"),
        Command::Close => "close".to_string(),
        Command::Navigate(screen_id) => format!("navigate to {screen_id}"),
        Command::Purchase(product_id) => format!("purchase {product_id}"),
        Command::Restore => "restore".to_string(),
    }
}
