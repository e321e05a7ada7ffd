//! Interactive menu shown when no subcommand is given.

use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Select};
use tracing::debug;

use crate::cmd;
use crate::context::{AppContext, Tone};
use crate::ReportKind;

enum Action {
    Report(ReportKind),
    Login,
    Whoami,
    Logout,
    Exit,
}

const ACTIONS: &[(&str, Action)] = &[
    ("Report a failure", Action::Report(ReportKind::Failure)),
    ("Report production", Action::Report(ReportKind::Production)),
    ("Record a variable reading", Action::Report(ReportKind::Reading)),
    ("Run a checklist", Action::Report(ReportKind::Checklist)),
    ("Update a work order", Action::Report(ReportKind::WorkOrder)),
    ("Sign in", Action::Login),
    ("Who am I", Action::Whoami),
    ("Sign out", Action::Logout),
    ("Exit", Action::Exit),
];

pub async fn run(ctx: &mut AppContext) -> Result<()> {
    println!("{}", style("Fastman").cyan().bold());

    loop {
        println!();
        let labels: Vec<&str> = ACTIONS.iter().map(|(label, _)| *label).collect();
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let result = match &ACTIONS[choice].1 {
            Action::Report(kind) => cmd::report::run(ctx, *kind).await,
            Action::Login => cmd::login::run(ctx).await,
            Action::Whoami => cmd::session::whoami(ctx).await,
            Action::Logout => cmd::session::logout(ctx).await,
            Action::Exit => break,
        };

        // A failed action never ends the session
        if let Err(e) = result {
            debug!(error = ?e, "Menu action failed");
            ctx.say(Tone::Warning, format!("{:#}", e));
        }
    }

    Ok(())
}
