use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Password};
use fastman_forms::{AuthError, LoginState};

use crate::context::{AppContext, Tone};

/// Typed at a prompt to return to the previous step.
const BACK: &str = "<";

pub async fn run(ctx: &mut AppContext) -> Result<()> {
    let mut flow = ctx.login_flow().await?;
    if let Some(session) = flow.session() {
        let prompt = format!("Signed in as {}@{}. Sign in again?", session.username, session.domain);
        if !ctx.confirm(&prompt, false)? {
            return Ok(());
        }
        flow.logout(&mut ctx.client).await?;
    }

    ctx.say(Tone::Heading, "Sign in");
    if ctx.config.api.locked_domain.is_none() {
        ctx.say(Tone::Info, format!("Type {} to go back a step", BACK));
    }

    loop {
        let theme = ColorfulTheme::default();
        let step = match flow.state().clone() {
            LoginState::Authenticated(session) => {
                ctx.say(Tone::Success, format!("Welcome, {}", session.personnel_name));
                return Ok(());
            }
            LoginState::Domain => {
                // A locked tenant needs no input
                let raw = if ctx.config.api.locked_domain.is_some() {
                    String::new()
                } else {
                    Input::<String>::with_theme(&theme)
                        .with_prompt("Domain")
                        .interact_text()?
                };
                flow.submit_domain(&mut ctx.client, &raw).await.map(|_| ())
            }
            LoginState::User { domain } => {
                let raw: String = Input::with_theme(&theme)
                    .with_prompt(format!("Username ({})", domain))
                    .allow_empty(true)
                    .interact_text()?;
                if raw.trim() == BACK {
                    flow.back();
                    continue;
                }
                flow.submit_username(&ctx.client, &raw).await.map(|_| ())
            }
            LoginState::Password { username, .. } => {
                let raw = Password::with_theme(&theme)
                    .with_prompt(format!("Password for {}", username))
                    .allow_empty_password(true)
                    .interact()?;
                if raw == BACK {
                    flow.back();
                    continue;
                }
                flow.submit_password(&mut ctx.client, &raw).await.map(|_| ())
            }
        };

        match step {
            Ok(()) => {}
            Err(AuthError::Store(e)) => return Err(e.into()),
            Err(e) => {
                ctx.say(Tone::Warning, e.to_string());
                if ctx.config.api.locked_domain.is_some() && matches!(flow.state(), LoginState::Domain) {
                    // Nothing to re-enter for a pinned tenant
                    return Err(e.into());
                }
            }
        }
    }
}
