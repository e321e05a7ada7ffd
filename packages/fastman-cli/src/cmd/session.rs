use anyhow::{Context, Result};

use crate::context::{AppContext, Tone};

pub async fn whoami(ctx: &mut AppContext) -> Result<()> {
    let flow = ctx.login_flow().await?;
    match flow.session() {
        Some(session) => {
            ctx.say(Tone::Heading, &session.personnel_name);
            println!("User:    {}", session.username);
            println!("Domain:  {}", session.domain);
            println!("API:     {}", ctx.client.base_url().unwrap_or("-"));
        }
        None => ctx.say(Tone::Warning, "Not signed in"),
    }
    Ok(())
}

pub async fn logout(ctx: &mut AppContext) -> Result<()> {
    let mut flow = ctx.login_flow().await?;
    flow.logout(&mut ctx.client)
        .await
        .context("Failed to clear the stored session")?;
    ctx.say(Tone::Success, "Signed out");
    Ok(())
}
