//! Application context with shared state and utilities

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use fastman_client::{ApiClient, DOMAIN_PLACEHOLDER};
use fastman_forms::{BaseSessionStore, FastmanConfig, FileSessionStore, LoginFlow, Session};

/// Application context passed to all commands
pub struct AppContext {
    pub quiet: bool,
    pub config: FastmanConfig,
    pub client: ApiClient,
    pub store: Arc<dyn BaseSessionStore>,
}

impl AppContext {
    pub fn new(
        quiet: bool,
        api_url: Option<String>,
        locked_domain: Option<String>,
        session_path: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = FastmanConfig::from_env().context("Invalid Fastman configuration")?;
        if let Some(template) = api_url {
            if !template.contains(DOMAIN_PLACEHOLDER) {
                bail!("--api-url must contain {}", DOMAIN_PLACEHOLDER);
            }
            config.api.base_url_template = template;
        }
        if let Some(domain) = locked_domain {
            config.api = config.api.with_locked_domain(domain);
        }
        if let Some(path) = session_path {
            config.session_path = path;
        }

        let client = ApiClient::with_reqwest(config.api.clone())
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
        let store: Arc<dyn BaseSessionStore> =
            Arc::new(FileSessionStore::new(config.session_path.clone()));

        Ok(Self {
            quiet,
            config,
            client,
            store,
        })
    }

    /// Restore the stored session into the client.
    pub async fn login_flow(&mut self) -> Result<LoginFlow> {
        LoginFlow::restore(self.store.clone(), &mut self.client)
            .await
            .context("Failed to restore session")
    }

    pub async fn require_session(&mut self) -> Result<Session> {
        let flow = self.login_flow().await?;
        match flow.session() {
            Some(session) => Ok(session.clone()),
            None => bail!("Not signed in. Run `fastman login` first."),
        }
    }

    /// Prompts answer with `default` under `--quiet`.
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.quiet {
            return Ok(default);
        }
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    pub fn say(&self, tone: Tone, msg: impl AsRef<str>) {
        if tone.visible(self.quiet) {
            println!("{}", tone.paint(msg.as_ref()));
        }
    }
}

/// Styling of one line of status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Success,
    Warning,
    Info,
}

impl Tone {
    /// Only warnings survive `--quiet`.
    fn visible(self, quiet: bool) -> bool {
        !quiet || self == Tone::Warning
    }

    fn paint(self, msg: &str) -> String {
        match self {
            Tone::Heading => format!("\n{}", style(msg).bold()),
            Tone::Success => style(msg).green().to_string(),
            Tone::Warning => style(msg).yellow().to_string(),
            Tone::Info => style(msg).cyan().to_string(),
        }
    }
}
