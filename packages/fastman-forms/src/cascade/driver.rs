//! Executes the fetches a [`SelectionForm`] asks for.

use futures::future::join_all;
use tracing::debug;

use fastman_client::{ApiClient, ChoiceId};

use super::form::{Resolution, SelectionForm, SelectionError};
use super::level::FetchTicket;
use super::source::ErasedSource;

/// Runs fetch tickets against the API and feeds the results back.
///
/// Tickets from one decision run concurrently. Each result is resolved
/// through the form, which discards whatever has gone stale meanwhile.
pub struct CascadeDriver<'a> {
    client: &'a ApiClient,
}

impl<'a> CascadeDriver<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn run(&self, form: &mut SelectionForm, tickets: Vec<FetchTicket>) -> Vec<Resolution> {
        let jobs: Vec<_> = tickets
            .into_iter()
            .filter_map(|ticket| form.source(ticket.level).map(|source| (ticket, source)))
            .collect();

        let client = self.client;
        let results = join_all(jobs.into_iter().map(|(ticket, source)| async move {
            let result = source.fetch_entries(client, ticket.parent).await;
            (ticket, result)
        }))
        .await;

        results
            .into_iter()
            .map(|(ticket, result)| {
                let resolution = form.resolve(&ticket, result);
                debug!(level = ticket.level, ?resolution, "Fetch resolved");
                resolution
            })
            .collect()
    }

    pub async fn mount(&self, form: &mut SelectionForm) {
        let tickets = form.mount();
        self.run(form, tickets).await;
    }

    pub async fn select(
        &self,
        form: &mut SelectionForm,
        key: &str,
        id: ChoiceId,
    ) -> Result<(), SelectionError> {
        let tickets = form.select(key, id)?;
        self.run(form, tickets).await;
        Ok(())
    }

    pub async fn refresh(&self, form: &mut SelectionForm, key: &str) -> Result<(), SelectionError> {
        let ticket = form.refresh(key)?;
        self.run(form, vec![ticket]).await;
        Ok(())
    }
}
