//! Debounced row search
//!
//! Typing in a row's medicine field issues a [`SearchTicket`]. The search is
//! only sent once the row has been quiet for the debounce window; a newer
//! ticket for the same row replaces the pending one. Outcomes arrive on a
//! channel and are applied to the [`OrderBuilder`], which drops any that are
//! no longer current.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
    time::Duration,
};

use medstore::{
    builder::{OrderBuilder, QueryOutcome, RowKey, SEARCH_RESULT_LIMIT, SearchTicket},
    medicines::Medicine,
};
use rustc_hash::FxHashMap;
use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    task::JoinHandle,
    time::sleep,
};
use tracing::{debug, warn};

use crate::{api::ApiError, services::CatalogService};

/// Quiet period before a row's search is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Result of one search, tagged with the ticket that requested it.
#[derive(Debug)]
pub struct SearchOutcome {
    /// Ticket the search was issued for
    pub ticket: SearchTicket,

    /// Candidates, or the reason the search failed
    pub result: Result<Vec<Medicine>, ApiError>,
}

impl SearchOutcome {
    /// Apply the outcome to its row. Returns `false` for stale outcomes.
    pub fn apply(self, builder: &mut OrderBuilder) -> bool {
        let applied = match self.result {
            Ok(medicines) => builder.apply_results(&self.ticket, medicines),
            Err(error) => {
                warn!(query = self.ticket.query(), %error, "medicine search failed");
                builder.search_failed(&self.ticket)
            }
        };

        if !applied {
            debug!(query = self.ticket.query(), "discarding stale search results");
        }

        applied
    }
}

/// Per-row debounce timers feeding an outcome channel.
pub struct RowSearch<C> {
    catalog: Arc<C>,
    debounce: Duration,
    limit: usize,
    pending: FxHashMap<RowKey, JoinHandle<()>>,
    outcomes: UnboundedSender<SearchOutcome>,
}

impl<C> Debug for RowSearch<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RowSearch")
            .field("debounce", &self.debounce)
            .field("limit", &self.limit)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl<C> RowSearch<C>
where
    C: CatalogService + 'static,
{
    /// Create a scheduler and the receiver its outcomes arrive on.
    pub fn new(catalog: Arc<C>) -> (Self, UnboundedReceiver<SearchOutcome>) {
        let (outcomes, receiver) = unbounded_channel();

        let search = Self {
            catalog,
            debounce: SEARCH_DEBOUNCE,
            limit: SEARCH_RESULT_LIMIT,
            pending: FxHashMap::default(),
            outcomes,
        };

        (search, receiver)
    }

    /// Use a different quiet period.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Ask the catalog for at most `limit` candidates.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// React to a query edit: schedule the search, or drop a pending one
    /// when the query became too short.
    pub fn on_query(&mut self, row: RowKey, outcome: QueryOutcome) {
        match outcome {
            QueryOutcome::Search(ticket) => self.schedule(ticket),
            QueryOutcome::Cleared => {
                self.cancel(row);
            }
        }
    }

    /// Schedule a search for `ticket`, replacing any pending search for its row.
    ///
    /// Once the debounce window elapses the request is sent and runs to
    /// completion even if the row changes again; its outcome is then stale.
    pub fn schedule(&mut self, ticket: SearchTicket) {
        let row = ticket.row();

        self.cancel(row);
        self.pending.retain(|_, timer| !timer.is_finished());

        let catalog = Arc::clone(&self.catalog);
        let outcomes = self.outcomes.clone();
        let debounce = self.debounce;
        let limit = self.limit;

        let timer = tokio::spawn(async move {
            sleep(debounce).await;

            tokio::spawn(async move {
                debug!(query = ticket.query(), "searching medicines");

                let result = catalog.search_medicines(ticket.query(), limit).await;

                if outcomes.send(SearchOutcome { ticket, result }).is_err() {
                    debug!("search outcome dropped; receiver closed");
                }
            });
        });

        self.pending.insert(row, timer);
    }

    /// Drop the pending search for `row`. Returns `true` if one was pending.
    pub fn cancel(&mut self, row: RowKey) -> bool {
        match self.pending.remove(&row) {
            Some(timer) => {
                let was_pending = !timer.is_finished();
                timer.abort();
                was_pending
            }
            None => false,
        }
    }

    /// Number of rows with a search still waiting out the debounce window.
    pub fn pending(&self) -> usize {
        self.pending
            .values()
            .filter(|timer| !timer.is_finished())
            .count()
    }
}

impl<C> Drop for RowSearch<C> {
    fn drop(&mut self) {
        for timer in self.pending.values() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;
    use tokio::{sync::mpsc::error::TryRecvError, time::advance};

    use medstore::{builder::RowState, medicines::PackagingType};

    use crate::services::MockCatalogService;

    use super::*;

    fn echo_catalog() -> MockCatalogService {
        let mut catalog = MockCatalogService::new();

        catalog.expect_search_medicines().returning(|query, _| {
            Ok(vec![Medicine::new(
                1,
                query.to_string(),
                PackagingType::Strip,
                Decimal::new(250, 2),
                10,
            )])
        });

        catalog
    }

    fn search_ticket(outcome: QueryOutcome) -> Result<SearchTicket, &'static str> {
        match outcome {
            QueryOutcome::Search(ticket) => Ok(ticket),
            QueryOutcome::Cleared => Err("expected a search"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn typing_within_window_sends_one_search() -> TestResult {
        let mut builder = OrderBuilder::new();
        let row = builder.rows().next().map(|(key, _)| key).ok_or("no rows")?;
        let (mut search, mut outcomes) = RowSearch::new(Arc::new(echo_catalog()));

        search.schedule(search_ticket(builder.set_query(row, "para")?)?);
        advance(Duration::from_millis(100)).await;
        search.schedule(search_ticket(builder.set_query(row, "paraceta")?)?);

        let outcome = outcomes.recv().await.ok_or("channel closed")?;

        assert_eq!(outcome.ticket.query(), "paraceta");
        assert!(outcome.apply(&mut builder), "latest outcome applies");

        sleep(Duration::from_secs(1)).await;

        assert!(
            matches!(outcomes.try_recv(), Err(TryRecvError::Empty)),
            "the superseded query was never searched"
        );
        assert_eq!(
            builder.row(row).map(|row| row.state()),
            Some(RowState::ResultsShown)
        );

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn search_waits_for_debounce_window() -> TestResult {
        let mut builder = OrderBuilder::new();
        let row = builder.rows().next().map(|(key, _)| key).ok_or("no rows")?;
        let (mut search, mut outcomes) = RowSearch::new(Arc::new(echo_catalog()));

        search.schedule(search_ticket(builder.set_query(row, "crocin")?)?);

        advance(Duration::from_millis(299)).await;
        tokio::task::yield_now().await;

        assert!(matches!(outcomes.try_recv(), Err(TryRecvError::Empty)), "too early");
        assert_eq!(search.pending(), 1);

        let outcome = outcomes.recv().await.ok_or("channel closed")?;

        assert_eq!(outcome.ticket.query(), "crocin");

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_query_cancels_pending_search() -> TestResult {
        let mut builder = OrderBuilder::new();
        let row = builder.rows().next().map(|(key, _)| key).ok_or("no rows")?;

        let mut catalog = MockCatalogService::new();
        catalog.expect_search_medicines().never();

        let (mut search, mut outcomes) = RowSearch::new(Arc::new(catalog));

        search.on_query(row, builder.set_query(row, "para")?);
        search.on_query(row, builder.set_query(row, "p")?);

        sleep(Duration::from_secs(1)).await;

        assert!(matches!(outcomes.try_recv(), Err(TryRecvError::Empty)), "no search sent");
        assert_eq!(search.pending(), 0);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn stale_outcome_is_discarded() -> TestResult {
        let mut builder = OrderBuilder::new();
        let row = builder.rows().next().map(|(key, _)| key).ok_or("no rows")?;
        let (mut search, mut outcomes) = RowSearch::new(Arc::new(echo_catalog()));

        search.schedule(search_ticket(builder.set_query(row, "para")?)?);

        let outcome = outcomes.recv().await.ok_or("channel closed")?;

        builder.set_query(row, "pantop")?;

        assert!(!outcome.apply(&mut builder), "row moved on to another query");
        assert!(builder.row(row).is_some_and(|row| row.candidates().is_empty()));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn failed_search_returns_row_to_empty() -> TestResult {
        let mut builder = OrderBuilder::new();
        let row = builder.rows().next().map(|(key, _)| key).ok_or("no rows")?;

        let mut catalog = MockCatalogService::new();
        catalog
            .expect_search_medicines()
            .once()
            .return_once(|_, _| Err(ApiError::SessionExpired));

        let (mut search, mut outcomes) = RowSearch::new(Arc::new(catalog));

        search.schedule(search_ticket(builder.set_query(row, "para")?)?);

        let outcome = outcomes.recv().await.ok_or("channel closed")?;

        assert!(outcome.apply(&mut builder));
        assert_eq!(builder.row(row).map(|row| row.state()), Some(RowState::Empty));

        Ok(())
    }
}
