use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use crate::app::Result;
use crate::domain::{ImageItem, SearchState};
use crate::search::event::SearchEvent;
use crate::search::reducer::{reduce, StateChange};
use crate::usecase::{join_result, SearchImages};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Messages from the outside world.
#[derive(Debug)]
enum Command {
    Event(SearchEvent),
    Shutdown,
}

/// Messages the controller sends itself from timers and fetch tasks.
#[derive(Debug)]
enum Internal {
    DebounceElapsed(u64),
    FetchFinished {
        generation: u64,
        result: Result<Vec<ImageItem>>,
    },
}

/// Handle to a running search session.
///
/// Cheap to clone. The session stops once every handle is dropped or
/// [`SearchHandle::shutdown`] is called; any timer or fetch still running is
/// aborted at that point.
#[derive(Clone)]
pub struct SearchHandle {
    tx: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SearchState>,
}

impl SearchHandle {
    pub fn dispatch(&self, event: SearchEvent) {
        if let Err(e) = self.tx.send(Command::Event(event)) {
            warn!("Search session is gone, dropping event: {:?}", e.0);
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);
    }
}

struct InFlight {
    generation: u64,
    search: AbortHandle,
    forwarder: JoinHandle<()>,
}

impl InFlight {
    fn abort(self) {
        self.search.abort();
        self.forwarder.abort();
    }
}

/// Owns one `SearchState` and is the only writer to it.
///
/// Runs as a single tokio task: UI events, debounce expiries and fetch
/// completions are all applied in arrival order, so no locking is needed.
pub struct SearchController {
    use_case: SearchImages,
    debounce: Duration,
    state: watch::Sender<SearchState>,
    commands: mpsc::UnboundedReceiver<Command>,
    internal_tx: mpsc::UnboundedSender<Internal>,
    internal_rx: mpsc::UnboundedReceiver<Internal>,
    /// Single-slot cell holding the query waiting out the debounce.
    pending: Option<Option<String>>,
    timer: Option<(u64, JoinHandle<()>)>,
    timer_seq: u64,
    last_dispatched: Option<Option<String>>,
    generation: u64,
    in_flight: Option<InFlight>,
}

impl SearchController {
    /// Start a session on the current runtime. A debounced fetch of the
    /// default results is scheduled straight away.
    pub fn spawn(use_case: SearchImages, debounce: Duration) -> SearchHandle {
        let (tx, commands) = mpsc::unbounded_channel();
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let (state, state_rx) = watch::channel(SearchState::default());

        let mut controller = Self {
            use_case,
            debounce,
            state,
            commands,
            internal_tx,
            internal_rx,
            pending: None,
            timer: None,
            timer_seq: 0,
            last_dispatched: None,
            generation: 0,
            in_flight: None,
        };
        controller.schedule(None);

        tokio::spawn(controller.run());

        SearchHandle {
            tx,
            state: state_rx,
        }
    }

    async fn run(mut self) {
        debug!("Search session started");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Event(event)) => self.handle_event(event),
                    Some(Command::Shutdown) | None => break,
                },
                Some(message) = self.internal_rx.recv() => self.handle_internal(message),
            }
        }

        self.cancel_timer();
        self.cancel_fetch();
        debug!("Search session stopped");
    }

    fn handle_event(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::InitiateSearch(query) => self.start_fetch(query),

            SearchEvent::QueryChanged(query) if query.is_empty() => {
                self.cancel_timer();
                self.cancel_fetch();
                self.pending = None;
                self.last_dispatched = None;
                self.apply(StateChange::Cleared);
            }

            SearchEvent::QueryChanged(query) => {
                self.apply(StateChange::QueryUpdated(query.clone()));
                self.schedule(Some(query));
            }

            SearchEvent::OnError(message) => self.fail(message),

            SearchEvent::ErrorDismissed => self.apply(StateChange::ErrorDismissed),

            SearchEvent::UpdateCurrentItem(item) => self.apply(StateChange::Selected(item)),
        }
    }

    fn handle_internal(&mut self, message: Internal) {
        match message {
            Internal::DebounceElapsed(id) => {
                if !matches!(&self.timer, Some((current, _)) if *current == id) {
                    return;
                }
                self.timer = None;

                let Some(query) = self.pending.take() else {
                    return;
                };

                if self.last_dispatched.as_ref() == Some(&query) {
                    debug!("Query {:?} unchanged, not fetching again", query);
                    return;
                }

                self.start_fetch(query);
            }

            Internal::FetchFinished { generation, result } => {
                let is_current = matches!(&self.in_flight, Some(f) if f.generation == generation);
                if !is_current {
                    debug!("Discarding result of superseded fetch #{}", generation);
                    return;
                }
                self.in_flight = None;

                match result {
                    Ok(items) => {
                        info!("Search #{} returned {} images", generation, items.len());
                        let results = items.into_iter().map(Arc::new).collect();
                        self.apply(StateChange::Loaded(results));
                    }
                    Err(e) => {
                        warn!("Search #{} failed: {}", generation, e);
                        self.fail(e.to_string());
                    }
                }
            }
        }
    }

    /// Put `query` in the pending cell and restart the debounce timer.
    fn schedule(&mut self, query: Option<String>) {
        self.cancel_timer();
        self.pending = Some(query);

        self.timer_seq += 1;
        let id = self.timer_seq;
        let delay = self.debounce;
        let tx = self.internal_tx.clone();

        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Internal::DebounceElapsed(id));
        });
        self.timer = Some((id, timer));
    }

    fn start_fetch(&mut self, query: Option<String>) {
        self.cancel_fetch();

        self.generation += 1;
        let generation = self.generation;
        debug!("Starting search #{} for {:?}", generation, query);

        self.last_dispatched = Some(query.clone());
        self.apply(StateChange::Loading);

        let search = self.use_case.execute(query);
        let abort = search.abort_handle();
        let tx = self.internal_tx.clone();

        let forwarder = tokio::spawn(async move {
            let result = join_result(search.await);
            let _ = tx.send(Internal::FetchFinished { generation, result });
        });

        self.in_flight = Some(InFlight {
            generation,
            search: abort,
            forwarder,
        });
    }

    fn fail(&mut self, message: String) {
        self.cancel_fetch();
        self.apply(StateChange::Failed(message));
    }

    fn cancel_timer(&mut self) {
        if let Some((_, timer)) = self.timer.take() {
            timer.abort();
        }
    }

    fn cancel_fetch(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!("Cancelling search #{}", in_flight.generation);
            in_flight.abort();
        }
    }

    fn apply(&self, change: StateChange) {
        let current = self.state.borrow().clone();
        self.state.send_replace(reduce(current, change));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::app::FlickfeedError;
    use crate::fetcher::Fetcher;
    use crate::normalizer::Normalizer;
    use crate::repository::{FeedRepository, DEFAULT_QUERY};

    /// Answers every tag with a one-item feed titled after the tag. `boom`
    /// fails, `empty` returns no items, and tags in `delays` answer late.
    struct ScriptedFetcher {
        requests: Mutex<Vec<String>>,
        delays: HashMap<String, Duration>,
    }

    impl ScriptedFetcher {
        fn new() -> Self {
            Self::with_delays(&[])
        }

        fn with_delays(delays: &[(&str, u64)]) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                delays: delays
                    .iter()
                    .map(|(tag, ms)| (tag.to_string(), Duration::from_millis(*ms)))
                    .collect(),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for ScriptedFetcher {
        async fn fetch(&self, tags: &str) -> Result<Vec<u8>> {
            self.requests.lock().unwrap().push(tags.to_string());

            if let Some(delay) = self.delays.get(tags) {
                tokio::time::sleep(*delay).await;
            }

            match tags {
                "boom" => Err(FlickfeedError::Other("boom".into())),
                "empty" => Ok(br#"{"items": []}"#.to_vec()),
                _ => Ok(format!(
                    r#"{{"items": [{{"title": "{0}", "media": {{"m": "https://img.example/{0}.jpg"}}}}]}}"#,
                    tags
                )
                .into_bytes()),
            }
        }
    }

    fn start(fetcher: &Arc<ScriptedFetcher>) -> SearchHandle {
        let repository = FeedRepository::new(fetcher.clone(), Normalizer::new());
        SearchController::spawn(SearchImages::new(Arc::new(repository)), DEFAULT_DEBOUNCE)
    }

    async fn wait_for_state(
        handle: &SearchHandle,
        predicate: impl FnMut(&SearchState) -> bool,
    ) -> SearchState {
        let mut rx = handle.subscribe();
        let state = tokio::time::timeout(Duration::from_secs(30), rx.wait_for(predicate))
            .await
            .expect("state never matched")
            .expect("search session stopped");
        state.clone()
    }

    fn first_title(state: &SearchState) -> Option<&str> {
        state.results.first().map(|item| item.title.as_str())
    }

    async fn started(fetcher: &Arc<ScriptedFetcher>) -> SearchHandle {
        let handle = start(fetcher);
        wait_for_state(&handle, |s| first_title(s) == Some(DEFAULT_QUERY)).await;
        handle
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_startup_fetches_default_results_once() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let handle = start(&fetcher);

        assert_eq!(handle.state(), SearchState::default());

        let state = wait_for_state(&handle, |s| s.has_results()).await;
        assert_eq!(first_title(&state), Some(DEFAULT_QUERY));
        assert_eq!(state.query, None);
        assert!(!state.is_loading);

        settle().await;
        assert_eq!(fetcher.requests(), vec![DEFAULT_QUERY.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_is_fetched_once_after_quiet_period() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let handle = started(&fetcher).await;

        handle.dispatch(SearchEvent::QueryChanged("cat".into()));
        let state = wait_for_state(&handle, |s| s.query.as_deref() == Some("cat")).await;
        assert_eq!(first_title(&state), Some(DEFAULT_QUERY));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fetcher.requests().len(), 1);

        let state = wait_for_state(&handle, |s| first_title(s) == Some("cat")).await;
        assert!(!state.is_loading);
        assert_eq!(state.error, None);

        settle().await;
        assert_eq!(fetcher.requests(), vec![DEFAULT_QUERY.to_string(), "cat".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_changes_fetch_only_the_last() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let handle = started(&fetcher).await;

        for query in ["c", "ca", "cat"] {
            handle.dispatch(SearchEvent::QueryChanged(query.into()));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        wait_for_state(&handle, |s| first_title(s) == Some("cat")).await;
        settle().await;
        assert_eq!(fetcher.requests(), vec![DEFAULT_QUERY.to_string(), "cat".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_query_is_not_refetched() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let handle = started(&fetcher).await;

        handle.dispatch(SearchEvent::QueryChanged("cat".into()));
        wait_for_state(&handle, |s| first_title(s) == Some("cat")).await;

        handle.dispatch(SearchEvent::QueryChanged("cats".into()));
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.dispatch(SearchEvent::QueryChanged("cat".into()));

        settle().await;
        assert_eq!(fetcher.requests(), vec![DEFAULT_QUERY.to_string(), "cat".to_string()]);
        assert_eq!(first_title(&handle.state()), Some("cat"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_resets_without_network() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let handle = started(&fetcher).await;

        let before = tokio::time::Instant::now();
        handle.dispatch(SearchEvent::QueryChanged("ca".into()));
        handle.dispatch(SearchEvent::QueryChanged(String::new()));

        let state = wait_for_state(&handle, |s| !s.has_results()).await;
        assert!(before.elapsed() < DEFAULT_DEBOUNCE);
        assert_eq!(state.query, None);
        assert_eq!(state.current_item, None);
        assert!(!state.is_loading);

        settle().await;
        assert_eq!(fetcher.requests(), vec![DEFAULT_QUERY.to_string()]);
        assert!(!handle.state().has_results());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_query_wins_over_slow_fetch() {
        let fetcher = Arc::new(ScriptedFetcher::with_delays(&[("slow", 1_000)]));
        let handle = started(&fetcher).await;

        handle.dispatch(SearchEvent::QueryChanged("slow".into()));
        wait_for_state(&handle, |s| s.is_loading).await;

        handle.dispatch(SearchEvent::QueryChanged("fast".into()));
        let state = wait_for_state(&handle, |s| first_title(s) == Some("fast")).await;
        assert!(!state.is_loading);

        settle().await;
        assert_eq!(first_title(&handle.state()), Some("fast"));
        assert_eq!(
            fetcher.requests(),
            vec![DEFAULT_QUERY.to_string(), "slow".to_string(), "fast".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_failure_is_discarded() {
        let fetcher = Arc::new(ScriptedFetcher::with_delays(&[("boom", 1_000)]));
        let handle = started(&fetcher).await;

        handle.dispatch(SearchEvent::QueryChanged("boom".into()));
        wait_for_state(&handle, |s| s.is_loading).await;

        handle.dispatch(SearchEvent::QueryChanged("fast".into()));
        wait_for_state(&handle, |s| first_title(s) == Some("fast")).await;

        settle().await;
        let state = handle.state();
        assert_eq!(state.error, None);
        assert_eq!(first_title(&state), Some("fast"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_external_error_outlives_in_flight_fetch() {
        let fetcher = Arc::new(ScriptedFetcher::with_delays(&[("slow", 1_000)]));
        let handle = started(&fetcher).await;

        handle.dispatch(SearchEvent::QueryChanged("slow".into()));
        wait_for_state(&handle, |s| s.is_loading).await;

        handle.dispatch(SearchEvent::OnError("offline".into()));
        wait_for_state(&handle, |s| s.error.is_some()).await;

        settle().await;
        let state = handle.state();
        assert_eq!(state.error.as_deref(), Some("offline"));
        assert!(!state.is_loading);
        assert!(state.results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_becomes_error_state() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let handle = started(&fetcher).await;

        handle.dispatch(SearchEvent::QueryChanged("boom".into()));
        let state = wait_for_state(&handle, |s| s.error.is_some()).await;

        assert_eq!(state.error.as_deref(), Some("boom"));
        assert!(!state.is_loading);
        assert!(state.results.is_empty());
        assert_eq!(state.current_item, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_feed_becomes_error_state() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let handle = started(&fetcher).await;

        handle.dispatch(SearchEvent::QueryChanged("empty".into()));
        let state = wait_for_state(&handle, |s| s.error.is_some()).await;

        assert_eq!(state.error.as_deref(), Some("No images found"));
        assert!(state.results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_dismissed_keeps_query() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let handle = started(&fetcher).await;

        handle.dispatch(SearchEvent::OnError("boom".into()));
        let failed = wait_for_state(&handle, |s| s.error.is_some()).await;

        handle.dispatch(SearchEvent::ErrorDismissed);
        let state = wait_for_state(&handle, |s| s.error.is_none()).await;

        assert_eq!(state.current_item, None);
        assert_eq!(state.query, failed.query);
        assert_eq!(state.results, failed.results);
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_only_touches_current_item() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let handle = started(&fetcher).await;
        let before = handle.state();
        let chosen = before.results[0].clone();

        handle.dispatch(SearchEvent::UpdateCurrentItem(chosen.clone()));
        let state = wait_for_state(&handle, |s| s.current_item.is_some()).await;

        assert_eq!(
            state,
            SearchState {
                current_item: Some(chosen),
                ..before
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_change_clears_selection() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let handle = started(&fetcher).await;
        let chosen = handle.state().results[0].clone();

        handle.dispatch(SearchEvent::UpdateCurrentItem(chosen));
        wait_for_state(&handle, |s| s.current_item.is_some()).await;

        handle.dispatch(SearchEvent::QueryChanged("dog".into()));
        let state = wait_for_state(&handle, |s| s.query.is_some()).await;
        assert_eq!(state.current_item, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initiate_search_skips_debounce() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let handle = started(&fetcher).await;

        handle.dispatch(SearchEvent::InitiateSearch(Some("dog".into())));
        let state = wait_for_state(&handle, |s| first_title(s) == Some("dog")).await;

        assert!(!state.is_loading);
        assert_eq!(fetcher.requests(), vec![DEFAULT_QUERY.to_string(), "dog".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drops_in_flight_fetch() {
        let fetcher = Arc::new(ScriptedFetcher::with_delays(&[("slow", 1_000)]));
        let handle = started(&fetcher).await;

        handle.dispatch(SearchEvent::QueryChanged("slow".into()));
        wait_for_state(&handle, |s| s.is_loading).await;

        handle.shutdown();
        settle().await;

        let state = handle.state();
        assert!(state.is_loading);
        assert_eq!(first_title(&state), Some(DEFAULT_QUERY));
    }
}
