use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::domain::{Article, Direction, LoadState, LoadStates, Page, Phase};
use crate::errors::{LoadError, NewsResult};
use crate::paging::cancel::CancelToken;
use crate::paging::source::{PagingSource, PagingState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    pub page_size: usize,
    /// How close to the end of the loaded items an access has to be to
    /// trigger loading the next page.
    pub prefetch_distance: usize,
}

impl PagingConfig {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            prefetch_distance: page_size,
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self::new(10)
    }
}

/// What a consumer sees of the feed at one point in time.
#[derive(Debug, Clone)]
pub struct PagingSnapshot {
    pub items: Arc<Vec<Article>>,
    pub load_states: LoadStates,
    pub phase: Phase,
}

impl PagingSnapshot {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Article> {
        self.items.get(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// Nothing was fetched: a load for that direction was already running,
    /// the feed is exhausted, or the feed is in a state that needs `retry`.
    Skipped,
    Failed(LoadError),
    Cancelled,
}

struct EngineState<S> {
    /// Source for the current generation; set once its first refresh succeeds.
    source: Option<Arc<S>>,
    pages: Vec<Page>,
    load_states: LoadStates,
    generation: u64,
    /// Key of the last refresh attempt, reused by `retry`.
    refresh_key: Option<u32>,
    refresh_in_flight: bool,
    append_in_flight: bool,
    anchor_position: Option<usize>,
}

impl<S> EngineState<S> {
    fn loaded(&self) -> bool {
        self.source.is_some()
    }

    fn next_key(&self) -> Option<u32> {
        self.pages.last().and_then(|page| page.next_key)
    }

    fn phase(&self) -> Phase {
        let states = &self.load_states;
        match (&states.refresh, &states.append) {
            (LoadState::Loading, _) => Phase::Loading(Direction::Refresh),
            (LoadState::Error(_), _) => Phase::Error(Direction::Refresh),
            _ if !self.loaded() => Phase::Idle,
            (_, LoadState::Loading) => Phase::Loading(Direction::Append),
            (_, LoadState::Error(_)) => Phase::Error(Direction::Append),
            (_, append) if append.end_reached() => Phase::Exhausted,
            _ => Phase::Ready,
        }
    }

    fn can_append(&self) -> bool {
        self.loaded()
            && !self.append_in_flight
            && !self.refresh_in_flight
            && self.load_states.append.error().is_none()
            && self.next_key().is_some()
    }

    fn set_in_flight(&mut self, direction: Direction, value: bool) {
        match direction {
            Direction::Refresh => self.refresh_in_flight = value,
            _ => self.append_in_flight = value,
        }
    }
}

/// Incrementally loads a paged feed on demand and publishes snapshots of it.
///
/// Each refresh builds a new source from `factory`, so per-source counters
/// start over. Appends always continue from the last loaded page.
pub struct PagingEngine<S: PagingSource> {
    factory: Box<dyn Fn() -> S + Send + Sync>,
    config: PagingConfig,
    state: Mutex<EngineState<S>>,
    snapshots: watch::Sender<PagingSnapshot>,
}

impl<S: PagingSource> PagingEngine<S> {
    pub fn new(config: PagingConfig, factory: impl Fn() -> S + Send + Sync + 'static) -> Self {
        let state = EngineState {
            source: None,
            pages: Vec::new(),
            load_states: LoadStates::default(),
            generation: 0,
            refresh_key: None,
            refresh_in_flight: false,
            append_in_flight: false,
            anchor_position: None,
        };
        let (snapshots, _) = watch::channel(PagingSnapshot {
            items: Arc::new(Vec::new()),
            load_states: state.load_states.clone(),
            phase: state.phase(),
        });

        Self {
            factory: Box::new(factory),
            config,
            state: Mutex::new(state),
            snapshots,
        }
    }

    pub fn config(&self) -> PagingConfig {
        self.config
    }

    pub fn subscribe(&self) -> watch::Receiver<PagingSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> PagingSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.snapshots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at `index` without triggering any load.
    pub fn get(&self, index: usize) -> Option<Article> {
        self.snapshots.borrow().get(index).cloned()
    }

    /// Consumer-driven access: loads the first page when idle and the next
    /// page when `index` is within the prefetch distance of the end.
    pub async fn access(&self, index: usize, cancel: &CancelToken) -> Option<Article> {
        let needs_refresh = {
            let mut state = self.lock();
            state.anchor_position = Some(index);
            !state.loaded() && state.load_states.refresh.error().is_none()
        };
        if needs_refresh {
            self.load(Direction::Refresh, None, cancel).await;
        }

        let should_append = {
            let state = self.lock();
            let loaded_items: usize = state.pages.iter().map(|p| p.articles.len()).sum();
            state.can_append() && index.saturating_add(self.config.prefetch_distance) >= loaded_items
        };
        if should_append {
            self.load(Direction::Append, None, cancel).await;
        }

        self.get(index)
    }

    /// Reload from the first page with a fresh source.
    pub async fn refresh(&self, cancel: &CancelToken) -> LoadOutcome {
        self.load(Direction::Refresh, None, cancel).await
    }

    /// Load the page after the last loaded one.
    pub async fn load_more(&self, cancel: &CancelToken) -> LoadOutcome {
        let (loaded, refresh_failed, append_failed) = {
            let state = self.lock();
            (
                state.loaded(),
                state.load_states.refresh.error().is_some(),
                state.load_states.append.error().is_some(),
            )
        };

        if !loaded {
            if refresh_failed {
                return LoadOutcome::Skipped;
            }
            return self.load(Direction::Refresh, None, cancel).await;
        }
        if append_failed {
            return LoadOutcome::Skipped;
        }
        self.load(Direction::Append, None, cancel).await
    }

    /// Re-issue whichever load last failed, refresh first.
    pub async fn retry(&self, cancel: &CancelToken) -> LoadOutcome {
        let (direction, refresh_key) = {
            let state = self.lock();
            if state.load_states.refresh.error().is_some() {
                (Direction::Refresh, state.refresh_key)
            } else if state.load_states.append.error().is_some() {
                (Direction::Append, None)
            } else {
                return LoadOutcome::Skipped;
            }
        };

        self.load(direction, refresh_key, cancel).await
    }

    /// Reload around the last accessed item instead of from the first page.
    pub async fn invalidate(&self, cancel: &CancelToken) -> LoadOutcome {
        let key = {
            let state = self.lock();
            state.source.as_ref().and_then(|source| {
                source.refresh_key(&PagingState {
                    pages: state.pages.clone(),
                    anchor_position: state.anchor_position,
                })
            })
        };
        tracing::debug!(?key, "invalidating feed");
        self.load(Direction::Refresh, key, cancel).await
    }

    fn lock(&self) -> MutexGuard<'_, EngineState<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &EngineState<S>) {
        let items: Vec<Article> = state
            .pages
            .iter()
            .flat_map(|page| page.articles.iter().cloned())
            .collect();

        self.snapshots.send_replace(PagingSnapshot {
            items: Arc::new(items),
            load_states: state.load_states.clone(),
            phase: state.phase(),
        });
    }

    /// `refresh_key` is only used for refreshes.
    async fn load(
        &self,
        direction: Direction,
        refresh_key: Option<u32>,
        cancel: &CancelToken,
    ) -> LoadOutcome {
        let (source, key, generation, previous) = {
            let mut state = self.lock();
            let (source, key) = match direction {
                Direction::Refresh => {
                    if state.refresh_in_flight {
                        return LoadOutcome::Skipped;
                    }
                    state.refresh_key = refresh_key;
                    (Arc::new((self.factory)()), refresh_key)
                }
                _ => {
                    if state.append_in_flight || state.refresh_in_flight {
                        return LoadOutcome::Skipped;
                    }
                    match (state.source.clone(), state.next_key()) {
                        (Some(source), Some(key)) => (source, Some(key)),
                        _ => return LoadOutcome::Skipped,
                    }
                }
            };

            let previous = state.load_states.get(direction).clone();
            state.set_in_flight(direction, true);
            state.load_states.set(direction, LoadState::Loading);
            self.publish(&state);
            (source, key, state.generation, previous)
        };

        let mut in_flight = InFlight {
            engine: self,
            direction,
            generation,
            previous: Some(previous),
        };

        if cancel.is_cancelled() {
            return LoadOutcome::Cancelled;
        }

        tracing::debug!(?direction, ?key, "loading page");
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = source.load(key) => Some(result),
        };

        match result {
            Some(result) => in_flight.complete(source, result),
            None => {
                tracing::debug!(?direction, "load cancelled");
                LoadOutcome::Cancelled
            }
        }
    }
}

/// Marks one running load. Dropping it without `complete` (cancellation, or
/// the future being dropped) puts the engine back the way it was.
struct InFlight<'a, S: PagingSource> {
    engine: &'a PagingEngine<S>,
    direction: Direction,
    generation: u64,
    previous: Option<LoadState>,
}

impl<S: PagingSource> InFlight<'_, S> {
    fn complete(&mut self, source: Arc<S>, result: NewsResult<Page>) -> LoadOutcome {
        self.previous = None;
        let mut state = self.engine.lock();
        state.set_in_flight(self.direction, false);

        // A refresh finished while this append was running; its page belongs
        // to a generation that no longer exists.
        if self.direction == Direction::Append && state.generation != self.generation {
            return LoadOutcome::Skipped;
        }

        let outcome = match result {
            Ok(page) => {
                match self.direction {
                    Direction::Refresh => {
                        state.generation += 1;
                        state.source = Some(source);
                        state.load_states = LoadStates {
                            refresh: LoadState::idle(),
                            prepend: LoadState::NotLoading {
                                end_of_pagination_reached: page.prev_key.is_none(),
                            },
                            append: LoadState::NotLoading {
                                end_of_pagination_reached: page.next_key.is_none(),
                            },
                        };
                        state.pages = vec![page];
                    }
                    _ => {
                        state.load_states.append = LoadState::NotLoading {
                            end_of_pagination_reached: page.next_key.is_none(),
                        };
                        state.pages.push(page);
                    }
                }
                LoadOutcome::Loaded
            }
            Err(err) => {
                tracing::warn!(direction = ?self.direction, error = %err, "page load failed");
                let error = LoadError::from(&err);
                state
                    .load_states
                    .set(self.direction, LoadState::Error(error.clone()));
                LoadOutcome::Failed(error)
            }
        };

        self.engine.publish(&state);
        outcome
    }
}

impl<S: PagingSource> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        let Some(previous) = self.previous.take() else {
            return;
        };

        let mut state = self.engine.lock();
        state.set_in_flight(self.direction, false);
        if self.direction == Direction::Refresh || state.generation == self.generation {
            state.load_states.set(self.direction, previous);
        }
        self.engine.publish(&state);
    }
}
