// State store - single owner of the dashboard document
use crate::application::state_repository::StateRepository;
use crate::domain::dashboard::{DashboardState, Document, Item, ListKey, Tab};
use crate::domain::error::ValidationError;
use crate::domain::reorder::{insertion_index, reorder};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// User-visible failure reported on the side channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LoadFailed(String),
    SaveFailed(String),
}

pub type Notifier = mpsc::UnboundedSender<Notice>;

/// Render boundary, invoked with a snapshot after load and after every mutation.
pub trait Render<D>: Send + Sync {
    fn render(&self, state: &D);
}

impl<D, F> Render<D> for F
where
    F: Fn(&D) + Send + Sync,
{
    fn render(&self, state: &D) {
        self(state)
    }
}

/// Owns the dashboard document. Every mutation leaves it structurally valid,
/// then fires a background save and renders.
///
/// Saves are spawned on the ambient Tokio runtime and never queued: overlapping
/// writes converge last-write-wins, and a failed save is reported but never
/// rolled back.
pub struct Store<D: Document> {
    state: D,
    repository: Arc<dyn StateRepository<D>>,
    renderer: Arc<dyn Render<D>>,
    notifier: Notifier,
    in_flight: JoinSet<()>,
}

impl<D: Document> Store<D> {
    pub fn new(
        mut state: D,
        repository: Arc<dyn StateRepository<D>>,
        renderer: Arc<dyn Render<D>>,
        notifier: Notifier,
    ) -> Self {
        state.repair();
        Self {
            state,
            repository,
            renderer,
            notifier,
            in_flight: JoinSet::new(),
        }
    }

    /// Build a store from whatever the repository holds and render it once.
    pub async fn init(
        repository: Arc<dyn StateRepository<D>>,
        renderer: Arc<dyn Render<D>>,
        notifier: Notifier,
    ) -> Self {
        let mut store = Self::new(D::default(), repository, renderer, notifier);
        store.load().await;
        store
    }

    /// Replace the in-memory document with the stored one, repairing defects.
    ///
    /// An absent document, or any load failure, falls back to the default document.
    pub async fn load(&mut self) {
        self.state = match self.repository.load().await {
            Ok(Some(mut state)) => {
                state.repair();
                state
            }
            Ok(None) => {
                tracing::info!("No stored dashboard, starting from the default");
                D::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load dashboard, using the default");
                let _ = self.notifier.send(Notice::LoadFailed(e.to_string()));
                D::default()
            }
        };
        self.render();
    }

    /// Discard the current document in favour of the default one.
    pub fn reset(&mut self) {
        self.state = D::default();
        self.commit();
    }

    pub fn state(&self) -> &D {
        &self.state
    }

    pub fn item(&self, list: ListKey, index: usize) -> Option<&Item> {
        self.state.list(list)?.get(index)
    }

    pub fn add_item(
        &mut self,
        list: ListKey,
        name: &str,
        url: &str,
    ) -> Result<(), ValidationError> {
        let item = Item::new(name, url)?;
        self.list_mut(list)?.push(item);
        self.commit();
        Ok(())
    }

    pub fn remove_item(&mut self, list: ListKey, index: usize) -> Result<Item, ValidationError> {
        let items = self.list_mut(list)?;
        check_index(index, items.len())?;
        let removed = items.remove(index);
        self.commit();
        Ok(removed)
    }

    /// Drag `source` onto `target` within one list. Returns whether the order changed.
    pub fn reorder(
        &mut self,
        source_list: ListKey,
        source: usize,
        target_list: ListKey,
        target: usize,
        drop_before: bool,
    ) -> Result<bool, ValidationError> {
        if source_list != target_list {
            return Err(ValidationError::CrossListDrag {
                source_list,
                target_list,
            });
        }

        let items = self.list_mut(source_list)?;
        let len = items.len();
        check_index(source, len)?;
        check_index(target, len)?;
        if source == target || insertion_index(len, source, target, drop_before) == source {
            return Ok(false);
        }

        let current = std::mem::take(items);
        *items = reorder(current, source, target, drop_before);
        self.commit();
        Ok(true)
    }

    /// Wait for every in-flight save to finish.
    pub async fn settle(&mut self) {
        while self.in_flight.join_next().await.is_some() {}
    }

    fn list_mut(&mut self, list: ListKey) -> Result<&mut Vec<Item>, ValidationError> {
        self.state
            .list_mut(list)
            .ok_or(ValidationError::UnknownList(list))
    }

    fn commit(&mut self) {
        self.persist();
        self.render();
    }

    fn persist(&mut self) {
        while self.in_flight.try_join_next().is_some() {}

        let snapshot = self.state.clone();
        let repository = self.repository.clone();
        let notifier = self.notifier.clone();
        self.in_flight.spawn(async move {
            if let Err(e) = repository.save(&snapshot).await {
                tracing::warn!(error = %e, "Failed to save dashboard");
                let _ = notifier.send(Notice::SaveFailed(e.to_string()));
            }
        });
    }

    fn render(&self) {
        self.renderer.render(&self.state);
    }
}

impl Store<DashboardState> {
    pub fn active_tab_index(&self) -> usize {
        self.state.active_tab_index
    }

    pub fn tab_count(&self) -> usize {
        self.state.tabs.len()
    }

    /// Append a tab and make it active. Returns its index.
    pub fn add_tab(&mut self, name: &str) -> Result<usize, ValidationError> {
        let tab = Tab::new(name)?;
        self.state.tabs.push(tab);
        self.state.active_tab_index = self.state.tabs.len() - 1;
        self.commit();
        Ok(self.state.active_tab_index)
    }

    /// Remove a tab, keeping the same tab active when a tab in front of it goes.
    pub fn remove_tab(&mut self, index: usize) -> Result<Tab, ValidationError> {
        check_index(index, self.state.tabs.len())?;
        let removed = self.state.tabs.remove(index);
        if index < self.state.active_tab_index {
            self.state.active_tab_index -= 1;
        }
        self.state.clamp_active();
        self.commit();
        Ok(removed)
    }

    /// Returns false without saving when the index is out of range or already active.
    pub fn switch_active_tab(&mut self, index: usize) -> bool {
        if index >= self.state.tabs.len() || index == self.state.active_tab_index {
            return false;
        }
        self.state.active_tab_index = index;
        self.commit();
        true
    }
}

fn check_index(index: usize, len: usize) -> Result<(), ValidationError> {
    if index < len {
        Ok(())
    } else {
        Err(ValidationError::IndexOutOfRange { index, len })
    }
}
