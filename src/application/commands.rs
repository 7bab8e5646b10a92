// Command dispatch - user actions translated into store mutations
use crate::application::shortcuts::{KeyChord, ShortcutRouter};
use crate::application::store::Store;
use crate::domain::dashboard::{DashboardState, Document, ListKey, ListKind};
use crate::domain::error::ValidationError;
use crate::domain::favicon::fallback_glyph;
use crate::domain::reorder::drops_before;

/// An item addressed by list key and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRef {
    pub list: ListKey,
    pub index: usize,
}

impl ItemRef {
    pub fn new(list: ListKey, index: usize) -> Self {
        Self { list, index }
    }
}

/// End of a drag gesture. Either end may be missing when the pointer was
/// pressed or released outside an item.
#[derive(Debug, Clone, PartialEq)]
pub struct DragRelease {
    pub source: Option<ItemRef>,
    pub target: Option<ItemRef>,
    pub pointer_x: f64,
    pub target_left: f64,
    pub target_width: f64,
}

/// Commands that work on any document.
#[derive(Debug, Clone, PartialEq)]
pub enum ListCommand {
    AddItem {
        list: ListKey,
        name: String,
        url: String,
    },
    RemoveItem(ItemRef),
    Drag(DragRelease),
    Activate(ItemRef),
    /// A background favicon lookup finished for the item that was at this position.
    IconResolved {
        item: ItemRef,
        icon_url: Option<String>,
    },
}

/// Commands for the tabbed dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddTab { name: String },
    RemoveTab { index: usize },
    SwitchTab { index: usize },
    Key(KeyChord),
    List(ListCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icon {
    Url(String),
    Glyph(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
    Rejected(ValidationError),
    Navigate(String),
    ShowText(String),
    Icon { item: ItemRef, icon: Icon },
}

impl From<Result<(), ValidationError>> for Outcome {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Outcome::Changed,
            Err(e) => Outcome::Rejected(e),
        }
    }
}

fn changed(changed: bool) -> Outcome {
    if changed {
        Outcome::Changed
    } else {
        Outcome::Unchanged
    }
}

pub fn apply<D: Document>(store: &mut Store<D>, command: ListCommand) -> Outcome {
    match command {
        ListCommand::AddItem { list, name, url } => store.add_item(list, &name, &url).into(),
        ListCommand::RemoveItem(item) => {
            store.remove_item(item.list, item.index).map(|_| ()).into()
        }
        ListCommand::Drag(release) => drag(store, release),
        ListCommand::Activate(item) => activate(store, item),
        ListCommand::IconResolved { item, icon_url } => {
            // the item may have been removed or moved while the probe was running
            let Some(target) = store.item(item.list, item.index) else {
                return Outcome::Unchanged;
            };
            let icon = match icon_url {
                Some(url) => Icon::Url(url),
                None => Icon::Glyph(fallback_glyph(&target.name)),
            };
            Outcome::Icon { item, icon }
        }
    }
}

pub fn dispatch(
    store: &mut Store<DashboardState>,
    router: &ShortcutRouter,
    command: Command,
) -> Outcome {
    match command {
        Command::AddTab { name } => store.add_tab(&name).map(|_| ()).into(),
        Command::RemoveTab { index } => store.remove_tab(index).map(|_| ()).into(),
        Command::SwitchTab { index } => changed(store.switch_active_tab(index)),
        Command::Key(chord) => {
            match router.route(&chord, store.tab_count(), store.active_tab_index()) {
                Some(index) => changed(store.switch_active_tab(index)),
                None => Outcome::Unchanged,
            }
        }
        Command::List(command) => apply(store, command),
    }
}

fn drag<D: Document>(store: &mut Store<D>, release: DragRelease) -> Outcome {
    let Some(source) = release.source else {
        return Outcome::Rejected(ValidationError::MalformedDrag("source"));
    };
    let Some(target) = release.target else {
        return Outcome::Rejected(ValidationError::MalformedDrag("target"));
    };

    let before = drops_before(release.pointer_x, release.target_left, release.target_width);
    match store.reorder(source.list, source.index, target.list, target.index, before) {
        Ok(moved) => changed(moved),
        Err(e) => Outcome::Rejected(e),
    }
}

fn activate<D: Document>(store: &Store<D>, item: ItemRef) -> Outcome {
    let Some(list) = store.state().list(item.list) else {
        return Outcome::Rejected(ValidationError::UnknownList(item.list));
    };
    let Some(target) = list.get(item.index) else {
        return Outcome::Rejected(ValidationError::IndexOutOfRange {
            index: item.index,
            len: list.len(),
        });
    };

    match store.state().list_kind(item.list) {
        ListKind::Navigable => Outcome::Navigate(target.url.clone()),
        ListKind::DisplayOnly => Outcome::ShowText(target.url.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::shortcuts::Modifier;
    use crate::application::store::tests::harness;
    use crate::domain::dashboard::{FlatLists, Item};

    fn add(list: ListKey, name: &str, url: &str) -> ListCommand {
        ListCommand::AddItem {
            list,
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    fn release(source: usize, target: usize, pointer_x: f64) -> DragRelease {
        DragRelease {
            source: Some(ItemRef::new(ListKey::Services, source)),
            target: Some(ItemRef::new(ListKey::Services, target)),
            pointer_x,
            target_left: 200.0,
            target_width: 100.0,
        }
    }

    fn flat() -> FlatLists {
        FlatLists {
            services: ["A", "B", "C"]
                .into_iter()
                .map(|name| Item::new(name, &format!("{name}.lan")).unwrap())
                .collect(),
            addresses: vec![Item::new("NAS", "192.168.1.20").unwrap()],
        }
    }

    #[tokio::test]
    async fn test_dispatch_builds_dashboard() {
        let mut h = harness(DashboardState::empty());
        let router = ShortcutRouter::default();

        let outcomes = [
            dispatch(&mut h.store, &router, Command::AddTab { name: "Work".into() }),
            dispatch(&mut h.store, &router, Command::List(add(ListKey::Tab(0), "Mail", "mail.com"))),
            dispatch(&mut h.store, &router, Command::List(add(ListKey::Tab(0), "", "x.com"))),
        ];

        assert_eq!(outcomes[0], Outcome::Changed);
        assert_eq!(outcomes[1], Outcome::Changed);
        assert_eq!(outcomes[2], Outcome::Rejected(ValidationError::EmptyName));
        assert_eq!(h.store.state().tabs[0].items[0].url, "http://mail.com");
    }

    #[tokio::test]
    async fn test_commands_reach_second_tab_with_same_name() {
        let mut h = harness(DashboardState::empty());
        let router = ShortcutRouter::default();
        for _ in 0..2 {
            dispatch(&mut h.store, &router, Command::AddTab { name: "Work".into() });
        }

        let second = ListKey::Tab(1);
        dispatch(&mut h.store, &router, Command::List(add(second, "Mail", "mail.com")));
        dispatch(&mut h.store, &router, Command::List(add(second, "Docs", "docs.com")));
        let drag = DragRelease {
            source: Some(ItemRef::new(second, 1)),
            target: Some(ItemRef::new(second, 0)),
            pointer_x: 0.0,
            target_left: 0.0,
            target_width: 100.0,
        };
        assert_eq!(
            dispatch(&mut h.store, &router, Command::List(ListCommand::Drag(drag))),
            Outcome::Changed
        );
        let remove = ListCommand::RemoveItem(ItemRef::new(second, 1));
        assert_eq!(dispatch(&mut h.store, &router, Command::List(remove)), Outcome::Changed);

        let tabs = &h.store.state().tabs;
        assert!(tabs[0].items.is_empty());
        assert_eq!(tabs[1].items.len(), 1);
        assert_eq!(tabs[1].items[0].name, "Docs");
    }

    #[tokio::test]
    async fn test_drag_after_last_item() {
        let mut h = harness(flat());

        // released on the right half of the target
        assert_eq!(apply(&mut h.store, ListCommand::Drag(release(0, 2, 280.0))), Outcome::Changed);

        let names: Vec<_> = h.store.state().services.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["B", "C", "A"]);
    }

    #[tokio::test]
    async fn test_drag_before_target() {
        let mut h = harness(flat());
        assert_eq!(apply(&mut h.store, ListCommand::Drag(release(2, 0, 210.0))), Outcome::Changed);

        let names: Vec<_> = h.store.state().services.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_malformed_drag_is_rejected() {
        let mut h = harness(flat());
        let mut missing = release(0, 1, 0.0);
        missing.target = None;

        assert_eq!(
            apply(&mut h.store, ListCommand::Drag(missing)),
            Outcome::Rejected(ValidationError::MalformedDrag("target"))
        );

        let mut across = release(0, 0, 0.0);
        across.target = Some(ItemRef::new(ListKey::Addresses, 0));
        assert!(matches!(
            apply(&mut h.store, ListCommand::Drag(across)),
            Outcome::Rejected(ValidationError::CrossListDrag { .. })
        ));
        assert_eq!(h.store.state(), &flat());
    }

    #[tokio::test]
    async fn test_activate_respects_list_kind() {
        let mut h = harness(flat());

        assert_eq!(
            apply(&mut h.store, ListCommand::Activate(ItemRef::new(ListKey::Services, 0))),
            Outcome::Navigate("http://A.lan".into())
        );
        assert_eq!(
            apply(&mut h.store, ListCommand::Activate(ItemRef::new(ListKey::Addresses, 0))),
            Outcome::ShowText("http://192.168.1.20".into())
        );
        assert!(matches!(
            apply(&mut h.store, ListCommand::Activate(ItemRef::new(ListKey::Addresses, 3))),
            Outcome::Rejected(ValidationError::IndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[tokio::test]
    async fn test_late_icon_for_removed_item_is_ignored() {
        let mut h = harness(flat());
        apply(&mut h.store, ListCommand::RemoveItem(ItemRef::new(ListKey::Services, 2)));

        let late = ListCommand::IconResolved {
            item: ItemRef::new(ListKey::Services, 2),
            icon_url: Some("http://c.lan/favicon.ico".into()),
        };
        assert_eq!(apply(&mut h.store, late), Outcome::Unchanged);

        let missing = ListCommand::IconResolved {
            item: ItemRef::new(ListKey::Services, 1),
            icon_url: None,
        };
        assert_eq!(
            apply(&mut h.store, missing),
            Outcome::Icon {
                item: ItemRef::new(ListKey::Services, 1),
                icon: Icon::Glyph("B".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_key_chord_switches_tab() {
        let mut h = harness(DashboardState::default());
        let router = ShortcutRouter::default();
        dispatch(&mut h.store, &router, Command::AddTab { name: "Second".into() });
        h.store.settle().await;
        let saves = h.repository.saves();

        let alt = |key| Command::Key(KeyChord::new(Modifier::Alt, key));
        assert_eq!(dispatch(&mut h.store, &router, alt('s')), Outcome::Unchanged);
        assert_eq!(dispatch(&mut h.store, &router, alt('d')), Outcome::Unchanged);
        assert_eq!(
            dispatch(&mut h.store, &router, Command::Key(KeyChord::new(Modifier::Alt, 'a').in_editable())),
            Outcome::Unchanged
        );
        h.store.settle().await;
        assert_eq!(h.repository.saves(), saves);

        assert_eq!(dispatch(&mut h.store, &router, alt('a')), Outcome::Changed);
        assert_eq!(h.store.active_tab_index(), 0);
    }
}
