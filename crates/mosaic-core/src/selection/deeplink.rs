//! Mirroring the selection to an external key (e.g. a URL query parameter)
//!
//! The key for an open item is its id. Incoming keys resolve by exact id
//! first, then by a loose title match so hand-written slugs such as
//! `harbour-lights` still find "Harbour Lights".

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::state::SelectionChange;
use crate::gallery::Item;

/// Host-side callbacks fired after a selection change is committed
pub trait SelectionHost {
    /// The viewer opened, moved, or closed; `key` is `None` when closed
    fn on_selection_change(&mut self, is_open: bool, key: Option<&str>);

    /// The viewer became visible or hidden (e.g. to lock page scrolling)
    fn on_viewer_open_change(&mut self, _open: bool) {}
}

impl<F> SelectionHost for F
where
    F: FnMut(bool, Option<&str>),
{
    fn on_selection_change(&mut self, is_open: bool, key: Option<&str>) {
        self(is_open, key)
    }
}

/// Host that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl SelectionHost for NoopHost {
    fn on_selection_change(&mut self, _is_open: bool, _key: Option<&str>) {}
}

/// External key of an item
pub fn external_key(item: &Item) -> &str {
    item.id.as_str()
}

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_\-]+").expect("separator regex should compile"));

/// Lowercase and drop whitespace, dashes and underscores
pub fn normalize(text: &str) -> String {
    SEPARATORS.replace_all(&text.to_lowercase(), "").into_owned()
}

/// Find the item an external key refers to
///
/// Exact id matches win; otherwise the first item whose normalized title
/// (in any locale) contains the normalized key. Broad keys can match the
/// wrong item when titles share words.
pub fn resolve_key(items: &[Item], key: &str) -> Option<usize> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    if let Some(index) = items.iter().position(|item| item.id.as_str() == key) {
        return Some(index);
    }

    let needle = normalize(key);
    if needle.is_empty() {
        return None;
    }

    let found = items.iter().position(|item| {
        item.title
            .as_ref()
            .map(|title| {
                title
                    .variants()
                    .into_iter()
                    .any(|variant| normalize(variant).contains(&needle))
            })
            .unwrap_or(false)
    });
    debug!(key, ?found, "Resolved deep link by title");
    found
}

/// Forwards committed selection changes to the host
pub struct DeepLinkSync {
    host: Box<dyn SelectionHost>,
}

impl DeepLinkSync {
    pub fn new(host: Box<dyn SelectionHost>) -> Self {
        Self { host }
    }

    /// Notify the host of a change that has already been applied
    pub fn publish(&mut self, change: SelectionChange, items: &[Item]) {
        if change.toggles_viewer() {
            self.host.on_viewer_open_change(change.to.is_open());
        }
        let key = change
            .to
            .active_index()
            .and_then(|index| items.get(index))
            .map(external_key);
        self.host.on_selection_change(key.is_some(), key);
    }
}

impl std::fmt::Debug for DeepLinkSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepLinkSync").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use super::*;
    use crate::gallery::LocalizedText;
    use crate::selection::state::Selection;

    fn gallery() -> Vec<Item> {
        let mut localized = BTreeMap::new();
        localized.insert("en".to_string(), "Night Market".to_string());
        localized.insert("de".to_string(), "Nachtmarkt".to_string());

        vec![
            Item::image("xcons-01", 600.0, "a.png").with_title("Harbour Lights"),
            Item::image("xcons-02", 400.0, "b.png").with_title("Harbour Cranes at Dawn"),
            Item::image("fusion-ads", 800.0, "c.png").with_title(LocalizedText::Localized(localized)),
            Item::image("xcons-03", 300.0, "d.png"),
        ]
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Harbour   Lights "), "harbourlights");
        assert_eq!(normalize("harbour-lights"), "harbourlights");
        assert_eq!(normalize("Harbour_Lights"), "harbourlights");
        assert_eq!(normalize("Harbour -_\tLights"), "harbourlights");
    }

    #[test]
    fn test_exact_id_first() {
        let items = gallery();
        assert_eq!(resolve_key(&items, "xcons-02"), Some(1));
        assert_eq!(resolve_key(&items, "xcons-03"), Some(3));
    }

    #[test]
    fn test_title_fallback() {
        let items = gallery();
        assert_eq!(resolve_key(&items, "harbour-lights"), Some(0));
        assert_eq!(resolve_key(&items, "CRANES"), Some(1));
        assert_eq!(resolve_key(&items, "nachtmarkt"), Some(2));
    }

    #[test]
    fn test_broad_key_takes_first_match() {
        let items = gallery();
        assert_eq!(resolve_key(&items, "harbour"), Some(0));
    }

    #[test]
    fn test_unresolvable_and_empty_keys() {
        let items = gallery();
        assert_eq!(resolve_key(&items, "lighthouse"), None);
        assert_eq!(resolve_key(&items, ""), None);
        assert_eq!(resolve_key(&items, " - _ "), None);
    }

    #[test]
    fn test_publish_order_and_payload() {
        let items = gallery();
        let log: Rc<RefCell<Vec<(bool, Option<String>)>>> = Rc::default();
        let sink = log.clone();
        let mut sync = DeepLinkSync::new(Box::new(move |open: bool, key: Option<&str>| {
            sink.borrow_mut().push((open, key.map(str::to_string)));
        }));

        let mut selection = Selection::new(items.len());
        let change = selection.open_at(2).unwrap();
        sync.publish(change, &items);
        let change = selection.close().unwrap();
        sync.publish(change, &items);

        assert_eq!(
            *log.borrow(),
            vec![(true, Some("fusion-ads".to_string())), (false, None)]
        );
    }

    #[test]
    fn test_round_trip() {
        let items = gallery();
        for index in 0..items.len() {
            let key = external_key(&items[index]).to_string();
            assert_eq!(resolve_key(&items, &key), Some(index));
        }
    }
}
