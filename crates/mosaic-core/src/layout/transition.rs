//! Keyed enter/update/leave transitions between two layouts
//!
//! Tiles are matched by [`ItemId`], never by position, so removing or
//! reordering items cannot make an unrelated tile inherit another tile's
//! geometry.

use std::collections::{HashMap, HashSet};

use crate::gallery::ItemId;

use super::balancer::{GridItem, TileRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// New tile, grows in from nothing
    Enter,
    /// Tile present before and after, moves to its new slot
    Update,
    /// Tile no longer present, collapses and is removed
    Leave,
}

/// Displayed state of one tile at some point of a transition
#[derive(Debug, Clone, PartialEq)]
pub struct TileFrame {
    pub id: ItemId,
    /// Index in the current item list; `None` for leaving tiles
    pub index: Option<usize>,
    pub rect: TileRect,
    pub opacity: f64,
}

/// Animation of a single tile
#[derive(Debug, Clone, PartialEq)]
pub struct TileTransition {
    pub id: ItemId,
    pub kind: TransitionKind,
    pub index: Option<usize>,
    pub from: TileRect,
    pub to: TileRect,
    pub from_opacity: f64,
    pub to_opacity: f64,
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

fn collapsed(rect: TileRect) -> TileRect {
    TileRect { height: 0.0, ..rect }
}

impl TileTransition {
    fn enter(tile: &GridItem) -> Self {
        Self {
            id: tile.id.clone(),
            kind: TransitionKind::Enter,
            index: Some(tile.index),
            from: collapsed(tile.rect),
            to: tile.rect,
            from_opacity: 0.0,
            to_opacity: 1.0,
        }
    }

    fn update(from: TileRect, from_opacity: f64, tile: &GridItem) -> Self {
        Self {
            id: tile.id.clone(),
            kind: TransitionKind::Update,
            index: Some(tile.index),
            from,
            to: tile.rect,
            from_opacity,
            to_opacity: 1.0,
        }
    }

    fn leave(id: ItemId, from: TileRect, from_opacity: f64) -> Self {
        Self {
            id,
            kind: TransitionKind::Leave,
            index: None,
            from,
            to: collapsed(from),
            from_opacity,
            to_opacity: 0.0,
        }
    }

    /// Frame at eased progress `t` in `[0, 1]`
    pub fn sample(&self, t: f64) -> TileFrame {
        let t = t.clamp(0.0, 1.0);
        TileFrame {
            id: self.id.clone(),
            index: self.index,
            rect: TileRect {
                x: lerp(self.from.x, self.to.x, t),
                y: lerp(self.from.y, self.to.y, t),
                width: lerp(self.from.width, self.to.width, t),
                height: lerp(self.from.height, self.to.height, t),
            },
            opacity: lerp(self.from_opacity, self.to_opacity, t),
        }
    }

    /// Whether the tile actually changes
    pub fn is_static(&self) -> bool {
        self.from == self.to && self.from_opacity == self.to_opacity
    }
}

/// All tile transitions produced by one layout change
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransitionPlan {
    /// Entering and updating tiles in the new layout's order, then leaving tiles
    pub transitions: Vec<TileTransition>,
}

impl TransitionPlan {
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// True when nothing moves, fades or changes size
    pub fn is_static(&self) -> bool {
        self.transitions.iter().all(TileTransition::is_static)
    }

    pub fn of_kind(&self, kind: TransitionKind) -> impl Iterator<Item = &TileTransition> {
        self.transitions.iter().filter(move |t| t.kind == kind)
    }

    pub fn get(&self, id: &ItemId) -> Option<&TileTransition> {
        self.transitions.iter().find(|t| &t.id == id)
    }

    pub fn frames_at(&self, t: f64) -> Vec<TileFrame> {
        self.transitions.iter().map(|tr| tr.sample(t)).collect()
    }

    /// Settled frames once the plan has finished (leaving tiles removed)
    pub fn settled_frames(&self) -> Vec<TileFrame> {
        self.transitions
            .iter()
            .filter(|t| t.kind != TransitionKind::Leave)
            .map(|t| t.sample(1.0))
            .collect()
    }
}

/// Diff two layouts by item id
pub fn plan(previous: &[GridItem], next: &[GridItem]) -> TransitionPlan {
    let frames: Vec<TileFrame> = previous
        .iter()
        .map(|tile| TileFrame {
            id: tile.id.clone(),
            index: Some(tile.index),
            rect: tile.rect,
            opacity: 1.0,
        })
        .collect();
    plan_from_frames(&frames, next)
}

/// Diff what is currently on screen against a new layout
///
/// Used to retarget while a previous plan is still running: every tile starts
/// from the geometry it is displayed at right now, including tiles that were
/// half-way through leaving and come back.
pub fn plan_from_frames(current: &[TileFrame], next: &[GridItem]) -> TransitionPlan {
    let shown: HashMap<&ItemId, &TileFrame> = current.iter().map(|f| (&f.id, f)).collect();

    let mut transitions = Vec::with_capacity(next.len() + current.len());
    for tile in next {
        match shown.get(&tile.id) {
            Some(frame) => transitions.push(TileTransition::update(frame.rect, frame.opacity, tile)),
            None => transitions.push(TileTransition::enter(tile)),
        }
    }

    let remaining: HashSet<&ItemId> = next.iter().map(|t| &t.id).collect();
    for frame in current {
        if !remaining.contains(&frame.id) {
            transitions.push(TileTransition::leave(frame.id.clone(), frame.rect, frame.opacity));
        }
    }

    TransitionPlan { transitions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::Item;
    use crate::layout::balancer::layout;

    fn items(ids: &[(&str, f64)]) -> Vec<Item> {
        ids.iter()
            .map(|(id, h)| Item::image(*id, *h, "x.png"))
            .collect()
    }

    #[test]
    fn test_initial_layout_all_enter() {
        let next = layout(&items(&[("a", 200.0), ("b", 300.0)]), 2, 400.0);
        let plan = plan(&[], &next.tiles);
        assert_eq!(plan.of_kind(TransitionKind::Enter).count(), 2);

        let start = plan.frames_at(0.0);
        assert_eq!(start[0].rect.height, 0.0);
        assert_eq!(start[0].opacity, 0.0);
        assert_eq!(plan.frames_at(1.0)[1].rect, next.tiles[1].rect);
    }

    #[test]
    fn test_column_change_updates_by_id() {
        let list = items(&[("a", 600.0), ("b", 400.0), ("c", 800.0)]);
        let before = layout(&list, 2, 400.0);
        let after = layout(&list, 1, 400.0);
        let plan = plan(&before.tiles, &after.tiles);

        assert_eq!(plan.of_kind(TransitionKind::Update).count(), 3);
        let c = plan.get(&ItemId::from("c")).unwrap();
        assert_eq!(c.from, before.tiles[2].rect);
        assert_eq!(c.to, after.tiles[2].rect);
    }

    #[test]
    fn test_removal_does_not_teleport_neighbours() {
        let before = layout(&items(&[("a", 200.0), ("b", 200.0), ("c", 200.0)]), 3, 300.0);
        let after = layout(&items(&[("a", 200.0), ("c", 200.0)]), 3, 300.0);
        let plan = plan(&before.tiles, &after.tiles);

        let b = plan.get(&ItemId::from("b")).unwrap();
        assert_eq!(b.kind, TransitionKind::Leave);
        assert_eq!(b.to.height, 0.0);
        assert_eq!(b.to_opacity, 0.0);

        // "c" slides from its own slot (column 2) to column 1, it does not
        // start from the slot "b" used to occupy.
        let c = plan.get(&ItemId::from("c")).unwrap();
        assert_eq!(c.kind, TransitionKind::Update);
        assert_eq!(c.from.x, 200.0);
        assert_eq!(c.to.x, 100.0);
        assert_eq!(c.index, Some(1));
    }

    #[test]
    fn test_each_id_appears_once() {
        let before = layout(&items(&[("a", 100.0), ("b", 100.0), ("c", 100.0)]), 2, 200.0);
        let after = layout(&items(&[("c", 100.0), ("d", 100.0), ("a", 100.0)]), 2, 200.0);
        let plan = plan(&before.tiles, &after.tiles);

        let mut ids: Vec<&str> = plan.transitions.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(plan.settled_frames().len(), 3);
    }

    #[test]
    fn test_retarget_starts_from_current_frame() {
        let list = items(&[("a", 200.0), ("b", 200.0)]);
        let two = layout(&list, 2, 400.0);
        let one = layout(&list, 1, 400.0);

        let first = plan(&two.tiles, &one.tiles);
        let midway = first.frames_at(0.5);
        let second = plan_from_frames(&midway, &two.tiles);

        let b = second.get(&ItemId::from("b")).unwrap();
        assert_eq!(b.from, midway[1].rect);
        assert_eq!(b.to, two.tiles[1].rect);
    }

    #[test]
    fn test_leaving_tile_can_come_back() {
        let full = layout(&items(&[("a", 200.0), ("b", 200.0)]), 2, 400.0);
        let reduced = layout(&items(&[("a", 200.0)]), 2, 400.0);

        let leaving = plan(&full.tiles, &reduced.tiles);
        let midway = leaving.frames_at(0.5);
        let back = plan_from_frames(&midway, &full.tiles);

        let b = back.get(&ItemId::from("b")).unwrap();
        assert_eq!(b.kind, TransitionKind::Update);
        assert!((b.from_opacity - 0.5).abs() < 1e-9);
        assert_eq!(b.to_opacity, 1.0);
    }

    #[test]
    fn test_identical_layouts_are_static() {
        let list = items(&[("a", 200.0), ("b", 300.0)]);
        let current = layout(&list, 2, 400.0);
        assert!(plan(&current.tiles, &current.tiles).is_static());
    }
}
