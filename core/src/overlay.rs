use std::collections::HashMap;

use crate::layout::BannerDim;
use crate::message::{FontSize, Message, MessageBody};
use crate::timer::{TimerHandle, TimerQueue};

pub const HIGHLIGHT_MS: f64 = 2000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    // The overlay goes on the half of the banner opposite the marker.
    pub fn for_position(x: f64, reference_width: f64) -> Self {
        if x < reference_width / 2.0 {
            Side::Right
        } else {
            Side::Left
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayPanel<'a> {
    pub side: Side,
    pub text: &'a str,
    pub font_size: FontSize,
    pub attribution: String,
}

pub trait OverlaySurface {
    type Overlay;

    /// Returns `None` when the overlay could not be created; nothing is
    /// unmounted for that selection later.
    fn mount_overlay(&mut self, panel: &OverlayPanel<'_>) -> Option<Self::Overlay>;
    fn unmount_overlay(&mut self, overlay: Self::Overlay);
    fn scroll_to(&mut self, target_id: &str) -> bool;
    fn set_highlight(&mut self, target_id: &str, active: bool);
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum OverlayTask {
    ClearHighlight { target: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SelectOutcome {
    Opened { index: usize, side: Side },
    Closed { index: usize },
    Jumped { index: usize, target: String },
    MissingTarget { index: usize, target: Option<String> },
    Ignored { index: usize },
}

#[derive(Debug)]
pub struct SelectionState<H> {
    selected: Option<usize>,
    side: Option<Side>,
    overlay: Option<H>,
}

impl<H> SelectionState<H> {
    fn new() -> Self {
        Self {
            selected: None,
            side: None,
            overlay: None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }

    pub fn overlay(&self) -> Option<&H> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }
}

pub struct OverlayController<H> {
    messages: Vec<Message>,
    banner: BannerDim,
    selection: SelectionState<H>,
    highlights: HashMap<String, TimerHandle>,
    timers: TimerQueue<OverlayTask>,
}

impl<H> OverlayController<H> {
    pub fn new(messages: Vec<Message>, banner: BannerDim) -> Self {
        Self {
            messages,
            banner,
            selection: SelectionState::new(),
            highlights: HashMap::new(),
            timers: TimerQueue::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn banner(&self) -> BannerDim {
        self.banner
    }

    pub fn selection(&self) -> &SelectionState<H> {
        &self.selection
    }

    pub fn side_for(&self, index: usize) -> Option<Side> {
        let message = self.messages.get(index)?;
        Some(Side::for_position(message.position.x, self.banner.width))
    }

    pub fn select_user<S>(&mut self, surface: &mut S, index: usize, now_ms: f64) -> SelectOutcome
    where
        S: OverlaySurface<Overlay = H>,
    {
        let Some(side) = self.side_for(index) else {
            return SelectOutcome::Ignored { index };
        };
        self.remove_overlay(surface);
        if self.selection.selected == Some(index) {
            self.deselect_user(surface);
            return SelectOutcome::Closed { index };
        }
        self.selection.selected = Some(index);
        self.selection.side = Some(side);
        self.render(surface, now_ms)
    }

    pub fn deselect_user<S>(&mut self, surface: &mut S)
    where
        S: OverlaySurface<Overlay = H>,
    {
        self.selection.selected = None;
        self.selection.side = None;
        self.remove_overlay(surface);
    }

    pub fn remove_overlay<S>(&mut self, surface: &mut S)
    where
        S: OverlaySurface<Overlay = H>,
    {
        if let Some(overlay) = self.selection.overlay.take() {
            surface.unmount_overlay(overlay);
        }
    }

    fn render<S>(&mut self, surface: &mut S, now_ms: f64) -> SelectOutcome
    where
        S: OverlaySurface<Overlay = H>,
    {
        let (Some(index), Some(side)) = (self.selection.selected, self.selection.side) else {
            return SelectOutcome::Ignored {
                index: self.selection.selected.unwrap_or_default(),
            };
        };
        let message = &self.messages[index];
        match &message.body {
            MessageBody::Text { text } => {
                let panel = OverlayPanel {
                    side,
                    text,
                    font_size: message.font_size,
                    attribution: message.attribution(),
                };
                self.selection.overlay = surface.mount_overlay(&panel);
                SelectOutcome::Opened { index, side }
            }
            MessageBody::Url { target } => {
                let target = target.clone();
                // url markers never hold the selection, so the next click flashes again
                self.selection.selected = None;
                self.selection.side = None;
                let Some(target) = target else {
                    return SelectOutcome::MissingTarget {
                        index,
                        target: None,
                    };
                };
                if !surface.scroll_to(&target) {
                    return SelectOutcome::MissingTarget {
                        index,
                        target: Some(target),
                    };
                }
                surface.set_highlight(&target, true);
                if let Some(pending) = self.highlights.remove(&target) {
                    self.timers.cancel(pending);
                }
                let handle = self.timers.schedule(
                    now_ms,
                    HIGHLIGHT_MS,
                    OverlayTask::ClearHighlight {
                        target: target.clone(),
                    },
                );
                self.highlights.insert(target.clone(), handle);
                SelectOutcome::Jumped { index, target }
            }
        }
    }

    pub fn highlighted_targets(&self) -> impl Iterator<Item = &str> {
        self.highlights.keys().map(String::as_str)
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.timers.next_deadline()
    }

    pub fn fire_due<S>(&mut self, surface: &mut S, now_ms: f64) -> bool
    where
        S: OverlaySurface<Overlay = H>,
    {
        let Some((_, task)) = self.timers.pop_due(now_ms) else {
            return false;
        };
        match task {
            OverlayTask::ClearHighlight { target } => {
                self.highlights.remove(&target);
                surface.set_highlight(&target, false);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Placement, Position};

    #[derive(Default)]
    struct RecordingSurface {
        next_id: u32,
        mounted: Vec<u32>,
        panels: Vec<(Side, String, String)>,
        highlighted: Vec<String>,
        known_targets: Vec<String>,
        refuse_mount: bool,
        unmounted: Vec<u32>,
    }

    impl OverlaySurface for RecordingSurface {
        type Overlay = u32;

        fn mount_overlay(&mut self, panel: &OverlayPanel<'_>) -> Option<u32> {
            if self.refuse_mount {
                return None;
            }
            self.next_id += 1;
            self.mounted.push(self.next_id);
            self.panels
                .push((panel.side, panel.text.to_string(), panel.attribution.clone()));
            Some(self.next_id)
        }

        fn unmount_overlay(&mut self, overlay: u32) {
            self.unmounted.push(overlay);
            self.mounted.retain(|id| *id != overlay);
        }

        fn scroll_to(&mut self, target_id: &str) -> bool {
            self.known_targets.iter().any(|known| known == target_id)
        }

        fn set_highlight(&mut self, target_id: &str, active: bool) {
            if active {
                self.highlighted.push(target_id.to_string());
            } else {
                self.highlighted.retain(|known| known != target_id);
            }
        }
    }

    fn text_message(x: f64, text: &str) -> Message {
        Message {
            position: Position { x, y: 10.0 },
            body: MessageBody::Text {
                text: text.to_string(),
            },
            name: "kai".to_string(),
            pfp_url: "pfp/kai.png".to_string(),
            placement: Placement::Top,
            font_size: FontSize::Default,
        }
    }

    fn url_message(x: f64, target: Option<&str>) -> Message {
        Message {
            position: Position { x, y: 10.0 },
            body: MessageBody::Url {
                target: target.map(str::to_string),
            },
            name: "noa".to_string(),
            pfp_url: "pfp/noa.png".to_string(),
            placement: Placement::Bottom,
            font_size: FontSize::Default,
        }
    }

    #[test]
    fn side_is_opposite_the_marker() {
        assert_eq!(Side::for_position(100.0, 872.0), Side::Right);
        assert_eq!(Side::for_position(800.0, 872.0), Side::Left);
        assert_eq!(Side::for_position(436.0, 872.0), Side::Left);
        assert_eq!(Side::for_position(435.999, 872.0), Side::Right);
    }

    #[test]
    fn selecting_text_mounts_single_overlay() {
        let mut surface = RecordingSurface::default();
        let mut controller = OverlayController::new(
            vec![text_message(100.0, "first"), text_message(800.0, "second")],
            BannerDim::default(),
        );
        let outcome = controller.select_user(&mut surface, 0, 0.0);
        assert_eq!(
            outcome,
            SelectOutcome::Opened {
                index: 0,
                side: Side::Right
            }
        );
        assert_eq!(surface.mounted.len(), 1);
        assert_eq!(surface.panels[0].1, "first");
        assert_eq!(surface.panels[0].2, "- kai");

        let outcome = controller.select_user(&mut surface, 1, 0.0);
        assert_eq!(
            outcome,
            SelectOutcome::Opened {
                index: 1,
                side: Side::Left
            }
        );
        assert_eq!(surface.mounted, vec![2]);
        assert_eq!(controller.selection().selected(), Some(1));
        assert_eq!(controller.selection().overlay(), Some(&2));
    }

    #[test]
    fn selecting_twice_toggles_off() {
        let mut surface = RecordingSurface::default();
        let mut controller =
            OverlayController::new(vec![text_message(100.0, "hi")], BannerDim::default());
        controller.select_user(&mut surface, 0, 0.0);
        let outcome = controller.select_user(&mut surface, 0, 0.0);
        assert_eq!(outcome, SelectOutcome::Closed { index: 0 });
        assert_eq!(controller.selection().selected(), None);
        assert_eq!(controller.selection().side(), None);
        assert!(!controller.selection().has_overlay());
        assert!(surface.mounted.is_empty());
    }

    #[test]
    fn failed_mount_keeps_selection_without_overlay() {
        let mut surface = RecordingSurface {
            refuse_mount: true,
            ..RecordingSurface::default()
        };
        let mut controller =
            OverlayController::new(vec![text_message(100.0, "hi")], BannerDim::default());
        let outcome = controller.select_user(&mut surface, 0, 0.0);
        assert_eq!(
            outcome,
            SelectOutcome::Opened {
                index: 0,
                side: Side::Right
            }
        );
        assert_eq!(controller.selection().selected(), Some(0));
        assert!(!controller.selection().has_overlay());

        let outcome = controller.select_user(&mut surface, 0, 0.0);
        assert_eq!(outcome, SelectOutcome::Closed { index: 0 });
        assert!(surface.unmounted.is_empty());
        assert_eq!(controller.selection().selected(), None);
    }

    #[test]
    fn remove_overlay_is_idempotent() {
        let mut surface = RecordingSurface::default();
        let mut controller =
            OverlayController::new(vec![text_message(100.0, "hi")], BannerDim::default());
        controller.remove_overlay(&mut surface);
        controller.select_user(&mut surface, 0, 0.0);
        controller.remove_overlay(&mut surface);
        controller.remove_overlay(&mut surface);
        assert!(surface.mounted.is_empty());
        assert_eq!(controller.selection().selected(), Some(0));
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut surface = RecordingSurface::default();
        let mut controller =
            OverlayController::new(vec![text_message(100.0, "hi")], BannerDim::default());
        controller.select_user(&mut surface, 0, 0.0);
        assert_eq!(
            controller.select_user(&mut surface, 7, 0.0),
            SelectOutcome::Ignored { index: 7 }
        );
        assert_eq!(surface.mounted.len(), 1);
        assert_eq!(controller.selection().selected(), Some(0));
    }

    #[test]
    fn url_selection_flashes_without_overlay() {
        let mut surface = RecordingSurface {
            known_targets: vec!["gallery".to_string()],
            ..RecordingSurface::default()
        };
        let mut controller = OverlayController::new(
            vec![text_message(100.0, "hi"), url_message(500.0, Some("gallery"))],
            BannerDim::default(),
        );
        controller.select_user(&mut surface, 0, 0.0);
        let outcome = controller.select_user(&mut surface, 1, 1000.0);
        assert_eq!(
            outcome,
            SelectOutcome::Jumped {
                index: 1,
                target: "gallery".to_string()
            }
        );
        assert!(surface.mounted.is_empty());
        assert!(!controller.selection().has_overlay());
        assert_eq!(controller.selection().selected(), None);
        assert_eq!(surface.highlighted, vec!["gallery".to_string()]);
        assert_eq!(controller.next_deadline(), Some(3000.0));

        assert!(!controller.fire_due(&mut surface, 2999.0));
        assert_eq!(surface.highlighted.len(), 1);
        assert!(controller.fire_due(&mut surface, 3000.0));
        assert!(surface.highlighted.is_empty());
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn reflash_restarts_highlight_window() {
        let mut surface = RecordingSurface {
            known_targets: vec!["gallery".to_string()],
            ..RecordingSurface::default()
        };
        let mut controller = OverlayController::new(
            vec![url_message(500.0, Some("gallery"))],
            BannerDim::default(),
        );
        controller.select_user(&mut surface, 0, 0.0);
        controller.select_user(&mut surface, 0, 1500.0);
        assert_eq!(controller.next_deadline(), Some(3500.0));
        assert!(!controller.fire_due(&mut surface, 2000.0));
        assert!(controller.fire_due(&mut surface, 3500.0));
        assert!(surface.highlighted.iter().all(|target| target != "gallery"));
    }

    #[test]
    fn missing_url_target_has_no_side_effect() {
        let mut surface = RecordingSurface::default();
        let mut controller = OverlayController::new(
            vec![url_message(500.0, None), url_message(10.0, Some("nowhere"))],
            BannerDim::default(),
        );
        assert_eq!(
            controller.select_user(&mut surface, 0, 0.0),
            SelectOutcome::MissingTarget {
                index: 0,
                target: None
            }
        );
        assert_eq!(
            controller.select_user(&mut surface, 1, 0.0),
            SelectOutcome::MissingTarget {
                index: 1,
                target: Some("nowhere".to_string())
            }
        );
        assert!(surface.highlighted.is_empty());
        assert_eq!(controller.next_deadline(), None);
    }
}
