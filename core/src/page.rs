use crate::annotation::{build_markers, reposition_markers, MarkerSurface};
use crate::error::DataError;
use crate::layout::{BannerDim, BannerScale, BANNER_DIM};
use crate::message::{decode_messages, Message};
use crate::overlay::{OverlayController, OverlaySurface, SelectOutcome, SelectionState};
use crate::player::{PlaybackState, PlayerController, PlayerView, VideoPlayer};
use crate::timer::Throttle;

pub const RESIZE_THROTTLE_MS: f64 = 50.0;

pub trait BannerSurface: OverlaySurface + MarkerSurface {}

impl<T: OverlaySurface + MarkerSurface> BannerSurface for T {}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSettings {
    pub banner: BannerDim,
    pub resize_throttle_ms: f64,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            banner: BANNER_DIM,
            resize_throttle_ms: RESIZE_THROTTLE_MS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PageData {
    pub messages: Vec<Message>,
    pub users: serde_json::Value,
}

impl PageData {
    pub fn from_json(messages_json: &str, users_json: &str) -> Result<Self, DataError> {
        let messages = decode_messages(messages_json)?;
        let users = serde_json::from_str(users_json)?;
        Ok(Self { messages, users })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerSource {
    Resize,
    Overlay,
    Player,
}

pub struct PageContext<S: BannerSurface, P, V> {
    settings: PageSettings,
    surface: S,
    overlay: Option<OverlayController<S::Overlay>>,
    users: serde_json::Value,
    player: Option<PlayerController<P, V>>,
    resize: Throttle,
}

impl<S, P, V> PageContext<S, P, V>
where
    S: BannerSurface,
    P: VideoPlayer,
    V: PlayerView,
{
    pub fn new(settings: PageSettings, surface: S) -> Self {
        Self {
            settings,
            surface,
            overlay: None,
            users: serde_json::Value::Null,
            player: None,
            resize: Throttle::new(settings.resize_throttle_ms),
        }
    }

    pub fn settings(&self) -> PageSettings {
        self.settings
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_loaded(&self) -> bool {
        self.overlay.is_some()
    }

    // Markers are built once here; later layout changes only move them.
    pub fn load(&mut self, data: PageData) -> Option<BannerScale> {
        if self.overlay.is_some() {
            return None;
        }
        build_markers(&mut self.surface, &data.messages);
        self.users = data.users;
        let overlay = OverlayController::new(data.messages, self.settings.banner);
        self.overlay = Some(overlay);
        self.reposition()
    }

    pub fn messages(&self) -> &[Message] {
        self.overlay
            .as_ref()
            .map(|overlay| overlay.messages())
            .unwrap_or(&[])
    }

    pub fn users(&self) -> &serde_json::Value {
        &self.users
    }

    pub fn selection(&self) -> Option<&SelectionState<S::Overlay>> {
        self.overlay.as_ref().map(|overlay| overlay.selection())
    }

    pub fn select_user(&mut self, index: usize, now_ms: f64) -> SelectOutcome {
        match self.overlay.as_mut() {
            Some(overlay) => overlay.select_user(&mut self.surface, index, now_ms),
            None => SelectOutcome::Ignored { index },
        }
    }

    pub fn deselect_user(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.deselect_user(&mut self.surface);
        }
    }

    pub fn on_banner_resized(&mut self, now_ms: f64) -> bool {
        self.resize.trigger(now_ms)
    }

    pub fn reposition(&mut self) -> Option<BannerScale> {
        let overlay = self.overlay.as_ref()?;
        reposition_markers(&mut self.surface, overlay.messages(), self.settings.banner)
    }

    pub fn attach_player(&mut self, controller: PlayerController<P, V>) {
        self.player = Some(controller);
    }

    pub fn player(&self) -> Option<&PlayerController<P, V>> {
        self.player.as_ref()
    }

    pub fn on_player_ready(&mut self, now_ms: f64) {
        if let Some(player) = self.player.as_mut() {
            player.on_ready(now_ms);
        }
    }

    pub fn on_player_state_change(&mut self, state: PlaybackState) {
        if let Some(player) = self.player.as_mut() {
            player.on_state_change(state);
        }
    }

    pub fn toggle_play(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.toggle();
        }
    }

    pub fn next_track(&mut self, now_ms: f64) {
        if let Some(player) = self.player.as_mut() {
            player.next(now_ms);
        }
    }

    pub fn prev_track(&mut self, now_ms: f64) {
        if let Some(player) = self.player.as_mut() {
            player.prev(now_ms);
        }
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.deadlines()
            .into_iter()
            .filter_map(|(_, deadline)| deadline)
            .min_by(|a, b| a.total_cmp(b))
    }

    // Runs every task due at `now_ms` in deadline order. Returns the scale of
    // the last marker reposition, if one ran.
    pub fn advance(&mut self, now_ms: f64) -> Option<BannerScale> {
        let mut repositioned = None;
        while let Some(source) = self.due_source(now_ms) {
            match source {
                TimerSource::Resize => {
                    if self.resize.take_due(now_ms) {
                        if let Some(scale) = self.reposition() {
                            repositioned = Some(scale);
                        }
                    }
                }
                TimerSource::Overlay => {
                    if let Some(overlay) = self.overlay.as_mut() {
                        overlay.fire_due(&mut self.surface, now_ms);
                    }
                }
                TimerSource::Player => {
                    if let Some(player) = self.player.as_mut() {
                        player.fire_due(now_ms);
                    }
                }
            }
        }
        repositioned
    }

    fn deadlines(&self) -> [(TimerSource, Option<f64>); 3] {
        [
            (TimerSource::Resize, self.resize.deadline()),
            (
                TimerSource::Overlay,
                self.overlay.as_ref().and_then(|overlay| overlay.next_deadline()),
            ),
            (
                TimerSource::Player,
                self.player.as_ref().and_then(|player| player.next_deadline()),
            ),
        ]
    }

    fn due_source(&self, now_ms: f64) -> Option<TimerSource> {
        self.deadlines()
            .into_iter()
            .filter_map(|(source, deadline)| {
                deadline
                    .filter(|deadline| *deadline <= now_ms)
                    .map(|deadline| (source, deadline))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(source, _)| source)
    }
}
