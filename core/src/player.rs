use serde::Serialize;

use crate::timer::{TimerHandle, TimerQueue};

pub const POLL_INTERVAL_MS: f64 = 500.0;
pub const SETTLE_DELAY_MS: f64 = 500.0;
pub const PLAYER_ELEMENT_ID: &str = "yt-player";
pub const PLAYER_SIZE: &str = "100";
pub const FALLBACK_ARTIST: &str = "Artist";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
    Unknown,
}

impl PlaybackState {
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => PlaybackState::Unstarted,
            0 => PlaybackState::Ended,
            1 => PlaybackState::Playing,
            2 => PlaybackState::Paused,
            3 => PlaybackState::Buffering,
            5 => PlaybackState::Cued,
            _ => PlaybackState::Unknown,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoData {
    pub title: Option<String>,
    pub author: Option<String>,
    pub video_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NowPlaying {
    pub title: Option<String>,
    pub artist: String,
    pub thumbnail_url: Option<String>,
}

impl NowPlaying {
    pub fn from_video_data(data: &VideoData) -> Self {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        Self {
            title: non_empty(&data.title),
            artist: non_empty(&data.author).unwrap_or_else(|| FALLBACK_ARTIST.to_string()),
            thumbnail_url: non_empty(&data.video_id).map(|id| thumbnail_url(&id)),
        }
    }
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/hqdefault.jpg")
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerVars {
    pub list_type: String,
    pub playlist: String,
    pub autoplay: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerSetup {
    pub height: String,
    pub width: String,
    #[serde(rename = "playerVars")]
    pub player_vars: PlayerVars,
}

impl PlayerSetup {
    pub fn for_playlist(video_ids: &[String]) -> Self {
        Self {
            height: PLAYER_SIZE.to_string(),
            width: PLAYER_SIZE.to_string(),
            player_vars: PlayerVars {
                list_type: "playlist".to_string(),
                playlist: video_ids.join(","),
                autoplay: 1,
            },
        }
    }
}

pub trait VideoPlayer {
    fn play_video(&self);
    fn pause_video(&self);
    fn next_video(&self);
    fn previous_video(&self);
    fn playback_state(&self) -> PlaybackState;
    fn video_data(&self) -> VideoData;
}

pub trait PlayerView {
    fn show_playing(&mut self, playing: bool);
    fn show_now_playing(&mut self, now_playing: &NowPlaying);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PlayerTask {
    Poll,
    Settle,
}

pub struct PlayerController<P, V> {
    player: P,
    view: V,
    playing: bool,
    ready: bool,
    timers: TimerQueue<PlayerTask>,
    poll: Option<TimerHandle>,
    settle: Option<TimerHandle>,
}

impl<P: VideoPlayer, V: PlayerView> PlayerController<P, V> {
    pub fn new(player: P, view: V) -> Self {
        Self {
            player,
            view,
            playing: false,
            ready: false,
            timers: TimerQueue::new(),
            poll: None,
            settle: None,
        }
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    pub fn on_ready(&mut self, now_ms: f64) {
        self.ready = true;
        self.refresh_now_playing();
        self.start_polling(now_ms);
    }

    pub fn on_state_change(&mut self, state: PlaybackState) {
        if state.is_playing() {
            self.refresh_now_playing();
        }
    }

    // Commands are dropped until the widget reports ready.
    pub fn play(&mut self) {
        if !self.ready {
            return;
        }
        self.player.play_video();
        self.set_playing(true);
    }

    pub fn pause(&mut self) {
        if !self.ready {
            return;
        }
        self.player.pause_video();
        self.set_playing(false);
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn next(&mut self, now_ms: f64) {
        if !self.ready {
            return;
        }
        self.player.next_video();
        self.schedule_settle(now_ms);
    }

    pub fn prev(&mut self, now_ms: f64) {
        if !self.ready {
            return;
        }
        self.player.previous_video();
        self.schedule_settle(now_ms);
    }

    pub fn start_polling(&mut self, now_ms: f64) {
        if self.poll.is_some() {
            return;
        }
        self.poll = Some(self.timers.schedule(now_ms, POLL_INTERVAL_MS, PlayerTask::Poll));
    }

    pub fn stop_polling(&mut self) {
        if let Some(handle) = self.poll.take() {
            self.timers.cancel(handle);
        }
    }

    // Adopts the widget's reported state; never sends play/pause back to it.
    pub fn reconcile(&mut self) -> bool {
        let actual = self.player.playback_state().is_playing();
        if actual == self.playing {
            return false;
        }
        self.set_playing(actual);
        true
    }

    pub fn refresh_now_playing(&mut self) {
        let now_playing = NowPlaying::from_video_data(&self.player.video_data());
        self.view.show_now_playing(&now_playing);
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.timers.next_deadline()
    }

    pub fn fire_due(&mut self, now_ms: f64) -> bool {
        let Some((_, task)) = self.timers.pop_due(now_ms) else {
            return false;
        };
        match task {
            PlayerTask::Poll => {
                self.reconcile();
                // Missed ticks are not replayed; the next poll is one interval after now.
                self.poll = Some(self.timers.schedule(now_ms, POLL_INTERVAL_MS, PlayerTask::Poll));
            }
            PlayerTask::Settle => {
                self.settle = None;
                self.refresh_now_playing();
                if !self.playing {
                    self.play();
                }
            }
        }
        true
    }

    fn schedule_settle(&mut self, now_ms: f64) {
        if let Some(handle) = self.settle.take() {
            self.timers.cancel(handle);
        }
        self.settle = Some(self.timers.schedule(now_ms, SETTLE_DELAY_MS, PlayerTask::Settle));
    }

    fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
        self.view.show_playing(playing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakeWidget {
        state: Rc<Cell<i32>>,
        calls: Rc<RefCell<Vec<&'static str>>>,
        data: Rc<RefCell<VideoData>>,
    }

    impl VideoPlayer for FakeWidget {
        fn play_video(&self) {
            self.calls.borrow_mut().push("play");
            self.state.set(1);
        }

        fn pause_video(&self) {
            self.calls.borrow_mut().push("pause");
            self.state.set(2);
        }

        fn next_video(&self) {
            self.calls.borrow_mut().push("next");
        }

        fn previous_video(&self) {
            self.calls.borrow_mut().push("previous");
        }

        fn playback_state(&self) -> PlaybackState {
            PlaybackState::from_code(self.state.get())
        }

        fn video_data(&self) -> VideoData {
            self.data.borrow().clone()
        }
    }

    #[derive(Default)]
    struct FakeView {
        playing: Vec<bool>,
        now_playing: Vec<NowPlaying>,
    }

    impl PlayerView for FakeView {
        fn show_playing(&mut self, playing: bool) {
            self.playing.push(playing);
        }

        fn show_now_playing(&mut self, now_playing: &NowPlaying) {
            self.now_playing.push(now_playing.clone());
        }
    }

    #[test]
    fn now_playing_falls_back_like_the_page() {
        let data = VideoData {
            title: Some(String::new()),
            author: None,
            video_id: Some("abc123".to_string()),
        };
        let now_playing = NowPlaying::from_video_data(&data);
        assert_eq!(now_playing.title, None);
        assert_eq!(now_playing.artist, "Artist");
        assert_eq!(
            now_playing.thumbnail_url.as_deref(),
            Some("https://img.youtube.com/vi/abc123/hqdefault.jpg")
        );
    }

    fn ready_controller(widget: &FakeWidget) -> PlayerController<FakeWidget, FakeView> {
        let mut controller = PlayerController::new(widget.clone(), FakeView::default());
        controller.on_ready(0.0);
        controller.stop_polling();
        controller
    }

    #[test]
    fn toggle_drives_widget_and_view() {
        let widget = FakeWidget::default();
        let mut controller = ready_controller(&widget);
        controller.toggle();
        assert!(controller.is_playing());
        controller.toggle();
        assert!(!controller.is_playing());
        assert_eq!(*widget.calls.borrow(), vec!["play", "pause"]);
        assert_eq!(controller.view().playing, vec![true, false]);
    }

    #[test]
    fn poll_adopts_external_state_without_commands() {
        let widget = FakeWidget::default();
        let mut controller = PlayerController::new(widget.clone(), FakeView::default());
        controller.on_ready(0.0);
        assert!(controller.is_polling());
        widget.state.set(1);
        assert!(!controller.fire_due(499.0));
        assert!(controller.fire_due(500.0));
        assert!(controller.is_playing());
        assert!(widget.calls.borrow().is_empty());
        assert_eq!(controller.next_deadline(), Some(1000.0));

        widget.state.set(2);
        assert!(controller.fire_due(1000.0));
        assert!(!controller.is_playing());
        assert_eq!(controller.view().playing, vec![true, false]);
    }

    #[test]
    fn next_settles_then_resumes_playback() {
        let widget = FakeWidget::default();
        *widget.data.borrow_mut() = VideoData {
            title: Some("Usseewa".to_string()),
            author: Some("Ado".to_string()),
            video_id: Some("Qp3b-RXtz4w".to_string()),
        };
        let mut controller = ready_controller(&widget);
        controller.next(100.0);
        controller.next(300.0);
        assert_eq!(controller.next_deadline(), Some(800.0));
        assert!(!controller.fire_due(700.0));
        assert!(controller.fire_due(800.0));
        assert!(controller.is_playing());
        assert_eq!(*widget.calls.borrow(), vec!["next", "next", "play"]);
        let shown = controller.view().now_playing.last().cloned().expect("metadata shown");
        assert_eq!(shown.title.as_deref(), Some("Usseewa"));
        assert_eq!(shown.artist, "Ado");
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn prev_while_playing_does_not_replay() {
        let widget = FakeWidget::default();
        let mut controller = ready_controller(&widget);
        controller.play();
        controller.prev(0.0);
        assert!(controller.fire_due(500.0));
        assert_eq!(*widget.calls.borrow(), vec!["play", "previous"]);
    }

    #[test]
    fn commands_before_ready_never_reach_the_widget() {
        let widget = FakeWidget::default();
        let mut controller = PlayerController::new(widget.clone(), FakeView::default());
        controller.toggle();
        controller.play();
        controller.pause();
        controller.next(0.0);
        controller.prev(0.0);
        assert!(!controller.is_ready());
        assert!(!controller.is_playing());
        assert!(widget.calls.borrow().is_empty());
        assert!(controller.view().playing.is_empty());
        assert_eq!(controller.next_deadline(), None);

        controller.on_ready(1000.0);
        controller.toggle();
        assert!(controller.is_ready());
        assert_eq!(*widget.calls.borrow(), vec!["play"]);
    }

    #[test]
    fn long_gap_runs_a_single_poll() {
        let widget = FakeWidget::default();
        let mut controller = PlayerController::new(widget.clone(), FakeView::default());
        controller.on_ready(0.0);
        let mut polls = 0;
        while controller.fire_due(3_600_000.0) {
            polls += 1;
        }
        assert_eq!(polls, 1);
        assert_eq!(controller.next_deadline(), Some(3_600_500.0));
    }

    #[test]
    fn state_change_to_playing_refreshes_metadata() {
        let mut controller = PlayerController::new(FakeWidget::default(), FakeView::default());
        controller.on_state_change(PlaybackState::Buffering);
        assert!(controller.view().now_playing.is_empty());
        controller.on_state_change(PlaybackState::from_code(1));
        assert_eq!(controller.view().now_playing.len(), 1);
    }

    #[test]
    fn player_setup_serializes_widget_options() {
        let setup = PlayerSetup::for_playlist(&["a".to_string(), "b".to_string()]);
        let value = serde_json::to_value(&setup).expect("setup serializes");
        assert_eq!(
            value,
            serde_json::json!({
                "height": "100",
                "width": "100",
                "playerVars": {
                    "listType": "playlist",
                    "playlist": "a,b",
                    "autoplay": 1
                }
            })
        );
    }
}
