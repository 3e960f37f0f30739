use gloo::console;
use js_sys::{Math, Object, Reflect};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use web_sys::HtmlScriptElement;

use birthday_core::player::PLAYER_ELEMENT_ID;
use birthday_core::{
    parse_playlist_items, playlist_items_url, shuffled_playlist, PlaybackState, PlayerSetup,
    VideoData, VideoPlayer,
};

use crate::config::{PageConfig, YT_IFRAME_API_SRC};
use crate::fetch::{fetch_text, js_err};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = YT, js_name = Player)]
    type YtWidget;

    #[wasm_bindgen(constructor, js_namespace = YT, js_class = "Player", catch)]
    fn new(element_id: &str, options: &JsValue) -> Result<YtWidget, JsValue>;

    #[wasm_bindgen(method, catch, js_name = playVideo)]
    fn play_video(this: &YtWidget) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = pauseVideo)]
    fn pause_video(this: &YtWidget) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = nextVideo)]
    fn next_video(this: &YtWidget) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = previousVideo)]
    fn previous_video(this: &YtWidget) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = getPlayerState)]
    fn get_player_state(this: &YtWidget) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = getVideoData)]
    fn get_video_data(this: &YtWidget) -> Result<JsValue, JsValue>;
}

pub(crate) struct PlayerEvents {
    pub(crate) on_ready: Closure<dyn FnMut(JsValue)>,
    pub(crate) on_state_change: Closure<dyn FnMut(JsValue)>,
}

pub(crate) struct YtPlayer {
    widget: YtWidget,
}

impl YtPlayer {
    pub(crate) fn create(setup: &PlayerSetup, events: &PlayerEvents) -> Result<Self, JsValue> {
        let json =
            serde_json::to_string(setup).map_err(|err| JsValue::from_str(&err.to_string()))?;
        let options = js_sys::JSON::parse(&json)?;
        let handlers = Object::new();
        Reflect::set(&handlers, &"onReady".into(), events.on_ready.as_ref())?;
        Reflect::set(
            &handlers,
            &"onStateChange".into(),
            events.on_state_change.as_ref(),
        )?;
        Reflect::set(&options, &"events".into(), &handlers)?;
        let widget = YtWidget::new(PLAYER_ELEMENT_ID, &options)?;
        Ok(Self { widget })
    }
}

fn log_command(command: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        console::warn!("player:", command, js_err(err));
    }
}

impl VideoPlayer for YtPlayer {
    fn play_video(&self) {
        log_command("playVideo", self.widget.play_video());
    }

    fn pause_video(&self) {
        log_command("pauseVideo", self.widget.pause_video());
    }

    fn next_video(&self) {
        log_command("nextVideo", self.widget.next_video());
    }

    fn previous_video(&self) {
        log_command("previousVideo", self.widget.previous_video());
    }

    fn playback_state(&self) -> PlaybackState {
        match self.widget.get_player_state() {
            Ok(state) => state
                .as_f64()
                .map(|code| PlaybackState::from_code(code as i32))
                .unwrap_or(PlaybackState::Unknown),
            Err(err) => {
                console::warn!("player: getPlayerState", js_err(err));
                PlaybackState::Unknown
            }
        }
    }

    fn video_data(&self) -> VideoData {
        let data = match self.widget.get_video_data() {
            Ok(data) => data,
            Err(err) => {
                console::warn!("player: getVideoData", js_err(err));
                return VideoData::default();
            }
        };
        VideoData {
            title: string_field(&data, "title"),
            author: string_field(&data, "author"),
            video_id: string_field(&data, "video_id"),
        }
    }
}

fn string_field(object: &JsValue, key: &str) -> Option<String> {
    if !object.is_object() {
        return None;
    }
    Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_string())
}

pub(crate) fn state_from_event(event: &JsValue) -> PlaybackState {
    Reflect::get(event, &"data".into())
        .ok()
        .and_then(|value| value.as_f64())
        .map(|code| PlaybackState::from_code(code as i32))
        .unwrap_or(PlaybackState::Unknown)
}

pub(crate) fn install_api_ready_hook(hook: &Closure<dyn FnMut()>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
    Reflect::set(&window, &"onYouTubeIframeAPIReady".into(), hook.as_ref())?;
    Ok(())
}

pub(crate) fn inject_iframe_api() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("missing document"))?;
    let script: HtmlScriptElement = document.create_element("script")?.dyn_into()?;
    script.set_src(YT_IFRAME_API_SRC);
    script.set_async(true);
    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("missing head"))?;
    head.append_child(&script)?;
    Ok(())
}

async fn playlist_video_ids(playlist_id: &str, api_key: &str) -> Vec<String> {
    let url = match playlist_items_url(playlist_id, api_key) {
        Ok(url) => url,
        Err(err) => {
            console::error!("playlist: bad url", playlist_id, err.to_string());
            return Vec::new();
        }
    };
    let body = match fetch_text(url.as_str()).await {
        Ok(body) => body,
        Err(err) => {
            console::error!("playlist: fetch failed", playlist_id, js_err(err));
            return Vec::new();
        }
    };
    match parse_playlist_items(&body) {
        Ok(ids) => ids,
        Err(err) => {
            console::error!("playlist: unexpected response", playlist_id, err.to_string());
            Vec::new()
        }
    }
}

pub(crate) async fn load_shuffled_playlist(config: &PageConfig) -> Vec<String> {
    let Some(api_key) = config.api_key.as_deref() else {
        console::warn!("playlist: no api key configured");
        return Vec::new();
    };
    let mut lists = Vec::with_capacity(config.playlists.len());
    for playlist_id in &config.playlists {
        lists.push(playlist_video_ids(playlist_id, api_key).await);
    }
    let seed = (Math::random() * u32::MAX as f64) as u64 ^ js_sys::Date::now() as u64;
    let mut rng = SmallRng::seed_from_u64(seed);
    shuffled_playlist(lists, &mut rng)
}
