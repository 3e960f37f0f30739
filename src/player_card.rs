use std::cell::RefCell;
use std::rc::Rc;

use yew::prelude::*;

use birthday_core::{NowPlaying, PlayerView};

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct CardState {
    pub(crate) playing: bool,
    pub(crate) now_playing: Option<NowPlaying>,
}

thread_local! {
    static CARD_HOOK: RefCell<Option<Rc<dyn Fn(CardState)>>> = RefCell::new(None);
    static CARD_LAST: RefCell<Option<CardState>> = RefCell::new(None);
}

pub(crate) fn set_card_hook(hook: Option<Rc<dyn Fn(CardState)>>) {
    CARD_HOOK.with(|slot| {
        *slot.borrow_mut() = hook.clone();
    });
    if let Some(hook) = hook {
        if let Some(state) = CARD_LAST.with(|slot| slot.borrow().clone()) {
            hook(state);
        }
    }
}

fn publish(state: CardState) {
    CARD_LAST.with(|slot| {
        *slot.borrow_mut() = Some(state.clone());
    });
    let hook = CARD_HOOK.with(|slot| slot.borrow().clone());
    if let Some(hook) = hook {
        hook(state);
    }
}

#[derive(Default)]
pub(crate) struct CardChannel {
    state: CardState,
}

impl PlayerView for CardChannel {
    fn show_playing(&mut self, playing: bool) {
        self.state.playing = playing;
        publish(self.state.clone());
    }

    fn show_now_playing(&mut self, now_playing: &NowPlaying) {
        self.state.now_playing = Some(now_playing.clone());
        publish(self.state.clone());
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct PlayerCardProps {
    pub(crate) state: CardState,
    pub(crate) on_toggle: Callback<()>,
    pub(crate) on_next: Callback<()>,
    pub(crate) on_prev: Callback<()>,
}

fn skeleton(known: bool, kind: &'static str) -> Classes {
    if known {
        Classes::new()
    } else {
        classes!("skeleton", kind)
    }
}

#[function_component(PlayerCard)]
pub(crate) fn player_card(props: &PlayerCardProps) -> Html {
    let now_playing = props.state.now_playing.as_ref();
    let title = now_playing.and_then(|info| info.title.clone());
    let artist = now_playing.map(|info| info.artist.clone());
    let thumbnail = now_playing.and_then(|info| info.thumbnail_url.clone());
    let playing = props.state.playing;

    let thumbnail_view = match thumbnail {
        Some(src) => html! {
            <img id="video-thumbnail" class="video-thumbnail" src={src} alt="now playing" />
        },
        None => html! {
            <div id="thumbnail-skeleton" class="skeleton skeleton-thumbnail"></div>
        },
    };

    let on_prev = props.on_prev.reform(|_: MouseEvent| ());
    let on_toggle = props.on_toggle.reform(|_: MouseEvent| ());
    let on_next = props.on_next.reform(|_: MouseEvent| ());

    html! {
        <div class="player-card">
            { thumbnail_view }
            <div class="player-info">
                <p id="video-title" class={classes!("video-title", skeleton(title.is_some(), "skeleton-title"))}>
                    { title.unwrap_or_default() }
                </p>
                <p id="video-artist" class={classes!("video-artist", skeleton(artist.is_some(), "skeleton-artist"))}>
                    { artist.unwrap_or_default() }
                </p>
            </div>
            <div class="player-controls">
                <button type="button" class="player-button" aria-label="previous" onclick={on_prev}>
                    { "⏮" }
                </button>
                <button
                    type="button"
                    id="playButton"
                    class={classes!("player-button", playing.then_some("hidden"))}
                    aria-label="play"
                    onclick={on_toggle.clone()}
                >
                    { "▶" }
                </button>
                <button
                    type="button"
                    id="pauseButton"
                    class={classes!("player-button", (!playing).then_some("hidden"))}
                    aria-label="pause"
                    onclick={on_toggle}
                >
                    { "⏸" }
                </button>
                <button type="button" class="player-button" aria-label="next" onclick={on_next}>
                    { "⏭" }
                </button>
            </div>
        </div>
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use std::cell::Cell;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn hook_replays_last_card_state() {
        let mut channel = CardChannel::default();
        channel.show_playing(true);
        channel.show_now_playing(&NowPlaying {
            title: Some("Show".to_string()),
            artist: "Ado".to_string(),
            thumbnail_url: None,
        });

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let hook: Rc<dyn Fn(CardState)> = Rc::new(move |state: CardState| {
            sink.borrow_mut().push(state);
        });
        set_card_hook(Some(hook));
        {
            let seen = seen.borrow();
            assert_eq!(seen.len(), 1);
            assert!(seen[0].playing);
            assert_eq!(
                seen[0].now_playing.as_ref().map(|info| info.artist.as_str()),
                Some("Ado")
            );
        }

        channel.show_playing(false);
        assert_eq!(seen.borrow().len(), 2);
        set_card_hook(None);
    }

    #[wasm_bindgen_test]
    fn cleared_hook_stops_delivery() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let hook: Rc<dyn Fn(CardState)> = Rc::new(move |_state: CardState| {
            counter.set(counter.get() + 1);
        });
        set_card_hook(Some(hook));
        let before = calls.get();
        set_card_hook(None);
        CardChannel::default().show_playing(true);
        assert_eq!(calls.get(), before);
    }
}
