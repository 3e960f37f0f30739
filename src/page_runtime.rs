use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo::console;
use gloo::timers::callback::Timeout;
use js_sys::{Array, Date};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::ResizeObserver;

use birthday_core::{BannerScale, PageContext, PageData, PlayerController, PlayerSetup};

use crate::banner_dom::{element_by_id, DomBanner, BANNER_IMAGE_ID};
use crate::config::PageConfig;
use crate::fetch::{fetch_text, js_err};
use crate::player_card::CardChannel;
use crate::youtube::{
    inject_iframe_api, install_api_ready_hook, load_shuffled_playlist, state_from_event,
    PlayerEvents, YtPlayer,
};

pub(crate) type Page = PageContext<DomBanner, YtPlayer, CardChannel>;

struct BannerObserver {
    observer: ResizeObserver,
    _handler: Closure<dyn FnMut(Array)>,
}

impl Drop for BannerObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

pub(crate) struct PageRuntime {
    config: PageConfig,
    page: RefCell<Page>,
    pump: RefCell<Option<Timeout>>,
    pump_deadline: Cell<Option<f64>>,
    banner_observer: RefCell<Option<BannerObserver>>,
    api_ready: RefCell<Option<Closure<dyn FnMut()>>>,
    player_events: RefCell<Option<PlayerEvents>>,
    booted: Cell<bool>,
    this: Weak<PageRuntime>,
}

impl PageRuntime {
    pub(crate) fn new(config: PageConfig) -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<PageRuntime>| {
            let select_target = this.clone();
            let on_select: Rc<dyn Fn(usize)> = Rc::new(move |index| {
                if let Some(runtime) = select_target.upgrade() {
                    runtime.select_user(index);
                }
            });
            let page = Page::new(config.settings, DomBanner::new(on_select));
            Self {
                config,
                page: RefCell::new(page),
                pump: RefCell::new(None),
                pump_deadline: Cell::new(None),
                banner_observer: RefCell::new(None),
                api_ready: RefCell::new(None),
                player_events: RefCell::new(None),
                booted: Cell::new(false),
                this: this.clone(),
            }
        })
    }

    pub(crate) fn config(&self) -> &PageConfig {
        &self.config
    }

    pub(crate) fn boot(self: &Rc<Self>) {
        if self.booted.replace(true) {
            return;
        }
        self.observe_banner();
        self.load_youtube();
        let runtime = Rc::clone(self);
        spawn_local(async move {
            runtime.load_data().await;
        });
    }

    pub(crate) fn select_user(&self, index: usize) {
        let outcome = self.with_page(|page, now| page.select_user(index, now));
        if self.config.debug {
            if let Some(outcome) = outcome {
                console::log!("overlay:", format!("{outcome:?}"));
            }
        }
    }

    pub(crate) fn toggle_play(&self) {
        self.with_page(|page, _| page.toggle_play());
    }

    pub(crate) fn next_track(&self) {
        self.with_page(|page, now| page.next_track(now));
    }

    pub(crate) fn prev_track(&self) {
        self.with_page(|page, now| page.prev_track(now));
    }

    fn with_page<R>(&self, action: impl FnOnce(&mut Page, f64) -> R) -> Option<R> {
        let result = match self.page.try_borrow_mut() {
            Ok(mut page) => Some(action(&mut page, Date::now())),
            Err(_) => {
                console::warn!("page: busy, event dropped");
                None
            }
        };
        self.rearm();
        result
    }

    fn rearm(&self) {
        let deadline = match self.page.try_borrow() {
            Ok(page) => page.next_deadline(),
            Err(_) => return,
        };
        if deadline == self.pump_deadline.get() && self.pump.borrow().is_some() {
            return;
        }
        self.pump_deadline.set(deadline);
        let Some(deadline) = deadline else {
            self.pump.borrow_mut().take();
            return;
        };
        let delay_ms = (deadline - Date::now()).max(0.0).ceil() as u32;
        let this = self.this.clone();
        *self.pump.borrow_mut() = Some(Timeout::new(delay_ms, move || {
            if let Some(runtime) = this.upgrade() {
                runtime.pump.borrow_mut().take();
                runtime.pump_deadline.set(None);
                runtime.tick();
            }
        }));
    }

    fn tick(&self) {
        let scale = self
            .with_page(|page, now| page.advance(now))
            .flatten();
        if let Some(scale) = scale {
            self.log_scale(scale);
        }
    }

    fn log_scale(&self, scale: BannerScale) {
        if self.config.debug {
            console::log!(
                "banner: scale",
                scale.x_scale,
                scale.y_scale,
                scale.marker_size
            );
        }
    }

    async fn load_data(self: Rc<Self>) {
        let Some(messages) = fetch_logged(&self.config.messages_url()).await else {
            return;
        };
        let Some(users) = fetch_logged(&self.config.users_url()).await else {
            return;
        };
        let data = match PageData::from_json(&messages, &users) {
            Ok(data) => data,
            Err(err) => {
                console::error!("page data:", err.to_string());
                return;
            }
        };
        console::log!(
            "page data: messages",
            data.messages.len(),
            "users",
            data.users.to_string()
        );
        if let Some(Some(scale)) = self.with_page(|page, _| page.load(data)) {
            self.log_scale(scale);
        }
    }

    fn observe_banner(&self) {
        let this = self.this.clone();
        let handler = Closure::wrap(Box::new(move |_entries: Array| {
            if let Some(runtime) = this.upgrade() {
                runtime.with_page(|page, now| page.on_banner_resized(now));
            }
        }) as Box<dyn FnMut(Array)>);
        let observer = match ResizeObserver::new(handler.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(err) => {
                console::warn!("banner: resize observer unavailable", js_err(err));
                return;
            }
        };
        match element_by_id(BANNER_IMAGE_ID) {
            Ok(image) => observer.observe(&image),
            Err(err) => {
                console::warn!("banner:", js_err(err));
                return;
            }
        }
        *self.banner_observer.borrow_mut() = Some(BannerObserver {
            observer,
            _handler: handler,
        });
    }

    fn load_youtube(&self) {
        let this = self.this.clone();
        let ready = Closure::wrap(Box::new(move || {
            if let Some(runtime) = this.upgrade() {
                spawn_local(runtime.start_player());
            }
        }) as Box<dyn FnMut()>);
        if let Err(err) = install_api_ready_hook(&ready) {
            console::error!("player: api hook", js_err(err));
            return;
        }
        *self.api_ready.borrow_mut() = Some(ready);
        if let Err(err) = inject_iframe_api() {
            console::error!("player: iframe api", js_err(err));
        }
    }

    async fn start_player(self: Rc<Self>) {
        if self.player_events.borrow().is_some() {
            return;
        }
        let video_ids = load_shuffled_playlist(&self.config).await;
        if video_ids.is_empty() {
            console::warn!("player: playlist is empty");
        }
        let events = self.player_events();
        match YtPlayer::create(&PlayerSetup::for_playlist(&video_ids), &events) {
            Ok(player) => {
                *self.player_events.borrow_mut() = Some(events);
                self.with_page(|page, _| {
                    page.attach_player(PlayerController::new(player, CardChannel::default()));
                });
            }
            Err(err) => console::error!("player: widget", js_err(err)),
        }
    }

    fn player_events(&self) -> PlayerEvents {
        let ready_target = self.this.clone();
        let on_ready = Closure::wrap(Box::new(move |_event: JsValue| {
            if let Some(runtime) = ready_target.upgrade() {
                runtime.with_page(|page, now| page.on_player_ready(now));
            }
        }) as Box<dyn FnMut(JsValue)>);
        let state_target = self.this.clone();
        let on_state_change = Closure::wrap(Box::new(move |event: JsValue| {
            let state = state_from_event(&event);
            if let Some(runtime) = state_target.upgrade() {
                runtime.with_page(|page, _| page.on_player_state_change(state));
            }
        }) as Box<dyn FnMut(JsValue)>);
        PlayerEvents {
            on_ready,
            on_state_change,
        }
    }
}

async fn fetch_logged(url: &str) -> Option<String> {
    match fetch_text(url).await {
        Ok(body) => Some(body),
        Err(err) => {
            console::error!("page data: fetch failed", js_err(err));
            None
        }
    }
}
