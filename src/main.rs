use std::rc::Rc;

use yew::prelude::*;

mod background;
mod banner_dom;
mod config;
mod fetch;
mod page_runtime;
mod player_card;
mod youtube;

use background::TiledBackground;
use banner_dom::{BANNER_CONTAINER_ID, BANNER_IMAGE_ID};
use page_runtime::PageRuntime;
use player_card::{set_card_hook, CardState, PlayerCard};

const APP_ROOT_ID: &str = "birthday-app";

#[derive(Properties)]
struct AppProps {
    runtime: Rc<PageRuntime>,
}

impl PartialEq for AppProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.runtime, &other.runtime)
    }
}

#[derive(Properties, PartialEq)]
struct BannerProps {
    src: AttrValue,
}

#[function_component(Banner)]
fn banner(props: &BannerProps) -> Html {
    html! {
        <div id={BANNER_CONTAINER_ID} class="banner-container">
            <img id={BANNER_IMAGE_ID} class="banner-img" src={props.src.clone()} alt="birthday banner" />
        </div>
    }
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let runtime = props.runtime.clone();
    let card = use_state(CardState::default);
    {
        let card = card.clone();
        use_effect_with((), move |_| {
            let hook: Rc<dyn Fn(CardState)> = Rc::new(move |state: CardState| card.set(state));
            set_card_hook(Some(hook));
            || set_card_hook(None)
        });
    }
    {
        let runtime = runtime.clone();
        use_effect_with((), move |_| {
            runtime.boot();
            || ()
        });
    }

    let on_toggle = {
        let runtime = runtime.clone();
        Callback::from(move |_: ()| runtime.toggle_play())
    };
    let on_next = {
        let runtime = runtime.clone();
        Callback::from(move |_: ()| runtime.next_track())
    };
    let on_prev = {
        let runtime = runtime.clone();
        Callback::from(move |_: ()| runtime.prev_track())
    };
    let config = runtime.config();
    let banner_src = AttrValue::from(config.banner_src.clone());

    html! {
        <>
            <TiledBackground images={config.background_images.clone()} />
            <main class="page">
                <Banner src={banner_src} />
                <PlayerCard state={(*card).clone()} {on_toggle} {on_next} {on_prev} />
            </main>
        </>
    }
}

fn main() {
    let config = config::load_page_config();
    if config.debug {
        gloo::console::log!("config:", format!("{config:?}"));
    }
    let runtime = PageRuntime::new(config);
    let props = AppProps { runtime };
    let root = gloo::utils::document().get_element_by_id(APP_ROOT_ID);
    match root {
        Some(root) => {
            yew::Renderer::<App>::with_root_and_props(root, props).render();
        }
        None => {
            yew::Renderer::<App>::with_props(props).render();
        }
    }
}
