use gloo::events::EventListener;
use yew::prelude::*;

use birthday_core::{tile_grid, TILE_HEIGHT, TILE_WIDTH};

fn viewport_size() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (0.0, 0.0);
    };
    let read = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|value| value.as_f64()).unwrap_or(0.0)
    };
    (read(window.inner_width()), read(window.inner_height()))
}

#[derive(Properties, PartialEq)]
pub(crate) struct TiledBackgroundProps {
    pub(crate) images: Vec<String>,
}

#[function_component(TiledBackground)]
pub(crate) fn tiled_background(props: &TiledBackgroundProps) -> Html {
    let viewport = use_state(viewport_size);
    {
        let viewport = viewport.clone();
        use_effect_with((), move |_| {
            let listener = web_sys::window().map(|window| {
                EventListener::new(&window, "resize", move |_event| {
                    viewport.set(viewport_size());
                })
            });
            move || drop(listener)
        });
    }

    let (width, height) = *viewport;
    let tiles = tile_grid(width, height, TILE_WIDTH, TILE_HEIGHT, props.images.len());
    html! {
        <div class="god-dog-background" aria-hidden="true">
            { for tiles.iter().map(|tile| {
                let src = props.images[tile.image_index].clone();
                let style = format!(
                    "display: block; position: absolute; left: {}px; top: {}px; width: {}px; height: {}px;",
                    tile.left, tile.top, TILE_WIDTH, TILE_HEIGHT
                );
                html! { <img src={src} style={style} alt="" /> }
            }) }
        </div>
    }
}
