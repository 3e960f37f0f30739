use std::rc::Rc;

use gloo::console;
use gloo::events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition,
};

use birthday_core::annotation::marker_element_id;
use birthday_core::{
    FontSize, MarkerLayout, MarkerOrder, MarkerSpec, MarkerSurface, OverlayPanel, OverlaySurface,
};

use crate::fetch::js_err;

pub(crate) const BANNER_CONTAINER_ID: &str = "banner-container";
pub(crate) const BANNER_IMAGE_ID: &str = "banner-img";
const OVERLAY_ID: &str = "side-overlay";
const FLASH_CLASS: &str = "flash-box-shadow";

pub(crate) fn font_class(font_size: FontSize) -> &'static str {
    match font_size {
        FontSize::Small => "text-xs md:text-sm",
        FontSize::Large => "text-md md:text-5xl",
        FontSize::Default => "text-sm md:text-3xl",
    }
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("missing document"))
}

pub(crate) fn element_by_id(id: &str) -> Result<Element, JsValue> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
}

fn set_px(element: &HtmlElement, property: &str, value: f64) -> Result<(), JsValue> {
    element.style().set_property(property, &format!("{value}px"))
}

fn apply_layout(element: &HtmlElement, layout: MarkerLayout) -> Result<(), JsValue> {
    set_px(element, "width", layout.size)?;
    set_px(element, "height", layout.size)?;
    set_px(element, "top", layout.top)?;
    set_px(element, "left", layout.left)
}

// Markers and the overlay live outside the yew tree, as direct children of
// #banner-container.
pub(crate) struct DomBanner {
    on_select: Rc<dyn Fn(usize)>,
    listeners: Vec<EventListener>,
}

impl DomBanner {
    pub(crate) fn new(on_select: Rc<dyn Fn(usize)>) -> Self {
        Self {
            on_select,
            listeners: Vec::new(),
        }
    }

    fn try_build_marker(&mut self, spec: &MarkerSpec<'_>) -> Result<(), JsValue> {
        let document = document()?;
        let container = element_by_id(BANNER_CONTAINER_ID)?;

        let marker: HtmlElement = document.create_element("div")?.dyn_into()?;
        marker.set_id(&spec.element_id);
        marker.set_class_name("pfp-container");

        let image: HtmlImageElement = document.create_element("img")?.dyn_into()?;
        image.set_src(spec.pfp_url);
        image.set_alt(spec.name);
        image.set_class_name("pfp-image");

        let label = document.create_element("p")?;
        label.set_class_name("pfp-name");
        label.set_text_content(Some(spec.name));

        match spec.order {
            MarkerOrder::ImageFirst => {
                marker.append_child(&image)?;
                marker.append_child(&label)?;
            }
            MarkerOrder::LabelFirst => {
                marker.append_child(&label)?;
                marker.append_child(&image)?;
            }
        }
        apply_layout(&marker, spec.layout)?;

        let on_select = Rc::clone(&self.on_select);
        let index = spec.index;
        self.listeners
            .push(EventListener::new(&image, "click", move |_event| {
                on_select(index);
            }));
        container.append_child(&marker)?;
        Ok(())
    }

    fn try_mount_overlay(&self, panel: &OverlayPanel<'_>) -> Result<Element, JsValue> {
        let document = document()?;
        let container = element_by_id(BANNER_CONTAINER_ID)?;

        let overlay = document.create_element("div")?;
        overlay.set_id(OVERLAY_ID);
        overlay.set_class_name(&format!("side-overlay-{}", panel.side.as_str()));

        let text = document.create_element("p")?;
        text.set_class_name(&format!("overlay-text {}", font_class(panel.font_size)));
        text.set_text_content(Some(panel.text));

        let name = document.create_element("p")?;
        name.set_class_name("overlay-name");
        name.set_text_content(Some(&panel.attribution));

        overlay.append_child(&text)?;
        overlay.append_child(&name)?;
        container.append_child(&overlay)?;
        text.set_scroll_top(0);
        Ok(overlay)
    }
}

impl OverlaySurface for DomBanner {
    type Overlay = Element;

    fn mount_overlay(&mut self, panel: &OverlayPanel<'_>) -> Option<Element> {
        match self.try_mount_overlay(panel) {
            Ok(overlay) => Some(overlay),
            Err(err) => {
                console::warn!("overlay: mount failed", js_err(err));
                None
            }
        }
    }

    fn unmount_overlay(&mut self, overlay: Element) {
        overlay.remove();
    }

    fn scroll_to(&mut self, target_id: &str) -> bool {
        let Ok(target) = element_by_id(target_id) else {
            return false;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        target.scroll_into_view_with_scroll_into_view_options(&options);
        true
    }

    fn set_highlight(&mut self, target_id: &str, active: bool) {
        let Ok(target) = element_by_id(target_id) else {
            return;
        };
        let classes = target.class_list();
        let result = if active {
            classes.add_1(FLASH_CLASS)
        } else {
            classes.remove_1(FLASH_CLASS)
        };
        if let Err(err) = result {
            console::warn!("overlay: highlight toggle failed", js_err(err));
        }
    }
}

impl MarkerSurface for DomBanner {
    fn build_marker(&mut self, spec: &MarkerSpec<'_>) {
        if let Err(err) = self.try_build_marker(spec) {
            console::warn!("banner: marker", spec.index, js_err(err));
        }
    }

    fn place_marker(&mut self, index: usize, layout: MarkerLayout) {
        let result = element_by_id(&marker_element_id(index))
            .and_then(|marker| marker.dyn_into::<HtmlElement>().map_err(JsValue::from))
            .and_then(|marker| apply_layout(&marker, layout));
        if let Err(err) = result {
            console::warn!("banner: place marker", index, js_err(err));
        }
    }

    fn banner_size(&self) -> Option<(f64, f64)> {
        let rect = element_by_id(BANNER_IMAGE_ID).ok()?.get_bounding_client_rect();
        let (width, height) = (rect.width(), rect.height());
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some((width, height))
    }
}
