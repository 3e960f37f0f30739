use web_sys::UrlSearchParams;

use birthday_core::playlist::parse_id_list;
use birthday_core::PageSettings;

const DEFAULT_DATA_BASE: &str = "./data";
const DEFAULT_BANNER_SRC: &str = "images/banner.svg";
const DEFAULT_PLAYLISTS: &[&str] = &[
    "OLAK5uy_mT2KInkQZCW-n5okJvoqeBtNYeUb4bEUQ",
    "PLSQSRgGmmWo4vgfufqo9p-5Mt_ge4RjdJ",
];
const DEFAULT_BACKGROUND_IMAGES: &[&str] = &[
    "images/background/god-dog-1.svg",
    "images/background/god-dog-2.svg",
    "images/background/god-dog-3.svg",
];
pub(crate) const YT_IFRAME_API_SRC: &str = "https://www.youtube.com/iframe_api";

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PageConfig {
    pub(crate) data_base: String,
    pub(crate) banner_src: String,
    pub(crate) playlists: Vec<String>,
    pub(crate) api_key: Option<String>,
    pub(crate) background_images: Vec<String>,
    pub(crate) settings: PageSettings,
    pub(crate) debug: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            data_base: DEFAULT_DATA_BASE.to_string(),
            banner_src: DEFAULT_BANNER_SRC.to_string(),
            playlists: DEFAULT_PLAYLISTS.iter().map(|id| id.to_string()).collect(),
            api_key: None,
            background_images: DEFAULT_BACKGROUND_IMAGES
                .iter()
                .map(|src| src.to_string())
                .collect(),
            settings: PageSettings::default(),
            debug: false,
        }
    }
}

impl PageConfig {
    pub(crate) fn messages_url(&self) -> String {
        data_url(&self.data_base, "messages.json")
    }

    pub(crate) fn users_url(&self) -> String {
        data_url(&self.data_base, "users.json")
    }
}

pub(crate) fn load_page_config() -> PageConfig {
    let mut config = build_time_config();
    let search = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default();
    apply_query(&mut config, &search);
    config
}

fn build_time_config() -> PageConfig {
    let mut config = PageConfig::default();
    config.api_key = non_empty(option_env!("BIRTHDAY_YT_API_KEY"));
    if let Some(raw) = non_empty(option_env!("BIRTHDAY_PLAYLISTS")) {
        config.playlists = parse_id_list(&raw);
    }
    if let Some(base) = non_empty(option_env!("BIRTHDAY_DATA_BASE")) {
        config.data_base = base;
    }
    config
}

fn apply_query(config: &mut PageConfig, search: &str) {
    let search = search.trim();
    if search.is_empty() {
        return;
    }
    let Ok(params) = UrlSearchParams::new_with_str(search) else {
        return;
    };
    if let Some(raw) = params.get("playlist").or_else(|| params.get("playlists")) {
        let playlists = parse_id_list(&raw);
        if !playlists.is_empty() {
            config.playlists = playlists;
        }
    }
    if let Some(base) = params.get("data").and_then(|raw| non_empty(Some(&raw))) {
        config.data_base = base;
    }
    if params.has("debug") {
        config.debug = true;
    }
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub(crate) fn data_url(base: &str, file: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    if base.is_empty() {
        return file.to_string();
    }
    format!("{base}/{file}")
}
