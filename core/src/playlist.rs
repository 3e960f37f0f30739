use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use url::Url;

pub const PLAYLIST_ITEMS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/playlistItems";
pub const PLAYLIST_PAGE_SIZE: u32 = 50;

#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    items: Option<Vec<PlaylistItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    video_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaylistError {
    #[error("invalid playlist response: {0}")]
    Json(String),
    #[error("playlist response has no items")]
    MissingItems,
}

pub fn playlist_items_url(playlist_id: &str, api_key: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(PLAYLIST_ITEMS_ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("part", "contentDetails")
        .append_pair("maxResults", &PLAYLIST_PAGE_SIZE.to_string())
        .append_pair("playlistId", playlist_id)
        .append_pair("key", api_key);
    Ok(url)
}

pub fn parse_playlist_items(body: &str) -> Result<Vec<String>, PlaylistError> {
    let response: PlaylistResponse =
        serde_json::from_str(body).map_err(|err| PlaylistError::Json(err.to_string()))?;
    let items = response.items.ok_or(PlaylistError::MissingItems)?;
    Ok(items
        .into_iter()
        .filter_map(|item| item.content_details?.video_id)
        .filter(|id| !id.trim().is_empty())
        .collect())
}

pub fn shuffled_playlist<R: Rng + ?Sized>(lists: Vec<Vec<String>>, rng: &mut R) -> Vec<String> {
    let mut ids: Vec<String> = lists.into_iter().flatten().collect();
    ids.shuffle(rng);
    ids
}

pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
