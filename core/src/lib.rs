pub mod annotation;
pub mod error;
pub mod layout;
pub mod message;
pub mod overlay;
pub mod page;
pub mod player;
pub mod playlist;
pub mod timer;

pub use annotation::{build_markers, reposition_markers, MarkerOrder, MarkerSpec, MarkerSurface};
pub use error::DataError;
pub use layout::{
    layout_markers, marker_size, tile_grid, BannerDim, BannerScale, MarkerLayout, Tile,
    BANNER_DIM, IMAGE_SIZE, MAX_IMAGE_PERCENT, TILE_HEIGHT, TILE_WIDTH,
};
pub use message::{decode_messages, FontSize, Message, MessageBody, Placement, Position};
pub use overlay::{
    OverlayController, OverlayPanel, OverlaySurface, SelectOutcome, SelectionState, Side,
    HIGHLIGHT_MS,
};
pub use page::{BannerSurface, PageContext, PageData, PageSettings, RESIZE_THROTTLE_MS};
pub use player::{
    NowPlaying, PlaybackState, PlayerController, PlayerSetup, PlayerView, VideoData, VideoPlayer,
};
pub use playlist::{parse_playlist_items, playlist_items_url, shuffled_playlist, PlaylistError};
pub use timer::{Throttle, TimerHandle, TimerQueue};
