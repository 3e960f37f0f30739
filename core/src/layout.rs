use crate::message::{Message, Position};

pub const IMAGE_SIZE: f64 = 50.0;
pub const MAX_IMAGE_PERCENT: f64 = 0.1;
pub const TILE_WIDTH: f64 = 300.0;
pub const TILE_HEIGHT: f64 = 350.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BannerDim {
    pub width: f64,
    pub height: f64,
}

pub const BANNER_DIM: BannerDim = BannerDim {
    width: 872.0,
    height: 490.0,
};

impl Default for BannerDim {
    fn default() -> Self {
        BANNER_DIM
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BannerScale {
    pub x_scale: f64,
    pub y_scale: f64,
    pub marker_size: f64,
}

impl BannerScale {
    pub fn compute(reference: BannerDim, rendered_width: f64, rendered_height: f64) -> Self {
        Self {
            x_scale: ratio(rendered_width, reference.width),
            y_scale: ratio(rendered_height, reference.height),
            marker_size: marker_size(rendered_width, rendered_height),
        }
    }

    pub fn apply(&self, position: Position) -> Position {
        Position {
            x: position.x * self.x_scale,
            y: position.y * self.y_scale,
        }
    }

    pub fn layout(&self, position: Position) -> MarkerLayout {
        let scaled = self.apply(position);
        MarkerLayout {
            left: scaled.x,
            top: scaled.y,
            size: self.marker_size,
        }
    }
}

fn ratio(rendered: f64, reference: f64) -> f64 {
    if reference > 0.0 && rendered.is_finite() {
        rendered / reference
    } else {
        0.0
    }
}

pub fn marker_size(rendered_width: f64, rendered_height: f64) -> f64 {
    IMAGE_SIZE
        .min(rendered_height * MAX_IMAGE_PERCENT)
        .min(rendered_width * MAX_IMAGE_PERCENT)
        .max(0.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerLayout {
    pub left: f64,
    pub top: f64,
    pub size: f64,
}

impl MarkerLayout {
    pub fn initial(position: Position) -> Self {
        Self {
            left: position.x,
            top: position.y,
            size: IMAGE_SIZE,
        }
    }
}

pub fn layout_markers(messages: &[Message], scale: &BannerScale) -> Vec<MarkerLayout> {
    messages
        .iter()
        .map(|message| scale.layout(message.position))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub left: f64,
    pub top: f64,
    pub image_index: usize,
}

pub fn tile_grid(
    view_width: f64,
    view_height: f64,
    tile_width: f64,
    tile_height: f64,
    image_count: usize,
) -> Vec<Tile> {
    if image_count == 0 || tile_width <= 0.0 || tile_height <= 0.0 {
        return Vec::new();
    }
    let cols = (view_width.max(0.0) / tile_width).ceil() as usize;
    let rows = (view_height.max(0.0) / tile_height).ceil() as usize;
    let mut tiles = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            tiles.push(Tile {
                left: col as f64 * tile_width,
                top: row as f64 * tile_height,
                image_index: (row * cols + col) % image_count,
            });
        }
    }
    tiles
}
