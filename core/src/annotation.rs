use crate::layout::{BannerDim, BannerScale, MarkerLayout};
use crate::message::{Message, Placement};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerOrder {
    ImageFirst,
    LabelFirst,
}

impl From<Placement> for MarkerOrder {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Bottom => MarkerOrder::ImageFirst,
            Placement::Top => MarkerOrder::LabelFirst,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MarkerSpec<'a> {
    pub index: usize,
    pub element_id: String,
    pub name: &'a str,
    pub pfp_url: &'a str,
    pub order: MarkerOrder,
    pub layout: MarkerLayout,
}

impl<'a> MarkerSpec<'a> {
    pub fn new(index: usize, message: &'a Message) -> Self {
        Self {
            index,
            element_id: marker_element_id(index),
            name: &message.name,
            pfp_url: &message.pfp_url,
            order: message.placement.into(),
            layout: MarkerLayout::initial(message.position),
        }
    }
}

pub fn marker_element_id(index: usize) -> String {
    format!("pfp-{index}")
}

pub trait MarkerSurface {
    fn build_marker(&mut self, spec: &MarkerSpec<'_>);
    fn place_marker(&mut self, index: usize, layout: MarkerLayout);
    fn banner_size(&self) -> Option<(f64, f64)>;
}

pub fn build_markers<S: MarkerSurface>(surface: &mut S, messages: &[Message]) {
    for (index, message) in messages.iter().enumerate() {
        surface.build_marker(&MarkerSpec::new(index, message));
    }
}

pub fn reposition_markers<S: MarkerSurface>(
    surface: &mut S,
    messages: &[Message],
    banner: BannerDim,
) -> Option<BannerScale> {
    let (width, height) = surface.banner_size()?;
    let scale = BannerScale::compute(banner, width, height);
    for (index, message) in messages.iter().enumerate() {
        surface.place_marker(index, scale.layout(message.position));
    }
    Some(scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{FontSize, MessageBody, Position};

    struct GridSurface {
        size: Option<(f64, f64)>,
        built: Vec<(String, MarkerOrder, MarkerLayout)>,
        placed: Vec<(usize, MarkerLayout)>,
    }

    impl MarkerSurface for GridSurface {
        fn build_marker(&mut self, spec: &MarkerSpec<'_>) {
            self.built
                .push((spec.element_id.clone(), spec.order, spec.layout));
        }

        fn place_marker(&mut self, index: usize, layout: MarkerLayout) {
            self.placed.push((index, layout));
        }

        fn banner_size(&self) -> Option<(f64, f64)> {
            self.size
        }
    }

    fn message(x: f64, y: f64, placement: Placement) -> Message {
        Message {
            position: Position { x, y },
            body: MessageBody::Text {
                text: "yo".to_string(),
            },
            name: "sol".to_string(),
            pfp_url: "pfp/sol.png".to_string(),
            placement,
            font_size: FontSize::Small,
        }
    }

    #[test]
    fn builds_one_marker_per_message_in_order() {
        let messages = vec![
            message(10.0, 20.0, Placement::Bottom),
            message(400.0, 300.0, Placement::Top),
        ];
        let mut surface = GridSurface {
            size: None,
            built: Vec::new(),
            placed: Vec::new(),
        };
        build_markers(&mut surface, &messages);
        assert_eq!(surface.built.len(), 2);
        assert_eq!(surface.built[0].0, "pfp-0");
        assert_eq!(surface.built[0].1, MarkerOrder::ImageFirst);
        assert_eq!(surface.built[1].0, "pfp-1");
        assert_eq!(surface.built[1].1, MarkerOrder::LabelFirst);
        assert_eq!(surface.built[1].2, MarkerLayout::initial(Position { x: 400.0, y: 300.0 }));
    }

    #[test]
    fn reposition_scales_every_marker() {
        let messages = vec![
            message(10.0, 20.0, Placement::Bottom),
            message(400.0, 300.0, Placement::Top),
        ];
        let mut surface = GridSurface {
            size: Some((436.0, 245.0)),
            built: Vec::new(),
            placed: Vec::new(),
        };
        let scale = reposition_markers(&mut surface, &messages, BannerDim::default())
            .expect("banner has a size");
        assert_eq!(scale.x_scale, 0.5);
        assert_eq!(surface.placed.len(), 2);
        assert_eq!(surface.placed[1].0, 1);
        assert_eq!(surface.placed[1].1.left, 200.0);
        assert_eq!(surface.placed[1].1.top, 150.0);
    }

    #[test]
    fn reposition_without_banner_size_is_skipped() {
        let messages = vec![message(10.0, 20.0, Placement::Bottom)];
        let mut surface = GridSurface {
            size: None,
            built: Vec::new(),
            placed: Vec::new(),
        };
        assert!(reposition_markers(&mut surface, &messages, BannerDim::default()).is_none());
        assert!(surface.placed.is_empty());
    }
}
