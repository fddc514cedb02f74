//! The map surface capability and the retained draw list.

use bevy::math::Vec2;
use bevy_osmlayers_overpass::BoundingBox;
use bevy_osmlayers_overpass::payload::GeoPoint;

use crate::id::LayerId;

/// Handle to a drawable object on the map surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Renderable {
    /// Background layer, always drawn first.
    Base { name: String },
    /// The vector layer backing a registered layer.
    Vector { layer: LayerId },
}

impl Renderable {
    pub fn is_base(&self) -> bool {
        matches!(self, Renderable::Base { .. })
    }

    pub fn layer(&self) -> Option<LayerId> {
        match self {
            Renderable::Vector { layer } => Some(*layer),
            Renderable::Base { .. } => None,
        }
    }
}

/// What the registry needs from a map widget.
///
/// Draw order is bottom to top: the last renderable is painted last and appears on top.
pub trait MapSurface: Send + Sync + 'static {
    fn add_drawable(&mut self, renderable: Renderable);

    fn remove_drawable(&mut self, renderable: &Renderable);

    fn draw_order(&self) -> Vec<Renderable>;

    fn set_draw_order(&mut self, order: Vec<Renderable>);

    fn project_to_display(&self, point: GeoPoint) -> Vec2;
}

/// Spherical Web Mercator (EPSG:3857) scaled into display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator {
    /// Display units per projected meter
    pub scale: f64,
}

impl WebMercator {
    pub const EARTH_RADIUS: f64 = 6_378_137.0;
    /// Latitude limit of the square Mercator world
    pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    pub fn project(&self, point: GeoPoint) -> Vec2 {
        let lat = point.lat.clamp(-Self::MAX_LATITUDE, Self::MAX_LATITUDE);
        let x = Self::EARTH_RADIUS * point.lon.to_radians();
        let y = Self::EARTH_RADIUS * lat.to_radians().tan().asinh();
        Vec2::new((x * self.scale) as f32, (y * self.scale) as f32)
    }

    pub fn unproject(&self, display: Vec2) -> GeoPoint {
        let x = f64::from(display.x) / self.scale;
        let y = f64::from(display.y) / self.scale;
        let lon = (x / Self::EARTH_RADIUS).to_degrees();
        let lat = (y / Self::EARTH_RADIUS).sinh().atan().to_degrees();
        GeoPoint::new(lat, lon)
    }

    /// Bounding box of a display-space rectangle.
    pub fn unproject_rect(&self, min: Vec2, max: Vec2) -> BoundingBox {
        let a = self.unproject(min);
        let b = self.unproject(max);
        BoundingBox::from_corners((a.lon, a.lat), (b.lon, b.lat))
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new(0.01)
    }
}

/// Retained map surface: an ordered list of renderables plus a projection.
///
/// Renderers walk [`DrawList::drawables`] bottom to top each frame.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    drawables: Vec<Renderable>,
    projection: WebMercator,
}

impl DrawList {
    pub fn new(projection: WebMercator) -> Self {
        Self {
            drawables: Vec::new(),
            projection,
        }
    }

    /// Add a base layer at the bottom.
    pub fn with_base(mut self, name: impl Into<String>) -> Self {
        self.drawables.insert(0, Renderable::Base { name: name.into() });
        self
    }

    pub fn drawables(&self) -> &[Renderable] {
        &self.drawables
    }

    pub fn projection(&self) -> WebMercator {
        self.projection
    }

    pub fn contains(&self, renderable: &Renderable) -> bool {
        self.drawables.contains(renderable)
    }
}

impl MapSurface for DrawList {
    fn add_drawable(&mut self, renderable: Renderable) {
        if !self.drawables.contains(&renderable) {
            self.drawables.push(renderable);
        }
    }

    fn remove_drawable(&mut self, renderable: &Renderable) {
        self.drawables.retain(|r| r != renderable);
    }

    fn draw_order(&self) -> Vec<Renderable> {
        self.drawables.clone()
    }

    fn set_draw_order(&mut self, order: Vec<Renderable>) {
        self.drawables = order;
    }

    fn project_to_display(&self, point: GeoPoint) -> Vec2 {
        self.projection.project(point)
    }
}
