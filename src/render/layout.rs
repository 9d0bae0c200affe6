//! Signal → geometry mapping.
//!
//! Every element gets an offset from its base position, a rotation and a
//! stacking depth. The "chaos" is derived from the element's index only, so
//! the same elements and the same signal always give the same layout.

use std::f64::consts::PI;

use rayon::prelude::*;
use serde::Serialize;

use crate::signal::weather::WeatherReading;

/// Rotation damping for photo elements
pub const PHOTO_DAMPING: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Project,
    Photo,
}

/// One item of the scattered collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    /// Ordinal position in the collection; seeds the jitter
    pub index: usize,
    /// Base position, percent of container width
    pub base_x: f64,
    /// Base position, percent of container height
    pub base_y: f64,
    /// Width in pixels
    pub size: f64,
    pub kind: ElementKind,
    /// DOM id, if the element carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Pixel size of the container the percentages refer to
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Container {
    pub width: f64,
    pub height: f64,
}

/// Computed geometry for one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutResult {
    pub index: usize,
    /// Percent of container width
    pub left: f64,
    /// Percent of container height
    pub top: f64,
    /// Pixels
    pub width: f64,
    /// Degrees
    pub rotation: f64,
    pub z_index: i64,
}

/// Deterministic per-element seed in 0..100.
pub fn jitter_seed(index: usize) -> u32 {
    ((index % 100) * 73 % 100) as u32
}

/// Stacking depth: nearer the centre of the container stacks higher.
pub fn z_index(left: f64, top: f64) -> i64 {
    let center_distance = ((left - 50.0).powi(2) + (top - 50.0).powi(2)).sqrt();
    (100.0 - center_distance).floor() as i64
}

/// A signal that knows how to push elements around.
pub trait ScatterField: Sync {
    /// Displacement magnitude in pixels
    fn scatter_px(&self) -> f64;

    /// Direction of displacement (radians) for an element seed
    fn angle(&self, seed: u32) -> f64;

    /// Undamped rotation in degrees for an element seed
    fn rotation(&self, seed: u32) -> f64;
}

/// Scatter driven by the combined clock/scroll uncertainty.
#[derive(Debug, Clone, Copy)]
pub struct UncertaintyField {
    pub combined: f64,
}

impl ScatterField for UncertaintyField {
    fn scatter_px(&self) -> f64 {
        (self.combined / 100.0) * 150.0
    }

    fn angle(&self, seed: u32) -> f64 {
        (seed as f64 / 100.0) * PI * 2.0
    }

    fn rotation(&self, seed: u32) -> f64 {
        let base = (self.combined / 100.0) * 30.0 - 15.0;
        base + ((seed % 20) as f64 - 10.0) * 0.3
    }
}

/// Scatter driven by wind.
///
/// The seed is added to the wind direction as a raw radian offset, not
/// scaled; existing layouts depend on that.
#[derive(Debug, Clone, Copy)]
pub struct WindField {
    pub direction: f64,
    pub speed: f64,
}

impl From<&WeatherReading> for WindField {
    fn from(r: &WeatherReading) -> Self {
        Self {
            direction: r.wind_dir,
            speed: r.wind_speed,
        }
    }
}

impl ScatterField for WindField {
    fn scatter_px(&self) -> f64 {
        self.speed * 2.0
    }

    fn angle(&self, seed: u32) -> f64 {
        let wind_radians = (self.direction * PI) / 180.0;
        wind_radians + seed as f64
    }

    fn rotation(&self, seed: u32) -> f64 {
        let base = (self.direction / 360.0) * 30.0 - 15.0;
        base + ((seed % 20) as f64 - 10.0) * (self.speed / 50.0)
    }
}

/// Place a single element.
pub fn place<F: ScatterField + ?Sized>(
    element: &Element,
    container: Container,
    field: &F,
) -> LayoutResult {
    let seed = jitter_seed(element.index);
    let scatter = field.scatter_px();
    let angle = field.angle(seed);

    let chaos_x = angle.cos() * scatter;
    let chaos_y = angle.sin() * scatter;

    let left = element.base_x + (chaos_x / container.width * 100.0);
    let top = element.base_y + (chaos_y / container.height * 100.0);

    let rotation = match element.kind {
        ElementKind::Photo => field.rotation(seed) * PHOTO_DAMPING,
        ElementKind::Project => field.rotation(seed),
    };

    LayoutResult {
        index: element.index,
        left,
        top,
        width: element.size,
        rotation,
        z_index: z_index(left, top),
    }
}

/// Place every element, preserving collection order.
pub fn map_elements<F: ScatterField>(
    elements: &[Element],
    container: Container,
    field: &F,
) -> Vec<LayoutResult> {
    elements
        .par_iter()
        .map(|el| place(el, container, field))
        .collect()
}

/// Push every element down by `rain × 0.5` percent.
///
/// Runs after the wind pass; the stacking depth keeps its pre-rain value.
pub fn apply_rain_weight(layout: &mut [LayoutResult], rain: f64) {
    let weight = rain * 0.5;
    for item in layout.iter_mut() {
        item.top += weight;
    }
}

/// Full weather geometry: wind scatter, then rain weight.
pub fn map_weather(
    elements: &[Element],
    container: Container,
    reading: &WeatherReading,
) -> Vec<LayoutResult> {
    let mut layout = map_elements(elements, container, &WindField::from(reading));
    apply_rain_weight(&mut layout, reading.rain);
    layout
}
