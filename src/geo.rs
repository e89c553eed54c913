//! Geographic primitives: coordinates, city presets and map bounds.

use crate::error::{DemoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kilometres per degree used to scale planar distances.
pub const KM_PER_DEGREE: f64 = 111.32;

/// Side of a Web-Mercator map tile in pixels.
const TILE_SIZE: f64 = 256.0;

/// A point on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    /// Planar Euclidean distance in degrees, scaled to kilometres.
    pub fn distance_km(&self, other: &LatLng) -> f64 {
        distance_km(self, other)
    }

    /// Coordinates in GeoJSON order.
    pub fn lng_lat(&self) -> (f64, f64) {
        (self.lng, self.lat)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// Calculate the scaled Euclidean distance between two points.
pub fn distance_km(a: &LatLng, b: &LatLng) -> f64 {
    let dlat = a.lat - b.lat;
    let dlng = a.lng - b.lng;
    (dlat * dlat + dlng * dlng).sqrt() * KM_PER_DEGREE
}

/// Linear interpolation between two points, `t` clamped to `[0, 1]`.
pub fn lerp(a: &LatLng, b: &LatLng, t: f64) -> LatLng {
    let t = t.clamp(0.0, 1.0);
    LatLng {
        lat: a.lat + (b.lat - a.lat) * t,
        lng: a.lng + (b.lng - a.lng) * t,
    }
}

/// Cities the demo can be centered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum City {
    #[default]
    Bangalore,
    Mumbai,
    Delhi,
    Hyderabad,
    Chennai,
}

impl City {
    pub const ALL: [City; 5] = [
        City::Bangalore,
        City::Mumbai,
        City::Delhi,
        City::Hyderabad,
        City::Chennai,
    ];

    /// Center of the city, where the depot is placed.
    pub fn center(&self) -> LatLng {
        match self {
            City::Bangalore => LatLng::new(12.9716, 77.5946),
            City::Mumbai => LatLng::new(19.0760, 72.8777),
            City::Delhi => LatLng::new(28.7041, 77.1025),
            City::Hyderabad => LatLng::new(17.3850, 78.4867),
            City::Chennai => LatLng::new(13.0827, 80.2707),
        }
    }

    /// Initial map zoom level.
    pub fn zoom(&self) -> u8 {
        12
    }

    /// Lowercase identifier.
    pub fn key(&self) -> &'static str {
        match self {
            City::Bangalore => "bangalore",
            City::Mumbai => "mumbai",
            City::Delhi => "delhi",
            City::Hyderabad => "hyderabad",
            City::Chennai => "chennai",
        }
    }

    /// Name with the first letter capitalized.
    pub fn display_name(&self) -> String {
        capitalize_first_letter(self.key())
    }

    /// Heading shown above the map.
    pub fn title(&self) -> String {
        format!("{} Route Optimization", self.display_name())
    }
}

impl FromStr for City {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        City::ALL
            .iter()
            .copied()
            .find(|city| city.key() == key)
            .ok_or_else(|| DemoError::UnknownCity(s.to_string()))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Uppercase the first character of a string.
pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A rectangular map area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Bounds {
            south,
            west,
            north,
            east,
        }
    }

    /// Area visible in a `width_px` x `height_px` map centered at `center`.
    pub fn viewport(center: LatLng, zoom: u8, width_px: u32, height_px: u32) -> Self {
        let degrees_per_px = 360.0 / (TILE_SIZE * 2f64.powi(zoom as i32));
        let lng_span = degrees_per_px * width_px as f64;
        let lat_span = degrees_per_px * height_px as f64 * center.lat.to_radians().cos();

        Bounds {
            south: center.lat - lat_span / 2.0,
            west: center.lng - lng_span / 2.0,
            north: center.lat + lat_span / 2.0,
            east: center.lng + lng_span / 2.0,
        }
    }

    /// Smallest bounds containing all points, `None` for an empty input.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LatLng>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds::new(p.lat, p.lng, p.lat, p.lng),
                Some(b) => Bounds {
                    south: b.south.min(p.lat),
                    west: b.west.min(p.lng),
                    north: b.north.max(p.lat),
                    east: b.east.max(p.lng),
                },
            })
        })
    }

    /// Grow the bounds by `ratio` of their span on every side.
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_pad = self.lat_span() * ratio;
        let lng_pad = self.lng_span() * ratio;
        Bounds {
            south: self.south - lat_pad,
            west: self.west - lng_pad,
            north: self.north + lat_pad,
            east: self.east + lng_pad,
        }
    }

    pub fn lat_span(&self) -> f64 {
        (self.north - self.south).abs()
    }

    pub fn lng_span(&self) -> f64 {
        (self.east - self.west).abs()
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn contains(&self, p: &LatLng) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lng >= self.west && p.lng <= self.east
    }
}
