//! Résolution de l'étendue de vue initiale
//!
//! L'étendue est calculée depuis le polygone de capture quand il existe,
//! sinon depuis un centre de repli fixe (Rome) avec un rayon de 100 km,
//! pour que la vue soit toujours définie.

use geo::{BoundingRect, Geometry, Rect};

/// Centre de repli quand aucun polygone de capture n'est fourni (Rome)
pub const FALLBACK_CENTER: (f64, f64) = (41.9028, 12.4964);

/// Rayon de repli en mètres
pub const FALLBACK_RADIUS_M: f64 = 100_000.0;

/// Mètres par degré de latitude (approximation équirectangulaire,
/// rayon équatorial WGS84)
const METERS_PER_DEGREE: f64 = 6_378_137.0 * std::f64::consts::PI / 180.0;

/// Étendue géographique d'une vue, en degrés
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewExtent {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl ViewExtent {
    /// Boîte englobante minimale d'un ensemble de points (latitude, longitude)
    ///
    /// Retourne `None` si l'ensemble est vide.
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let (&(first_lat, first_lon), rest) = points.split_first()?;
        let mut extent = Self {
            south: first_lat,
            west: first_lon,
            north: first_lat,
            east: first_lon,
        };
        for &(lat, lon) in rest {
            extent.south = extent.south.min(lat);
            extent.north = extent.north.max(lat);
            extent.west = extent.west.min(lon);
            extent.east = extent.east.max(lon);
        }
        Some(extent)
    }

    /// Étendue carrée autour d'un centre (latitude, longitude), rayon en mètres
    pub fn from_center_radius(center: (f64, f64), radius_m: f64) -> Self {
        let (lat, lon) = center;
        let dlat = radius_m / METERS_PER_DEGREE;
        // Les degrés de longitude rétrécissent avec la latitude
        let dlon = radius_m / (METERS_PER_DEGREE * lat.to_radians().cos());
        Self {
            south: lat - dlat,
            west: lon - dlon,
            north: lat + dlat,
            east: lon + dlon,
        }
    }

    /// Étendue d'une géométrie (boîte englobante), si elle en a une
    pub fn of_geometry(geometry: &Geometry<f64>) -> Option<Self> {
        geometry.bounding_rect().map(Self::from_rect)
    }

    /// Conversion depuis un `geo::Rect` (x = longitude, y = latitude)
    pub fn from_rect(rect: Rect<f64>) -> Self {
        Self {
            south: rect.min().y,
            west: rect.min().x,
            north: rect.max().y,
            east: rect.max().x,
        }
    }

    /// Centre de l'étendue (latitude, longitude)
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }
}

/// Résout l'étendue de vue initiale depuis la zone de capture
///
/// Jamais d'erreur: une zone vide tombe sur l'étendue de repli.
pub fn resolve_extent(area: &crate::types::CaptureArea) -> ViewExtent {
    match ViewExtent::from_points(area.points()) {
        Some(extent) => extent,
        None => ViewExtent::from_center_radius(FALLBACK_CENTER, FALLBACK_RADIUS_M),
    }
}
