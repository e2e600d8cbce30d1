//! Construction des couches rendues
//!
//! Chaque collection donne une couche indépendante, dont les formes sont
//! dérivées 1:1 des features. Les couches sont toujours reconstruites en
//! bloc à l'arrivée de nouveaux résultats, jamais rapiécées.

use geo::{Geometry, Point};
use tracing::debug;

use crate::popup::{building_popup, Popup};
use crate::style::{style_for, Style};
use crate::types::{FeatureCollection, LayerKind};

/// Icône fixe des arbres ponctuels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    /// Chemin de l'image, résolu par l'adaptateur de rendu
    pub url: &'static str,
    /// Dimensions en pixels (largeur, hauteur)
    pub size: (u32, u32),
    /// Point d'ancrage en pixels depuis le coin haut-gauche
    pub anchor: (u32, u32),
}

/// Icône des arbres ponctuels
pub const TREE_ICON: Icon = Icon {
    url: "assets/treePopUp.png",
    size: (25, 25),
    anchor: (12, 25),
};

/// Forme affichable dérivée d'une feature
#[derive(Debug, Clone)]
pub enum Shape {
    /// Géométrie vectorielle (polygone, multi-polygone, ligne) stylée
    Vector {
        geometry: Geometry<f64>,
        style: Style,
    },
    /// Marqueur ponctuel à icône fixe
    Marker { position: Point<f64>, icon: Icon },
}

/// Forme rendue avec son identité et son interactivité
#[derive(Debug, Clone)]
pub struct RenderedShape {
    /// Identifiant canonique de la feature source
    pub feature_id: String,
    pub shape: Shape,
    /// Popup lié, le cas échéant (bâtiments uniquement)
    pub popup: Option<Popup>,
    pub interactive: bool,
}

/// Couche prête à être attachée à la vue
#[derive(Debug, Clone)]
pub struct RenderedLayer {
    pub kind: LayerKind,
    pub shapes: Vec<RenderedShape>,
}

/// Construit la couche des bâtiments notés
///
/// Style par conformité et popup d'information pour chaque empreinte.
pub fn build_buildings(collection: &FeatureCollection) -> RenderedLayer {
    let shapes = collection
        .features
        .iter()
        .map(|feature| RenderedShape {
            feature_id: feature.id.clone(),
            shape: Shape::Vector {
                geometry: feature.geometry.clone(),
                style: style_for(LayerKind::Buildings, &feature.properties),
            },
            popup: Some(building_popup(&feature.properties)),
            interactive: true,
        })
        .collect::<Vec<_>>();

    debug!(count = shapes.len(), "buildings layer built");
    RenderedLayer {
        kind: LayerKind::Buildings,
        shapes,
    }
}

/// Construit la couche des arbres
///
/// Les arbres ponctuels deviennent des marqueurs à icône fixe, les zones
/// boisées (polygones) prennent le style vectoriel des arbres.
pub fn build_trees(collection: &FeatureCollection) -> RenderedLayer {
    let shapes = collection
        .features
        .iter()
        .map(|feature| {
            let shape = match &feature.geometry {
                Geometry::Point(point) => Shape::Marker {
                    position: *point,
                    icon: TREE_ICON,
                },
                other => Shape::Vector {
                    geometry: other.clone(),
                    style: style_for(LayerKind::Trees, &feature.properties),
                },
            };
            RenderedShape {
                feature_id: feature.id.clone(),
                shape,
                popup: None,
                interactive: false,
            }
        })
        .collect::<Vec<_>>();

    debug!(count = shapes.len(), "trees layer built");
    RenderedLayer {
        kind: LayerKind::Trees,
        shapes,
    }
}

/// Construit la couche des aires vertes (pas de popup)
pub fn build_green_areas(collection: &FeatureCollection) -> RenderedLayer {
    let shapes = collection
        .features
        .iter()
        .map(|feature| RenderedShape {
            feature_id: feature.id.clone(),
            shape: Shape::Vector {
                geometry: feature.geometry.clone(),
                style: style_for(LayerKind::GreenAreas, &feature.properties),
            },
            popup: None,
            interactive: false,
        })
        .collect::<Vec<_>>();

    debug!(count = shapes.len(), "green areas layer built");
    RenderedLayer {
        kind: LayerKind::GreenAreas,
        shapes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style;
    use geo::polygon;
    use crate::types::MapFeature;
    use serde_json::json;

    fn feature(id: &str, geometry: Geometry<f64>, props: serde_json::Value) -> MapFeature {
        MapFeature {
            id: id.to_string(),
            geometry,
            properties: props.as_object().cloned().unwrap(),
        }
    }

    fn square() -> Geometry<f64> {
        Geometry::Polygon(geo::polygon![
            (x: 12.0, y: 41.0),
            (x: 12.1, y: 41.0),
            (x: 12.1, y: 41.1),
            (x: 12.0, y: 41.0),
        ])
    }

    #[test]
    fn test_buildings_get_style_and_popup() {
        let collection = FeatureCollection {
            features: vec![
                feature("1", square(), json!({ "id": 1, "is_conforme": 1 })),
                feature("2", square(), json!({ "id": 2, "is_conforme": 0 })),
            ],
        };
        let layer = build_buildings(&collection);
        assert_eq!(layer.shapes.len(), 2);
        assert!(layer.shapes.iter().all(|s| s.popup.is_some() && s.interactive));

        match (&layer.shapes[0].shape, &layer.shapes[1].shape) {
            (Shape::Vector { style: a, .. }, Shape::Vector { style: b, .. }) => {
                assert_eq!(*a, style::CONFORMANT);
                assert_eq!(*b, style::NON_CONFORMANT);
            }
            _ => panic!("buildings must be vector shapes"),
        }
    }

    #[test]
    fn test_trees_split_points_and_polygons() {
        let collection = FeatureCollection {
            features: vec![
                feature("7", Geometry::Point(Point::new(12.05, 41.05)), json!({})),
                feature("12", square(), json!({})),
            ],
        };
        let layer = build_trees(&collection);

        match &layer.shapes[0].shape {
            Shape::Marker { icon, .. } => assert_eq!(*icon, TREE_ICON),
            _ => panic!("point tree must be a marker"),
        }
        match &layer.shapes[1].shape {
            Shape::Vector { style, .. } => assert_eq!(*style, style::TREES),
            _ => panic!("forest tree must be a vector shape"),
        }
    }

    #[test]
    fn test_green_areas_have_no_popup() {
        let collection = FeatureCollection {
            features: vec![feature("g1", square(), json!({}))],
        };
        let layer = build_green_areas(&collection);
        assert!(layer.shapes[0].popup.is_none());
        assert!(!layer.shapes[0].interactive);
        match &layer.shapes[0].shape {
            Shape::Vector { style, .. } => assert_eq!(*style, style::GREEN_AREAS),
            _ => panic!("green area must be a vector shape"),
        }
    }
}
