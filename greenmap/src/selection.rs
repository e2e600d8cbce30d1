//! Résolution des références croisées d'un bâtiment sélectionné
//!
//! Un bâtiment référence par identifiant les arbres et aires vertes qui
//! ont contribué à son score. La résolution compare les identifiants
//! sous leur forme canonique (chaîne) et ignore silencieusement toute
//! référence sans correspondance: ce n'est pas une faute, juste une
//! feature hors de la zone chargée.

use geo::Geometry;
use tracing::debug;

use crate::style::{HIGHLIGHT, HIGHLIGHT_CIRCLE, HIGHLIGHT_CIRCLE_RADIUS_PX};
use crate::types::{BuildingScores, FeatureCollection, LayerKind, MapFeature};
use crate::view::HighlightShape;

/// État de sélection de la carte de résultats
///
/// Au plus un bâtiment sélectionné à la fois; ouvrir une nouvelle
/// sélection ferme d'abord la précédente.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected {
        building_id: String,
    },
}

impl SelectionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SelectionState::Idle)
    }

    pub fn selected_id(&self) -> Option<&str> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Selected { building_id } => Some(building_id),
        }
    }
}

/// Résout l'ensemble de surbrillance d'un bâtiment
///
/// Une liste vide ou absente, ou une couche source absente, donne un
/// ensemble vide (état valide). Les aires vertes liées sont clonées au
/// style de surbrillance; les arbres liés deviennent un marqueur
/// circulaire s'ils sont ponctuels, un clone de polygone sinon.
pub fn resolve_highlights(
    building: &MapFeature,
    trees: Option<&FeatureCollection>,
    green_areas: Option<&FeatureCollection>,
) -> Vec<HighlightShape> {
    let scores = BuildingScores::from_properties(&building.properties);
    let mut shapes = Vec::new();

    if let Some(green_areas) = green_areas {
        for id in &scores.green_areas_id {
            let Some(feature) = green_areas.find_by_id(id) else {
                debug!(building = %building.id, id = %id, "no matching green area, skipped");
                continue;
            };
            shapes.push(HighlightShape::Clone {
                source: LayerKind::GreenAreas,
                feature_id: feature.id.clone(),
                geometry: feature.geometry.clone(),
                style: HIGHLIGHT,
            });
        }
    }

    if let Some(trees) = trees {
        for id in &scores.visible_trees_id {
            let Some(feature) = trees.find_by_id(id) else {
                debug!(building = %building.id, id = %id, "no matching tree, skipped");
                continue;
            };
            shapes.push(match &feature.geometry {
                Geometry::Point(point) => HighlightShape::CircleMarker {
                    feature_id: feature.id.clone(),
                    center: *point,
                    radius_px: HIGHLIGHT_CIRCLE_RADIUS_PX,
                    style: HIGHLIGHT_CIRCLE,
                },
                other => HighlightShape::Clone {
                    source: LayerKind::Trees,
                    feature_id: feature.id.clone(),
                    geometry: other.clone(),
                    style: HIGHLIGHT,
                },
            });
        }
    }

    debug!(
        building = %building.id,
        count = shapes.len(),
        "highlight set resolved"
    );
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Point};
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
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ])
    }

    fn trees() -> FeatureCollection {
        FeatureCollection {
            features: vec![
                feature("7", Geometry::Point(Point::new(0.5, 0.5)), json!({})),
                feature("12", square(), json!({})),
            ],
        }
    }

    fn green_areas() -> FeatureCollection {
        FeatureCollection {
            features: vec![feature("g1", square(), json!({}))],
        }
    }

    #[test]
    fn test_point_tree_becomes_circle_polygon_tree_becomes_clone() {
        let building = feature(
            "b1",
            square(),
            json!({ "id": "b1", "visible_trees_id": ["7", "12"] }),
        );
        let shapes = resolve_highlights(&building, Some(&trees()), None);
        assert_eq!(shapes.len(), 2);

        let circles = shapes
            .iter()
            .filter(|s| matches!(s, HighlightShape::CircleMarker { .. }))
            .count();
        let clones = shapes
            .iter()
            .filter(|s| matches!(s, HighlightShape::Clone { .. }))
            .count();
        assert_eq!(circles, 1);
        assert_eq!(clones, 1);
    }

    #[test]
    fn test_numeric_ids_match_string_features() {
        let building = feature(
            "b1",
            square(),
            json!({ "id": "b1", "visible_trees_id": [7], "green_areas_id": ["g1"] }),
        );
        let shapes = resolve_highlights(&building, Some(&trees()), Some(&green_areas()));
        assert_eq!(shapes.len(), 2);
        assert!(shapes.iter().any(|s| s.feature_id() == "7"));
        assert!(shapes.iter().any(|s| s.feature_id() == "g1"));
    }

    #[test]
    fn test_unresolved_ids_silently_skipped() {
        let building = feature(
            "b1",
            square(),
            json!({ "id": "b1", "visible_trees_id": ["7", "999"], "green_areas_id": ["nope"] }),
        );
        let shapes = resolve_highlights(&building, Some(&trees()), Some(&green_areas()));
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].feature_id(), "7");
    }

    #[test]
    fn test_empty_lists_and_absent_layers_give_empty_set() {
        let no_links = feature("b1", square(), json!({ "id": "b1" }));
        assert!(resolve_highlights(&no_links, Some(&trees()), Some(&green_areas())).is_empty());

        let with_links = feature(
            "b2",
            square(),
            json!({ "id": "b2", "visible_trees_id": ["7"], "green_areas_id": ["g1"] }),
        );
        assert!(resolve_highlights(&with_links, None, None).is_empty());
    }
}
