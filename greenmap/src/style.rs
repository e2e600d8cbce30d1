//! Résolution des styles visuels
//!
//! `style_for` est une fonction pure: restaurer le style d'un bâtiment
//! après une désélection revient à la ré-invoquer, jamais à relire un
//! instantané mis en cache (sinon dérive possible entre sélections
//! rapprochées).

use serde::Serialize;

use crate::types::{BuildingScores, LayerKind, Properties};

/// Paramètres visuels d'une forme vectorielle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Style {
    pub color: &'static str,
    pub weight: f32,
    pub opacity: f32,
    pub fill_opacity: f32,
}

/// Bâtiments conformes à toutes les règles
pub const CONFORMANT: Style = Style {
    color: "#00FF00",
    weight: 2.0,
    opacity: 1.0,
    fill_opacity: 0.3,
};

/// Bâtiments non conformes
pub const NON_CONFORMANT: Style = Style {
    color: "#FF0000",
    weight: 2.0,
    opacity: 1.0,
    fill_opacity: 0.3,
};

/// Arbres (zones boisées polygonales)
pub const TREES: Style = Style {
    color: "#0c0c0bff",
    weight: 1.0,
    opacity: 0.8,
    fill_opacity: 0.3,
};

/// Aires vertes
pub const GREEN_AREAS: Style = Style {
    color: "#286d0cff",
    weight: 1.0,
    opacity: 0.7,
    fill_opacity: 0.3,
};

/// Surbrillance des éléments liés au bâtiment sélectionné (clones)
pub const HIGHLIGHT: Style = Style {
    color: "#FFFF00",
    weight: 4.0,
    opacity: 1.0,
    fill_opacity: 0.7,
};

/// Surbrillance des arbres ponctuels (marqueur circulaire)
pub const HIGHLIGHT_CIRCLE: Style = Style {
    color: "#FFFF00",
    weight: 3.0,
    opacity: 1.0,
    fill_opacity: 0.8,
};

/// Rayon en pixels du marqueur circulaire de surbrillance
pub const HIGHLIGHT_CIRCLE_RADIUS_PX: f64 = 8.0;

/// Style d'une feature selon son genre et ses attributs
///
/// Seuls les bâtiments dépendent de leurs attributs (`is_conforme`);
/// arbres et aires vertes ont une palette fixe par genre.
pub fn style_for(kind: LayerKind, properties: &Properties) -> Style {
    match kind {
        LayerKind::Buildings => {
            if BuildingScores::from_properties(properties).is_conforme {
                CONFORMANT
            } else {
                NON_CONFORMANT
            }
        }
        LayerKind::Trees => TREES,
        LayerKind::GreenAreas => GREEN_AREAS,
    }
}

/// Variante quasi invisible d'un style, pour estomper les bâtiments non
/// sélectionnés (la forme devient aussi non interactive)
pub fn dimmed(base: Style) -> Style {
    Style {
        opacity: 0.0,
        fill_opacity: 0.0,
        ..base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: serde_json::Value) -> Properties {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_conformance_drives_building_palette() {
        let conforme = props(json!({ "is_conforme": 1, "coverage_percentage": 2.0 }));
        let non_conforme = props(json!({ "is_conforme": 0, "coverage_percentage": 99.0 }));
        assert_eq!(style_for(LayerKind::Buildings, &conforme), CONFORMANT);
        assert_eq!(style_for(LayerKind::Buildings, &non_conforme), NON_CONFORMANT);
        // Attribut absent -> non conforme
        assert_eq!(style_for(LayerKind::Buildings, &props(json!({}))), NON_CONFORMANT);
    }

    #[test]
    fn test_fixed_palettes_ignore_attributes() {
        let noisy = props(json!({ "is_conforme": 1 }));
        assert_eq!(style_for(LayerKind::Trees, &noisy), TREES);
        assert_eq!(style_for(LayerKind::GreenAreas, &noisy), GREEN_AREAS);
    }

    #[test]
    fn test_style_for_is_pure() {
        let attrs = props(json!({ "is_conforme": 1 }));
        assert_eq!(
            style_for(LayerKind::Buildings, &attrs),
            style_for(LayerKind::Buildings, &attrs)
        );
    }

    #[test]
    fn test_dimmed_keeps_color_kills_visibility() {
        let dim = dimmed(CONFORMANT);
        assert_eq!(dim.color, CONFORMANT.color);
        assert_eq!(dim.opacity, 0.0);
        assert_eq!(dim.fill_opacity, 0.0);
    }
}
