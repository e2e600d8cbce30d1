//! Construction des popups d'information des bâtiments
//!
//! Le contenu est d'abord un modèle structuré (lignes), puis rendu en
//! HTML pour la capacité d'affichage. Chaque ligne d'attribut OSM n'est
//! incluse que si l'attribut est présent; les trois métriques de notation
//! sont toujours présentes, colorées vert/rouge selon leur propre seuil.

use serde::Serialize;
use serde_json::Value;

use crate::types::{BuildingScores, Properties};

/// Seuil de conformité du nombre d'arbres visibles
pub const VISIBLE_TREES_THRESHOLD: u32 = 3;

/// Seuil de conformité de la couverture verte (pourcentage)
pub const COVERAGE_THRESHOLD: f64 = 30.0;

/// Couleur d'une métrique au-dessus de son seuil
const METRIC_OK_COLOR: &str = "green";

/// Couleur d'une métrique sous son seuil
const METRIC_KO_COLOR: &str = "#d9534f";

/// Une ligne du popup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PopupLine {
    /// En-tête (identifiant du bâtiment)
    Header(String),
    /// Attribut descriptif, présent seulement si la donnée existe
    Info { label: String, value: String },
    /// Séparateur entre attributs OSM et métriques de notation
    Separator,
    /// Métrique de notation, colorée selon son seuil
    Metric {
        label: String,
        value: String,
        ok: bool,
    },
}

/// Contenu structuré d'un popup de bâtiment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub lines: Vec<PopupLine>,
}

impl Popup {
    /// Rendu HTML, même balisage que l'interface d'origine
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for line in &self.lines {
            match line {
                PopupLine::Header(id) => {
                    html.push_str(&format!("<b>Edificio ID: {id}</b><br>"));
                }
                PopupLine::Info { label, value } => {
                    html.push_str(&format!("<b>{label}:</b> {value}<br>"));
                }
                PopupLine::Separator => {
                    html.push_str(
                        r#"<hr style="margin: 5px 0; border-top: 1px solid #ccc;">"#,
                    );
                }
                PopupLine::Metric { label, value, ok } => {
                    let color = if *ok { METRIC_OK_COLOR } else { METRIC_KO_COLOR };
                    html.push_str(&format!(
                        r#"{label}: <b style="color:{color}">{value}</b><br>"#
                    ));
                }
            }
        }
        html
    }
}

/// Construit le popup d'un bâtiment depuis ses attributs
pub fn building_popup(properties: &Properties) -> Popup {
    let mut lines = Vec::new();

    let id = properties
        .get("id")
        .and_then(crate::types::canonical_id)
        .unwrap_or_default();
    lines.push(PopupLine::Header(id));

    if let Some(name) = text(properties.get("name")) {
        lines.push(PopupLine::Info {
            label: "Nome".to_string(),
            value: name,
        });
    }

    // "yes" est la valeur OSM par défaut, sans information
    if let Some(kind) = text(properties.get("building")).filter(|v| v != "yes") {
        lines.push(PopupLine::Info {
            label: "Tipo".to_string(),
            value: kind,
        });
    }

    if let Some(street) = text(properties.get("addr:street")) {
        let value = match text(properties.get("addr:housenumber")) {
            Some(number) => format!("{street}, {number}"),
            None => street,
        };
        lines.push(PopupLine::Info {
            label: "Indirizzo".to_string(),
            value,
        });
    }

    if let Some(levels) = text(properties.get("building:levels")) {
        lines.push(PopupLine::Info {
            label: "Piani".to_string(),
            value: levels,
        });
    }

    if let Some(amenity) = text(properties.get("amenity")) {
        lines.push(PopupLine::Info {
            label: "Funzione".to_string(),
            value: amenity,
        });
    }

    lines.push(PopupLine::Separator);

    let scores = BuildingScores::from_properties(properties);

    lines.push(PopupLine::Metric {
        label: "Alberi visibili".to_string(),
        value: scores.visible_trees_count.to_string(),
        ok: scores.visible_trees_count >= VISIBLE_TREES_THRESHOLD,
    });

    lines.push(PopupLine::Metric {
        label: "Accesso Parco (300m)".to_string(),
        value: if scores.score_300 { "Sì" } else { "No" }.to_string(),
        ok: scores.score_300,
    });

    lines.push(PopupLine::Metric {
        label: "Copertura Zona".to_string(),
        value: format!("{}%", format_percentage(scores.coverage_percentage)),
        ok: scores.coverage_percentage >= COVERAGE_THRESHOLD,
    });

    Popup { lines }
}

/// Formate un pourcentage avec deux décimales, arrondi décimal demi-supérieur
///
/// L'arrondi binaire de `format!("{:.2}")` rendrait "27.34" pour 27.345;
/// on passe par des millièmes entiers pour obtenir "27.35".
pub fn format_percentage(value: f64) -> String {
    let millis = (value * 1000.0).round() as i64;
    let cents = if millis >= 0 {
        (millis + 5) / 10
    } else {
        (millis - 5) / 10
    };
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

/// Valeur d'attribut en texte (chaîne ou nombre), sinon `None`
fn text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
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
    fn test_format_percentage_half_up() {
        assert_eq!(format_percentage(27.345), "27.35");
        assert_eq!(format_percentage(27.344), "27.34");
        assert_eq!(format_percentage(30.0), "30.00");
        assert_eq!(format_percentage(0.0), "0.00");
        assert_eq!(format_percentage(99.999), "100.00");
    }

    #[test]
    fn test_coverage_below_threshold_is_red() {
        let popup = building_popup(&props(json!({
            "id": 1,
            "coverage_percentage": 27.345
        })));
        let coverage = popup
            .lines
            .iter()
            .find_map(|l| match l {
                PopupLine::Metric { label, value, ok } if label == "Copertura Zona" => {
                    Some((value.clone(), *ok))
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(coverage.0, "27.35%");
        assert!(!coverage.1);

        let html = popup.to_html();
        assert!(html.contains(r##"Copertura Zona: <b style="color:#d9534f">27.35%</b>"##));
    }

    #[test]
    fn test_metric_thresholds() {
        let popup = building_popup(&props(json!({
            "id": 2,
            "visible_trees_count": 3,
            "score_300": 1,
            "coverage_percentage": 30.0
        })));
        let all_ok = popup.lines.iter().all(|l| match l {
            PopupLine::Metric { ok, .. } => *ok,
            _ => true,
        });
        assert!(all_ok);

        let popup = building_popup(&props(json!({
            "id": 2,
            "visible_trees_count": 2,
            "score_300": 0,
            "coverage_percentage": 29.999
        })));
        let none_ok = popup.lines.iter().all(|l| match l {
            PopupLine::Metric { ok, .. } => !*ok,
            _ => true,
        });
        assert!(none_ok);
    }

    #[test]
    fn test_conditional_info_lines() {
        let popup = building_popup(&props(json!({
            "id": 3,
            "building": "yes",
            "addr:street": "Via Roma",
            "addr:housenumber": "12"
        })));

        // "building: yes" ne produit pas de ligne Tipo
        assert!(!popup.lines.iter().any(|l| matches!(
            l,
            PopupLine::Info { label, .. } if label == "Tipo"
        )));

        let address = popup.lines.iter().find_map(|l| match l {
            PopupLine::Info { label, value } if label == "Indirizzo" => Some(value.clone()),
            _ => None,
        });
        assert_eq!(address.as_deref(), Some("Via Roma, 12"));

        // Aucun "Nome" sans attribut name
        assert!(!popup.lines.iter().any(|l| matches!(
            l,
            PopupLine::Info { label, .. } if label == "Nome"
        )));
    }

    #[test]
    fn test_header_and_separator_always_present() {
        let popup = building_popup(&props(json!({ "id": "w123" })));
        assert_eq!(popup.lines.first(), Some(&PopupLine::Header("w123".to_string())));
        assert!(popup.lines.contains(&PopupLine::Separator));
        let html = popup.to_html();
        assert!(html.starts_with("<b>Edificio ID: w123</b><br>"));
    }
}
