//! Types de données pour le crate greenmap

use geo::Geometry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attributs bruts d'une feature (clé -> valeur JSON)
pub type Properties = Map<String, Value>;

/// Zone de capture dessinée par l'utilisateur, sous forme de paires
/// (latitude, longitude) ordonnées. Peut être vide (déclenche l'étendue
/// de repli). Immuable une fois capturée.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureArea {
    points: Vec<(f64, f64)>,
}

impl CaptureArea {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Paires (latitude, longitude) dans l'ordre de capture
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}

impl From<Vec<[f64; 2]>> for CaptureArea {
    fn from(coords: Vec<[f64; 2]>) -> Self {
        Self::new(coords.into_iter().map(|c| (c[0], c[1])).collect())
    }
}

/// Les trois familles de couches superposées à la carte de base
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    /// Résultats de l'analyse (empreintes des bâtiments notés)
    Buildings,
    /// Arbres en entrée (points isolés ou zones boisées)
    Trees,
    /// Aires vertes en entrée
    GreenAreas,
}

impl LayerKind {
    /// Nom du champ du payload correspondant
    pub fn payload_field(self) -> &'static str {
        match self {
            LayerKind::Buildings => "risultati",
            LayerKind::Trees => "alberi",
            LayerKind::GreenAreas => "aree_verdi",
        }
    }
}

/// Une feature en mémoire: identifiant canonique, géométrie et attributs
///
/// L'identifiant est normalisé en chaîne une seule fois à l'ingestion,
/// ce qui élimine toute coercition ad hoc aux points de comparaison.
#[derive(Debug, Clone)]
pub struct MapFeature {
    /// Identifiant unique, forme canonique (chaîne)
    pub id: String,

    /// Géométrie (Point, Polygon, MultiPolygon, ...)
    pub geometry: Geometry<f64>,

    /// Attributs bruts de la feature
    pub properties: Properties,
}

/// Une collection de features d'un même genre
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    pub features: Vec<MapFeature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Recherche par identifiant canonique
    pub fn find_by_id(&self, id: &str) -> Option<&MapFeature> {
        self.features.iter().find(|f| f.id == id)
    }
}

/// Payload brut renvoyé par le backend d'analyse
///
/// Chaque champ est une FeatureCollection GeoJSON encodée en chaîne,
/// indépendamment optionnelle/nullable. Les noms de champs sont ceux du
/// contrat serveur (italien).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultPayload {
    /// Bâtiments notés par l'algorithme
    #[serde(default)]
    pub risultati: Option<String>,

    /// Arbres fournis en entrée de l'analyse
    #[serde(default)]
    pub alberi: Option<String>,

    /// Aires vertes fournies en entrée de l'analyse
    #[serde(default)]
    pub aree_verdi: Option<String>,
}

/// État de session possédé explicitement: zone de capture et dernier
/// payload reçu. Remplace l'état global partagé entre instances.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub capture_area: CaptureArea,
    pub payload: Option<ResultPayload>,
}

/// Vue typée sur les attributs de notation d'un bâtiment
///
/// Tolérante aux encodages numériques ou chaînes des drapeaux, comme
/// l'étaient les comparaisons lâches du composant d'origine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingScores {
    /// Le bâtiment satisfait toutes les règles de notation
    pub is_conforme: bool,

    /// Nombre d'arbres visibles depuis le bâtiment
    pub visible_trees_count: u32,

    /// Accès à un parc dans un rayon de 300 m
    pub score_300: bool,

    /// Pourcentage de couverture verte de la zone (0-100)
    pub coverage_percentage: f64,

    /// Identifiants des arbres contribuant au score
    pub visible_trees_id: Vec<String>,

    /// Identifiants des aires vertes contribuant au score
    pub green_areas_id: Vec<String>,
}

impl BuildingScores {
    /// Extrait les scores depuis les attributs bruts d'une feature
    pub fn from_properties(props: &Properties) -> Self {
        Self {
            is_conforme: flag(props.get("is_conforme")),
            visible_trees_count: integer(props.get("visible_trees_count")),
            score_300: flag(props.get("score_300")),
            coverage_percentage: float(props.get("coverage_percentage")),
            visible_trees_id: id_list(props.get("visible_trees_id")),
            green_areas_id: id_list(props.get("green_areas_id")),
        }
    }
}

/// Forme canonique (chaîne) d'une valeur JSON utilisée comme identifiant
///
/// Les nombres entiers perdent leur éventuelle partie décimale nulle
/// (`7.0` -> `"7"`), pour que la comparaison chaîne à chaîne retrouve les
/// correspondances quel que soit l'encodage côté serveur.
pub fn canonical_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().map(|f| {
                    if f.fract() == 0.0 {
                        format!("{}", f as i64)
                    } else {
                        f.to_string()
                    }
                })
            }
        }
        _ => None,
    }
}

fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        Some(Value::String(s)) => s == "1",
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

fn integer(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0) as u32,
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

fn float(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn id_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(canonical_id).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_canonical_id_forms() {
        assert_eq!(canonical_id(&json!("42")), Some("42".to_string()));
        assert_eq!(canonical_id(&json!(42)), Some("42".to_string()));
        assert_eq!(canonical_id(&json!(42.0)), Some("42".to_string()));
        assert_eq!(canonical_id(&json!(4.5)), Some("4.5".to_string()));
        assert_eq!(canonical_id(&json!(null)), None);
        assert_eq!(canonical_id(&json!("")), None);
    }

    #[test]
    fn test_scores_numeric_and_string_flags() {
        let numeric = BuildingScores::from_properties(&props(json!({
            "is_conforme": 1,
            "visible_trees_count": 4,
            "score_300": 0,
            "coverage_percentage": 31.5,
            "visible_trees_id": [7, "12"],
            "green_areas_id": []
        })));
        assert!(numeric.is_conforme);
        assert!(!numeric.score_300);
        assert_eq!(numeric.visible_trees_count, 4);
        assert_eq!(numeric.visible_trees_id, vec!["7", "12"]);
        assert!(numeric.green_areas_id.is_empty());

        let stringly = BuildingScores::from_properties(&props(json!({
            "is_conforme": "1",
            "visible_trees_count": "2",
            "score_300": "1",
            "coverage_percentage": "27.3"
        })));
        assert!(stringly.is_conforme);
        assert!(stringly.score_300);
        assert_eq!(stringly.visible_trees_count, 2);
        assert!((stringly.coverage_percentage - 27.3).abs() < 1e-9);
    }

    #[test]
    fn test_scores_missing_properties_default() {
        let scores = BuildingScores::from_properties(&props(json!({})));
        assert_eq!(scores, BuildingScores::default());
    }

    #[test]
    fn test_payload_deserialize_partial() {
        let payload: ResultPayload =
            serde_json::from_str(r#"{"risultati": "{}", "alberi": null}"#).unwrap();
        assert!(payload.risultati.is_some());
        assert!(payload.alberi.is_none());
        assert!(payload.aree_verdi.is_none());
    }
}
