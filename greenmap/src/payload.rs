//! Ingestion du payload d'analyse
//!
//! Chaque champ du payload est une FeatureCollection GeoJSON encodée en
//! chaîne. Les identifiants sont normalisés en chaînes ici, une seule
//! fois; les features sans identifiant ou sans géométrie exploitable sont
//! écartées avec un warning.

use geo::Geometry;
use geojson::GeoJson;
use tracing::{debug, warn};

use crate::error::GreenmapError;
use crate::types::{canonical_id, FeatureCollection, LayerKind, MapFeature, ResultPayload};

/// Collections issues d'un payload, une par genre de couche
///
/// `None` signifie couche absente: champ manquant, nul, vide ou, pour
/// les arbres et aires vertes, illisible. Tous les consommateurs en
/// aval doivent tolérer l'absence.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub buildings: Option<FeatureCollection>,
    pub trees: Option<FeatureCollection>,
    pub green_areas: Option<FeatureCollection>,
}

/// Ingère un payload complet
///
/// # Errors
///
/// Retourne `InvalidPayload` si le champ `risultati` est présent mais
/// illisible: dans ce cas rien ne doit être rendu. Un échec de parsing
/// des arbres ou des aires vertes est indépendant (couche absente,
/// warning loggé) et ne bloque pas la couche des bâtiments.
pub fn parse_payload(payload: &ResultPayload) -> Result<Collections, GreenmapError> {
    let buildings = parse_collection(payload.risultati.as_deref(), LayerKind::Buildings)?;

    let trees = parse_collection(payload.alberi.as_deref(), LayerKind::Trees)
        .unwrap_or_else(|e| {
            warn!(error = %e, "trees collection unreadable, layer skipped");
            None
        });

    let green_areas = parse_collection(payload.aree_verdi.as_deref(), LayerKind::GreenAreas)
        .unwrap_or_else(|e| {
            warn!(error = %e, "green areas collection unreadable, layer skipped");
            None
        });

    Ok(Collections {
        buildings,
        trees,
        green_areas,
    })
}

/// Parse un champ du payload en collection normalisée
///
/// Champ absent, nul ou collection vide -> `Ok(None)` (couche absente).
pub fn parse_collection(
    raw: Option<&str>,
    kind: LayerKind,
) -> Result<Option<FeatureCollection>, GreenmapError> {
    let field = kind.payload_field();

    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Ok(None),
    };

    let geojson: GeoJson = raw
        .parse()
        .map_err(|e| GreenmapError::invalid_payload(field, format!("not valid GeoJSON: {e}")))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        other => {
            return Err(GreenmapError::invalid_payload(
                field,
                format!("expected a FeatureCollection, got {}", geojson_kind(&other)),
            ))
        }
    };

    let mut features = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let Some(id) = feature_id(&feature) else {
            warn!(field, "feature without id skipped");
            continue;
        };

        let Some(geometry) = feature.geometry.as_ref() else {
            warn!(field, id = %id, "feature without geometry skipped");
            continue;
        };

        let geometry = match Geometry::<f64>::try_from(geometry.value.clone()) {
            Ok(g) => g,
            Err(e) => {
                warn!(field, id = %id, error = %e, "unsupported geometry skipped");
                continue;
            }
        };

        features.push(MapFeature {
            id,
            geometry,
            properties: feature.properties.unwrap_or_default(),
        });
    }

    if features.is_empty() {
        debug!(field, "collection is empty, no layer built");
        return Ok(None);
    }

    debug!(field, count = features.len(), "collection ingested");
    Ok(Some(FeatureCollection { features }))
}

/// Identifiant canonique d'une feature GeoJSON
///
/// La propriété `id` prime (c'est elle que référencent les listes
/// `visible_trees_id`/`green_areas_id`), l'identifiant au niveau feature
/// sert de repli.
fn feature_id(feature: &geojson::Feature) -> Option<String> {
    if let Some(props) = &feature.properties {
        if let Some(id) = props.get("id").and_then(canonical_id) {
            return Some(id);
        }
    }
    match &feature.id {
        Some(geojson::feature::Id::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(geojson::feature::Id::Number(n)) => {
            canonical_id(&serde_json::Value::Number(n.clone()))
        }
        _ => None,
    }
}

fn geojson_kind(value: &GeoJson) -> &'static str {
    match value {
        GeoJson::Geometry(_) => "a bare geometry",
        GeoJson::Feature(_) => "a single feature",
        GeoJson::FeatureCollection(_) => "a FeatureCollection",
    }
}
