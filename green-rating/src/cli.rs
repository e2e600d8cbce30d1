//! Définition et implémentation des commandes CLI
//!
//! - `export`: payload d'analyse -> une FeatureCollection GeoJSON stylée
//!   par couche présente, plus un rapport de synthèse
//! - `inspect`: simule la sélection d'un bâtiment et affiche son popup
//!   et l'ensemble de surbrillance résolu

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use tracing::info;

use greenmap::headless::AttachedLayer;
use greenmap::layer::Shape;
use greenmap::payload::parse_payload;
use greenmap::popup::PopupLine;
use greenmap::types::FeatureCollection;
use greenmap::view::HighlightShape;
use greenmap::{CaptureArea, HeadlessView, LayerKind, ResultMap, ResultPayload};

use crate::report::RenderReport;

#[derive(Subcommand)]
pub enum Commands {
    /// Export styled GeoJSON layers from a saved analysis payload
    Export {
        /// Path to the analysis payload (JSON with risultati/alberi/aree_verdi)
        #[arg(short, long)]
        payload: PathBuf,

        /// Path to the capture polygon (JSON array of [lat, lon] pairs)
        #[arg(long)]
        polygon: Option<PathBuf>,

        /// Output directory for the GeoJSON files
        #[arg(short, long)]
        output: PathBuf,

        /// Print the summary report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Simulate selecting a building and print its popup and highlight set
    Inspect {
        /// Path to the analysis payload (JSON with risultati/alberi/aree_verdi)
        #[arg(short, long)]
        payload: PathBuf,

        /// Path to the capture polygon (JSON array of [lat, lon] pairs)
        #[arg(long)]
        polygon: Option<PathBuf>,

        /// Canonical id of the building to select
        #[arg(short, long)]
        building: String,
    },
}

pub fn cmd_export(
    payload_path: &Path,
    polygon_path: Option<&Path>,
    output: &Path,
    json: bool,
) -> Result<()> {
    let payload = load_payload(payload_path)?;
    let capture_area = load_polygon(polygon_path)?;

    // Validation en amont: un champ risultati illisible est une erreur
    // CLI franche, pas une dégradation silencieuse comme dans l'UI
    let collections = parse_payload(&payload).context("invalid analysis payload")?;

    let mut map = ResultMap::new(HeadlessView::new());
    map.attach("map");
    map.load_results(payload, capture_area);

    std::fs::create_dir_all(output)
        .context(format!("Failed to create directory: {}", output.display()))?;

    let mut report = RenderReport::from_collections(&collections);

    let layers = [
        (LayerKind::Buildings, collections.buildings.as_ref(), "edifici.geojson"),
        (LayerKind::Trees, collections.trees.as_ref(), "alberi.geojson"),
        (LayerKind::GreenAreas, collections.green_areas.as_ref(), "aree_verdi.geojson"),
    ];

    for (kind, collection, filename) in layers {
        let (Some(attached), Some(collection)) = (map.view().layer(kind), collection) else {
            continue;
        };
        let path = output.join(filename);
        write_layer(&path, attached, collection)?;
        info!(file = %path.display(), shapes = attached.layer.shapes.len(), "layer written");
        report.files.push(path.display().to_string());
    }

    if json {
        println!("{}", report.to_json()?);
    } else {
        report.print();
    }

    Ok(())
}

pub fn cmd_inspect(
    payload_path: &Path,
    polygon_path: Option<&Path>,
    building: &str,
) -> Result<()> {
    let payload = load_payload(payload_path)?;
    let capture_area = load_polygon(polygon_path)?;

    parse_payload(&payload).context("invalid analysis payload")?;

    let mut map = ResultMap::new(HeadlessView::new());
    map.attach("map");
    map.load_results(payload, capture_area);
    map.select_building(building);

    if map.selection().selected_id() != Some(building) {
        bail!("building '{building}' not found in the results layer");
    }

    let buildings = map
        .view()
        .layer(LayerKind::Buildings)
        .context("no buildings layer")?;
    let popup = buildings
        .layer
        .shapes
        .iter()
        .find(|s| s.feature_id == building)
        .and_then(|s| s.popup.as_ref())
        .context("selected building has no popup")?;

    println!("\n{}", "=".repeat(60));
    for line in &popup.lines {
        match line {
            PopupLine::Header(id) => println!("Edificio ID: {id}"),
            PopupLine::Info { label, value } => println!("  {label}: {value}"),
            PopupLine::Separator => println!("{}", "-".repeat(40)),
            PopupLine::Metric { label, value, ok } => {
                println!("  {label}: {value} [{}]", if *ok { "ok" } else { "!!" })
            }
        }
    }

    println!("\n--- HIGHLIGHTS ({}) ---", map.view().highlights.len());
    for shape in &map.view().highlights {
        match shape {
            HighlightShape::CircleMarker { feature_id, .. } => {
                println!("  tree {feature_id}: circle marker")
            }
            HighlightShape::Clone {
                source, feature_id, ..
            } => {
                let source = match source {
                    LayerKind::Trees => "tree",
                    LayerKind::GreenAreas => "green area",
                    LayerKind::Buildings => "building",
                };
                println!("  {source} {feature_id}: polygon clone")
            }
        }
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

fn load_payload(path: &Path) -> Result<ResultPayload> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read payload file: {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse payload JSON")
}

fn load_polygon(path: Option<&Path>) -> Result<CaptureArea> {
    let Some(path) = path else {
        return Ok(CaptureArea::empty());
    };
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read polygon file: {}", path.display()))?;
    let coords: Vec<[f64; 2]> =
        serde_json::from_str(&content).context("Failed to parse polygon JSON")?;
    Ok(CaptureArea::from(coords))
}

/// Écrit une couche en FeatureCollection GeoJSON stylée
///
/// Les formes et les features sources sont alignées 1:1; chaque feature
/// exportée garde ses attributs d'origine, complétés des paramètres de
/// style effectifs (clés préfixées `_`).
fn write_layer(path: &Path, attached: &AttachedLayer, collection: &FeatureCollection) -> Result<()> {
    let mut features = Vec::with_capacity(attached.layer.shapes.len());

    for (shape, source) in attached.layer.shapes.iter().zip(&collection.features) {
        let mut properties = source.properties.clone();
        properties.insert("_id".to_string(), source.id.clone().into());

        match &shape.shape {
            Shape::Vector { style, .. } => {
                properties.insert("_color".to_string(), style.color.into());
                properties.insert("_weight".to_string(), style.weight.into());
                properties.insert("_opacity".to_string(), style.opacity.into());
                properties.insert("_fill_opacity".to_string(), style.fill_opacity.into());
            }
            Shape::Marker { icon, .. } => {
                properties.insert("_icon".to_string(), icon.url.into());
            }
        }

        features.push(geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(
                &source.geometry,
            ))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    let collection = geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    let file = File::create(path)
        .context(format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, &collection).context("Failed to write GeoJSON")?;

    Ok(())
}
