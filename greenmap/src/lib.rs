//! # greenmap
//!
//! Moteur de visualisation des résultats d'analyse "green rating":
//! construit des couches cartographiques stylées depuis les payloads
//! GeoJSON du backend (bâtiments notés, arbres, aires vertes) et relie
//! chaque bâtiment sélectionné aux features qui ont contribué à son
//! score.
//!
//! ## Features
//!
//! - Résolution de l'étendue de vue depuis le polygone de capture (repli
//!   Rome, rayon 100 km)
//! - Styles purs par genre de feature, palette de conformité pour les
//!   bâtiments
//! - Ingestion tolérante des trois collections du payload, identifiants
//!   normalisés en chaînes
//! - Machine à états de sélection avec surcouche de surbrillance
//!   éphémère (clones de polygones, marqueurs circulaires)
//! - Interface de capacité `MapView` + vue headless pour tests et export
//!
//! ## Usage
//!
//! ```rust,ignore
//! use greenmap::{CaptureArea, HeadlessView, ResultMap, ResultPayload};
//!
//! let mut map = ResultMap::new(HeadlessView::new());
//! map.attach("map");
//! map.load_results(payload, CaptureArea::new(polygon));
//! map.select_building("123456");
//! ```

pub mod bounds;
pub mod control;
pub mod engine;
pub mod error;
pub mod headless;
pub mod layer;
pub mod payload;
pub mod popup;
pub mod selection;
pub mod style;
pub mod types;
pub mod view;

pub use bounds::{resolve_extent, ViewExtent};
pub use control::{LayerControl, LayerToggle};
pub use engine::ResultMap;
pub use error::GreenmapError;
pub use headless::HeadlessView;
pub use selection::SelectionState;
pub use style::{style_for, Style};
pub use types::{CaptureArea, FeatureCollection, LayerKind, MapFeature, ResultPayload, Session};
pub use view::{HighlightShape, MapView};
