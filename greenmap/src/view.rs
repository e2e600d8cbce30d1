//! Interface de capacité de la carte
//!
//! Le moteur ne dépend que de cette surface: un adaptateur l'implémente
//! au-dessus de la bibliothèque de rendu concrète (tuiles, DOM, GPU...).
//! Le moteur possède exclusivement la vue; aucun autre composant ne la
//! mute.

use geo::{Geometry, Point};

use crate::bounds::ViewExtent;
use crate::error::GreenmapError;
use crate::layer::RenderedLayer;
use crate::style::Style;
use crate::types::LayerKind;

/// Options de cadrage de la vue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Marge en pixels autour de l'étendue
    pub padding_px: u32,
    /// Zoom maximal autorisé par le cadrage
    pub max_zoom: Option<u8>,
    pub animate: bool,
}

/// Cadrage initial sur la zone de capture
pub const INITIAL_FIT: FitOptions = FitOptions {
    padding_px: 0,
    max_zoom: None,
    animate: false,
};

/// Cadrage sur un bâtiment sélectionné
pub const BUILDING_FIT: FitOptions = FitOptions {
    padding_px: 100,
    max_zoom: Some(19),
    animate: true,
};

/// Forme éphémère de la surcouche de surbrillance
#[derive(Debug, Clone)]
pub enum HighlightShape {
    /// Clone de la géométrie d'une feature liée, au style de surbrillance
    Clone {
        source: LayerKind,
        feature_id: String,
        geometry: Geometry<f64>,
        style: Style,
    },
    /// Marqueur circulaire à rayon fixe pour les arbres ponctuels
    CircleMarker {
        feature_id: String,
        center: Point<f64>,
        radius_px: f64,
        style: Style,
    },
}

impl HighlightShape {
    pub fn feature_id(&self) -> &str {
        match self {
            HighlightShape::Clone { feature_id, .. } => feature_id,
            HighlightShape::CircleMarker { feature_id, .. } => feature_id,
        }
    }
}

/// Capacité de rendu cartographique
///
/// Toutes les opérations sont synchrones du point de vue du moteur: le
/// chargement asynchrone de la bibliothèque sous-jacente est traité en
/// amont, via `mount` (le signal de disponibilité explicite).
pub trait MapView {
    /// Attache la vue au conteneur hôte
    ///
    /// # Errors
    ///
    /// `MissingMountPoint` si le conteneur n'existe pas.
    fn mount(&mut self, container_id: &str) -> Result<(), GreenmapError>;

    /// Cadre la vue sur une étendue
    fn fit_bounds(&mut self, extent: &ViewExtent, options: &FitOptions);

    /// Dézoome d'un nombre de niveaux depuis le cadrage courant
    fn zoom_out(&mut self, levels: u32);

    /// Attache une couche reconstruite (remplace toute couche du même genre)
    fn add_layer(&mut self, layer: &RenderedLayer);

    /// Retire une couche de la vue
    fn remove_layer(&mut self, kind: LayerKind);

    /// Montre ou cache une couche sans la détruire
    fn set_layer_visible(&mut self, kind: LayerKind, visible: bool);

    /// Montre ou cache le fond de carte
    fn set_base_visible(&mut self, visible: bool);

    /// Change le style et l'interactivité d'une forme d'une couche
    fn restyle_shape(&mut self, kind: LayerKind, index: usize, style: Style, interactive: bool);

    /// Ajoute une forme à la surcouche de surbrillance
    fn add_highlight(&mut self, shape: HighlightShape);

    /// Vide entièrement la surcouche de surbrillance
    fn clear_highlights(&mut self);
}
