//! Vue sans rendu, pour les tests et l'export hors navigateur
//!
//! Enregistre chaque commande du moteur et maintient l'état de scène
//! résultant (couches, styles courants, surbrillances, cadrage), ce qui
//! permet d'exécuter tout le pipeline sans bibliothèque de carte.

use std::collections::BTreeMap;

use crate::bounds::ViewExtent;
use crate::error::GreenmapError;
use crate::layer::RenderedLayer;
use crate::style::Style;
use crate::types::LayerKind;
use crate::view::{FitOptions, HighlightShape, MapView};

/// État courant d'une forme (style réassignable, interactivité)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeState {
    /// Style courant, `None` pour les marqueurs à icône
    pub style: Option<Style>,
    pub interactive: bool,
}

/// Une couche attachée, avec l'état courant de chaque forme
#[derive(Debug, Clone)]
pub struct AttachedLayer {
    pub layer: RenderedLayer,
    pub states: Vec<ShapeState>,
    pub visible: bool,
}

/// Vue enregistreuse, sans rendu
#[derive(Debug, Default)]
pub struct HeadlessView {
    mounted: bool,
    /// Simule un conteneur hôte absent (`mount` échoue alors)
    missing_container: bool,
    pub extent: Option<ViewExtent>,
    pub fit_history: Vec<(ViewExtent, FitOptions)>,
    pub zoom_offset: i32,
    pub base_visible: bool,
    pub layers: BTreeMap<LayerKind, AttachedLayer>,
    pub highlights: Vec<HighlightShape>,
}

impl HeadlessView {
    pub fn new() -> Self {
        Self {
            base_visible: true,
            ..Self::default()
        }
    }

    /// Vue dont le montage échouera (conteneur hôte introuvable)
    pub fn detached() -> Self {
        Self {
            missing_container: true,
            ..Self::new()
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&AttachedLayer> {
        self.layers.get(&kind)
    }

    /// Identifiants des features de la surcouche de surbrillance
    pub fn highlight_ids(&self) -> Vec<&str> {
        self.highlights.iter().map(|h| h.feature_id()).collect()
    }
}

impl MapView for HeadlessView {
    fn mount(&mut self, container_id: &str) -> Result<(), GreenmapError> {
        if self.missing_container {
            return Err(GreenmapError::MissingMountPoint(container_id.to_string()));
        }
        self.mounted = true;
        Ok(())
    }

    fn fit_bounds(&mut self, extent: &ViewExtent, options: &FitOptions) {
        self.extent = Some(*extent);
        self.fit_history.push((*extent, *options));
        // Un cadrage explicite remet le décalage de zoom à zéro
        self.zoom_offset = 0;
    }

    fn zoom_out(&mut self, levels: u32) {
        self.zoom_offset -= levels as i32;
    }

    fn add_layer(&mut self, layer: &RenderedLayer) {
        let states = layer
            .shapes
            .iter()
            .map(|shape| ShapeState {
                style: match &shape.shape {
                    crate::layer::Shape::Vector { style, .. } => Some(*style),
                    crate::layer::Shape::Marker { .. } => None,
                },
                interactive: shape.interactive,
            })
            .collect();
        self.layers.insert(
            layer.kind,
            AttachedLayer {
                layer: layer.clone(),
                states,
                visible: true,
            },
        );
    }

    fn remove_layer(&mut self, kind: LayerKind) {
        self.layers.remove(&kind);
    }

    fn set_layer_visible(&mut self, kind: LayerKind, visible: bool) {
        if let Some(attached) = self.layers.get_mut(&kind) {
            attached.visible = visible;
        }
    }

    fn set_base_visible(&mut self, visible: bool) {
        self.base_visible = visible;
    }

    fn restyle_shape(&mut self, kind: LayerKind, index: usize, style: Style, interactive: bool) {
        if let Some(attached) = self.layers.get_mut(&kind) {
            if let Some(state) = attached.states.get_mut(index) {
                state.style = Some(style);
                state.interactive = interactive;
            }
        }
    }

    fn add_highlight(&mut self, shape: HighlightShape) {
        self.highlights.push(shape);
    }

    fn clear_highlights(&mut self) {
        self.highlights.clear();
    }
}
