//! Moteur de la carte de résultats
//!
//! Orchestration complète: cadrage initial, (re)construction des couches,
//! machine à états de sélection (`Idle` <-> `Selected`) et façade de
//! visibilité. Mono-thread, piloté par événements discrets; chaque point
//! d'entrée public attrape ses erreurs internes, les logge et laisse la
//! vue dans son dernier état valide: aucune erreur ne s'échappe d'un
//! gestionnaire d'événement.

use tracing::{debug, error, info, warn};

use crate::bounds::resolve_extent;
use crate::control::{LayerControl, LayerToggle};
use crate::error::GreenmapError;
use crate::layer::{build_buildings, build_green_areas, build_trees};
use crate::payload::{parse_payload, Collections};
use crate::selection::{resolve_highlights, SelectionState};
use crate::style::{dimmed, style_for};
use crate::types::{CaptureArea, LayerKind, ResultPayload, Session};
use crate::view::{MapView, BUILDING_FIT, INITIAL_FIT};

/// Carte de résultats: possède la vue, la session et tout l'état de scène
pub struct ResultMap<V> {
    view: V,
    ready: bool,
    session: Session,
    collections: Collections,
    control: LayerControl,
    selection: SelectionState,
}

impl<V: MapView> ResultMap<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            ready: false,
            session: Session::default(),
            collections: Collections::default(),
            control: LayerControl::default(),
            selection: SelectionState::Idle,
        }
    }

    /// Accès en lecture à la vue (tests, export)
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn layer_control(&self) -> &LayerControl {
        &self.control
    }

    /// Signal de disponibilité: la bibliothèque de rendu est chargée
    ///
    /// Monte la vue sur le conteneur hôte puis rejoue le payload mis en
    /// attente, le cas échéant. Un conteneur introuvable est fatal pour
    /// le rendu mais jamais pour l'appelant (loggé, pas de panic).
    pub fn attach(&mut self, container_id: &str) {
        if self.ready {
            debug!("view already attached, ignoring");
            return;
        }
        if let Err(e) = self.view.mount(container_id) {
            error!(error = %e, "cannot attach map view");
            return;
        }
        self.ready = true;
        info!(container = container_id, "map view ready");

        if self.session.payload.is_some() {
            if let Err(e) = self.try_rebuild() {
                error!(error = %e, "deferred rebuild failed");
            }
        }
    }

    /// Nouveau jeu de résultats (remis par l'hôte, une fois, avec le
    /// polygone de capture utilisé pour la vue initiale)
    ///
    /// Avant la disponibilité de la vue, le payload est simplement mis
    /// en attente dans la session; il sera construit au signal `attach`.
    pub fn load_results(&mut self, payload: ResultPayload, capture_area: CaptureArea) {
        self.session = Session {
            capture_area,
            payload: Some(payload),
        };

        match self.try_rebuild() {
            Ok(()) => {}
            Err(GreenmapError::ViewNotReady) => debug!("view not ready, payload deferred"),
            Err(e) => error!(error = %e, "rebuild failed, keeping last good state"),
        }
    }

    /// Sélection d'un bâtiment (clic utilisateur)
    ///
    /// Depuis `Selected`, équivaut à une fermeture immédiatement suivie
    /// d'une ouverture: tous les effets de la transition vers `Idle`
    /// s'accomplissent avant ceux de la nouvelle sélection.
    pub fn select_building(&mut self, id: &str) {
        if !self.ready {
            warn!(id, "view not ready, selection ignored");
            return;
        }
        let Some(buildings) = self.collections.buildings.as_ref() else {
            warn!(id, "no buildings layer, selection ignored");
            return;
        };
        let Some(selected_index) = buildings.features.iter().position(|f| f.id == id) else {
            warn!(id, "unknown building, selection ignored");
            return;
        };

        if !self.selection.is_idle() {
            self.close_selection();
        }

        let Some(buildings) = self.collections.buildings.as_ref() else {
            return;
        };
        let Some(building) = buildings.features.get(selected_index) else {
            return;
        };

        // 1. Cadrer la vue sur le bâtiment choisi
        if let Some(extent) = crate::bounds::ViewExtent::of_geometry(&building.geometry) {
            self.view.fit_bounds(&extent, &BUILDING_FIT);
        }

        // 2. Estomper tous les autres bâtiments (quasi invisibles, non
        //    interactifs) pour ne laisser ressortir que la sélection
        for (index, feature) in buildings.features.iter().enumerate() {
            if index != selected_index {
                let base = style_for(LayerKind::Buildings, &feature.properties);
                self.view
                    .restyle_shape(LayerKind::Buildings, index, dimmed(base), false);
            }
        }

        // 3. Purger toute surbrillance résiduelle
        self.view.clear_highlights();

        // 4-6. Résoudre les références croisées et peindre la surcouche
        let highlights = resolve_highlights(
            building,
            self.collections.trees.as_ref(),
            self.collections.green_areas.as_ref(),
        );
        let count = highlights.len();
        for shape in highlights {
            self.view.add_highlight(shape);
        }

        self.selection = SelectionState::Selected {
            building_id: building.id.to_string(),
        };
        info!(id, highlights = count, "building selected");
    }

    /// Fermeture du popup du bâtiment sélectionné
    pub fn close_popup(&mut self) {
        if !self.ready {
            warn!("view not ready, close ignored");
            return;
        }
        if self.selection.is_idle() {
            debug!("no selection to close");
            return;
        }
        self.close_selection();
        info!("selection closed");
    }

    /// Bascule de visibilité d'une couche (sélecteur de couches)
    pub fn set_layer_visible(&mut self, toggle: LayerToggle, visible: bool) {
        if !self.ready {
            warn!("view not ready, toggle ignored");
            return;
        }
        if !self.control.set_visible(toggle, visible) {
            warn!(label = toggle.label(), "layer not present, toggle ignored");
            return;
        }
        match toggle {
            LayerToggle::BaseMap => self.view.set_base_visible(visible),
            LayerToggle::Overlay(kind) => self.view.set_layer_visible(kind, visible),
        }
    }

    /// Reconstruit toute la scène depuis la session
    ///
    /// Le parsing précède toute mutation de la vue: si le champ
    /// `risultati` est illisible, la vue n'est pas touchée. Le retrait
    /// des anciennes couches et l'ajout des nouvelles se font dans la
    /// même invocation (aucune trame intermédiaire partielle).
    fn try_rebuild(&mut self) -> Result<(), GreenmapError> {
        if !self.ready {
            return Err(GreenmapError::ViewNotReady);
        }
        let payload = self.session.payload.as_ref().ok_or_else(|| {
            GreenmapError::invalid_payload("payload", "no payload in session")
        })?;
        let collections = parse_payload(payload)?;

        // Vue initiale: cadrage sur la capture puis un cran de recul
        let extent = resolve_extent(&self.session.capture_area);
        self.view.fit_bounds(&extent, &INITIAL_FIT);
        self.view.zoom_out(1);

        // Remplacement intégral: retirer l'existant avant d'ajouter
        for kind in [LayerKind::Buildings, LayerKind::Trees, LayerKind::GreenAreas] {
            self.view.remove_layer(kind);
        }
        self.view.clear_highlights();
        self.selection = SelectionState::Idle;

        let mut present = Vec::new();
        if let Some(buildings) = &collections.buildings {
            self.view.add_layer(&build_buildings(buildings));
            present.push(LayerKind::Buildings);
        }
        if let Some(trees) = &collections.trees {
            self.view.add_layer(&build_trees(trees));
            present.push(LayerKind::Trees);
        }
        if let Some(green_areas) = &collections.green_areas {
            self.view.add_layer(&build_green_areas(green_areas));
            present.push(LayerKind::GreenAreas);
        }

        self.control = LayerControl::new(&present);
        self.collections = collections;

        info!(
            buildings = self.collections.buildings.as_ref().map_or(0, |c| c.len()),
            trees = self.collections.trees.as_ref().map_or(0, |c| c.len()),
            green_areas = self.collections.green_areas.as_ref().map_or(0, |c| c.len()),
            "layers rebuilt"
        );
        Ok(())
    }

    /// Effets de la transition `Selected -> Idle`: rendre leur style à
    /// tous les bâtiments (recalculé, jamais un instantané) et vider la
    /// surcouche de surbrillance
    fn close_selection(&mut self) {
        if let Some(buildings) = self.collections.buildings.as_ref() {
            for (index, feature) in buildings.features.iter().enumerate() {
                let style = style_for(LayerKind::Buildings, &feature.properties);
                self.view
                    .restyle_shape(LayerKind::Buildings, index, style, true);
            }
        }
        self.view.clear_highlights();
        self.selection = SelectionState::Idle;
    }
}
