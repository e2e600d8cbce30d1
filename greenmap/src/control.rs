//! Façade de contrôle des couches
//!
//! Expose à l'interface hôte un interrupteur nommé par couche présente.
//! Basculer un interrupteur cache ou montre la couche sans la détruire;
//! la façade ne participe pas à la machine à états de sélection.

use crate::types::LayerKind;

/// Cible d'un interrupteur de couche
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerToggle {
    /// Fond de carte
    BaseMap,
    /// Une des couches de résultat superposées
    Overlay(LayerKind),
}

impl LayerToggle {
    /// Libellé affiché dans le sélecteur de couches (italien, contrat
    /// d'interface d'origine)
    pub fn label(self) -> &'static str {
        match self {
            LayerToggle::BaseMap => "Mappa base",
            LayerToggle::Overlay(LayerKind::Buildings) => "Edifici Conformi",
            LayerToggle::Overlay(LayerKind::Trees) => "Alberi",
            LayerToggle::Overlay(LayerKind::GreenAreas) => "Aree Verdi",
        }
    }
}

/// Entrée du sélecteur de couches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerEntry {
    pub toggle: LayerToggle,
    pub label: &'static str,
    pub visible: bool,
}

/// Interrupteurs des couches présentes sur la vue
#[derive(Debug, Clone, Default)]
pub struct LayerControl {
    entries: Vec<LayerEntry>,
}

impl LayerControl {
    /// Construit la façade pour les couches effectivement présentes
    ///
    /// Le fond de carte est toujours listé; seules les surcouches
    /// construites apparaissent (une couche absente n'a pas
    /// d'interrupteur).
    pub fn new(present: &[LayerKind]) -> Self {
        let mut entries = vec![LayerEntry {
            toggle: LayerToggle::BaseMap,
            label: LayerToggle::BaseMap.label(),
            visible: true,
        }];
        for kind in [LayerKind::Buildings, LayerKind::Trees, LayerKind::GreenAreas] {
            if present.contains(&kind) {
                let toggle = LayerToggle::Overlay(kind);
                entries.push(LayerEntry {
                    toggle,
                    label: toggle.label(),
                    visible: true,
                });
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[LayerEntry] {
        &self.entries
    }

    pub fn is_visible(&self, toggle: LayerToggle) -> Option<bool> {
        self.entries
            .iter()
            .find(|e| e.toggle == toggle)
            .map(|e| e.visible)
    }

    /// Change la visibilité d'une entrée; retourne `false` si la couche
    /// n'est pas présente
    pub fn set_visible(&mut self, toggle: LayerToggle, visible: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.toggle == toggle) {
            Some(entry) => {
                entry.visible = visible;
                true
            }
            None => false,
        }
    }
}
