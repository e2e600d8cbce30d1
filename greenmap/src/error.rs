//! Types d'erreurs pour le crate greenmap

use thiserror::Error;

/// Erreurs pouvant survenir dans le moteur de visualisation
///
/// Une référence d'identifiant sans correspondance (`visible_trees_id` ou
/// `green_areas_id` pointant vers une feature absente) n'est PAS une erreur:
/// elle est ignorée silencieusement lors de la résolution.
#[derive(Debug, Error)]
pub enum GreenmapError {
    /// Conteneur de la carte introuvable (fatal pour le rendu, jamais un panic)
    #[error("Map container not found: {0}")]
    MissingMountPoint(String),

    /// Un champ JSON du payload est manquant ou invalide
    #[error("Invalid payload field '{field}': {reason}")]
    InvalidPayload { field: &'static str, reason: String },

    /// La capacité de rendu n'est pas encore prête
    #[error("Map view is not ready")]
    ViewNotReady,
}

impl GreenmapError {
    /// Crée une erreur de payload invalide avec contexte
    pub fn invalid_payload(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            field,
            reason: reason.into(),
        }
    }
}
