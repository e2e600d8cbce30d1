//! Rapport de synthèse d'un rendu

use anyhow::Result;
use serde::Serialize;

use greenmap::payload::Collections;
use greenmap::types::BuildingScores;

/// Synthèse d'un export: effectifs par couche et fichiers produits
#[derive(Debug, Default, Serialize)]
pub struct RenderReport {
    /// Nombre de bâtiments notés
    pub buildings: usize,

    /// Bâtiments conformes à toutes les règles
    pub conformant: usize,

    /// Bâtiments non conformes
    pub non_conformant: usize,

    /// Nombre d'arbres en entrée
    pub trees: usize,

    /// Nombre d'aires vertes en entrée
    pub green_areas: usize,

    /// Fichiers GeoJSON écrits
    pub files: Vec<String>,
}

impl RenderReport {
    pub fn from_collections(collections: &Collections) -> Self {
        let mut report = Self::default();

        if let Some(buildings) = &collections.buildings {
            report.buildings = buildings.len();
            report.conformant = buildings
                .features
                .iter()
                .filter(|f| BuildingScores::from_properties(&f.properties).is_conforme)
                .count();
            report.non_conformant = report.buildings - report.conformant;
        }
        report.trees = collections.trees.as_ref().map_or(0, |c| c.len());
        report.green_areas = collections.green_areas.as_ref().map_or(0, |c| c.len());

        report
    }

    pub fn print(&self) {
        println!("\n{}", "=".repeat(60));
        println!("RENDER REPORT");
        println!("{}", "=".repeat(60));

        println!("\n--- LAYERS ---");
        println!(
            "  Buildings:   {} ({} conformant, {} non-conformant)",
            self.buildings, self.conformant, self.non_conformant
        );
        println!("  Trees:       {}", self.trees);
        println!("  Green areas: {}", self.green_areas);

        if !self.files.is_empty() {
            println!("\n--- FILES ---");
            for file in &self.files {
                println!("  {file}");
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
