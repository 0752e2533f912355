//! Reference table of raw material chemical compositions.
//!
//! Rows are raw materials, columns are tracked elements (oxides), values are mass
//! fractions. The order of `materials` is significant: row `i` of the solver matrix
//! is bound to `materials[i]` by position only.
use crate::error::{BlendError, BlendResult};
use log::warn;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MATERIALS: [&str; 15] = [
    "Areia",
    "Bauxita",
    "Braunita",
    "Brucita",
    "Calcita",
    "Corindon",
    "Dolomita",
    "Goethita",
    "Hematita",
    "Itabirito",
    "Magnesita",
    "Magnetita",
    "Pirolusita",
    "Quartzo",
    "Rhodocrosita",
];

pub const DEFAULT_ELEMENTS: [&str; 6] = ["SiO2", "CaO", "MgO", "Fe", "Al2O3", "Mn"];

// percent by mass, same row order as DEFAULT_MATERIALS
const DEFAULT_PERCENTAGES: [[f64; 6]; 15] = [
    [95.0, 1.0, 1.0, 1.0, 1.0, 0.0],
    [10.0, 0.0, 0.0, 5.0, 50.0, 0.0],
    [11.0, 0.0, 0.0, 0.0, 0.0, 60.0],
    [0.0, 0.0, 69.0, 0.0, 0.0, 0.0],
    [5.0, 50.0, 5.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 99.0, 0.0],
    [0.0, 0.0, 30.0, 0.0, 22.0, 0.0],
    [0.0, 0.0, 0.0, 63.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 70.0, 0.0, 0.0],
    [10.0, 0.0, 5.0, 60.0, 5.0, 0.0],
    [0.0, 0.0, 48.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 72.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 63.0],
    [99.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 47.0],
];

/// materials x elements table of mass fractions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionTable {
    pub materials: Vec<String>,
    pub elements: Vec<String>,
    pub fractions: Vec<Vec<f64>>,
}

impl Default for CompositionTable {
    fn default() -> Self {
        let rows: Vec<Vec<f64>> = DEFAULT_PERCENTAGES.iter().map(|row| row.to_vec()).collect();
        Self::from_percentages(
            DEFAULT_MATERIALS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_ELEMENTS.iter().map(|s| s.to_string()).collect(),
            rows,
        )
    }
}

impl CompositionTable {
    pub fn new(materials: Vec<String>, elements: Vec<String>, fractions: Vec<Vec<f64>>) -> Self {
        Self {
            materials,
            elements,
            fractions,
        }
    }
    /// table given in percent by mass, stored as fractions
    pub fn from_percentages(
        materials: Vec<String>,
        elements: Vec<String>,
        percentages: Vec<Vec<f64>>,
    ) -> Self {
        let fractions = percentages
            .into_iter()
            .map(|row| row.into_iter().map(|p| p / 100.0).collect())
            .collect();
        Self::new(materials, elements, fractions)
    }

    pub fn n_materials(&self) -> usize {
        self.materials.len()
    }

    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Checks the shape of the table and that every fraction is a finite non-negative
    /// number. A row summing above 1.0 is only reported as a warning.
    pub fn validate(&self) -> BlendResult<()> {
        if self.fractions.len() != self.materials.len() {
            return Err(BlendError::InvalidConfig(format!(
                "composition table has {} rows for {} raw materials",
                self.fractions.len(),
                self.materials.len()
            )));
        }
        for (material, row) in self.materials.iter().zip(self.fractions.iter()) {
            if row.len() != self.elements.len() {
                return Err(BlendError::InvalidConfig(format!(
                    "raw material '{}' has {} fractions for {} elements",
                    material,
                    row.len(),
                    self.elements.len()
                )));
            }
            if let Some(bad) = row.iter().find(|f| !f.is_finite() || **f < 0.0) {
                return Err(BlendError::InvalidConfig(format!(
                    "raw material '{}' has invalid fraction {}",
                    material, bad
                )));
            }
            let total: f64 = row.iter().sum();
            if total > 1.0 + 1e-9 {
                warn!(
                    "composition of raw material '{}' sums to {:.4} (> 1.0)",
                    material, total
                );
            }
        }
        Ok(())
    }

    /// materials x elements matrix, call `validate` first
    pub fn as_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.n_materials(), self.n_elements(), |i, j| {
            self.fractions[i][j]
        })
    }
}
