//! # Blending Analysis Engine
//!
//! ## Aim
//! Turns the solver matrix (raw materials x packages) and the composition table
//! (raw materials x elements) into two tables:
//! - the recipe: quantity of every raw material in every package plus the package weight
//! - the quality analysis: concentration (%) of every element in every package plus
//!   population mean, variance and standard deviation of each element across packages
//!
//! ## Logic
//! - weight\[j\] = sum_i q\[i\]\[j\]
//! - mass\[e\]\[j\] = (C^T * Q)\[e\]\[j\], where C is the composition matrix
//! - conc\[e\]\[j\] = mass\[e\]\[j\] / weight\[j\] * 100, NaN for a package of zero weight
//! - mean, variance and std use divisor n (population), NaN propagates into them
//!
//! The engine is pure: no I/O, no state kept between calls. Rounding is applied only
//! when a table is prepared for presentation (`RecipeTable::rounded`, `QualityTable::rounded`).
use crate::Blending::composition::CompositionTable;
use crate::Blending::report_output::LabeledTable;
use crate::Parsing::solver_output::NumericMatrix;
use crate::error::{BlendError, BlendResult};
use log::{info, warn};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

pub const RECIPE_SHEET: &str = "Recipe by Package";
pub const QUALITY_SHEET: &str = "Quality Analysis";
pub const TOTAL_WEIGHT_LABEL: &str = "Total Weight";
pub const SUMMARY_COLUMNS: [&str; 3] = ["Mean %", "Population Variance", "Population Std Dev %"];
pub const RECIPE_DECIMALS: i32 = 2;
pub const QUALITY_DECIMALS: i32 = 4;

/// What to do with a package whose raw materials weigh nothing in total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZeroWeightPolicy {
    /// keep NaN concentrations (and NaN statistics) and log a warning
    #[default]
    Warn,
    /// stop with `BlendError::ZeroWeightPackage`
    Fail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeTable {
    pub materials: Vec<String>,
    pub packages: Vec<String>,
    /// materials x packages
    pub quantities: DMatrix<f64>,
    pub total_weight: DVector<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityTable {
    pub elements: Vec<String>,
    pub packages: Vec<String>,
    /// elements x packages, percent
    pub concentrations: DMatrix<f64>,
    pub mean: DVector<f64>,
    pub variance: DVector<f64>,
    pub std_dev: DVector<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlendAnalysis {
    pub recipe: RecipeTable,
    pub quality: QualityTable,
    /// elements x packages, same mass units as the recipe
    pub element_mass: DMatrix<f64>,
    /// zero-based indices of packages with zero total weight
    pub zero_weight_packages: Vec<usize>,
}

/// Rounds half to even, the way numeric table libraries round for display
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

pub fn package_names(n_packages: usize) -> Vec<String> {
    (1..=n_packages).map(|i| format!("Package {}", i)).collect()
}

/// Row `i` of the matrix is raw material `i`, bound by position only. A non-empty matrix
/// must be rectangular and have exactly one row per raw material; an empty matrix is
/// accepted and means zero packages.
pub fn validate_recipe_shape(matrix: &NumericMatrix, n_materials: usize) -> BlendResult<()> {
    matrix.check_rectangular()?;
    if !matrix.is_empty() && matrix.nrows() != n_materials {
        return Err(BlendError::DimensionMismatch {
            expected: n_materials,
            found: matrix.nrows(),
        });
    }
    Ok(())
}

/// materials x packages matrix, `n_materials x 0` for an empty solver matrix
pub fn recipe_matrix(matrix: &NumericMatrix, n_materials: usize) -> BlendResult<DMatrix<f64>> {
    validate_recipe_shape(matrix, n_materials)?;
    if matrix.is_empty() {
        return Ok(DMatrix::zeros(n_materials, 0));
    }
    matrix.to_dmatrix()
}

/// column sums of the recipe
pub fn package_weights(recipe: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_iterator(recipe.ncols(), recipe.column_iter().map(|col| col.sum()))
}

/// elements x packages: composition^T * recipe
pub fn element_masses(
    composition: &DMatrix<f64>,
    recipe: &DMatrix<f64>,
) -> BlendResult<DMatrix<f64>> {
    if composition.nrows() != recipe.nrows() {
        return Err(BlendError::DimensionMismatch {
            expected: composition.nrows(),
            found: recipe.nrows(),
        });
    }
    Ok(composition.transpose() * recipe)
}

/// percent concentrations, every element of a zero weight package is NaN
pub fn concentrations(masses: &DMatrix<f64>, weights: &DVector<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(masses.nrows(), masses.ncols(), |e, j| {
        if weights[j] == 0.0 {
            f64::NAN
        } else {
            masses[(e, j)] / weights[j] * 100.0
        }
    })
}

/// (mean, population variance, population standard deviation); NaN in, NaN out.
/// An empty slice gives NaN for all three.
pub fn population_statistics(values: &[f64]) -> (f64, f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
    (mean, variance, variance.sqrt())
}

pub fn zero_weight_packages(weights: &DVector<f64>) -> Vec<usize> {
    weights
        .iter()
        .enumerate()
        .filter(|(_, w)| **w == 0.0)
        .map(|(j, _)| j)
        .collect()
}

/// Runs the whole analysis for one solver matrix.
pub fn analyze(
    matrix: &NumericMatrix,
    composition: &CompositionTable,
    policy: ZeroWeightPolicy,
) -> BlendResult<BlendAnalysis> {
    composition.validate()?;
    let quantities = recipe_matrix(matrix, composition.n_materials())?;
    let n_packages = quantities.ncols();
    let packages = package_names(n_packages);
    info!(
        "analyzing {} raw materials in {} packages",
        quantities.nrows(),
        n_packages
    );

    let weights = package_weights(&quantities);
    let zero_weight = zero_weight_packages(&weights);
    if let Some(&first) = zero_weight.first() {
        match policy {
            ZeroWeightPolicy::Fail => {
                return Err(BlendError::ZeroWeightPackage {
                    package: first + 1,
                });
            }
            ZeroWeightPolicy::Warn => {
                for j in &zero_weight {
                    warn!(
                        "{} has zero total weight, its concentrations and the element statistics are NaN",
                        packages[*j]
                    );
                }
            }
        }
    }

    let element_mass = element_masses(&composition.as_matrix(), &quantities)?;
    let conc = concentrations(&element_mass, &weights);

    let n_elements = conc.nrows();
    let mut mean = DVector::zeros(n_elements);
    let mut variance = DVector::zeros(n_elements);
    let mut std_dev = DVector::zeros(n_elements);
    for (e, row) in conc.row_iter().enumerate() {
        let values: Vec<f64> = row.iter().copied().collect();
        let (m, v, s) = population_statistics(&values);
        mean[e] = m;
        variance[e] = v;
        std_dev[e] = s;
    }

    Ok(BlendAnalysis {
        recipe: RecipeTable {
            materials: composition.materials.clone(),
            packages: packages.clone(),
            quantities,
            total_weight: weights,
        },
        quality: QualityTable {
            elements: composition.elements.clone(),
            packages,
            concentrations: conc,
            mean,
            variance,
            std_dev,
        },
        element_mass,
        zero_weight_packages: zero_weight,
    })
}

impl RecipeTable {
    pub fn n_packages(&self) -> usize {
        self.packages.len()
    }
    /// presentation table: one row per raw material plus the total weight row, 2 decimals
    pub fn rounded(&self) -> LabeledTable {
        let mut table = LabeledTable::new(RECIPE_SHEET, "Raw Material", self.packages.clone());
        for (i, material) in self.materials.iter().enumerate() {
            let values = self
                .quantities
                .row(i)
                .iter()
                .map(|q| round_to(*q, RECIPE_DECIMALS))
                .collect();
            table.push_row(material, values);
        }
        let totals = self
            .total_weight
            .iter()
            .map(|w| round_to(*w, RECIPE_DECIMALS))
            .collect();
        table.push_row(TOTAL_WEIGHT_LABEL, totals);
        table
    }
}

impl QualityTable {
    pub fn n_packages(&self) -> usize {
        self.packages.len()
    }

    pub fn element_index(&self, element: &str) -> Option<usize> {
        self.elements.iter().position(|e| e == element)
    }
    /// presentation table: per package concentrations followed by the summary columns, 4 decimals
    pub fn rounded(&self) -> LabeledTable {
        let mut columns = self.packages.clone();
        columns.extend(SUMMARY_COLUMNS.iter().map(|s| s.to_string()));
        let mut table = LabeledTable::new(QUALITY_SHEET, "Element", columns);
        for (e, element) in self.elements.iter().enumerate() {
            let mut values: Vec<f64> = self.concentrations.row(e).iter().copied().collect();
            values.extend([self.mean[e], self.variance[e], self.std_dev[e]]);
            let values = values
                .into_iter()
                .map(|v| round_to(v, QUALITY_DECIMALS))
                .collect();
            table.push_row(element, values);
        }
        table
    }
}
