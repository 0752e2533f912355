//! # Solver Output Parser
//!
//! ## Aim
//! Locate a named matrix inside the semi-structured text printed by an optimization solver
//! and convert it into a numeric grid, regardless of how the solver wrapped its lines.
//!
//! ## Main Data Structures and Logic
//! - `VariableBlock`: name of a variable and the raw text of its body
//! - `NumericMatrix`: row-major grid of finite `f64` values
//! - `scan_variable_blocks()`: explicit scanner over `identifier = body ;` assignments
//! - `extract_variable_blocks()`: map of name -> body, the LAST assignment of a name wins
//! - `parse_matrix()`: strips brackets and turns every non-blank line into one row
//!
//! ## Scanner rules
//! - an identifier is a maximal run of alphanumeric characters and underscores
//! - it opens a block only if it is followed by optional whitespace and `=`
//! - whitespace right after `=` is not part of the body
//! - the body ends at the first `;`, the scan resumes after it
//! - an identifier with no `;` anywhere after it opens no block
use crate::error::{BlendError, BlendResult};
use log::info;
use nalgebra::DMatrix;
use std::collections::HashMap;

/// named assignment found in the solver output
#[derive(Debug, Clone, PartialEq)]
pub struct VariableBlock {
    pub name: String,
    pub raw_text: String,
}

/// Row-major numeric grid. Rows correspond to raw materials and columns to packages
/// when the matrix is handed to the blending engine. Rectangularity is not enforced
/// at construction, use `check_rectangular` or `to_dmatrix`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumericMatrix {
    rows: Vec<Vec<f64>>,
}

impl NumericMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }
    /// number of columns taken from the first row, 0 for an empty matrix
    pub fn ncols(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_rectangular(&self) -> bool {
        let ncols = self.ncols();
        self.rows.iter().all(|row| row.len() == ncols)
    }

    /// returns `RaggedMatrix` for the first row whose length differs from the first row
    pub fn check_rectangular(&self) -> BlendResult<()> {
        let expected = self.ncols();
        match self
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected)
        {
            Some((i, row)) => Err(BlendError::RaggedMatrix {
                row: i + 1,
                expected,
                found: row.len(),
            }),
            None => Ok(()),
        }
    }

    pub fn to_dmatrix(&self) -> BlendResult<DMatrix<f64>> {
        self.check_rectangular()?;
        Ok(DMatrix::from_fn(self.nrows(), self.ncols(), |i, j| {
            self.rows[i][j]
        }))
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Scans the whole text and returns every `identifier = body ;` assignment in
/// encounter order, duplicates included.
pub fn scan_variable_blocks(text: &str) -> Vec<VariableBlock> {
    let mut blocks = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let Some(offset) = text[pos..].find(is_identifier_char) else {
            break;
        };
        let start = pos + offset;
        let end = text[start..]
            .find(|c: char| !is_identifier_char(c))
            .map_or(text.len(), |len| start + len);

        let after_name = text[end..].trim_start();
        if !after_name.starts_with('=') {
            pos = end;
            continue;
        }
        let body = after_name[1..].trim_start();
        let body_start = text.len() - body.len();
        match body.find(';') {
            Some(len) => {
                blocks.push(VariableBlock {
                    name: text[start..end].to_string(),
                    raw_text: body[..len].to_string(),
                });
                pos = body_start + len + 1;
            }
            // no terminator left, nothing after this point can form a block
            None => break,
        }
    }
    blocks
}

/// Returns the map of variable name -> raw body. If a name is assigned more than once
/// the last assignment wins.
pub fn extract_variable_blocks(text: &str) -> HashMap<String, String> {
    let mut blocks = HashMap::new();
    for block in scan_variable_blocks(text) {
        blocks.insert(block.name, block.raw_text);
    }
    blocks
}

/// Looks up one variable in the solver output, `VariableNotFound` if it is absent.
pub fn find_variable(text: &str, name: &str) -> BlendResult<VariableBlock> {
    let mut blocks = extract_variable_blocks(text);
    match blocks.remove(name) {
        Some(raw_text) => Ok(VariableBlock {
            name: name.to_string(),
            raw_text,
        }),
        None => Err(BlendError::VariableNotFound {
            name: name.to_string(),
        }),
    }
}

fn parse_token(token: &str, line: usize) -> BlendResult<f64> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(BlendError::MalformedNumber {
            token: token.to_string(),
            line,
        }),
    }
}

/// Parses the body of a matrix variable. All `[` and `]` are removed, every non-blank
/// line becomes one row of whitespace separated numbers. A body without numbers gives
/// a matrix with zero rows. Ragged rows are passed through unchanged.
pub fn parse_matrix(raw_block: &str) -> BlendResult<NumericMatrix> {
    let cleaned: String = raw_block
        .chars()
        .filter(|c| *c != '[' && *c != ']')
        .collect();
    let mut rows = Vec::new();
    for (i, line) in cleaned.trim().lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| parse_token(token, i + 1))
            .collect::<BlendResult<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(NumericMatrix::new(rows))
}

/// find the variable and parse its body in one step
pub fn parse_variable_matrix(text: &str, name: &str) -> BlendResult<NumericMatrix> {
    let block = find_variable(text, name)?;
    let matrix = parse_matrix(&block.raw_text)?;
    info!(
        "variable '{}' parsed: {} rows, {} columns",
        name,
        matrix.nrows(),
        matrix.ncols()
    );
    Ok(matrix)
}
