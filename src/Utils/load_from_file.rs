use crate::Parsing::solver_output::{NumericMatrix, parse_variable_matrix};
use crate::error::{BlendError, BlendResult};
use log::info;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_text(&self) -> BlendResult<String> {
        read_solver_output(&self.file_name)
    }
    pub fn load_matrix(&self, variable_name: &str) -> BlendResult<NumericMatrix> {
        load_variable_matrix(&self.file_name, variable_name)
    }
}

/// Reads the whole solver output file into memory.
pub fn read_solver_output(file_name: &str) -> BlendResult<String> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(BlendError::FileNotFound {
            path: file_name.to_string(),
            reason: "file does not exist".to_string(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| BlendError::FileNotFound {
        path: file_name.to_string(),
        reason: match e.kind() {
            ErrorKind::InvalidData => format!("file exists but is not valid UTF-8 text ({})", e),
            _ => e.to_string(),
        },
    })?;
    info!(
        "read {} bytes of solver output from '{}'",
        content.len(),
        file_name
    );
    Ok(content)
}

/// Reads the solver output and parses the matrix of one variable.
pub fn load_variable_matrix(file_name: &str, variable_name: &str) -> BlendResult<NumericMatrix> {
    let content = read_solver_output(file_name)?;
    parse_variable_matrix(&content, variable_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_variable_matrix_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "// solution (optimal) with objective 35").unwrap();
        writeln!(temp_file, "obj = 35;").unwrap();
        writeln!(temp_file, "x = [[10 0 5]").unwrap();
        writeln!(temp_file, "      [0 20 5]];").unwrap();
        let file_path = temp_file.path().to_str().unwrap();

        let matrix = load_variable_matrix(file_path, "x").unwrap();
        assert_eq!(matrix.nrows(), 2);
        assert_eq!(matrix.ncols(), 3);
        assert_eq!(matrix.rows()[1], vec![0.0, 20.0, 5.0]);

        let loader = LoadData::new(file_path.to_string());
        assert!(loader.load_text().unwrap().contains("obj = 35;"));
        assert_eq!(loader.load_matrix("x").unwrap(), matrix);
    }

    #[test]
    fn test_missing_file() {
        let result = read_solver_output("definitely_not_here_solucao.txt");
        match result {
            Err(BlendError::FileNotFound { path, .. }) => {
                assert_eq!(path, "definitely_not_here_solucao.txt")
            }
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_non_utf8_file_is_reported_as_undecodable() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&[b'x', b' ', b'=', 0xff, 0xfe, b';']).unwrap();
        let file_path = temp_file.path().to_str().unwrap();
        match read_solver_output(file_path) {
            Err(BlendError::FileNotFound { path, reason }) => {
                assert_eq!(path, file_path);
                assert!(reason.contains("exists but is not valid UTF-8"));
            }
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_variable_in_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "y = [[1 2] [3 4]];").unwrap();
        let file_path = temp_file.path().to_str().unwrap();
        let result = load_variable_matrix(file_path, "x");
        assert!(matches!(result, Err(BlendError::VariableNotFound { .. })));
    }
}
