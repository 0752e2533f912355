use crate::Blending::analysis::{BlendAnalysis, analyze};
use crate::Blending::report_output::{LabeledTable, write_report};
use crate::Utils::load_from_file::load_variable_matrix;
use crate::error::BlendResult;
use crate::settings::RunSettings;
use log::{LevelFilter, error, info};
use simplelog::{ColorChoice, Config, SimpleLogger, TermLogger, TerminalMode};
use std::path::Path;

/// Terminal logger, plain stderr logger if no terminal is attached
pub fn init_logging(level: LevelFilter) {
    if TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .is_err()
    {
        let _ = SimpleLogger::init(level, Config::default());
    }
}

/// read -> parse -> analyze -> write. Nothing is written if an earlier stage fails.
pub fn run(settings: &RunSettings) -> BlendResult<(BlendAnalysis, Vec<LabeledTable>)> {
    let config = settings.load_config()?;
    info!("reading solver output '{}'", settings.input_file);
    let matrix = load_variable_matrix(&settings.input_file, &config.variable_name)?;

    info!("computing concentrations and standard deviation");
    let analysis = analyze(&matrix, &config.composition, config.zero_weight_policy)?;
    let sheets = vec![analysis.recipe.rounded(), analysis.quality.rounded()];

    info!("writing report to '{}'", settings.output);
    write_report(Path::new(&settings.output), &sheets)?;
    Ok((analysis, sheets))
}

/// Entry point of the binary, returns the process exit code.
pub fn run_cli<I: IntoIterator<Item = String>>(args: I) -> i32 {
    let settings = RunSettings::from_args(args);
    match run(&settings) {
        Ok((_, sheets)) => {
            for sheet in &sheets {
                sheet.print_preview();
            }
            0
        }
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlendError;
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::tempdir;

    fn settings_in(dir: &Path, input: &str, config: Option<&str>) -> RunSettings {
        RunSettings {
            input_file: dir.join(input).to_str().unwrap().to_string(),
            output: dir.join("report").to_str().unwrap().to_string(),
            config_file: config.map(|c| dir.join(c).to_str().unwrap().to_string()),
        }
    }

    #[test]
    fn test_run_two_materials() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("solution.txt"),
            "// solution (optimal)\nobj = 30;\nx = [[10 0]\n [0 20]];\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{ "composition": { "materials": ["A", "B"], "elements": ["E1", "E2"],
                 "fractions": [[1.0, 0.0], [0.0, 1.0]] } }"#,
        )
        .unwrap();
        let settings = settings_in(dir.path(), "solution.txt", Some("config.json"));
        let (analysis, sheets) = run(&settings).unwrap();
        assert_relative_eq!(analysis.quality.mean[0], 50.0);
        assert_eq!(sheets.len(), 2);

        let report = dir.path().join("report");
        let quality = fs::read_to_string(report.join("quality_analysis.csv")).unwrap();
        let lines: Vec<&str> = quality.lines().collect();
        assert_eq!(
            lines[0],
            "Element,Package 1,Package 2,Mean %,Population Variance,Population Std Dev %"
        );
        assert_eq!(lines[1], "E1,100,0,50,2500,50");
        let recipe = fs::read_to_string(report.join("recipe_by_package.csv")).unwrap();
        assert!(recipe.lines().any(|l| l == "Total Weight,10,20"));
    }

    #[test]
    fn test_run_writes_single_workbook() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("solution.txt"), "x = [[10 0]\n [0 20]];\n").unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{ "composition": { "materials": ["A", "B"], "elements": ["E1", "E2"],
                 "fractions": [[1.0, 0.0], [0.0, 1.0]] } }"#,
        )
        .unwrap();
        let mut settings = settings_in(dir.path(), "solution.txt", Some("config.json"));
        settings.output = dir
            .path()
            .join("blending_report.xlsx")
            .to_str()
            .unwrap()
            .to_string();
        run(&settings).unwrap();
        assert!(dir.path().join("blending_report.xlsx").is_file());
        assert!(!dir.path().join("report").exists());
    }

    #[test]
    fn test_missing_variable_writes_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("solution.txt"), "y = [[1 2]];\nz = 3;\n").unwrap();
        let settings = settings_in(dir.path(), "solution.txt", None);
        let result = run(&settings);
        assert!(matches!(result, Err(BlendError::VariableNotFound { .. })));
        assert!(!dir.path().join("report").exists());
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempdir().unwrap();
        let settings = settings_in(dir.path(), "absent.txt", None);
        assert!(matches!(run(&settings), Err(BlendError::FileNotFound { .. })));
        assert!(!dir.path().join("report").exists());
    }

    #[test]
    fn test_run_cli_exit_codes() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("absent.txt");
        let code = run_cli(vec![input.to_str().unwrap().to_string()]);
        assert_eq!(code, 1);
    }
}
