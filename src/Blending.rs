/// eng
/// The module takes the solver matrix of raw material quantities (rows = raw materials,
/// columns = packages) together with the chemical composition of every raw material and produces:
/// 1) the recipe of every package with its total weight
/// 2) the concentration (%) of every element in every package
/// 3) population mean, variance and standard deviation of every element across packages
/// # Examples
/// ```
/// use SolverBlend::Blending::analysis::{analyze, ZeroWeightPolicy};
/// use SolverBlend::Blending::composition::CompositionTable;
/// use SolverBlend::Parsing::solver_output::NumericMatrix;
/// let composition = CompositionTable::new(
///     vec!["A".to_string(), "B".to_string()],
///     vec!["E1".to_string(), "E2".to_string()],
///     vec![vec![1.0, 0.0], vec![0.0, 1.0]],
/// );
/// let matrix = NumericMatrix::new(vec![vec![10.0, 0.0], vec![0.0, 20.0]]);
/// let result = analyze(&matrix, &composition, ZeroWeightPolicy::Warn).unwrap();
/// assert_eq!(result.quality.concentrations[(0, 0)], 100.0);
/// assert_eq!(result.quality.mean[0], 50.0);
/// assert_eq!(result.quality.variance[0], 2500.0);
/// assert_eq!(result.quality.std_dev[0], 50.0);
/// ```
pub mod analysis;
/// reference table of raw material compositions
pub mod composition;
/// console preview and CSV sheets of the report
pub mod report_output;
