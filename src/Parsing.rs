/// eng
/// The module reads the text printed by a mathematical-programming solver (CPLEX/OPL style)
/// after a successful run. Such output contains named assignments of the form
/// `name = <body>;` where the body of a matrix variable is a bracketed, whitespace
/// separated grid of numbers that may span any number of lines.
/// The module produces:
/// 1) a map from variable name to the raw text of its body
/// 2) a numeric matrix (rows x columns) parsed from one body
/// # Examples
/// ```
/// use SolverBlend::Parsing::solver_output::{extract_variable_blocks, parse_matrix};
/// let text = "// solution (optimal)\n x = [[10 0]\n [0 20]];\n obj = 30;";
/// let blocks = extract_variable_blocks(text);
/// let matrix = parse_matrix(&blocks["x"]).unwrap();
/// assert_eq!(matrix.nrows(), 2);
/// assert_eq!(matrix.ncols(), 2);
/// assert_eq!(matrix.rows()[1], vec![0.0, 20.0]);
/// ```
pub mod solver_output;
