use SolverBlend::cli::cli_main::{init_logging, run_cli};
use log::LevelFilter;

pub fn main() {
    init_logging(LevelFilter::Info);
    let code = run_cli(std::env::args().skip(1));
    std::process::exit(code);
}
