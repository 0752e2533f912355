/// command line entry point: argument handling, logging and the report pipeline
pub mod cli_main;
