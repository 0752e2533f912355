/// reading solver output files
pub mod load_from_file;
