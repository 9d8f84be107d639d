/// reading wall patches from JSON case files and writing results back
pub mod load_from_file;
