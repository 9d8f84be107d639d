use WallLaw::cli::cli_main::{run_interactive_menu, solve_case_file};
use log::error;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;

fn init_logging() {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    // WALLLAW_LOG=<file> additionally writes a debug log
    if let Ok(log_file) = std::env::var("WALLLAW_LOG") {
        match File::create(&log_file) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file)),
            Err(e) => eprintln!("cannot create log file '{}': {}", log_file, e),
        }
    }
    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("logger initialisation failed: {}", e);
    }
}

pub fn main() {
    init_logging();
    let args: Vec<String> = std::env::args().collect();
    match args.get(1) {
        // WallLaw <case.json> [results.json]
        Some(case_file) => {
            if let Err(e) = solve_case_file(case_file, args.get(2).map(|s| s.as_str())) {
                error!("{}", e);
                std::process::exit(1);
            }
        }
        None => run_interactive_menu(),
    }
}
