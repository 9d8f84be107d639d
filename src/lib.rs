#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Utils;
#[allow(non_snake_case)]
pub mod WallFunctions;
pub mod cli;
pub mod settings;
