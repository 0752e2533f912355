#[allow(non_snake_case)]
pub mod Blending;
#[allow(non_snake_case)]
pub mod Parsing;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod error;
pub mod settings;
