pub mod config;
pub mod vehicles;
