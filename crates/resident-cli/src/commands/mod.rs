pub mod config;
pub mod masterdata;
