pub mod claims;
pub mod columns;
pub mod config;
pub mod controller;
pub mod data_model;
pub mod debounce;
pub mod filter;
pub mod row_identity;
pub mod selection;
pub mod sort;
pub mod table_engine;
