pub mod adapter;
pub mod cli;
pub mod error;
pub mod export;
pub mod functions;
pub mod group;
pub mod ingest;
pub mod model;
pub mod report;
pub mod result;
pub mod schema;
pub mod segments;
pub mod tree;
pub mod xml;
