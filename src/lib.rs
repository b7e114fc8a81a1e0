//! Client for the PrintQA mesh analysis service.
//!
//! [`controller::UploadController`] drives one upload at a time against an
//! injected [`client::AnalysisClient`]; [`report::render`] turns the flat
//! answer into labeled lines and [`view::WidgetView`] projects the whole
//! state onto the upload surface.

pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod models;
pub mod report;
pub mod view;
