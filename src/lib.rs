//! Gateway for the academic illustrator agent - turns paper content into diagrams
//!
//! A planning model writes a Visual Schema from the paper (text, images or PDF
//! pages), then a vision model renders that schema into an image. This crate
//! adapts both calls to Google Generative Language and OpenAI-compatible
//! endpoints and serves them over HTTP.

pub mod ai;
pub mod error;
pub mod media;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod server;

pub use error::{Error, Result};
