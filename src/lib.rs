//! Catálogo de gadgets sobre una ontología OWL local: gateway SPARQL
//! (Oxigraph), normalizador de bindings y API REST con frontend estático.

pub mod api;
pub mod app_state;
pub mod config;
pub mod models;
pub mod normalizer;
pub mod query;
pub mod sparql;
