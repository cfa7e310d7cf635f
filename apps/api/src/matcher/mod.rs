// Résumé / job-description matching.
// Implements: prompt construction, model reply interpretation, the upload endpoint.
// All model calls go through llm_client::AiGateway; no direct provider calls here.

pub mod handlers;
pub mod interpreter;
pub mod models;
pub mod prompts;
