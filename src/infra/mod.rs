//! Integrations with external services.

pub mod montevideo;
