//! OpenAPI-only request schemas. JSON bodies live in `engai-types`.

pub mod chat;
