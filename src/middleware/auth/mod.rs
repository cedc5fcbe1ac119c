//! Authentication pipeline.
//!
//! - `authentication`: login stage, credentials → token
//! - `authorization`: bearer token → `AuthCtx`, never rejects
//! - `gate`: 401 for anonymous requests on protected namespaces
pub mod authentication;
pub mod authorization;
pub mod gate;
