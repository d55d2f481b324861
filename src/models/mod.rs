//! Data models for request templates and responses.
//!
//! This module contains the core data structures the engine consumes and
//! produces.

pub mod request;
pub mod response;

pub use request::{
    Auth, HttpMethod, KeyValue, PostRequestAction, RequestBody, RequestTemplate, SetEnvAction,
    SetEnvSource,
};
pub use response::{Response, ResponseCookie};
