//! Movie search, details, trailers and a persisted favorites list on top of
//! the OMDb and YouTube Data APIs.

pub mod config;
pub mod debounce;
pub mod details;
pub mod favorites;
pub mod http;
pub mod models;
pub mod omdb;
pub mod search;
pub mod storage;
pub mod trailer;
