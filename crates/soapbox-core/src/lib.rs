//! soapbox-core library.
//!
//! Client-side state model for the soapbox feature-voting app: the data
//! model, submission validation, the locally persisted anonymous user
//! session with its vote set, and the feature board that keeps an ordered
//! in-memory list synchronized with the remote API.
//!
//! The presentation layer (the `sbx` CLI) sits on top of [`board::FeatureBoard`];
//! transport and storage are reachable only through the [`api::FeatureService`]
//! and [`store::KeyValueStore`] seams.

pub mod api;
pub mod board;
pub mod config;
pub mod model;
pub mod store;
pub mod user;
pub mod validate;
