//! Girder REST API client.
//!
//! Provides an async client for the subset of the
//! [Girder](https://girder.readthedocs.io) API that medsync needs: folder
//! lookup, creation, access control and metadata, plus the three-call
//! upload protocol (`POST /file`, `POST /file/chunk`, `POST /file/completion`).

pub mod client;
pub mod config;

pub use client::{Client, Error};
pub use config::ClientConfig;
