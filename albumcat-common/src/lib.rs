//! # Album Catalog Common Library
//!
//! Shared code for the album catalog server and its clients including:
//! - Album data model and merge rules
//! - Cover image naming
//! - Configuration loading
//! - Bundled snapshot and mock catalog data
//! - The data context used by catalog front-ends

pub mod album;
pub mod api;
pub mod asset;
pub mod config;
pub mod context;
pub mod error;
pub mod mock;
pub mod snapshot;
pub mod time;

pub use album::{Album, AlbumPatch, NewAlbum};
pub use error::{Error, Result};
