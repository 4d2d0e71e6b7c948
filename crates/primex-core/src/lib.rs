//! Core of the Prime X Studio admin panel.
//!
//! Portfolio collections live in a key-value store ([`storage`]) behind a
//! typed adapter ([`portfolio`]). Entity forms ([`forms`]) validate input and
//! submit records, web projects are also forwarded to the studio backend
//! ([`remote`]), and [`auth`] guards the whole thing with a single admin
//! session.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod model;
pub mod portfolio;
pub mod remote;
pub mod storage;
