//! Core of the slide-out menu application.
//!
//! The crate is split along the path a frame takes: [`state`] advances the
//! menu animation, [`menu`] and [`ui`] turn the state into a list of
//! [`command::Command`]s, and [`render`] replays that list into quad batches
//! which a [`batch::RenderBackend`] submits to the GPU.
//!
//! Nothing in here touches a window or a GL context; the client package
//! supplies the backend.

pub mod atlas;
pub mod batch;
pub mod command;
pub mod config;
pub mod geometry;
pub mod logbuf;
pub mod menu;
pub mod render;
pub mod state;
pub mod ui;

#[cfg(test)]
mod testing;
