//! Core of the AniCards service: AniList statistics, milestone geometry and
//! SVG stat card rendering.

pub mod anilist;
pub mod domain;
pub mod infra;
pub mod ports;
pub mod render;
