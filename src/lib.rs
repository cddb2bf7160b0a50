//! # MahaTools
//!
//! Offline document and photo utilities: a passport photo sheet maker, an
//! invoice builder, a resume preview and an image compressor. Each tool is
//! independent; they share only the imaging layer, tolerant form parsing and
//! configuration.
//!
//! # Architecture: Capture → Layout → Export
//!
//! The passport tool is the only multi-stage flow:
//!
//! ```text
//! 1. Capture   file bytes  →  Photo      (decode + fixed-aspect crop, 600x771 px)
//! 2. Layout    settings    →  GridSheet  (how many copies, where each goes, in mm)
//! 3. Export    sheet+photo →  JPEG / HTML
//! ```
//!
//! Layout is pure arithmetic on millimetres and never touches pixels, so the
//! core of the tool is testable without images at all. Capture and export go
//! through the [`imaging::CropTool`] and [`imaging::Rasterizer`] traits, which
//! tests replace with a recording mock.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`grid`] | Print-unit presets, quantity modes, `compute_grid` and cell arrangement |
//! | [`capture`] | Photo capture state machine: select → decode → crop → ready |
//! | [`passport`] | Passport workspace: current photo, form settings, regeneration, export |
//! | [`invoice`] | Append-only invoice ledger with running total and bill header |
//! | [`resume`] | One-way field mirror with placeholders |
//! | [`compress`] | Fixed 60% / quality 0.7 re-encoder, single and batch |
//! | [`session`] | Run tickets: a newer capture/compress run supersedes older ones |
//! | [`parse`] | Lenient numeric parsing of free-text form fields |
//! | [`imaging`] | Pure-Rust decode, crop, rasterise, scale and JPEG encode |
//! | [`render`] | Standalone HTML previews using Maud |
//! | [`config`] | `config.toml` loading, validation and stock config |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Newest Run Wins
//!
//! Decoding, cropping and compressing can finish after the user has already
//! chosen another file. Every run holds a [`session::Ticket`]; a result whose
//! ticket is no longer current is dropped with a `Superseded` error instead
//! of overwriting newer state.
//!
//! ## Forms Stay Text
//!
//! Sizes, gaps and quantities are kept as the raw strings the user typed and
//! resolved only when a layout is computed. Garbage becomes a documented
//! default (see [`parse`]) rather than an error, so a half-typed field never
//! blocks a preview.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate only. No system libraries,
//! so the binary is self-contained.

pub mod capture;
pub mod compress;
pub mod config;
pub mod grid;
pub mod imaging;
pub mod invoice;
pub mod output;
pub mod parse;
pub mod passport;
pub mod render;
pub mod resume;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
