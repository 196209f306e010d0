//! # urlqr
//!
//! Turn URLs into QR code images with customizable rendering options.
//!
//! `urlqr` validates a URL, hands it to the [`qrcode`](https://docs.rs/qrcode) encoder
//! at the chosen error correction level and rasterizes the symbol with the
//! [`image`](https://docs.rs/image) crate. On top of that it offers batch generation,
//! logo embedding and a per-session history of the ten most recent codes.
//!
//! ## Features
//!
//! - Validate URLs before encoding (http, https, ftp and ftps with a real host).
//! - Choose foreground and background colours, module size, border and error correction level.
//! - Generate codes one at a time, in bulk from a list of URLs, or with a centred logo.
//! - Write PNG or SVG files, or print a preview in the terminal.
//! - Keep a most-recent-first history of up to ten codes per session.
//!
//! ## Example
//!
//! Generate a styled QR code and keep it in the session history:
//!
//! ```rust
//! use urlqr::config::{Color, EccLevel, GenerationConfig};
//! use urlqr::session::Session;
//!
//! let config = GenerationConfig::default()
//!     .with_foreground(Color::new(255, 165, 0)) // Orange
//!     .with_error_correction(EccLevel::High);
//! let mut session = Session::new(config);
//!
//! let generated = session.generate_single("https://example.com").unwrap();
//! assert_eq!(session.history().get(0).unwrap().image, generated.png);
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Colours, sizes and error correction levels.
//! - [`validate`]: URL well-formedness checks.
//! - [`encode`]: Encoding and rasterization glue.
//! - [`helper`]: PNG, SVG and file output utilities.
//! - [`logo`]: Logo loading and compositing.
//! - [`batch`]: Multi-URL input handling.
//! - [`history`]: Bounded most-recent-first history.
//! - [`session`]: Settings plus history for one user session.
//! - [`interactive`]: Line oriented interactive front end.
//! - [`cli`]: Command line front end.

pub mod batch;
pub mod cli;
pub mod config;
pub mod encode;
pub mod error;
pub mod helper;
pub mod history;
pub mod interactive;
pub mod logging;
pub mod logo;
pub mod session;
pub mod validate;

pub use error::{Error, Result};
