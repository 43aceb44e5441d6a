//! # makepub
//!
//! Build EPUB 3 packages from a declarative content tree.
//!
//! A [`Config`] describes the book: metadata, an optional cover image, an
//! optional media folder, and a recursive spine of content files. One build
//! pass renders markdown pages, infers titles, assigns manifest ids,
//! produces the navigation document in lockstep with the reading order, and
//! assembles the zip container.
//!
//! ## Quick Start
//!
//! ```no_run
//! use makepub::{Config, build_to_path};
//!
//! let config = Config::load("makepub.yaml")?;
//! build_to_path(&config, "book.epub")?;
//! # Ok::<(), makepub::Error>(())
//! ```
//!
//! Spine entries are either bare paths or nodes with explicit titles,
//! anchors, nav flags, and nested children:
//!
//! ```yaml
//! author: A. Writer
//! title: My Book
//! lang: en
//! spine:
//!   - cover_page: cover.jpg
//!   - nav_page: true
//!   - intro.md
//!   - title: Part One
//!     nodes:
//!       - chapter1.md
//!       - chapter2.md
//! ```

pub mod build;
pub mod config;
pub mod error;
pub mod init;
pub mod markdown;
pub(crate) mod util;

pub use build::{NavNode, build_package, build_to_path};
pub use config::{Config, SpineNode, SpineNodeSpec};
pub use error::{Error, Result};
