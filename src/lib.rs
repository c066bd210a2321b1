//! # Lyrical-RS: Lyric Feature Extraction Engine
//!
//! Turns a directory of plain-text song lyrics into an ACE XML feature vector
//! file, one `data_set` per document. Features come from three places:
//!
//! - **Local statistics**: word and vocabulary counts, function-word, letter
//!   and punctuation frequencies
//! - **External tools**: a Flesch readability scorer, a spell checker and a
//!   part-of-speech tagger, run as subprocesses
//! - **Sidecar matrices**: precomputed rows (bigram components, topic
//!   memberships) consumed one per document, in processing order
//!
//! A 729-wide letter-bigram vector is also appended to a side file for every
//! document, for offline dimensionality reduction.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        API Layer                          │
//! ├───────────────────────────────────────────────────────────┤
//! │  Core           │  Features          │  I/O               │
//! │ • Document      │ • Lexical          │ • ACE XML writer   │
//! │ • Categories    │ • Bigram           │ • Sidecar reader   │
//! │ • Featureset    │ • Readability      │ • Side output      │
//! │ • Pipeline      │ • Spelling, POS    │                    │
//! │ • Config        │ • Tool invocation  │                    │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lyrical_rs::{LyricalConfig, LyricalEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = LyricalEngine::new(LyricalConfig::default())?;
//!     let out = std::io::stdout().lock();
//!     let summary = engine.extract_directory("lyrics".as_ref(), out).await?;
//!
//!     eprintln!("Extracted features for {} documents", summary.documents);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

// Core data model and extraction loop
pub mod core {
    //! Documents, feature model, configuration and the extraction loop.

    pub mod categories;
    pub mod config;
    pub mod document;
    pub mod errors;
    pub mod featureset;
    pub mod pipeline;
}

// Feature extractors
pub mod features {
    //! Local and tool-backed feature extractors.

    pub mod bigram;
    pub mod lexical;
    pub mod pos;
    pub mod readability;
    pub mod spelling;
    pub mod tool;
}

// Output writers and sidecar input
pub mod io {
    //! ACE XML output, sidecar matrices and the bigram side file.

    pub mod ace_xml;
    pub mod side_output;
    pub mod sidecar;
}

// Public API and engine interface
pub mod api {
    //! High-level API and engine interface.

    pub mod engine;
}

// Re-export primary types for convenience
pub use api::engine::LyricalEngine;
pub use core::config::LyricalConfig;
pub use core::errors::{LyricalError, Result, ResultExt};
pub use core::pipeline::RunSummary;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
