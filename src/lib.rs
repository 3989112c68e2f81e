//! # operator-audit
//!
//! Audits an operator catalog against a platform-version support policy.
//!
//! Every release of every package declares the platform versions it supports
//! with a small specifier grammar (`v4.12`, `=v4.12`, `v4.12-v4.16`, or a
//! comma-separated mix). `operator-audit` expands those specifiers, classifies
//! their shape, and flags packages that promise open-ended support but have
//! gone stale.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use operator_audit::{audit, config::Config, history, output};
//!
//! let config = Config::load(None).expect("failed to load config");
//! let source = history::source_for(config.history.source);
//! let report = audit::run_audit(Path::new("operators"), &config, None, source.as_ref(), chrono::Utc::now())
//!     .expect("audit failed");
//!
//! let text = output::format_report(&report, output::OutputFormat::Summary).unwrap();
//! print!("{text}");
//! ```
//!
//! ## Architecture
//!
//! 1. **[`specifier`]** — parse and classify version specifiers (pure).
//! 2. **[`risk`]** — score staleness from shape and last update (pure).
//! 3. **[`discovery`]** / **[`history`]** — find packages, releases, metadata,
//!    and last-update instants on disk.
//! 4. **[`audit`]** — run the pipeline over a catalog.
//! 5. **[`record`]** — report data types.
//! 6. **[`output`]** — JSON, CSV, terminal summary, HTML, or [SARIF].
//!
//! [SARIF]: https://sarifweb.azurewebsites.net/

pub mod audit;
pub mod config;
pub mod discovery;
pub mod error;
pub mod history;
pub mod output;
pub mod record;
pub mod risk;
pub mod specifier;
