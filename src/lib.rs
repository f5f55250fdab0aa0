//! Tabshare - CLI tool for sharing page titles and URLs through
//! configurable pre-processing rules.
//!
//! This library provides the core functionality for tabshare, including:
//! - Configuration file parsing and cascade discovery
//! - Host matching and rule selection
//! - The transform registry and pre-processing pipeline
//! - Share-intent URL composition
//!
//! # Example
//!
//! ```no_run
//! use tabshare_cli::config::load_merged_config;
//! use tabshare_cli::page::PageValue;
//! use tabshare_cli::pipeline;
//! use tabshare_cli::rules::{MatchContext, compile_rules, select_applicable};
//!
//! let cwd = std::env::current_dir().unwrap();
//! let config = load_merged_config(&cwd).unwrap();
//! let rules = compile_rules(&config).unwrap();
//!
//! let value = PageValue::parse("Example", "https://example.com/p?q=1").unwrap();
//! let page_host = value.host().to_string();
//!
//! let ctx = MatchContext {
//!     page_host: &page_host,
//!     share_host: "twitter.com",
//! };
//!
//! let applicable = select_applicable(&rules, &ctx);
//! let shared = pipeline::run(value, &applicable).unwrap();
//! println!("{}", shared.text);
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod page;
pub mod pipeline;
pub mod rules;
pub mod transforms;

pub use error::{Result, ShareError};
pub use page::PageValue;
