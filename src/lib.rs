//! taskwatch — markdown vault task monitor with Telegram reminders.
//!
//! Watches a directory tree of markdown notes, extracts checkbox task
//! lines with their inline annotations (dates, complexity, tomato
//! duration, reminder times), keeps an in-memory task index in sync
//! with filesystem changes, and fires each due reminder at most once
//! per process lifetime.

pub mod config;
pub mod error;
pub mod index;
pub mod monitor;
pub mod parser;
pub mod scanner;
pub mod scheduler;
pub mod state;
pub mod summary;
pub mod telegram;
pub mod templates;
pub mod types;
pub mod watcher;
