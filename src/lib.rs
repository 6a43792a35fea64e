//! Personal knowledge base and agent personas for AI assistants, served over MCP.
//!
//! MCP Instruct is an [MCP](https://modelcontextprotocol.io/) server that keeps a
//! persistent profile of its user so every conversation can start with context.
//! Each profile is one JSON document with four typed categories plus open-ended
//! custom facts:
//!
//! | Category | Holds |
//! |----------|-------|
//! | **personal** | Name, location, languages, timezone, pronouns |
//! | **professional** | Occupation, experience, skills, certifications |
//! | **preferences** | Communication style, detail level, favorite tools |
//! | **projects** | Current projects, technologies, goals, team |
//! | **custom** | Any `(category, key) -> value` fact, with tags |
//!
//! Every change is appended to a bounded history ledger and the whole document is
//! rewritten atomically. A fuzzy search index over all set fields is rebuilt after
//! each save.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`knowledge`]: Document store, field mutators, history ledger, and search
//! - [`persona`]: Markdown agent templates and the active persona
//! - [`onboarding`]: First-run welcome and quick profile setup

pub mod config;
pub mod knowledge;
pub mod onboarding;
pub mod persona;
