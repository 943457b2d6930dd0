//! idsnip CLI - Command-line interface library
//!
//! This library provides the CLI functionality for idsnip, including:
//! - Export: Carve a selection out of a package as a standalone IDML file
//! - Orphans / Missing: Report unused and undefined resources
//! - Cleanup: Remove orphaned resource definitions
//! - Validate: Check internal references for dangling targets
//!
//! # Library Usage
//!
//! ```ignore
//! use idsnip_cli::{run_cli, OutputFormat};
//!
//! // Run the full CLI
//! run_cli();
//!
//! // Or use individual commands programmatically
//! export_command(&input, &output, &stories, &frames)?;
//! orphans_command(&input, OutputFormat::Json)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Export one story with everything it needs
//! idsnip export layout.idml --story u100 --output snippet.idml
//!
//! # Report unused resources
//! idsnip orphans layout.idml --format json
//!
//! # Remove them
//! idsnip cleanup layout.idml --apply --output clean.idml
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{
    cleanup_command, export_command, missing_command, new_command, orphans_command,
    validate_command,
};
pub use app::{run_cli, OutputFormat};
