//! Shared API Types for gitrends
//!
//! This crate is the SINGLE SOURCE OF TRUTH for every record crossing the
//! dashboard's HTTP boundary.
//!
//! ```text
//! ┌──────────────────┐         ┌──────────────────┐
//! │  analytics       │  JSON   │  dashboard       │
//! │  backend         │ ──────► │  (egui)          │
//! └──────────────────┘         └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. Data contracts only - no behavior beyond derived values, no egui
//! 2. Tagged enums only: `#[serde(tag = "type")]`
//! 3. Field names match the backend's snake_case JSON

pub mod structure;

use serde::{Deserialize, Serialize};

pub use structure::{Coupling, StructureNode};

// ============================================================================
// ENTRY TYPE
// ============================================================================

/// Whether a query is about individual files or whole modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    #[default]
    File,
    Module,
}

impl EntryType {
    /// Path segment used by the API (`/api/{file|module}/...`)
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::File => "file",
            EntryType::Module => "module",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EntryType::File => "File",
            EntryType::Module => "Module",
        }
    }

    pub fn all() -> &'static [EntryType] {
        &[EntryType::File, EntryType::Module]
    }
}

// ============================================================================
// FLAT METRIC RECORDS
// ============================================================================

/// Hotspot metrics for one file or module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotEntry {
    pub name: String,
    pub num_revisions: u64,
    pub num_code_lines: u64,
    pub total_indent_levels: u64,
}

/// Change coupling between two entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeCouplingEntry {
    pub left_name: String,
    pub right_name: String,
    pub coupled_revisions: u64,
    pub num_left_revisions: u64,
    pub num_right_revisions: u64,
}

impl ChangeCouplingEntry {
    /// Integer mean of both sides' revision counts
    pub fn average_revisions(&self) -> u64 {
        (self.num_left_revisions + self.num_right_revisions) / 2
    }

    /// Share of the average revisions in which both sides changed together.
    ///
    /// Returns 0.0 when neither side has revisions.
    pub fn coupling_ratio(&self) -> f64 {
        let average = self.average_revisions();
        if average == 0 {
            return 0.0;
        }
        self.coupled_revisions as f64 / average as f64
    }
}

/// Ownership of a file or module by its main developer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainDeveloperEntry {
    pub name: String,
    pub main_developer: String,
    pub net_added_lines: u64,
    pub total_net_added_lines: u64,
}

impl MainDeveloperEntry {
    /// Ownership in percent, rounded to one decimal
    pub fn ownership_percent(&self) -> f64 {
        if self.total_net_added_lines == 0 {
            return 0.0;
        }
        let ratio = self.net_added_lines as f64 / self.total_net_added_lines as f64;
        (100.0 * ratio * 10.0).round() / 10.0
    }
}

/// Number of revisions an author made in a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitSpreadEntry {
    pub module_name: String,
    pub author: String,
    pub num_revisions: u64,
}

/// Sum of all coupled revisions of one entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumOfCouplingsEntry {
    pub name: String,
    pub sum_of_couplings: u64,
}

/// A file as listed inside a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleFile {
    pub name: String,
    pub num_code_lines: u64,
    pub total_indent_levels: u64,
}

/// A module and the files it contains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub name: String,
    #[serde(default)]
    pub files: Vec<ModuleFile>,
}

/// One revision of a file, oldest first in a history response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileHistoryEntry {
    pub revision: String,
    /// Commit time, seconds since the Unix epoch
    pub date: i64,
    pub num_code_lines: u64,
    pub num_comment_lines: u64,
    pub num_blank_lines: u64,
    pub total_indent_levels: u64,
    pub avg_indent_levels: f64,
    pub std_indent_level: f64,
}

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
