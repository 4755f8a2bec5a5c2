//! Dashboard configuration
//!
//! Every value has a built-in default, can be set through a `GITRENDS_*`
//! environment variable (a `.env` file is loaded first), and can be
//! overridden on the command line.

use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9000";

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "gitrends")]
#[command(about = "Dashboard for gitrends git analytics")]
pub struct AppConfig {
    /// Base URL of the analytics API
    #[arg(long, env = "GITRENDS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Rows fetched for the hotspots table
    #[arg(long, env = "GITRENDS_HOTSPOTS_MAX_ENTRIES", default_value_t = 100)]
    pub hotspots_max_entries: usize,

    /// Rows fetched for the change coupling table
    #[arg(long, env = "GITRENDS_CHANGE_COUPLING_MAX_ENTRIES", default_value_t = 100)]
    pub change_coupling_max_entries: usize,

    /// Rows fetched for the main developer table
    #[arg(long, env = "GITRENDS_MAIN_DEVELOPER_MAX_ENTRIES", default_value_t = 100)]
    pub main_developer_max_entries: usize,

    /// Developers named in the main developer histogram
    #[arg(long, env = "GITRENDS_MAIN_DEVELOPER_HISTOGRAM_MAX_DEVELOPERS", default_value_t = 9)]
    pub main_developer_histogram_max_developers: usize,

    /// Developers colored in the main developer structure
    #[arg(long, env = "GITRENDS_MAIN_DEVELOPER_STRUCTURE_MAX_DEVELOPERS", default_value_t = 9)]
    pub main_developer_structure_max_developers: usize,

    /// Authors named per module in the commit spread
    #[arg(long, env = "GITRENDS_COMMIT_SPREAD_MAX_AUTHORS", default_value_t = 13)]
    pub commit_spread_max_authors: usize,

    /// Modules with fewer commits are left out of the commit spread
    #[arg(long, env = "GITRENDS_COMMIT_SPREAD_MIN_MODULE_COMMITS", default_value_t = 10)]
    pub commit_spread_min_module_commits: u64,

    /// Minimum coupled revisions for a coupling edge
    #[arg(long, env = "GITRENDS_COUPLING_MIN_COUPLED_REVISIONS", default_value_t = 15)]
    pub coupling_min_coupled_revisions: u64,

    /// Minimum coupling ratio for a coupling edge
    #[arg(long, env = "GITRENDS_COUPLING_MIN_RATIO", default_value_t = 0.2)]
    pub coupling_min_ratio: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            hotspots_max_entries: 100,
            change_coupling_max_entries: 100,
            main_developer_max_entries: 100,
            main_developer_histogram_max_developers: 9,
            main_developer_structure_max_developers: 9,
            commit_spread_max_authors: 13,
            commit_spread_min_module_commits: 10,
            coupling_min_coupled_revisions: 15,
            coupling_min_ratio: 0.2,
        }
    }
}

impl AppConfig {
    pub fn coupling_filter(&self) -> gitrends_graph::CouplingFilter {
        gitrends_graph::CouplingFilter {
            min_coupled_revisions: self.coupling_min_coupled_revisions,
            min_ratio: self.coupling_min_ratio,
        }
    }
}
