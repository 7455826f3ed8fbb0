use std::path::PathBuf;

/// Dataset loaded at startup when no path is given on the command line.
pub const DEFAULT_DATA_PATH: &str = "penguins.csv";

/// Inline dashboard settings. Only the dataset path can be overridden (first
/// command-line argument); everything else is fixed here.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub title: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    pub data_path: PathBuf,
    pub github_url: String,
    /// Initial value of every bin-count input.
    pub default_bins: u32,
    /// Rows per page in the data grid.
    pub grid_page_size: usize,
    /// Seed for the synthetic histogram; `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Interactive Data Visualizations".to_string(),
            window_size: [1400.0, 900.0],
            min_window_size: [800.0, 500.0],
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            github_url: "https://github.com/s-golla/cintel-02-data".to_string(),
            default_bins: 20,
            grid_page_size: 25,
            rng_seed: None,
        }
    }
}

impl DashboardConfig {
    /// Defaults, with the dataset path taken from the first argument if any.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = args.next() {
            config.data_path = PathBuf::from(path);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args() {
        let config = DashboardConfig::from_args(std::iter::empty());
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.default_bins, 20);

        let config = DashboardConfig::from_args(["data/p.parquet".to_string()].into_iter());
        assert_eq!(config.data_path, PathBuf::from("data/p.parquet"));
    }
}
