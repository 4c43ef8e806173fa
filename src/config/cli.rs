use crate::config::toml_config::EtlConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "uni-etl")]
#[command(about = "Scrapes university and course records into two relational tables")]
pub struct CliConfig {
    /// TOML configuration file; the built-in target list is used without it
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override load.output_path
    #[arg(long)]
    pub output_path: Option<String>,

    /// Override filter.target_country
    #[arg(long)]
    pub target_country: Option<String>,

    /// Override filter.min_courses_per_university
    #[arg(long)]
    pub min_courses: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Show what would be fetched without touching the network
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// Loads the TOML file (or the built-in defaults) and applies the
    /// command-line overrides on top.
    pub fn resolve(&self) -> Result<EtlConfig> {
        let mut config = match &self.config {
            Some(path) => EtlConfig::from_file(path)?,
            None => EtlConfig::default(),
        };

        if let Some(output_path) = &self.output_path {
            config.load.output_path = output_path.clone();
        }
        if let Some(country) = &self.target_country {
            config.filter.target_country = country.clone();
        }
        if let Some(min_courses) = self.min_courses {
            config.filter.min_courses_per_university = min_courses;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_defaults() {
        let cli = CliConfig::parse_from([
            "uni-etl",
            "--output-path",
            "/tmp/out",
            "--target-country",
            "United Kingdom",
            "--min-courses",
            "2",
        ]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.load.output_path, "/tmp/out");
        assert_eq!(config.filter.target_country, "United Kingdom");
        assert_eq!(config.filter.min_courses_per_university, 2);
        assert_eq!(config.targets.len(), 6);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let cli = CliConfig::parse_from(["uni-etl", "--config", "/nonexistent/uni-etl.toml"]);
        assert!(cli.resolve().is_err());
    }
}
