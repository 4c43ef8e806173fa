use crate::domain::model::UniversityTarget;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_BASE_URL: &str = "https://www.topuniversities.com";
const DEFAULT_OUTPUT_FILENAME: &str = "university_courses.zip";

const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
];

const DEFAULT_TARGETS: &[(&str, &str)] = &[
    (
        "university-hyderabad",
        "https://en.wikipedia.org/wiki/University_of_Hyderabad",
    ),
    (
        "osmania-university",
        "https://en.wikipedia.org/wiki/Osmania_University",
    ),
    (
        "university-madras",
        "https://en.wikipedia.org/wiki/University_of_Madras",
    ),
    (
        "national-institute-technology-warangal",
        "https://en.wikipedia.org/wiki/National_Institute_of_Technology,_Warangal",
    ),
    (
        "national-institute-technology-calicut",
        "https://en.wikipedia.org/wiki/National_Institute_of_Technology_Calicut",
    ),
    (
        "indian-institute-technology-mandi",
        "https://en.wikipedia.org/wiki/Indian_Institute_of_Technology_Mandi",
    ),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    pub source: SourceConfig,
    pub filter: FilterConfig,
    pub http: HttpConfig,
    pub load: LoadConfig,
    pub targets: Vec<UniversityTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub target_country: String,
    pub min_courses_per_university: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub retries: u32,
    pub timeout_seconds: u64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_ms: u64,
    pub user_agents: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub output_path: String,
    pub filename: String,
}

fn default_targets() -> Vec<UniversityTarget> {
    DEFAULT_TARGETS
        .iter()
        .map(|(slug, url)| UniversityTarget {
            slug: slug.to_string(),
            encyclopedia_url: url.to_string(),
        })
        .collect()
}

/// The built-in configuration: six Indian universities.
impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            filter: FilterConfig::default(),
            http: HttpConfig::default(),
            load: LoadConfig::default(),
            targets: default_targets(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            target_country: "India".to_string(),
            min_courses_per_university: 5,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            timeout_seconds: 30,
            min_delay_ms: 800,
            max_delay_ms: 1800,
            backoff_ms: 600,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            filename: DEFAULT_OUTPUT_FILENAME.to_string(),
        }
    }
}

impl EtlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.base_url", &self.source.base_url)?;
        validation::validate_non_empty_string("filter.target_country", &self.filter.target_country)?;
        validation::validate_positive_number(
            "filter.min_courses_per_university",
            self.filter.min_courses_per_university,
            1,
        )?;
        validation::validate_positive_number("http.retries", self.http.retries as usize, 1)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_non_empty_string("load.filename", &self.load.filename)?;

        if self.http.min_delay_ms > self.http.max_delay_ms {
            return Err(EtlError::InvalidConfigValueError {
                field: "http.min_delay_ms".to_string(),
                value: self.http.min_delay_ms.to_string(),
                reason: format!("must not exceed http.max_delay_ms ({})", self.http.max_delay_ms),
            });
        }

        if self.targets.is_empty() {
            return Err(EtlError::MissingTargets);
        }
        for target in &self.targets {
            validation::validate_slug("targets.slug", &target.slug)?;
            validation::validate_url("targets.encyclopedia_url", &target.encyclopedia_url)?;
        }

        Ok(())
    }
}

impl ConfigProvider for EtlConfig {
    fn base_url(&self) -> &str {
        &self.source.base_url
    }

    fn targets(&self) -> &[UniversityTarget] {
        &self.targets
    }

    fn target_country(&self) -> &str {
        &self.filter.target_country
    }

    fn min_courses_per_university(&self) -> usize {
        self.filter.min_courses_per_university
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_filename(&self) -> &str {
        &self.load.filename
    }
}

impl Validate for EtlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
