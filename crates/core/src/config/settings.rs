use crate::{
    error::{Error, Result},
    models::DefaultSignatureStrategy,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".mocksmith.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GeneratorConfig {
    /// Text written at the top of the output file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Doc comment marker selecting the protocols to mock
    pub annotation: String,
    /// Files processed at once; `None` runs sequentially
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
    pub custom_imports: Vec<String>,
    pub excluded_imports: Vec<String>,
    /// Modules imported with `@testable`
    pub testable_imports: Vec<String>,
    pub mock_final: bool,
    pub signature: DefaultSignatureStrategy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            header: None,
            annotation: "@mockable".to_string(),
            max_concurrency: None,
            custom_imports: Vec::new(),
            excluded_imports: Vec::new(),
            testable_imports: Vec::new(),
            mock_final: false,
            signature: DefaultSignatureStrategy::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == Some(0) {
            return Err(Error::ConfigError(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.signature.max_type_len == 0 {
            return Err(Error::ConfigError(
                "signature.max_type_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }

            current = current.parent()?;
        }
    }
}
