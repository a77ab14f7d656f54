use super::SheafConfig;
use crate::error::ConfigError;
use std::path::Path;

impl SheafConfig {
    /// Check values the type system can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "maxWorkers".to_string(),
                value: "0".to_string(),
                hint: "Use at least 1, or set \"fork\": false to minify in-process".to_string(),
            });
        }

        for (field, name) in [
            ("bundleNames.client", &self.bundle_names.client),
            ("bundleNames.admin", &self.bundle_names.admin),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: field.to_string(),
                    hint: "Each target needs an output file name".to_string(),
                });
            }
            if Path::new(name).components().count() != 1 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: name.clone(),
                    hint: "Bundle names are plain file names inside buildDir".to_string(),
                });
            }
        }

        if self.bundle_names.client == self.bundle_names.admin {
            return Err(ConfigError::ConflictingOptions(format!(
                "both targets would write '{}'",
                self.bundle_names.client
            )));
        }

        if let Some(scripts) = &self.scripts {
            for module in &scripts.modules {
                let name = Path::new(&module.registered_name);
                if module.registered_name.is_empty() || name.is_absolute() || name.has_root() {
                    return Err(ConfigError::InvalidValue {
                        field: "scripts.modules.registeredName".to_string(),
                        value: module.registered_name.clone(),
                        hint: "Vendor module names are relative to the modules root".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
