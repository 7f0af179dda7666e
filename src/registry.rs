//! Template registry loading and resolution.
//!
//! The registry is a YAML document mapping template names to the pair of
//! repositories each template is built from:
//!
//! ```yaml
//! basic-java:
//!   application: https://github.com/clouduct/seed-java-basic
//!   infrastructure: https://github.com/clouduct/infra-java-basic
//! ```
//!
//! The document can live on disk or behind an HTTP endpoint; either way the
//! generation pipeline only ever sees a single resolved [`Template`].

use crate::error::{CloudError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A pair of source repositories describing one project template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Template {
    /// Repository holding the application skeleton.
    pub application: String,
    /// Repository holding the matching infrastructure skeleton.
    pub infrastructure: String,
}

/// Named templates parsed from a clouduct-templates YAML document.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
}

impl TemplateRegistry {
    /// Load a registry from a path or URL.
    ///
    /// `source` may be a filesystem path, a `file:` URL, or an `http(s):`
    /// URL.
    pub fn load(source: &str) -> Result<Self> {
        if let Some(path) = source.strip_prefix("file://") {
            Self::load_file(Path::new(path))
        } else if source.starts_with("http://") || source.starts_with("https://") {
            Self::load_url(source)
        } else {
            Self::load_file(Path::new(source))
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CloudError::UserError(format!(
                "failed to read templates config '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    fn load_url(url: &str) -> Result<Self> {
        let response = reqwest::blocking::get(url).map_err(|e| {
            CloudError::UserError(format!("failed to fetch templates config '{}': {}", url, e))
        })?;

        if !response.status().is_success() {
            return Err(CloudError::UserError(format!(
                "failed to fetch templates config '{}': HTTP {}",
                url,
                response.status()
            )));
        }

        let content = response.text().map_err(|e| {
            CloudError::UserError(format!("failed to read templates config '{}': {}", url, e))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse a registry from a YAML string.
    ///
    /// A document with no templates is rejected outright; every loaded
    /// registry is guaranteed non-empty.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let templates: BTreeMap<String, Template> = serde_yaml::from_str(yaml)
            .map_err(|e| CloudError::UserError(format!("failed to parse templates config: {}", e)))?;

        if templates.is_empty() {
            return Err(CloudError::UserError(
                "templates config contains no templates".to_string(),
            ));
        }

        Ok(Self { templates })
    }

    /// Resolve a template by name.
    ///
    /// With no name, a registry holding exactly one template resolves to
    /// that template; otherwise the caller must pick one of [`names`].
    ///
    /// [`names`]: TemplateRegistry::names
    pub fn resolve(&self, name: Option<&str>) -> Result<&Template> {
        match name {
            Some(name) => self.templates.get(name).ok_or_else(|| {
                CloudError::UserError(format!(
                    "unknown template '{}'. Available templates: {}",
                    name,
                    self.names().join(", ")
                ))
            }),
            None => {
                let mut values = self.templates.values();
                match (values.next(), values.next()) {
                    (Some(template), None) => Ok(template),
                    (None, _) => Err(CloudError::UserError(
                        "templates config contains no templates".to_string(),
                    )),
                    _ => Err(CloudError::UserError(format!(
                        "more than one template is available, pick one with --template: {}",
                        self.names().join(", ")
                    ))),
                }
            }
        }
    }

    /// Names of all registered templates, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// Iterate templates in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Template)> {
        self.templates.iter().map(|(name, t)| (name.as_str(), t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TWO_TEMPLATES: &str = "\
basic-java:
  application: https://github.com/clouduct/seed-java-basic
  infrastructure: https://github.com/clouduct/infra-java-basic
basic-python:
  application: https://github.com/clouduct/seed-python-basic
  infrastructure: https://github.com/clouduct/infra-python-basic
";

    const ONE_TEMPLATE: &str = "\
basic-java:
  application: https://github.com/clouduct/seed-java-basic
  infrastructure: https://github.com/clouduct/infra-java-basic
";

    #[test]
    fn from_yaml_parses_templates() {
        let registry = TemplateRegistry::from_yaml(TWO_TEMPLATES).unwrap();
        assert_eq!(registry.names(), vec!["basic-java", "basic-python"]);

        let template = registry.resolve(Some("basic-java")).unwrap();
        assert_eq!(
            template.application,
            "https://github.com/clouduct/seed-java-basic"
        );
        assert_eq!(
            template.infrastructure,
            "https://github.com/clouduct/infra-java-basic"
        );
    }

    #[test]
    fn from_yaml_rejects_empty_document() {
        let result = TemplateRegistry::from_yaml("{}");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("no templates"));
    }

    #[test]
    fn from_yaml_rejects_malformed_document() {
        let result = TemplateRegistry::from_yaml("basic-java: just-a-string\n");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, CloudError::UserError(_)));
    }

    #[test]
    fn resolve_without_name_uses_sole_template() {
        let registry = TemplateRegistry::from_yaml(ONE_TEMPLATE).unwrap();
        let template = registry.resolve(None).unwrap();
        assert_eq!(
            template.application,
            "https://github.com/clouduct/seed-java-basic"
        );
    }

    #[test]
    fn resolve_without_name_fails_for_multiple_templates() {
        let registry = TemplateRegistry::from_yaml(TWO_TEMPLATES).unwrap();
        let err = registry.resolve(None).unwrap_err();
        assert!(err.to_string().contains("--template"));
        assert!(err.to_string().contains("basic-java"));
        assert!(err.to_string().contains("basic-python"));
    }

    #[test]
    fn resolve_unknown_name_lists_available_templates() {
        let registry = TemplateRegistry::from_yaml(TWO_TEMPLATES).unwrap();
        let err = registry.resolve(Some("basic-rust")).unwrap_err();
        assert!(err.to_string().contains("unknown template 'basic-rust'"));
        assert!(err.to_string().contains("basic-java"));
    }

    #[test]
    fn load_reads_plain_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("clouduct-templates.yaml");
        std::fs::write(&path, ONE_TEMPLATE).unwrap();

        let registry = TemplateRegistry::load(&path.to_string_lossy()).unwrap();
        assert_eq!(registry.names(), vec!["basic-java"]);
    }

    #[test]
    fn load_reads_file_url() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("clouduct-templates.yaml");
        std::fs::write(&path, ONE_TEMPLATE).unwrap();

        let source = format!("file://{}", path.display());
        let registry = TemplateRegistry::load(&source).unwrap();
        assert_eq!(registry.names(), vec!["basic-java"]);
    }

    #[test]
    fn load_missing_file_is_a_user_error() {
        let result = TemplateRegistry::load("/nonexistent/clouduct-templates.yaml");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, CloudError::UserError(_)));
        assert!(err.to_string().contains("clouduct-templates.yaml"));
    }

    #[test]
    fn iter_yields_templates_in_name_order() {
        let registry = TemplateRegistry::from_yaml(TWO_TEMPLATES).unwrap();
        let names: Vec<&str> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["basic-java", "basic-python"]);
    }
}
