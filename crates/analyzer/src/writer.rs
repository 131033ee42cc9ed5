use bddgen_core::{FeatureFile, NormalizedSpecification, SpecError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }
}

pub struct ArtifactWriter;

impl ArtifactWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write `content` unless the file already holds exactly that.
    /// Returns whether the file was written.
    pub fn write_if_changed(&self, path: &Path, content: &str) -> Result<bool, SpecError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        if path.exists() {
            let existing = fs::read_to_string(path)?;
            if existing == content {
                debug!(path = %path.display(), "unchanged");
                return Ok(false);
            }
        }

        fs::write(path, content)?;
        debug!(path = %path.display(), bytes = content.len(), "written");
        Ok(true)
    }

    /// Emit the normalized specification as `specification.<ext>`
    pub fn write_specification(
        &self,
        output_dir: &Path,
        spec: &NormalizedSpecification,
        format: OutputFormat,
    ) -> Result<PathBuf, SpecError> {
        let content = match format {
            OutputFormat::Yaml => spec.to_yaml()?,
            OutputFormat::Json => {
                let mut json = spec.to_json()?;
                json.push('\n');
                json
            }
        };

        let path = output_dir.join(format!("specification.{}", format.extension()));
        self.write_if_changed(&path, &content)?;
        Ok(path)
    }

    /// Emit `features/<name>.feature` plus step definitions when present
    pub fn write_features(
        &self,
        output_dir: &Path,
        features: &[FeatureFile],
    ) -> Result<Vec<PathBuf>, SpecError> {
        let features_dir = output_dir.join("features");
        let mut written = Vec::with_capacity(features.len());

        for feature in features {
            let file_name = feature.file_name();
            let path = features_dir.join(&file_name);
            self.write_if_changed(&path, &with_trailing_newline(&feature.content))?;
            written.push(path);

            if !feature.step_definitions.trim().is_empty() {
                let stem = file_name.trim_end_matches(".feature");
                let steps_path = features_dir
                    .join("step_definitions")
                    .join(format!("{}_steps.rb", stem));
                self.write_if_changed(
                    &steps_path,
                    &with_trailing_newline(&feature.step_definitions),
                )?;
            }
        }

        Ok(written)
    }
}

fn with_trailing_newline(content: &str) -> String {
    if content.ends_with('\n') {
        content.to_string()
    } else {
        format!("{}\n", content)
    }
}

impl Default for ArtifactWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_if_changed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out.txt");
        let writer = ArtifactWriter::new();

        assert!(writer.write_if_changed(&path, "one").unwrap());
        assert!(!writer.write_if_changed(&path, "one").unwrap());
        assert!(writer.write_if_changed(&path, "two").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn test_write_specification_formats() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new();
        let spec = NormalizedSpecification::default();

        let yaml = writer
            .write_specification(dir.path(), &spec, OutputFormat::Yaml)
            .unwrap();
        assert!(yaml.ends_with("specification.yaml"));
        let parsed =
            NormalizedSpecification::from_yaml(&fs::read_to_string(&yaml).unwrap()).unwrap();
        assert_eq!(parsed, spec);

        let json = writer
            .write_specification(dir.path(), &spec, OutputFormat::Json)
            .unwrap();
        assert!(json.ends_with("specification.json"));
    }

    #[test]
    fn test_write_features_with_steps() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new();
        let mut feature = FeatureFile::new("Book Management", "Feature: Book management");
        feature.step_definitions = "Given(/^a book$/) do\nend".to_string();

        let paths = writer.write_features(dir.path(), &[feature]).unwrap();
        assert_eq!(paths, vec![dir.path().join("features/book_management.feature")]);
        assert_eq!(
            fs::read_to_string(&paths[0]).unwrap(),
            "Feature: Book management\n"
        );
        assert!(dir
            .path()
            .join("features/step_definitions/book_management_steps.rb")
            .exists());
    }
}
