//! File-backed vocabulary sink: an in-memory model plus a staged `.ecore`
//! write on save, so a mid-run failure leaves no committed output.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::ecore;
use crate::model::{Association, Entity, EnumType, Vocabulary, VocabularySink};
use crate::VocabError;

pub struct EcoreFileSink {
    vocabulary: Vocabulary,
    output_path: PathBuf,
    config: EngineConfig,
}

impl EcoreFileSink {
    pub fn new(name: impl Into<String>, output_path: impl Into<PathBuf>, config: EngineConfig) -> Self {
        if let Some(home) = &config.home {
            debug!(home = %home.display(), "rules engine home configured");
        }
        Self {
            vocabulary: Vocabulary::new(name),
            output_path: output_path.into(),
            config,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    fn staging_dir(&self) -> PathBuf {
        if let Some(work_dir) = &self.config.work_dir {
            return work_dir.clone();
        }
        self.output_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl VocabularySink for EcoreFileSink {
    fn add_enum_type(&mut self, enum_type: EnumType) -> Result<(), VocabError> {
        self.vocabulary.add_enum_type(enum_type)
    }

    fn add_entity(&mut self, entity: Entity) -> Result<(), VocabError> {
        self.vocabulary.add_entity(entity)
    }

    fn has_entity(&self, name: &str) -> bool {
        self.vocabulary.has_entity(name)
    }

    fn has_association(&self, entity: &str, role: &str) -> bool {
        self.vocabulary.has_association(entity, role)
    }

    fn add_association(&mut self, association: Association) -> Result<(), VocabError> {
        self.vocabulary.add_association(association)
    }

    fn set_entity_identity(&mut self, entity: &str, property: &str) -> Result<(), VocabError> {
        self.vocabulary.set_entity_identity(entity, property)
    }

    fn save(&mut self) -> Result<(), VocabError> {
        let xml = ecore::to_xml(&self.vocabulary)?;
        let mut staged = tempfile::NamedTempFile::new_in(self.staging_dir())?;
        staged.write_all(xml.as_bytes())?;
        staged
            .persist(&self.output_path)
            .map_err(|e| VocabError::Io(e.error))?;
        info!(path = %self.output_path.display(), "vocabulary model written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn save_writes_the_serialized_model() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("sample.ecore");
        let mut sink = EcoreFileSink::new("sample", &output, EngineConfig::default());
        sink.add_entity(Entity::new("Kid")).unwrap();
        sink.save().unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains(r#"name="Kid""#));
        assert_eq!(written, ecore::to_xml(sink.vocabulary()).unwrap());
    }

    #[test]
    fn no_file_is_committed_before_save() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("sample.ecore");
        let mut sink = EcoreFileSink::new("sample", &output, EngineConfig::default());
        sink.add_entity(Entity::new("Kid")).unwrap();
        assert!(!output.exists());
        // A rejected registration leaves nothing on disk either.
        assert!(sink.add_entity(Entity::new("Kid")).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn failed_save_leaves_no_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing").join("sample.ecore");
        let mut sink = EcoreFileSink::new("sample", &output, EngineConfig::default());
        assert!(sink.save().is_err());
        assert!(!output.exists());
    }

    #[test]
    fn staging_honors_configured_work_dir() {
        let work = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let output = out.path().join("sample.ecore");
        let config = EngineConfig {
            home: None,
            work_dir: Some(work.path().to_path_buf()),
        };
        let mut sink = EcoreFileSink::new("sample", &output, config);
        sink.save().unwrap();
        assert!(output.exists());
    }
}
