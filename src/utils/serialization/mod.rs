use crate::core::types::OutputFormat;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

pub trait Serializer {
    fn serialize<T: Serialize>(&self, data: &T) -> Result<Vec<u8>>;
}

/// Pretty-printed JSON terminated by a newline.
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize<T: Serialize>(&self, data: &T) -> Result<Vec<u8>> {
        let mut content = serde_json::to_vec_pretty(data)?;
        content.push(b'\n');
        Ok(content)
    }
}

pub struct YamlSerializer;

impl Serializer for YamlSerializer {
    fn serialize<T: Serialize>(&self, data: &T) -> Result<Vec<u8>> {
        Ok(serde_yaml::to_string(data)?.into_bytes())
    }
}

/// Serialize `data` in the requested output format.
pub fn serialize_as<T: Serialize>(format: OutputFormat, data: &T) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Json => JsonSerializer.serialize(data),
        OutputFormat::Yaml => YamlSerializer.serialize(data),
    }
}

pub struct FileUtils;

impl FileUtils {
    /// Write already-serialized content, creating parent directories as needed.
    pub fn write_bytes(&self, path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let mut file = fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(content)?;
        Ok(())
    }
}
