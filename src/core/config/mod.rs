use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod loader;
pub mod validation;

pub use loader::ParametersLoader;
pub use validation::ParametersValidator;

/// Per-run decision parameters, loaded from a parameters YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Project (branch) the jobs are generated for
    #[serde(default = "default_project")]
    pub project: String,

    /// Try syntax mode, set when the push came through try
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub try_mode: Option<String>,

    /// SCM level of the project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Any other parameter, readable through [`Parameters::get`]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_project() -> String {
    "mozilla-central".to_string()
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            project: default_project(),
            try_mode: None,
            level: None,
            extra: Map::new(),
        }
    }
}

impl Parameters {
    pub fn for_project<T: Into<String>>(project: T) -> Self {
        Parameters {
            project: project.into(),
            ..Default::default()
        }
    }

    /// Whether this run was triggered from a try push.
    pub fn is_try(&self) -> bool {
        self.project.contains("try") || self.try_mode.is_some()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "project" => Some(Value::String(self.project.clone())),
            "try_mode" => self.try_mode.clone().map(Value::String),
            "level" => self.level.clone().map(Value::String),
            other => self.extra.get(other).cloned(),
        }
    }
}

/// Context handed to every pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformConfig {
    pub kind: String,
    pub params: Parameters,
}

impl TransformConfig {
    pub fn new<T: Into<String>>(kind: T, params: Parameters) -> Self {
        TransformConfig {
            kind: kind.into(),
            params,
        }
    }

    /// Run-level attributes available to keyed-by resolution besides the record's own fields.
    pub fn keyed_by_attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();
        attributes.insert(
            "project".to_string(),
            Value::String(self.params.project.clone()),
        );
        attributes
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        TransformConfig::new("raptor", Parameters::default())
    }
}
