use super::Dialect;
use crate::file_processor::FileMetadata;
use crate::syntax::{BehaviourDescription, MaterialPropertyDescription};
use serde::Serialize;
use std::time::Duration;

/// Model built by the dialect chosen for the file
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "dialect", content = "model")]
pub enum ParsedModel {
    MaterialProperty(MaterialPropertyDescription),
    Behaviour(BehaviourDescription),
}

impl ParsedModel {
    pub fn dialect(&self) -> Dialect {
        match self {
            ParsedModel::MaterialProperty(_) => Dialect::MaterialProperty,
            ParsedModel::Behaviour(_) => Dialect::Behaviour,
        }
    }

    /// Law or behaviour name
    pub fn name(&self) -> &str {
        match self {
            ParsedModel::MaterialProperty(law) => &law.law,
            ParsedModel::Behaviour(behaviour) => &behaviour.name,
        }
    }

    pub fn as_material_property(&self) -> Option<&MaterialPropertyDescription> {
        match self {
            ParsedModel::MaterialProperty(law) => Some(law),
            ParsedModel::Behaviour(_) => None,
        }
    }

    pub fn as_behaviour(&self) -> Option<&BehaviourDescription> {
        match self {
            ParsedModel::Behaviour(behaviour) => Some(behaviour),
            ParsedModel::MaterialProperty(_) => None,
        }
    }
}

/// Wall time spent in each stage
#[derive(Debug, Clone, Copy, Default)]
pub struct StageTimings {
    pub file_processing: Duration,
    pub tokenization: Duration,
    pub analysis: Duration,
    pub total: Duration,
}

#[derive(Debug)]
pub struct PipelineResult {
    pub model: ParsedModel,
    /// None for in-memory sources
    pub file_metadata: Option<FileMetadata>,
    pub token_count: usize,
    pub timings: StageTimings,
}

impl PipelineResult {
    pub fn dialect(&self) -> Dialect {
        self.model.dialect()
    }

    pub fn log_success(&self, file: &str) {
        crate::log_success!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "File analysed",
            "file" => file,
            "dialect" => self.dialect().as_str(),
            "name" => self.model.name(),
            "tokens" => self.token_count,
            "duration_ms" => format!("{:.2}", self.timings.total.as_secs_f64() * 1000.0),
            "analysis_ms" => format!("{:.2}", self.timings.analysis.as_secs_f64() * 1000.0)
        );
    }
}
