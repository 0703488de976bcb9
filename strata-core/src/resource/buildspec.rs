//! Build-spec documents
//!
//! The declarative script document handed to the managed build runner. The
//! runner executes phases in a fixed order (install, pre_build, build,
//! post_build), so phases are fixed struct fields rather than a map; the
//! serialized field order matches execution order.

use serde::{Deserialize, Serialize};

/// Command list for one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCommands {
    pub commands: Vec<String>,
}

impl PhaseCommands {
    pub fn new(commands: &[&str]) -> Self {
        Self {
            commands: commands.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// The fixed phase slots of a build spec
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPhases {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install: Option<PhaseCommands>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_build: Option<PhaseCommands>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<PhaseCommands>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_build: Option<PhaseCommands>,
}

/// Files the build hands to the next stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildArtifacts {
    pub files: Vec<String>,
}

/// A complete build-spec document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSpec {
    pub version: String,
    pub phases: BuildPhases,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<BuildArtifacts>,
}

impl BuildSpec {
    pub fn new(phases: BuildPhases) -> Self {
        Self {
            version: "0.2".to_string(),
            phases,
            artifacts: None,
        }
    }

    /// Declare the files the build exports as its artifact
    pub fn with_artifact_files(mut self, files: &[&str]) -> Self {
        self.artifacts = Some(BuildArtifacts {
            files: files.iter().map(|f| f.to_string()).collect(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_serialize_in_execution_order() {
        let spec = BuildSpec::new(BuildPhases {
            install: Some(PhaseCommands::new(&["npm install"])),
            build: Some(PhaseCommands::new(&["npm run build"])),
            ..Default::default()
        })
        .with_artifact_files(&["function.zip"]);

        let json = serde_json::to_string(&spec).unwrap();
        let install_at = json.find("install").unwrap();
        let build_at = json.find("build\"").unwrap();
        assert!(install_at < build_at);
        assert!(json.contains("\"version\":\"0.2\""));
        assert!(json.contains("function.zip"));
    }

    #[test]
    fn test_empty_phases_are_omitted() {
        let spec = BuildSpec::new(BuildPhases {
            build: Some(PhaseCommands::new(&["make"])),
            ..Default::default()
        });

        let json = serde_json::to_value(&spec).unwrap();
        assert!(json["phases"].get("install").is_none());
        assert!(json.get("artifacts").is_none());
    }
}
