//! Release pipeline declarations
//!
//! A pipeline is an ordered list of named stages, each holding one or more
//! actions. Stage order is insertion order and is significant: it models the
//! one-way progression of a release (code arrives, code is packaged, package
//! is installed). Nothing here loops, branches, or retries; those are
//! properties of the external pipeline engine.

use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::arn::ArnRef;
use crate::error::{Result, SynthError, require_non_empty};

/// A named handoff between stages
///
/// Each artifact has exactly one producer stage and at most one consumer
/// stage; [`Pipeline::validate`] enforces the linear chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
}

impl Artifact {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Fetch a repository revision through an external source connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceAction {
    pub action_name: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub connection_arn: ArnRef,
    pub output: Artifact,
}

/// Run a build project against an input artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildAction {
    pub action_name: String,
    /// Construct path of the build project that runs this action
    pub project: String,
    pub input: Artifact,
    pub outputs: Vec<Artifact>,
}

/// An atomic unit of work within a stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Action {
    Source(SourceAction),
    Build(BuildAction),
}

impl Action {
    pub fn name(&self) -> &str {
        match self {
            Self::Source(a) => &a.action_name,
            Self::Build(a) => &a.action_name,
        }
    }

    fn outputs(&self) -> &[Artifact] {
        match self {
            Self::Source(a) => std::slice::from_ref(&a.output),
            Self::Build(a) => &a.outputs,
        }
    }

    fn input(&self) -> Option<&Artifact> {
        match self {
            Self::Source(_) => None,
            Self::Build(a) => Some(&a.input),
        }
    }
}

/// A named unit of work within a pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub actions: Vec<Action>,
}

/// An ordered sequence of stages modeling a release process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub pipeline_name: String,
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(pipeline_name: impl Into<String>) -> Result<Self> {
        let pipeline_name = pipeline_name.into();
        require_non_empty("pipeline name", &pipeline_name)?;
        Ok(Self {
            pipeline_name,
            stages: Vec::new(),
        })
    }

    /// Append a stage; stage names must be unique and every stage needs at
    /// least one action
    pub fn add_stage(&mut self, stage: Stage) -> Result<()> {
        require_non_empty("stage name", &stage.name)?;
        if stage.actions.is_empty() {
            return Err(SynthError::validation(format!(
                "stage {} has no actions",
                stage.name
            )));
        }
        if self.stages.iter().any(|s| s.name == stage.name) {
            return Err(SynthError::validation(format!(
                "duplicate stage name: {}",
                stage.name
            )));
        }
        self.stages.push(stage);
        Ok(())
    }

    /// The stages in declaration order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Check the artifact handoff chain is linear: every artifact has one
    /// producer, at most one consumer, and is consumed only by a later stage
    /// than the one that produced it.
    pub fn validate(&self) -> Result<()> {
        let mut produced_in: HashMap<&str, usize> = HashMap::new();
        let mut consumers: HashMap<&str, usize> = HashMap::new();

        for (index, stage) in self.stages.iter().enumerate() {
            for action in &stage.actions {
                if let Some(input) = action.input() {
                    match produced_in.get(input.name.as_str()) {
                        Some(at) if *at < index => {}
                        _ => {
                            return Err(SynthError::validation(format!(
                                "artifact {} consumed in stage {} before any earlier stage produced it",
                                input.name, stage.name
                            )));
                        }
                    }
                    let count = consumers.entry(input.name.as_str()).or_insert(0);
                    *count += 1;
                    if *count > 1 {
                        return Err(SynthError::validation(format!(
                            "artifact {} has more than one consumer",
                            input.name
                        )));
                    }
                }
                for output in action.outputs() {
                    if produced_in.insert(output.name.as_str(), index).is_some() {
                        return Err(SynthError::validation(format!(
                            "artifact {} has more than one producer",
                            output.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub(crate) fn render(&self, ids: &BTreeMap<String, String>) -> Result<Value> {
        let stages = self
            .stages
            .iter()
            .map(|stage| {
                let actions = stage
                    .actions
                    .iter()
                    .map(|action| render_action(action, ids))
                    .collect::<Result<Vec<_>>>()?;
                Ok(json!({ "Name": stage.name, "Actions": actions }))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(json!({
            "Type": "AWS::CodePipeline::Pipeline",
            "Properties": {
                "Name": self.pipeline_name,
                "Stages": stages,
            }
        }))
    }
}

fn render_action(action: &Action, ids: &BTreeMap<String, String>) -> Result<Value> {
    match action {
        Action::Source(a) => Ok(json!({
            "Name": a.action_name,
            "ActionTypeId": {
                "Category": "Source",
                "Owner": "AWS",
                "Provider": "CodeStarSourceConnection",
                "Version": "1",
            },
            "Configuration": {
                "ConnectionArn": a.connection_arn.render(ids)?,
                "FullRepositoryId": format!("{}/{}", a.owner, a.repo),
                "BranchName": a.branch,
            },
            "OutputArtifacts": [{ "Name": a.output.name }],
        })),
        Action::Build(a) => {
            let project_id = ids.get(&a.project).ok_or_else(|| {
                SynthError::validation(format!(
                    "action {} references undeclared build project: {}",
                    a.action_name, a.project
                ))
            })?;
            let outputs: Vec<Value> =
                a.outputs.iter().map(|o| json!({ "Name": o.name })).collect();
            Ok(json!({
                "Name": a.action_name,
                "ActionTypeId": {
                    "Category": "Build",
                    "Owner": "AWS",
                    "Provider": "CodeBuild",
                    "Version": "1",
                },
                "Configuration": { "ProjectName": { "Ref": project_id } },
                "InputArtifacts": [{ "Name": a.input.name }],
                "OutputArtifacts": outputs,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_stage(output: &str) -> Stage {
        Stage {
            name: "Source".to_string(),
            actions: vec![Action::Source(SourceAction {
                action_name: "GitHub_Source".to_string(),
                owner: "acme".to_string(),
                repo: "widgets".to_string(),
                branch: "main".to_string(),
                connection_arn: ArnRef::literal("arn:aws:codeconnections:us-east-1:1:connection/x")
                    .unwrap(),
                output: Artifact::new(output),
            })],
        }
    }

    fn build_stage(name: &str, input: &str, outputs: &[&str]) -> Stage {
        Stage {
            name: name.to_string(),
            actions: vec![Action::Build(BuildAction {
                action_name: name.to_string(),
                project: format!("{name}-project"),
                input: Artifact::new(input),
                outputs: outputs.iter().map(|o| Artifact::new(*o)).collect(),
            })],
        }
    }

    #[test]
    fn test_linear_chain_validates() {
        let mut pipeline = Pipeline::new("widgets-pipeline").unwrap();
        pipeline.add_stage(source_stage("src")).unwrap();
        pipeline.add_stage(build_stage("Build", "src", &["out"])).unwrap();
        pipeline.add_stage(build_stage("Deploy", "out", &[])).unwrap();

        assert!(pipeline.validate().is_ok());
        let names: Vec<_> = pipeline.stages().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Source", "Build", "Deploy"]);
    }

    #[test]
    fn test_duplicate_stage_name_is_rejected() {
        let mut pipeline = Pipeline::new("p").unwrap();
        pipeline.add_stage(source_stage("src")).unwrap();
        let result = pipeline.add_stage(source_stage("src2"));
        assert!(matches!(result, Err(SynthError::Validation(_))));
    }

    #[test]
    fn test_empty_stage_is_rejected() {
        let mut pipeline = Pipeline::new("p").unwrap();
        let result = pipeline.add_stage(Stage {
            name: "Source".to_string(),
            actions: vec![],
        });
        assert!(matches!(result, Err(SynthError::Validation(_))));
    }

    #[test]
    fn test_consume_before_produce_fails_validation() {
        let mut pipeline = Pipeline::new("p").unwrap();
        pipeline.add_stage(source_stage("src")).unwrap();
        pipeline.add_stage(build_stage("Build", "missing", &["out"])).unwrap();

        assert!(matches!(pipeline.validate(), Err(SynthError::Validation(_))));
    }

    #[test]
    fn test_same_stage_handoff_fails_validation() {
        let mut pipeline = Pipeline::new("p").unwrap();
        pipeline.add_stage(source_stage("src")).unwrap();
        let mut stage = build_stage("Build", "src", &["out"]);
        stage.actions.push(Action::Build(BuildAction {
            action_name: "Package".to_string(),
            project: "package-project".to_string(),
            input: Artifact::new("out"),
            outputs: vec![],
        }));
        pipeline.add_stage(stage).unwrap();

        assert!(matches!(pipeline.validate(), Err(SynthError::Validation(_))));
    }

    #[test]
    fn test_double_producer_fails_validation() {
        let mut pipeline = Pipeline::new("p").unwrap();
        pipeline.add_stage(source_stage("src")).unwrap();
        pipeline.add_stage(build_stage("Build", "src", &["src"])).unwrap();

        assert!(matches!(pipeline.validate(), Err(SynthError::Validation(_))));
    }

    #[test]
    fn test_double_consumer_fails_validation() {
        let mut pipeline = Pipeline::new("p").unwrap();
        pipeline.add_stage(source_stage("src")).unwrap();
        pipeline.add_stage(build_stage("Build", "src", &["out"])).unwrap();
        pipeline.add_stage(build_stage("Deploy", "src", &[])).unwrap();

        assert!(matches!(pipeline.validate(), Err(SynthError::Validation(_))));
    }
}
