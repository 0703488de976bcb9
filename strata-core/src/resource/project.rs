//! Managed build-project records
//!
//! A build project is the unit the Build and Deploy stages run: an
//! environment image, an optional set of environment variables, a build
//! spec, and the policy statements its role needs. The project never
//! executes here; it is rendered into the template and run by the managed
//! build service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::Result;
use crate::resource::buildspec::BuildSpec;
use crate::resource::iam::PolicyStatement;

/// Image identifier for the standard managed build environment
pub const STANDARD_IMAGE_7_0: &str = "aws/codebuild/standard:7.0";

/// Execution environment of a build project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEnvironment {
    pub image: String,
    pub privileged: bool,
}

impl BuildEnvironment {
    /// The standard image without privileged mode
    pub fn standard() -> Self {
        Self {
            image: STANDARD_IMAGE_7_0.to_string(),
            privileged: false,
        }
    }

    /// The standard image with privileged mode enabled
    pub fn standard_privileged() -> Self {
        Self {
            privileged: true,
            ..Self::standard()
        }
    }
}

/// A named environment variable passed to the build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

/// A managed build-project declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildProject {
    pub environment: BuildEnvironment,
    pub environment_variables: Vec<EnvVar>,
    pub build_spec: BuildSpec,
    pub policy: Vec<PolicyStatement>,
}

impl BuildProject {
    pub fn new(environment: BuildEnvironment, build_spec: BuildSpec) -> Self {
        Self {
            environment,
            environment_variables: Vec::new(),
            build_spec,
            policy: Vec::new(),
        }
    }

    /// Add an environment variable visible to the build script
    pub fn with_env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment_variables.push(EnvVar {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a statement to the project role's policy
    pub fn add_to_role_policy(&mut self, statement: PolicyStatement) {
        self.policy.push(statement);
    }

    /// Render the project resource; `role_id` is the logical id of the role
    /// rendered by [`render_role`](Self::render_role)
    pub(crate) fn render(&self, role_id: &str) -> Result<Value> {
        let env_vars: Vec<Value> = self
            .environment_variables
            .iter()
            .map(|v| json!({ "Name": v.name, "Value": v.value }))
            .collect();
        let build_spec = serde_json::to_string(&self.build_spec)
            .map_err(|e| crate::SynthError::validation(format!("unserializable build spec: {e}")))?;

        Ok(json!({
            "Type": "AWS::CodeBuild::Project",
            "Properties": {
                "Environment": {
                    "Type": "LINUX_CONTAINER",
                    "ComputeType": "BUILD_GENERAL1_SMALL",
                    "Image": self.environment.image,
                    "PrivilegedMode": self.environment.privileged,
                    "EnvironmentVariables": env_vars,
                },
                "ServiceRole": { "Fn::GetAtt": [role_id, "Arn"] },
                "Source": { "Type": "CODEPIPELINE", "BuildSpec": build_spec },
                "Artifacts": { "Type": "CODEPIPELINE" },
            }
        }))
    }

    /// Render the project's role with its inline policy statements
    pub(crate) fn render_role(&self, ids: &BTreeMap<String, String>) -> Result<Value> {
        let statements = self
            .policy
            .iter()
            .map(|s| s.render(ids))
            .collect::<Result<Vec<_>>>()?;

        let mut properties = json!({
            "AssumeRolePolicyDocument": {
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": { "Service": "codebuild.amazonaws.com" },
                    "Action": "sts:AssumeRole",
                }],
            },
        });
        if !statements.is_empty() {
            properties["Policies"] = json!([{
                "PolicyName": "default",
                "PolicyDocument": { "Version": "2012-10-17", "Statement": statements },
            }]);
        }

        Ok(json!({ "Type": "AWS::IAM::Role", "Properties": properties }))
    }
}
