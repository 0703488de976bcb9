//! Three-stage release pipeline for a hosted function
//!
//! Given a props record, declares a placeholder function and a fixed
//! Source -> Build -> Deploy pipeline that keeps it updated from a source
//! repository, plus the one permission grant each stage needs. Assembly is
//! pure composition; source-change detection, build execution, and the
//! deploy command all run inside external managed services.

use serde::{Deserialize, Serialize};

use crate::arn::ArnRef;
use crate::duration::Duration;
use crate::error::{Result, require_non_empty};
use crate::resource::Resource;
use crate::resource::buildspec::{BuildPhases, BuildSpec, PhaseCommands};
use crate::resource::function::Function;
use crate::resource::iam::PolicyStatement;
use crate::resource::pipeline::{
    Action, Artifact, BuildAction, Pipeline, SourceAction, Stage,
};
use crate::resource::project::{BuildEnvironment, BuildProject};
use crate::stack::Stack;

/// Connection every source stage uses to reach the repository host
pub const SOURCE_CONNECTION_ARN: &str =
    "arn:aws:codeconnections:us-east-1:939880360164:connection/47eec894-a6e9-4073-b4b3-02efa7dfe6c0";

/// Secret-store id of the repository access token
pub const GITHUB_TOKEN_SECRET_ID: &str = "github-token";

/// Full ARN of the token secret, for the build stage's read grant
pub const GITHUB_TOKEN_SECRET_ARN: &str =
    "arn:aws:secretsmanager:us-east-1:939880360164:secret:github-token-BiIohH";

const HANDLER: &str = "dist/main.handler";

/// Parameters of a [`LambdaPipeline`]
///
/// All fields are required except `timeout`, which falls back to the
/// function default of 30 seconds. `timeout` governs the function's own
/// invocations, not pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaPipelineProps {
    pub region: String,
    pub function_name: String,
    pub github_owner: String,
    pub github_repo: String,
    pub github_branch: String,
    pub timeout: Option<Duration>,
}

/// The composed declarations
///
/// Fields are public so callers can read the identities of the pipeline and
/// the function, e.g. to attach further permissions before mounting.
#[derive(Debug, Clone)]
pub struct LambdaPipeline {
    pub pipeline: Pipeline,
    pub function: Function,
    pub build_project: BuildProject,
    pub deploy_project: BuildProject,
    function_path: String,
    build_project_path: String,
    deploy_project_path: String,
    pipeline_path: String,
}

impl LambdaPipeline {
    pub fn new(props: &LambdaPipelineProps) -> Result<Self> {
        require_non_empty("region", &props.region)?;
        require_non_empty("function name", &props.function_name)?;
        require_non_empty("source owner", &props.github_owner)?;
        require_non_empty("source repository", &props.github_repo)?;
        require_non_empty("source branch", &props.github_branch)?;

        let name = &props.function_name;
        let function_path = format!("{name}/function");
        let build_project_path = format!("{name}/build-project");
        let deploy_project_path = format!("{name}/deploy-project");
        let pipeline_path = format!("{name}/pipeline");

        let function = Function::new(name, HANDLER, props.timeout)?;

        let source_output = Artifact::new(format!("{name}SourceArtifact"));
        let build_output = Artifact::new(format!("{name}BuildArtifact"));

        let mut pipeline = Pipeline::new(format!("{name}-pipeline"))?;
        pipeline.add_stage(Stage {
            name: "Source".to_string(),
            actions: vec![Action::Source(SourceAction {
                action_name: "GitHub_Source".to_string(),
                owner: props.github_owner.clone(),
                repo: props.github_repo.clone(),
                branch: props.github_branch.clone(),
                connection_arn: ArnRef::literal(SOURCE_CONNECTION_ARN)?,
                output: source_output.clone(),
            })],
        })?;

        let mut build_project = BuildProject::new(
            BuildEnvironment::standard_privileged(),
            build_spec(&props.region),
        );
        build_project.add_to_role_policy(PolicyStatement::allow(
            &["secretsmanager:GetSecretValue"],
            vec![ArnRef::literal(GITHUB_TOKEN_SECRET_ARN)?],
        ));
        pipeline.add_stage(Stage {
            name: "Build".to_string(),
            actions: vec![Action::Build(BuildAction {
                action_name: "Build".to_string(),
                project: build_project_path.clone(),
                input: source_output,
                outputs: vec![build_output.clone()],
            })],
        })?;

        let mut deploy_project = BuildProject::new(BuildEnvironment::standard(), deploy_spec())
            .with_env_var("AWS_REGION", &props.region)
            .with_env_var("LAMBDA_NAME", name);
        deploy_project.add_to_role_policy(PolicyStatement::allow(
            &["lambda:UpdateFunctionCode"],
            vec![ArnRef::deferred(&function_path)],
        ));
        pipeline.add_stage(Stage {
            name: "Deploy".to_string(),
            actions: vec![Action::Build(BuildAction {
                action_name: "Deploy".to_string(),
                project: deploy_project_path.clone(),
                input: build_output,
                outputs: vec![],
            })],
        })?;

        Ok(Self {
            pipeline,
            function,
            build_project,
            deploy_project,
            function_path,
            build_project_path,
            deploy_project_path,
            pipeline_path,
        })
    }

    /// Construct path of the function, for grant scoping by callers
    pub fn function_path(&self) -> &str {
        &self.function_path
    }

    /// Mount the composed resources onto `stack`
    pub fn add_to_stack(self, stack: &mut Stack) -> Result<()> {
        stack.add_resource(self.function_path, Resource::Function(self.function))?;
        stack.add_resource(self.build_project_path, Resource::Project(self.build_project))?;
        stack.add_resource(self.deploy_project_path, Resource::Project(self.deploy_project))?;
        stack.add_resource(self.pipeline_path, Resource::Pipeline(self.pipeline))?;
        Ok(())
    }
}

/// Build stage script: fetch the token, route repository access through it,
/// install, build, package
fn build_spec(region: &str) -> BuildSpec {
    let export_token = format!(
        "export GITHUB_TOKEN=$(aws secretsmanager get-secret-value --secret-id {GITHUB_TOKEN_SECRET_ID} --region {region} --query SecretString --output text | jq -r '.\"{GITHUB_TOKEN_SECRET_ID}\"')"
    );
    BuildSpec::new(BuildPhases {
        install: Some(PhaseCommands {
            commands: vec![
                export_token,
                r#"git config --global url."https://$GITHUB_TOKEN@github.com/".insteadOf https://github.com/"#.to_string(),
                r#"git config --global url."https://$GITHUB_TOKEN@github.com/".insteadOf ssh://git@github.com/"#.to_string(),
                "npm install".to_string(),
            ],
        }),
        build: Some(PhaseCommands::new(&[
            "npm run build",
            "zip -r function.zip dist/* node_modules/* package.json",
        ])),
        ..Default::default()
    })
    .with_artifact_files(&["function.zip"])
}

/// Deploy stage script: one update command against the function, driven by
/// the two environment variables the project declares
fn deploy_spec() -> BuildSpec {
    BuildSpec::new(BuildPhases {
        build: Some(PhaseCommands::new(&[
            "aws lambda update-function-code --function-name $LAMBDA_NAME --zip-file fileb://function.zip --region $AWS_REGION",
        ])),
        ..Default::default()
    })
}
