//! Stacks and synthesis
//!
//! A stack is a named, independently provisioned collection of resource
//! declarations, each mounted at a construct path. Synthesis assigns
//! logical ids (sanitized path plus a sha256 suffix keyed by stack name, so
//! parallel regional stacks never share ids), validates the declarations,
//! and renders a [`Template`].

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::error::{Result, SynthError, require_non_empty};
use crate::resource::Resource;
use crate::template::Template;

/// A named, independently provisioned collection of resources
#[derive(Debug, Clone)]
pub struct Stack {
    pub name: String,
    pub region: String,
    resources: Vec<(String, Resource)>,
}

impl Stack {
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let region = region.into();
        require_non_empty("stack name", &name)?;
        require_non_empty("region", &region)?;
        Ok(Self {
            name,
            region,
            resources: Vec::new(),
        })
    }

    /// Mount a resource at `path`; paths must be unique within the stack
    pub fn add_resource(&mut self, path: impl Into<String>, resource: Resource) -> Result<()> {
        let path = path.into();
        require_non_empty("construct path", &path)?;
        if self.resources.iter().any(|(p, _)| *p == path) {
            return Err(SynthError::validation(format!(
                "duplicate construct path: {path}"
            )));
        }
        self.resources.push((path, resource));
        Ok(())
    }

    /// The mounted resources in declaration order
    pub fn resources(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.resources.iter().map(|(p, r)| (p.as_str(), r))
    }

    /// Logical id for the resource at `path`
    ///
    /// The suffix hashes the stack name together with the path, which keeps
    /// ids stable across synth runs and distinct across stacks.
    pub fn logical_id(&self, path: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        hasher.update(b"/");
        hasher.update(path.as_bytes());
        let digest = hasher.finalize();
        let suffix: String = digest[..4].iter().map(|b| format!("{b:02X}")).collect();
        let base: String = path.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        format!("{base}{suffix}")
    }

    /// Validate the declarations and render the stack to a template
    pub fn synth(&self) -> Result<Template> {
        // Projects claim an implicit `<path>/role` id; a declared resource
        // mounted there would shadow it, so any collision is an error.
        let mut ids: BTreeMap<String, String> = BTreeMap::new();
        for (path, resource) in &self.resources {
            if ids.insert(path.clone(), self.logical_id(path)).is_some() {
                return Err(SynthError::validation(format!(
                    "logical id collision at construct path: {path}"
                )));
            }
            if let Resource::Project(_) = resource {
                let role_path = format!("{path}/role");
                if ids.insert(role_path.clone(), self.logical_id(&role_path)).is_some() {
                    return Err(SynthError::validation(format!(
                        "logical id collision at construct path: {role_path}"
                    )));
                }
            }
        }

        // Build actions may only point at declared projects.
        for (_, resource) in &self.resources {
            if let Resource::Pipeline(pipeline) = resource {
                pipeline.validate()?;
                for stage in pipeline.stages() {
                    for action in &stage.actions {
                        if let crate::resource::pipeline::Action::Build(build) = action {
                            let target = self
                                .resources
                                .iter()
                                .find(|(p, _)| *p == build.project);
                            match target {
                                Some((_, Resource::Project(_))) => {}
                                _ => {
                                    return Err(SynthError::validation(format!(
                                        "action {} references undeclared build project: {}",
                                        build.action_name, build.project
                                    )));
                                }
                            }
                        }
                    }
                }
            }
        }

        let mut template = Template::new(Some(format!("{} ({})", self.name, self.region)));
        for (path, resource) in &self.resources {
            let logical_id = ids[path].clone();
            let rendered = match resource {
                Resource::Function(function) => function.render(),
                Resource::Table(table) => table.render(),
                Resource::Project(project) => {
                    let role_path = format!("{path}/role");
                    let role_id = ids[&role_path].clone();
                    template.resources.insert(role_id.clone(), project.render_role(&ids)?);
                    project.render(&role_id)?
                }
                Resource::Pipeline(pipeline) => pipeline.render(&ids)?,
            };
            template.resources.insert(logical_id, rendered);
        }
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::Duration;
    use crate::resource::function::Function;

    fn function() -> Resource {
        Resource::Function(Function::new("DdcLambda", "dist/main.handler", None).unwrap())
    }

    fn project() -> Resource {
        use crate::resource::buildspec::{BuildPhases, BuildSpec, PhaseCommands};
        use crate::resource::project::{BuildEnvironment, BuildProject};

        Resource::Project(BuildProject::new(
            BuildEnvironment::standard(),
            BuildSpec::new(BuildPhases {
                build: Some(PhaseCommands::new(&["make"])),
                ..Default::default()
            }),
        ))
    }

    #[test]
    fn test_logical_ids_are_stable_and_sanitized() {
        let stack = Stack::new("DdcStackEast1", "us-east-1").unwrap();
        let id = stack.logical_id("DdcLambda/function");
        assert_eq!(id, stack.logical_id("DdcLambda/function"));
        assert!(id.starts_with("DdcLambdafunction"));
        assert_eq!(id.len(), "DdcLambdafunction".len() + 8);
    }

    #[test]
    fn test_logical_ids_differ_across_stacks() {
        let east1 = Stack::new("DdcStackEast1", "us-east-1").unwrap();
        let east2 = Stack::new("DdcStackEast2", "us-east-2").unwrap();
        assert_ne!(
            east1.logical_id("DdcLambda/function"),
            east2.logical_id("DdcLambda/function")
        );
    }

    #[test]
    fn test_duplicate_path_is_rejected() {
        let mut stack = Stack::new("DdcStackEast1", "us-east-1").unwrap();
        stack.add_resource("DdcLambda/function", function()).unwrap();
        let result = stack.add_resource("DdcLambda/function", function());
        assert!(matches!(result, Err(SynthError::Validation(_))));
    }

    #[test]
    fn test_resource_shadowing_a_project_role_fails_synth() {
        let mut stack = Stack::new("DdcStackEast1", "us-east-1").unwrap();
        stack.add_resource("x", project()).unwrap();
        stack.add_resource("x/role", function()).unwrap();

        assert!(matches!(stack.synth(), Err(SynthError::Validation(_))));
    }

    #[test]
    fn test_project_role_shadowing_a_resource_fails_synth() {
        let mut stack = Stack::new("DdcStackEast1", "us-east-1").unwrap();
        stack.add_resource("x/role", function()).unwrap();
        stack.add_resource("x", project()).unwrap();

        assert!(matches!(stack.synth(), Err(SynthError::Validation(_))));
    }

    #[test]
    fn test_synth_renders_declared_resources() {
        let mut stack = Stack::new("DdcStackEast1", "us-east-1").unwrap();
        stack.add_resource("DdcLambda/function", function()).unwrap();

        let template = stack.synth().unwrap();
        assert_eq!(template.resources.len(), 1);
        let (_, rendered) = template.resources.iter().next().unwrap();
        assert_eq!(rendered["Type"], "AWS::Lambda::Function");
        assert_eq!(
            rendered["Properties"]["Timeout"],
            Duration::seconds(30).as_secs()
        );
    }

    #[test]
    fn test_empty_stack_name_is_rejected() {
        let result = Stack::new("", "us-east-1");
        assert!(matches!(result, Err(SynthError::Validation(_))));
    }
}
