//! Application stacks
//!
//! The two regional deployments of the DDC release pipeline. Both declare
//! the same pipeline construct from one shared props helper; the differences
//! are the region, the stack name, and the auxiliary table carried only by
//! us-east-1.

use strata_core::Result;
use strata_core::construct::{LambdaPipeline, LambdaPipelineProps};
use strata_core::duration::Duration;
use strata_core::resource::Resource;
use strata_core::resource::table::{AttributeType, BillingMode, PartitionKey, Table};
use strata_core::stack::Stack;

const FUNCTION_NAME: &str = "DdcLambda";

/// All stacks the application declares, in synthesis order
pub fn app_stacks() -> Result<Vec<Stack>> {
    Ok(vec![ddc_stack_east1()?, ddc_stack_east2()?])
}

fn ddc_props(region: &str) -> LambdaPipelineProps {
    LambdaPipelineProps {
        region: region.to_string(),
        function_name: FUNCTION_NAME.to_string(),
        github_owner: "DuckDuckCode-tech".to_string(),
        github_repo: "lambda".to_string(),
        github_branch: "main".to_string(),
        timeout: Some(Duration::minutes(10)),
    }
}

fn ddc_stack_east1() -> Result<Stack> {
    let mut stack = Stack::new("DdcStackEast1", "us-east-1")?;
    LambdaPipeline::new(&ddc_props("us-east-1"))?.add_to_stack(&mut stack)?;

    let table = Table::new(
        "DDCTable",
        PartitionKey {
            name: "pk".to_string(),
            attribute_type: AttributeType::String,
        },
        BillingMode::PayPerRequest,
    )?;
    stack.add_resource("DDCTable", Resource::Table(table))?;

    Ok(stack)
}

fn ddc_stack_east2() -> Result<Stack> {
    let mut stack = Stack::new("DdcStackEast2", "us-east-2")?;
    LambdaPipeline::new(&ddc_props("us-east-2"))?.add_to_stack(&mut stack)?;
    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_stacks_synthesize() {
        for stack in app_stacks().unwrap() {
            let template = stack.synth().unwrap();
            assert!(!template.resources.is_empty());
        }
    }

    #[test]
    fn test_stacks_share_pipeline_name_but_nothing_else() {
        let stacks = app_stacks().unwrap();
        assert_eq!(stacks.len(), 2);

        let pipeline_names: Vec<_> = stacks
            .iter()
            .map(|stack| {
                stack
                    .resources()
                    .find_map(|(_, r)| match r {
                        Resource::Pipeline(p) => Some(p.pipeline_name.clone()),
                        _ => None,
                    })
                    .unwrap()
            })
            .collect();
        assert_eq!(pipeline_names, ["DdcLambda-pipeline", "DdcLambda-pipeline"]);

        assert_ne!(stacks[0].name, stacks[1].name);
        assert_ne!(stacks[0].region, stacks[1].region);
        assert_ne!(
            stacks[0].logical_id("DdcLambda/pipeline"),
            stacks[1].logical_id("DdcLambda/pipeline")
        );
    }

    #[test]
    fn test_only_east1_carries_the_table() {
        let stacks = app_stacks().unwrap();
        let has_table = |stack: &Stack| {
            stack
                .resources()
                .any(|(_, r)| matches!(r, Resource::Table(_)))
        };
        assert!(has_table(&stacks[0]));
        assert!(!has_table(&stacks[1]));
    }

    #[test]
    fn test_deploy_region_follows_the_stack() {
        let stacks = app_stacks().unwrap();
        for stack in &stacks {
            let deploy = stack
                .resources()
                .find(|(path, _)| path.ends_with("deploy-project"))
                .map(|(_, r)| r)
                .unwrap();
            let Resource::Project(project) = deploy else {
                panic!("deploy-project path does not hold a project");
            };
            let region = project
                .environment_variables
                .iter()
                .find(|v| v.name == "AWS_REGION")
                .map(|v| v.value.as_str());
            assert_eq!(region, Some(stack.region.as_str()));
        }
    }
}
