//! Show command handler
//!
//! Prints a stack's pipeline topology (stages, actions, artifact handoffs)
//! and the grants each build project declares.

use anyhow::{Result, bail};
use colored::*;
use strata_core::resource::Resource;
use strata_core::resource::pipeline::Action;

use crate::stacks;

pub fn handle_show(name: &str) -> Result<()> {
    let stacks = stacks::app_stacks()?;
    let Some(stack) = stacks.iter().find(|s| s.name == name) else {
        bail!("unknown stack: {name}");
    };

    println!("{}", format!("Stack {} ({})", stack.name, stack.region).bold());
    println!();

    for (path, resource) in stack.resources() {
        match resource {
            Resource::Pipeline(pipeline) => {
                println!("  {} {}", "▸".cyan(), pipeline.pipeline_name.bold());
                for stage in pipeline.stages() {
                    println!("    {}", stage.name.yellow());
                    for action in &stage.actions {
                        match action {
                            Action::Source(a) => println!(
                                "      {} {}/{}@{} -> {}",
                                a.action_name.cyan(),
                                a.owner,
                                a.repo,
                                a.branch,
                                a.output.name.dimmed()
                            ),
                            Action::Build(a) => {
                                let outputs = a
                                    .outputs
                                    .iter()
                                    .map(|o| o.name.as_str())
                                    .collect::<Vec<_>>()
                                    .join(", ");
                                println!(
                                    "      {} {} -> {}",
                                    a.action_name.cyan(),
                                    a.input.name.dimmed(),
                                    if outputs.is_empty() { "(none)".to_string() } else { outputs }
                                        .dimmed()
                                );
                            }
                        }
                    }
                }
                println!();
            }
            Resource::Project(project) => {
                println!("  {} {}", "▸".cyan(), path.bold());
                println!(
                    "    Image:      {}{}",
                    project.environment.image.dimmed(),
                    if project.environment.privileged {
                        " (privileged)".yellow()
                    } else {
                        "".normal()
                    }
                );
                for var in &project.environment_variables {
                    println!("    Env:        {}={}", var.name, var.value.dimmed());
                }
                for statement in &project.policy {
                    println!(
                        "    Grant:      {} on {}",
                        statement.actions.join(", ").green(),
                        statement
                            .resources
                            .iter()
                            .map(|r| r.to_string())
                            .collect::<Vec<_>>()
                            .join(", ")
                            .dimmed()
                    );
                }
                println!();
            }
            Resource::Function(function) => {
                println!("  {} {}", "▸".cyan(), function.function_name.bold());
                println!("    Runtime:    {}", function.runtime.id().dimmed());
                println!("    Handler:    {}", function.handler.dimmed());
                println!("    Timeout:    {}s", function.timeout.as_secs());
                println!();
            }
            Resource::Table(table) => {
                println!("  {} {}", "▸".cyan(), table.table_name.bold());
                println!("    Kind:       {}", resource.kind().dimmed());
                println!("    Partition:  {}", table.partition_key.name.dimmed());
                println!();
            }
        }
    }
    Ok(())
}
