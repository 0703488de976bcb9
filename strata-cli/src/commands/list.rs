//! List command handler

use anyhow::Result;
use colored::*;

use crate::stacks;

pub fn handle_list() -> Result<()> {
    let stacks = stacks::app_stacks()?;

    println!("{}", format!("Stacks ({}):", stacks.len()).bold());
    println!();
    for stack in &stacks {
        println!("  {} {}", "▸".cyan(), stack.name.bold());
        println!("    Region:    {}", stack.region.dimmed());
        println!(
            "    Resources: {}",
            stack.resources().count().to_string().dimmed()
        );
        println!();
    }
    Ok(())
}
