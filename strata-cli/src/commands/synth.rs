//! Synth command handler
//!
//! Renders every declared stack (or one, with `--stack`) to a template file
//! and writes a manifest describing the produced artifacts.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use colored::*;
use serde::Serialize;
use tracing::info;

use crate::stacks;

#[derive(Serialize)]
struct Manifest {
    version: String,
    generated_at: DateTime<Utc>,
    artifacts: Vec<ManifestArtifact>,
}

#[derive(Serialize)]
struct ManifestArtifact {
    stack: String,
    region: String,
    template_file: String,
}

pub fn handle_synth(only: Option<&str>, out: &Path) -> Result<()> {
    let stacks = stacks::app_stacks()?;
    let selected: Vec<_> = stacks
        .iter()
        .filter(|s| only.is_none_or(|name| s.name == name))
        .collect();
    if selected.is_empty() {
        bail!("unknown stack: {}", only.unwrap_or_default());
    }

    fs::create_dir_all(out)
        .with_context(|| format!("failed to create output directory {}", out.display()))?;

    let mut artifacts = Vec::new();
    for stack in &selected {
        let template = stack.synth()?;
        let file_name = format!("{}.template.json", stack.name);
        let path = out.join(&file_name);
        let body = serde_json::to_string_pretty(&template)?;
        fs::write(&path, body)
            .with_context(|| format!("failed to write {}", path.display()))?;

        info!(
            "synthesized stack {} ({} resources)",
            stack.name,
            template.resources.len()
        );
        println!(
            "{} {} {}",
            "✓".green().bold(),
            stack.name.bold(),
            path.display().to_string().dimmed()
        );

        artifacts.push(ManifestArtifact {
            stack: stack.name.clone(),
            region: stack.region.clone(),
            template_file: file_name,
        });
    }

    let manifest = Manifest {
        version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: Utc::now(),
        artifacts,
    };
    let manifest_path = out.join("manifest.json");
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("failed to write {}", manifest_path.display()))?;

    println!(
        "\n{} stack(s) synthesized to {}",
        selected.len().to_string().bold(),
        out.display()
    );
    Ok(())
}
