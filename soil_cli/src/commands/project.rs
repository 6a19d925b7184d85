//! `project`: saved profiles in a `.stm` project file.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use soil_core::file_io::{load_or_create, load_project, save_project, PROJECT_EXTENSION};
use soil_core::project::Project;
use soil_core::stresses::StressProfileInput;
use tracing::info;

use crate::render;

#[derive(Args)]
pub struct ProjectArgs {
    /// Project file; `.stm` is appended when no extension is given
    #[arg(short, long)]
    pub file: PathBuf,

    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Save a JSON request under a label (creates the project if needed)
    Add {
        label: String,
        /// Request file (JSON)
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long, default_value = "")]
        engineer: String,
        #[arg(long, default_value = "")]
        job: String,
        #[arg(long, default_value = "")]
        site: String,
    },
    /// List saved profiles
    List,
    /// Compute a saved profile
    Run {
        label: String,
        /// Print the JSON result instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Delete a saved profile
    Remove { label: String },
}

fn project_path(file: &Path) -> PathBuf {
    let mut path = file.to_path_buf();
    if path.extension().is_none() {
        path.set_extension(PROJECT_EXTENSION);
    }
    path
}

fn missing_label(label: &str, file: &Path) -> anyhow::Error {
    anyhow!("no profile labelled '{}' in {}", label, file.display())
}

pub fn execute(args: ProjectArgs) -> Result<()> {
    let file = project_path(&args.file);
    match args.action {
        ProjectAction::Add {
            label,
            input,
            engineer,
            job,
            site,
        } => {
            let body = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let request: StressProfileInput = serde_json::from_str(&body)
                .with_context(|| format!("invalid request in {}", input.display()))?;
            request.validate()?;

            let mut project = load_or_create(&file, || Project::new(engineer, job, site))?;
            let id = project.add_profile(label.as_str(), request);
            save_project(&project, &file)?;
            info!(%id, label = %label, "profile saved");
            println!("Saved '{}' ({}) to {}", label, id, file.display());
        }
        ProjectAction::List => {
            let project = load_project(&file)?;
            println!(
                "Job {} - {} (engineer: {})",
                project.meta.job_id, project.meta.site, project.meta.engineer
            );
            println!();
            for (id, item) in project.profiles_sorted() {
                println!(
                    "  {:<16} {:>2} layers  {:>6.2} m  {}",
                    item.label,
                    item.input.layers.len(),
                    item.input.total_depth(),
                    id
                );
            }
        }
        ProjectAction::Run { label, json } => {
            let project = load_project(&file)?;
            let (id, _) = project
                .find_by_label(&label)
                .ok_or_else(|| missing_label(&label, &file))?;
            let result = project.run(&id)?.rounded(project.settings.output_decimals);

            if json {
                render::print_json(&result)?;
            } else {
                let title = label.to_uppercase();
                render::print_profile(&title, &result.points, &result.layers, None);
            }
        }
        ProjectAction::Remove { label } => {
            let mut project = load_project(&file)?;
            let (id, _) = project
                .find_by_label(&label)
                .ok_or_else(|| missing_label(&label, &file))?;
            project.remove_profile(&id);
            save_project(&project, &file)?;
            println!("Removed '{}' from {}", label, file.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_path_appends_extension() {
        assert_eq!(project_path(Path::new("site")), PathBuf::from("site.stm"));
        assert_eq!(project_path(Path::new("dir/site.json")), PathBuf::from("dir/site.json"));
        assert_eq!(project_path(Path::new("site.stm")), PathBuf::from("site.stm"));
    }
}
