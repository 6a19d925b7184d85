//! `calc`: compute a profile from a JSON request file or stdin.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use soil_core::api::handle_json;
use tracing::info;

use crate::render;

#[derive(Args)]
pub struct CalcArgs {
    /// Request file (JSON), or `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// Print the JSON response instead of a table
    #[arg(long)]
    pub json: bool,

    /// Depth tolerance for merging computation points (m)
    #[arg(long)]
    pub tolerance: Option<f64>,
}

fn read_body(input: &str) -> Result<String> {
    if input == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("failed to read request from stdin")?;
        return Ok(body);
    }
    let path = PathBuf::from(input);
    std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
}

pub fn execute(args: CalcArgs) -> Result<()> {
    let body = read_body(&args.input)?;
    let settings = super::settings_with_tolerance(args.tolerance);
    info!(source = %args.input, "computing stress profile");

    let reply = handle_json(&body, &settings);
    if args.json {
        render::print_json(&reply.body)?;
    } else if reply.body.is_success() {
        render::print_profile("STRESS PROFILE", &reply.body.points, &reply.body.layers, None);
    }

    if !reply.body.is_success() {
        bail!(
            "request failed with status {}: {}",
            reply.status,
            reply.body.error.unwrap_or_default()
        );
    }
    Ok(())
}
