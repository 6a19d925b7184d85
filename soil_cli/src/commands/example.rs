//! `example`: list the built-in profiles or run one of them.

use anyhow::{anyhow, bail, Result};
use clap::Args;
use soil_core::api::handle;
use soil_core::presets;

use crate::render;

#[derive(Args)]
pub struct ExampleArgs {
    /// Example to run; lists the catalog when omitted
    pub name: Option<String>,

    /// Print the JSON response instead of a table
    #[arg(long)]
    pub json: bool,

    /// Print the request body of the example and exit
    #[arg(long)]
    pub request: bool,
}

fn list() {
    println!("Built-in example profiles:");
    println!();
    for preset in presets::catalog() {
        println!("  {:<22} {}", preset.name, preset.description);
    }
}

pub fn execute(args: ExampleArgs) -> Result<()> {
    let Some(name) = args.name else {
        list();
        return Ok(());
    };

    let preset = presets::find(&name).ok_or_else(|| {
        anyhow!("unknown example '{}', expected one of: {}", name, presets::names().join(", "))
    })?;

    if args.request {
        return render::print_json(&preset.input);
    }

    let reply = handle(&preset.input, &super::settings_with_tolerance(None));
    if !reply.body.is_success() {
        bail!("example '{}' failed: {}", name, reply.body.error.unwrap_or_default());
    }

    if args.json {
        render::print_json(&reply.body)
    } else {
        println!("{}: {}", preset.title, preset.description);
        println!();
        render::print_profile(
            "STRESS PROFILE",
            &reply.body.points,
            &reply.body.layers,
            Some(preset.layer_names.as_slice()),
        );
        Ok(())
    }
}
