use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use plugmeta_tools::search_path_with_extras;
use plugmeta_world::{ns, Uri, World};

#[derive(Parser, Debug)]
#[command(
    name = "list-presets",
    about = "List all presets of an LV2 plugin with the given URI."
)]
struct Args {
    /// URI of the plugin whose presets to list
    plugin_uri: Option<String>,

    /// Additional directories to search for bundles
    #[arg(long = "path", value_name = "PATH")]
    extra_paths: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Bad or missing arguments are expected usage, not failures: print a
    // message and exit successfully.
    let Some(text) = args.plugin_uri else {
        println!("Usage: list-presets <plugin URI>");
        return Ok(());
    };
    let Ok(uri) = Uri::parse(&text) else {
        println!("Invalid URI '{text}'.");
        return Ok(());
    };

    let search = search_path_with_extras(&args.extra_paths);
    let mut world = World::load(&search)?;
    if world.plugin(&uri).is_err() {
        println!("Plugin with URI '{text}' not found.");
        return Ok(());
    }

    let mut presets = Vec::new();
    for preset in world.related(&uri, &ns::pset_preset()) {
        // Preset labels live in per-preset data files referenced from the
        // manifest.
        world.load_resource(&preset);
        let label = match world.label(&preset) {
            Some(label) => label,
            None => {
                eprintln!("Preset '{preset}' has no label");
                preset.as_str().to_string()
            }
        };
        presets.push((label, preset));
    }

    presets.sort();
    for (label, preset) in presets {
        println!("Label: {label}\nURI: {preset}\n");
    }
    Ok(())
}
