use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use plugmeta_tools::search_path_with_extras;
use plugmeta_world::{Uri, World};

#[derive(Parser, Debug)]
#[command(name = "list-plugins", about = "List all installed LV2 plugins.")]
struct Args {
    /// Show names instead of URIs
    #[arg(short = 'n', long)]
    names: bool,

    /// Additional directories to search for bundles
    #[arg(long = "path", value_name = "PATH")]
    extra_paths: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let search = search_path_with_extras(&args.extra_paths);
    let mut world = World::load(&search)?;
    if args.names {
        // Plugin names live in the data files the manifest points at, so
        // pull those in before looking labels up.
        let uris: Vec<Uri> = world.plugins().map(|plugin| plugin.uri.clone()).collect();
        for uri in uris {
            world.load_resource(&uri);
            let name = world
                .label(&uri)
                .unwrap_or_else(|| uri.as_str().to_string());
            println!("{name}");
        }
    } else {
        for plugin in world.plugins() {
            println!("{}", plugin.uri);
        }
    }
    Ok(())
}
