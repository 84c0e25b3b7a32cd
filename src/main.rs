use anyhow::{Context, Result};
use clap::Parser;
use hostfetch::cli::{Cli, VERSION};
use hostfetch::config::Config;
use hostfetch::{catalog, display, logging, FetchContext, SystemProbe};
use std::io::{self, Write};

fn main() {
    logging::init();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("hostfetch: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.version {
        println!("hostfetch {}", VERSION);
        return Ok(());
    }
    if cli.items {
        println!("Available information to choose from:");
        for id in catalog::sorted_ids() {
            println!("  {}", id);
        }
        return Ok(());
    }

    let mut config = Config::load(cli.config.as_deref()).context("cannot load configuration")?;
    cli.apply(&mut config);
    let ctx = FetchContext::from_config(&config, cli.force_refresh())?;

    let probe = SystemProbe::new(config.weather.clone());
    let collected = hostfetch::collect(&ctx, &probe)?;

    let output = if cli.json {
        let mut json = serde_json::to_string_pretty(&collected.info.pruned(&ctx.items))?;
        json.push('\n');
        json
    } else {
        let lines = display::info_lines(&collected.info, &ctx.items, config.nerd_symbols);
        let logo = if config.display_logo {
            Some(display::load_logo(config.logo_file.as_deref()).context("cannot load logo")?)
        } else {
            None
        };
        display::render(&lines, logo.as_deref(), display::title_color())
    };
    io::stdout().write_all(output.as_bytes())?;

    // Output first, then persist: a write failure still exits non-zero
    collected.persist()?;
    Ok(())
}
