use clap::Parser;
use color_eyre::eyre::Result;
use log::*;
use std::io;

use release_notes::{
    cli::{Args, OutputFormat},
    config::Settings,
    create_document,
    forge::github::Github,
    list_release_notes, render_json, render_markdown,
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("release_notes")
        .build();

    // stdout carries the rendered notes
    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = Args::parse();

    initialize_logger(cli_args.debug)?;

    let settings = Settings::load(cli_args.config.as_deref()).await?;
    let run = cli_args.resolve(settings)?;

    let forge = Github::new(run.remote)?;

    info!("fetching all commits. this might take a while...");

    let notes =
        list_release_notes(&forge, &run.start_sha, &run.end_sha, &run.options)
            .await?;

    info!("collected {} release notes, rendering", notes.len());

    let mut stdout = io::stdout().lock();

    match run.format {
        OutputFormat::Markdown => {
            let doc = create_document(&notes);
            render_markdown(&doc, run.template.as_deref(), &mut stdout)?;
        }
        OutputFormat::Json => render_json(&notes, &mut stdout)?,
    }

    Ok(())
}
