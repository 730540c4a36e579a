use crate::cli::Cli;
use crate::config::{BookConfig, BookFormat, Catalog};
use crate::html;
use crate::loader::{self, LoadOutcome, LoadedContent};
use crate::markdown;
use crate::pane::ContentPane;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub fn convert(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let location = config
        .file
        .clone()
        .context("No book location given and the catalog entry has no file")?;
    let format = resolve_format(cli, &config, &location);

    let mut pane = ContentPane::new();
    let ticket = pane.begin(&config.id);
    log::debug!("load {} started for {}", ticket.generation(), location);

    let outcome = loader::load(&location, format, &config);
    let rendered = if cli.markdown {
        markdown::render_outcome(&outcome)
    } else {
        render_html(&outcome)
    };

    let loaded = pane
        .commit(
            &ticket,
            rendered,
            outcome.content.chapter_count(),
            outcome.content.is_placeholder(),
        )
        .context("Load was superseded before it finished")?;
    log::info!(
        "content ready for '{}' (load {})",
        loaded.book_id,
        loaded.generation
    );

    match cli.output {
        Some(ref path) => write_output(path, pane.markup())?,
        None => io::stdout()
            .write_all(pane.markup().as_bytes())
            .context("Failed to write to stdout")?,
    }

    eprintln!(
        "Loaded {} ({} chapters{}){}",
        outcome.title,
        loaded.chapters,
        if loaded.placeholder {
            ", placeholder shown"
        } else {
            ""
        },
        cli.output
            .as_ref()
            .map(|p| format!(" to {}", p.display()))
            .unwrap_or_default()
    );

    Ok(())
}

/// Merge the catalog entry (if any) with command-line overrides.
fn resolve_config(cli: &Cli) -> Result<BookConfig> {
    let mut config = match (&cli.catalog, &cli.book) {
        (Some(path), Some(id)) => {
            let catalog = Catalog::open(path)?;
            catalog
                .find(id)
                .cloned()
                .ok_or_else(|| anyhow!("Book '{}' not found in {}", id, path.display()))?
        }
        _ => BookConfig::default(),
    };

    if let Some(ref location) = cli.location {
        config.file = Some(location.clone());
    }
    if let Some(ref title) = cli.title {
        config.title = title.clone();
    }
    if let Some(ref author) = cli.author {
        config.author = author.clone();
    }
    if let Some(ref folder) = cli.folder {
        config.folder = Some(folder.clone());
    }
    if let Some(ref id) = cli.id {
        config.id = id.clone();
    }
    if let Some(format) = cli.format {
        config.format = Some(format);
    }

    Ok(config)
}

fn resolve_format(cli: &Cli, config: &BookConfig, location: &str) -> BookFormat {
    cli.format
        .or(config.format)
        .or_else(|| BookFormat::from_location(location))
        .unwrap_or_default()
}

fn render_html(outcome: &LoadOutcome) -> String {
    match &outcome.content {
        LoadedContent::Document(doc) | LoadedContent::Placeholder(doc) => {
            html::render_document(doc)
        }
        LoadedContent::PdfNotice { href } => html::render_pdf_notice(&outcome.title, href),
    }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    Ok(())
}
