use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vaultmark::{Config, MarkdownRenderer, STYLESHEET, inline_images, page_wrapper};

fn main() -> Result<()> {
    let config = Config::parse();

    let filter = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    config.validate().context("Invalid configuration")?;

    let renderer = MarkdownRenderer::new(config.render_options());
    let options = renderer.render_options();
    debug!(
        base_path = %options.base_path,
        assets_path = %options.assets_path,
        endpoint = ?options.endpoint,
        "Rendering {}",
        config.input.display()
    );

    let mut html = renderer
        .render_file(&config.input)
        .context("Failed to render note")?;

    if config.inline_images {
        let search_dirs = [config.assets_path(), config.base_path()];
        html = inline_images(&html, config.endpoint(), &search_dirs);
    }

    if config.standalone {
        let title = config.title()?;
        html = page_wrapper(&title, STYLESHEET, &html).into_string();
    }

    match &config.output {
        Some(output) => {
            if let Some(parent) = output.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }

            fs::write(output, &html)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Wrote {}", output.display());

            if config.open {
                open::that(output)
                    .with_context(|| format!("Failed to open {}", output.display()))?;
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
