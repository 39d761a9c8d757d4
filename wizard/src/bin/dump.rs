use std::{env, fs::File, io::BufWriter, path::Path};

use anyhow::Context;
use wizard::{analyze, page::xhtml::load_page_file};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let (Some(input_page), Some(output_json)) = (args.get(1), args.get(2)) else {
        anyhow::bail!("Usage: dump <page.xhtml> <report.json>");
    };

    let page = load_page_file(Path::new(input_page))
        .with_context(|| format!("Failed to load {}", input_page))?;
    let report = analyze(&page)?;

    let file = File::create(output_json).with_context(|| format!("Unable to create {}", output_json))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, &report)?;

    Ok(())
}
