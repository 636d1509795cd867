//! Interactive console front end: gathers every parameter through
//! sequential prompts, runs the pipeline, and reports the outcome.
mod prompt;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;

use clip_logging::clip_error;
use clipper_core::{ClipJob, ModuleNaming, NotesSelector, Source, TargetSelector, VaultLayout};
use clipper_engine::{convert_directory, FetchSettings, LogSink, Pipeline};

use prompt::{ask, ask_optional, ask_yes_no};

fn main() -> ExitCode {
    clip_logging::initialize_terminal();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            clip_error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    match ask("Mode (url / file / dir)")?.to_ascii_lowercase().as_str() {
        "url" => run_clip(true),
        "file" => run_clip(false),
        "dir" => run_batch(),
        other => anyhow::bail!("unknown mode {other:?} (expected url, file, or dir)"),
    }
}

fn run_clip(remote: bool) -> anyhow::Result<()> {
    let root = ask("Root directory")?;
    let section = ask("Section directory")?;
    let module_name = ask("Module name")?;
    let module_number = ask("Module number")?;
    let media_prefix = ask("Media prefix")?;

    let target_kind = ask("Target kind (document / id / tag)")?;
    let target_value = if target_kind.trim().eq_ignore_ascii_case("document") {
        String::new()
    } else {
        ask("Target value")?
    };
    let target = TargetSelector::parse(&target_kind, &target_value)?;

    let notes = match ask_optional("Notes element (leave blank if none)")? {
        Some(element) => {
            let class = ask_optional("Notes class (leave blank if none)")?;
            Some(NotesSelector::new(element, class))
        }
        None => None,
    };
    let frontmatter = ask_yes_no("Add frontmatter", false)?;

    let source = if remote {
        Source::Url(ask("URL to clip")?)
    } else {
        Source::File(PathBuf::from(ask("HTML file to clip")?))
    };

    let job = ClipJob::new(
        source,
        VaultLayout::new(root, &section),
        ModuleNaming::new(&module_name, &module_number, &media_prefix),
    )
    .with_target(target)
    .with_notes(notes)
    .with_frontmatter(frontmatter);

    let clipped_utc = Utc::now().to_rfc3339();
    let pipeline = Pipeline::new(FetchSettings::default(), clipped_utc)?;
    let outcome = pipeline.run_blocking(&job, &LogSink)?;

    println!(
        "Conversion complete. Markdown file saved to: {}",
        outcome.note_path.display()
    );
    if !outcome.assets.is_empty() {
        println!("Downloaded {} media asset(s).", outcome.assets.len());
    }
    if !outcome.preview.is_empty() {
        println!("\n{}", outcome.preview);
    }
    Ok(())
}

fn run_batch() -> anyhow::Result<()> {
    let input_dir = PathBuf::from(ask("Input directory")?);
    let output_dir = PathBuf::from(ask("Output directory")?);

    let summary = convert_directory(&input_dir, &output_dir)?;
    println!(
        "Converted {} file(s), manifest at {}",
        summary.converted,
        summary.manifest_path.display()
    );
    Ok(())
}
