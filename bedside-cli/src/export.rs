use std::path::PathBuf;

use bedside_lib::{
    Repository, Result,
    app::ExportSelection,
    document::{Document, file_name},
    export::ExportField,
    repository::CoreConfig,
};
use chrono::Local;
use colored::Colorize;

#[derive(clap::Args, Debug, Clone)]
pub struct Args {
    /// Fields to include, defaults to the configured selection
    #[arg(short, long, value_enum)]
    field: Vec<ExportField>,
    /// Export only these patients, by id or id prefix
    #[arg(short, long)]
    patient: Vec<String>,
    /// Include archived patients
    #[arg(short, long)]
    all: bool,
    /// Write a PDF instead of printing text, into the export directory unless a path is given
    #[arg(long, num_args = 0..=1)]
    pdf: Option<Option<PathBuf>>,
}

pub fn handle(repo: &Repository, cfg: &CoreConfig, args: &Args) -> Result<()> {
    let fields = if args.field.is_empty() {
        cfg.export().fields().clone()
    } else {
        args.field.clone()
    };

    let mut selection = ExportSelection::new(repo, fields);
    if !args.patient.is_empty() {
        let ids = args
            .patient
            .iter()
            .map(|id| repo.resolve(id).map(|p| p.id().clone()))
            .collect::<Result<Vec<_>>>()?;
        selection = selection.with_patients(ids);
    } else if args.all {
        selection = selection.with_patients(repo.patients().iter().map(|p| p.id().clone()));
    }

    if selection.patients().is_empty() {
        eprintln!("{}", "No patients selected".yellow());
    }

    match &args.pdf {
        None => println!("{}", selection.render(repo)),
        Some(path) => {
            let path = path.clone().unwrap_or_else(|| {
                cfg.export_dir()
                    .join(file_name(Local::now().naive_local()))
            });

            let blocks = selection.blocks(repo);
            Document::layout(blocks.as_slice(), cfg.document()).write(&path)?;
            println!("{} {}", "Wrote".green(), path.display());
        }
    }

    Ok(())
}
