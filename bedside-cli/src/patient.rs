use bedside_lib::{
    EditableField, FieldValue, Patient, QuickAddTarget, Repository, Result, TextField,
    app::home_rows, export::support_measures, repository::DEFAULT_NAME,
};
use chrono::Local;
use clap::Subcommand;
use colored::Colorize;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List patients in bed order
    List {
        /// Include archived patients
        #[arg(short, long)]
        all: bool,
        /// Only patients whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a new patient
    Add {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        bettplatz: Option<String>,
    },
    /// Show every field of a patient
    Show { id: String },
    /// Change a single field, e.g. `set 3f2a bettplatz 12` or `set 3f2a ecmo ja`
    Set {
        id: String,
        field: EditableField,
        value: String,
    },
    /// Archive a patient, or restore an archived one
    Hide { id: String },
    /// Append a dated note
    Note {
        id: String,
        text: String,
        #[arg(short, long, value_enum, default_value_t)]
        target: QuickAddTarget,
    },
}

pub fn handle(repo: &mut Repository, cmd: &Command) -> Result<()> {
    match cmd {
        Command::List { all, search } => {
            let patients = if *all && search.is_none() {
                Repository::sorted(repo.patients())
            } else {
                home_rows(repo, search.as_deref().unwrap_or_default())
            };

            if patients.is_empty() {
                println!("{}", "No patients".dimmed());
            }
            for patient in patients {
                print_row(patient);
            }
        }
        Command::Add { name, bettplatz } => {
            let mut patient = Patient::new(name.as_deref().unwrap_or(DEFAULT_NAME));
            if let Some(bettplatz) = bettplatz {
                patient.set_text(TextField::Bettplatz, bettplatz.as_str());
            }

            let id = repo.add(patient)?;
            println!("{} {id}", "Added".green());
        }
        Command::Show { id } => {
            let patient = repo.resolve(id)?;
            print_patient(patient);
        }
        Command::Set { id, field, value } => {
            let id = repo.resolve(id)?.id().clone();
            let value = FieldValue::parse(*field, value)?;

            repo.edit(&id, *field, value)?;
            println!("{} {}", "Updated".green(), field.label());
        }
        Command::Hide { id } => {
            let id = repo.resolve(id)?.id().clone();

            if repo.toggle_hidden(&id)? {
                println!("{} {id}", "Archived".yellow());
            } else {
                println!("{} {id}", "Restored".green());
            }
        }
        Command::Note { id, text, target } => {
            let id = repo.resolve(id)?.id().clone();

            repo.quick_add(&id, *target, text, Local::now().date_naive())?;
        }
    }

    Ok(())
}

fn print_row(patient: &Patient) {
    let mut row = format!(
        "{}  {:<8} {}",
        patient.id().short().dimmed(),
        patient.bettplatz().bold(),
        patient.name()
    );

    if let Some(measures) = support_measures(patient) {
        row.push_str(&format!("  {}", measures.cyan()));
    }
    if patient.hidden() {
        row.push_str(&format!("  {}", "(archived)".yellow()));
    }

    println!("{row}");
}

fn print_patient(patient: &Patient) {
    println!("{}", patient.display_label().bold());
    println!("  {:<22}{}", "Id", patient.id());
    if patient.hidden() {
        println!("  {}", "archived".yellow());
    }

    for field in EditableField::editor_order() {
        let value = patient.get(field);

        match (field, &value) {
            (EditableField::Text(_), FieldValue::Text(text)) if text.contains('\n') => {
                println!("  {}:", field.label());
                for line in text.lines() {
                    println!("      {line}");
                }
            }
            (EditableField::Flag(_), FieldValue::Flag(false)) => {
                println!("  {:<22}{}", field.label(), value.to_string().dimmed());
            }
            _ => println!("  {:<22}{value}", field.label()),
        }
    }
}
