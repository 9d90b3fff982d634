use anyhow::bail;

use proctor_core::enums::PersonRole;
use proctor_db::repos::person::NewPerson;
use proctor_engine::ProcessEngine;

use crate::cli::subcommands::StudentCommands;
use crate::cli::OutputFormat;
use crate::output;

/// Handle `pct student`.
pub async fn handle(
    action: &StudentCommands,
    engine: &ProcessEngine,
    format: OutputFormat,
    limit: usize,
) -> anyhow::Result<()> {
    match action {
        StudentCommands::Add {
            register,
            name,
            role,
            year,
            department,
        } => {
            if *role == PersonRole::Student && register.is_none() {
                bail!("students require --register");
            }
            let person = engine
                .store()
                .create_person(&NewPerson {
                    register_number: register.clone(),
                    name: name.clone(),
                    role: *role,
                    year: *year,
                    department: department.clone(),
                })
                .await?;
            output::output(&person, format)
        }
        StudentCommands::List { year } => {
            let mut students = match year {
                Some(year) => engine.store().list_students_by_year(*year).await?,
                None => {
                    engine
                        .store()
                        .list_persons_by_role(PersonRole::Student)
                        .await?
                }
            };
            students.truncate(limit);
            output::output(&students, format)
        }
    }
}
