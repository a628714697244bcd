use clap::{Args, Parser, Subcommand};
use medlink_core::{
    open_store, store_backend_from_env_values, validate_new_patient, validate_patient_changes,
    CoreConfig, Creation, Patient, PatientError, PatientPayload, PatientService,
};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "medlink")]
#[command(about = "MedLink patient registry CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    List,
    /// Create a patient, or show the existing one holding the email
    Create {
        #[command(flatten)]
        fields: PatientFields,
        /// Registration date (YYYY-MM-DD)
        #[arg(long)]
        registered_date: String,
    },
    /// Update an existing patient
    Update {
        /// Patient UUID
        id: Uuid,
        #[command(flatten)]
        fields: PatientFields,
    },
    /// Delete a patient (no-op if absent)
    Delete {
        /// Patient UUID
        id: Uuid,
    },
    /// Check whether a patient holds an email
    Exists {
        email: String,
    },
}

#[derive(Args)]
struct PatientFields {
    /// Full name
    #[arg(long)]
    name: String,
    /// Email address
    #[arg(long)]
    email: String,
    /// Postal address
    #[arg(long)]
    address: String,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    date_of_birth: String,
}

impl PatientFields {
    fn into_payload(self, registered_date: Option<String>) -> PatientPayload {
        PatientPayload {
            name: Some(self.name),
            email: Some(self.email),
            address: Some(self.address),
            date_of_birth: Some(self.date_of_birth),
            registered_date,
        }
    }
}

fn print_patient(patient: &Patient) {
    println!(
        "ID: {}, Name: {}, Email: {}, Address: {}, Born: {}, Registered: {}",
        patient.id,
        patient.name,
        patient.email,
        patient.address,
        patient.date_of_birth,
        patient.registered_date
    );
}

fn report(err: PatientError) {
    match err {
        PatientError::Validation(errors) => {
            for e in errors.errors() {
                eprintln!("{}: {}", e.field, e.message);
            }
        }
        other => eprintln!("Error: {}", other),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'medlink --help' for commands");
        return Ok(());
    };

    let store_backend = store_backend_from_env_values(
        std::env::var("PATIENT_STORE").ok(),
        std::env::var("PATIENT_DB_PATH").ok(),
    )?;
    let service = PatientService::new(open_store(&CoreConfig::new(store_backend)?)?);

    match command {
        Commands::List => {
            let patients = service.list_patients()?;
            if patients.is_empty() {
                println!("No patients found.");
            }
            for patient in &patients {
                print_patient(patient);
            }
        }
        Commands::Create {
            fields,
            registered_date,
        } => {
            let result = validate_new_patient(&fields.into_payload(Some(registered_date)))
                .map_err(PatientError::from)
                .and_then(|new| service.create_patient(new));
            match result {
                Ok(Creation::Created(patient)) => {
                    println!("Created patient:");
                    print_patient(&patient);
                }
                Ok(Creation::Existing(patient)) => {
                    println!("Patient with this email already exists:");
                    print_patient(&patient);
                }
                Err(e) => report(e),
            }
        }
        Commands::Update { id, fields } => {
            let result = validate_patient_changes(&fields.into_payload(None))
                .map_err(PatientError::from)
                .and_then(|changes| service.update_patient(id, changes));
            match result {
                Ok(patient) => {
                    println!("Updated patient:");
                    print_patient(&patient);
                }
                Err(e) => report(e),
            }
        }
        Commands::Delete { id } => {
            if service.delete_patient(id)? {
                println!("Deleted patient {}", id);
            } else {
                println!("No patient with id {}", id);
            }
        }
        Commands::Exists { email } => {
            println!("{}", service.patient_exists(&email)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_arguments() {
        let cli = Cli::try_parse_from([
            "medlink",
            "create",
            "--name",
            "Ana",
            "--email",
            "ana@example.com",
            "--address",
            "Rua A",
            "--date-of-birth",
            "1990-05-01",
            "--registered-date",
            "2024-01-15",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Create {
                fields,
                registered_date,
            }) => {
                let payload = fields.into_payload(Some(registered_date));
                assert!(validate_new_patient(&payload).is_ok());
            }
            _ => panic!("expected create command"),
        }
    }

    #[test]
    fn rejects_malformed_uuid() {
        assert!(Cli::try_parse_from(["medlink", "delete", "nope"]).is_err());
    }
}
