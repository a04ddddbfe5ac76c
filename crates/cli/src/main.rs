use clap::{Parser, Subcommand};
use diversity_core::service::{parse_patch, parse_resource, prepare_create};
use diversity_core::{
    CoreConfig, CustomerRecord, DiversityError, DiversityService, DiversityStore, FileStore,
    RequestContext, ResourceId, StoreBackend, TracingPublisher, DEFAULT_DATA_DIR,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "diversity")]
#[command(about = "Diversity record store CLI")]
struct Cli {
    /// Data directory (defaults to DIVERSITY_DATA_DIR, then diversity_data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List a customer's diversity records
    List {
        customer_id: String,
    },
    /// Show one diversity record
    Show {
        customer_id: String,
        diversity_id: String,
    },
    /// Validate a create body for a customer without storing it
    Validate {
        customer_id: String,
        file: PathBuf,
        /// Touchpoint id stamped as LastModifiedBy
        #[arg(long, default_value = "0000000000")]
        touchpoint: String,
    },
    /// Register a customer so records can be created for it
    AddCustomer {
        customer_id: String,
        /// Mark the customer as terminated (read only)
        #[arg(long)]
        terminated: bool,
    },
    /// Create a diversity record from a JSON file
    Create {
        customer_id: String,
        file: PathBuf,
        /// Touchpoint id stamped as LastModifiedBy
        #[arg(long, default_value = "0000000000")]
        touchpoint: String,
    },
    /// Apply a JSON patch file to a diversity record
    Patch {
        customer_id: String,
        diversity_id: String,
        file: PathBuf,
        /// Touchpoint id stamped as LastModifiedBy
        #[arg(long, default_value = "0000000000")]
        touchpoint: String,
    },
}

fn open_service(data_dir: Option<PathBuf>) -> Result<DiversityService, DiversityError> {
    let data_dir = data_dir
        .or_else(|| std::env::var("DIVERSITY_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let cfg = Arc::new(CoreConfig::new(data_dir, StoreBackend::File, None)?);
    let store = Arc::new(FileStore::open(cfg.clone())?);
    Ok(DiversityService::new(cfg, store, Arc::new(TracingPublisher)))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_failures(err: &DiversityError) {
    match err {
        DiversityError::Validation(failures) => {
            for failure in failures {
                eprintln!("  {}: {}", failure.member_names.join(", "), failure.message);
            }
        }
        other => eprintln!("Error: {other}"),
    }
}

/// Runs a create body through the same server-side steps as `create`, without storing it.
fn check_create_body(customer_id: &str, body: &str, touchpoint: &str) -> Result<(), DiversityError> {
    let ctx = RequestContext::new(Some(touchpoint), None, None)?;
    let resource = parse_resource(body)?;
    prepare_create(&ctx, ResourceId::parse(customer_id)?, resource, chrono::Utc::now())?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List { customer_id }) => {
            let service = open_service(cli.data_dir)?;
            let records = service.list(&ResourceId::parse(&customer_id)?)?;
            if records.is_empty() {
                println!("No diversity records found.");
            } else {
                print_json(&records)?;
            }
        }
        Some(Commands::Show {
            customer_id,
            diversity_id,
        }) => {
            let service = open_service(cli.data_dir)?;
            match service.get_by_id(
                &ResourceId::parse(&customer_id)?,
                &ResourceId::parse(&diversity_id)?,
            )? {
                Some(record) => print_json(&record)?,
                None => println!("Diversity record {diversity_id} not found."),
            }
        }
        Some(Commands::Validate {
            customer_id,
            file,
            touchpoint,
        }) => {
            let body = std::fs::read_to_string(&file)?;
            match check_create_body(&customer_id, &body, &touchpoint) {
                Ok(()) => println!("{} is valid.", file.display()),
                Err(e) => {
                    eprintln!("{} is not valid:", file.display());
                    print_failures(&e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::AddCustomer {
            customer_id,
            terminated,
        }) => {
            let service = open_service(cli.data_dir)?;
            let customer = CustomerRecord {
                customer_id: ResourceId::parse(&customer_id)?,
                date_of_termination: terminated.then(chrono::Utc::now),
            };
            service.store().put_customer(&customer)?;
            println!("Registered customer {customer_id}");
        }
        Some(Commands::Create {
            customer_id,
            file,
            touchpoint,
        }) => {
            let service = open_service(cli.data_dir)?;
            let ctx = RequestContext::new(Some(touchpoint.as_str()), None, None)?;
            let resource = parse_resource(&std::fs::read_to_string(&file)?)?;
            match service.create(&ctx, ResourceId::parse(&customer_id)?, resource) {
                Ok(created) => print_json(&created)?,
                Err(e) => {
                    eprintln!("Error creating diversity record:");
                    print_failures(&e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Patch {
            customer_id,
            diversity_id,
            file,
            touchpoint,
        }) => {
            let service = open_service(cli.data_dir)?;
            let ctx = RequestContext::new(Some(touchpoint.as_str()), None, None)?;
            let patch = parse_patch(&std::fs::read_to_string(&file)?)?;
            match service.patch(
                &ctx,
                ResourceId::parse(&customer_id)?,
                ResourceId::parse(&diversity_id)?,
                patch,
            ) {
                Ok(updated) => print_json(&updated)?,
                Err(e) => {
                    eprintln!("Error patching diversity record:");
                    print_failures(&e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("Use 'diversity --help' for commands");
        }
    }

    Ok(())
}
