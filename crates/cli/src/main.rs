mod client;
mod commands;
mod serve;

use std::env;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use partflow_core::{BranchId, SessionContext};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Which master list a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum MasterKindArg {
    Suppliers,
    Parts,
    Customers,
}

/// Workshop warranty round-trip tracker.
#[derive(Parser)]
#[command(
    name = "partflow",
    version,
    about = "Workshop warranty round-trip tracker"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Server base URL (default: $PARTFLOW_URL or http://127.0.0.1:5000)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Branch id scoping every operation (default: $PARTFLOW_BRANCH or 1)
    #[arg(long, global = true)]
    branch: Option<String>,

    /// Bearer token for mutating requests (default: $PARTFLOW_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP JSON API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 5000)]
        port: u16,
        /// Require this bearer token on every mutating request
        /// (default: $PARTFLOW_API_TOKEN; omit for an open server)
        #[arg(long)]
        token: Option<String>,
    },

    /// Supplier outward flow: parts sent to a supplier
    Outward {
        #[command(subcommand)]
        command: OutwardCommands,
    },

    /// Customer job-card flow: vehicles/parts in for service
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },

    /// Reconciliation reports (sent vs received)
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },

    /// Supplier/part/customer master lists
    Masters {
        #[command(subcommand)]
        command: MasterCommands,
    },
}

#[derive(Subcommand)]
enum OutwardCommands {
    /// Record a part being sent to a supplier
    New {
        #[arg(long)]
        supplier: String,
        /// Part name (optional when --from-job fills it in)
        #[arg(long)]
        part: Option<String>,
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        fault: Option<String>,
        /// Mark as a warranty claim
        #[arg(long)]
        warranty: bool,
        #[arg(long)]
        purchase_date: Option<String>,
        #[arg(long)]
        invoice: Option<String>,
        /// Customer job card this part came out of (back-reference only)
        #[arg(long)]
        job_ref: Option<String>,
        /// Select a pending job card and copy its part/serial/fault
        #[arg(long)]
        from_job: Option<String>,
        /// Entry date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List outwards still awaiting a supplier response
    Pending,
    /// Record the supplier's response for a pending outward
    Resolve {
        /// Reference number of the pending outward (e.g. OUT-5)
        #[arg(long = "ref")]
        reference: String,
        /// repair, replace, or reject
        #[arg(long)]
        result: String,
        /// New serial number (required for replace)
        #[arg(long)]
        new_serial: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
enum JobCommands {
    /// Open a customer job card
    Open {
        #[arg(long)]
        customer: String,
        #[arg(long)]
        part: String,
        #[arg(long)]
        mobile: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        fault: Option<String>,
        #[arg(long)]
        warranty: bool,
        #[arg(long)]
        purchase_date: Option<String>,
        #[arg(long)]
        invoice: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// List job cards still open
    Pending,
    /// Close a job card on customer delivery
    Close {
        /// Reference number of the open job card (e.g. JOB-100)
        #[arg(long = "ref")]
        reference: String,
        /// repair, replace, or reject
        #[arg(long)]
        result: String,
        #[arg(long)]
        new_serial: Option<String>,
        /// Service charges collected at delivery
        #[arg(long)]
        charges: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
enum ReportCommands {
    /// Supplier warranty reconciliation (outward vs inward)
    Warranty {
        /// Status tab: all, pending, or done
        #[arg(long, default_value = "all")]
        status: String,
        /// Case-insensitive substring filter
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Service job reconciliation (opened vs closed)
    Service {
        #[arg(long, default_value = "all")]
        status: String,
        #[arg(long, default_value = "")]
        query: String,
    },
}

#[derive(Subcommand)]
enum MasterCommands {
    /// Quick-add a master entry
    Add {
        #[arg(value_enum)]
        kind: MasterKindArg,
        #[arg(long)]
        name: String,
    },
    /// List a master
    List {
        #[arg(value_enum)]
        kind: MasterKindArg,
    },
}

fn main() {
    let cli = Cli::parse();

    let base_url = cli
        .url
        .or_else(|| env::var("PARTFLOW_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:5000".to_string());
    let branch = cli
        .branch
        .or_else(|| env::var("PARTFLOW_BRANCH").ok())
        .map(BranchId::new)
        .unwrap_or_default();
    let token = cli.token.or_else(|| env::var("PARTFLOW_API_TOKEN").ok());

    let command = match cli.command {
        Commands::Serve {
            port,
            token: serve_token,
        } => {
            run_server(port, serve_token.or(token));
            return;
        }
        other => other,
    };

    let session = SessionContext::new(token, branch);
    let api = client::ApiClient::new(base_url, session);

    let result = match command {
        Commands::Serve { .. } => unreachable!("handled above"),
        Commands::Outward { command } => match command {
            OutwardCommands::New {
                supplier,
                part,
                serial,
                fault,
                warranty,
                purchase_date,
                invoice,
                job_ref,
                from_job,
                date,
            } => commands::outward::cmd_new(
                &api,
                commands::outward::NewOutwardArgs {
                    supplier,
                    part,
                    serial,
                    fault,
                    warranty,
                    purchase_date,
                    invoice,
                    job_ref,
                    from_job,
                    date,
                },
                cli.output,
                cli.quiet,
            ),
            OutwardCommands::Pending => {
                commands::outward::cmd_pending(&api, cli.output, cli.quiet)
            }
            OutwardCommands::Resolve {
                reference,
                result,
                new_serial,
                date,
            } => commands::outward::cmd_resolve(
                &api,
                &reference,
                &result,
                new_serial,
                date,
                cli.output,
                cli.quiet,
            ),
        },
        Commands::Job { command } => match command {
            JobCommands::Open {
                customer,
                part,
                mobile,
                model,
                serial,
                fault,
                warranty,
                purchase_date,
                invoice,
                date,
            } => commands::job::cmd_open(
                &api,
                commands::job::OpenJobArgs {
                    customer,
                    part,
                    mobile,
                    model,
                    serial,
                    fault,
                    warranty,
                    purchase_date,
                    invoice,
                    date,
                },
                cli.output,
                cli.quiet,
            ),
            JobCommands::Pending => commands::job::cmd_pending(&api, cli.output, cli.quiet),
            JobCommands::Close {
                reference,
                result,
                new_serial,
                charges,
                date,
            } => commands::job::cmd_close(
                &api,
                &reference,
                &result,
                new_serial,
                charges,
                date,
                cli.output,
                cli.quiet,
            ),
        },
        Commands::Report { command } => match command {
            ReportCommands::Warranty { status, query } => commands::report::cmd_report(
                &api,
                commands::report::ReportSide::Warranty,
                &status,
                &query,
                cli.output,
                cli.quiet,
            ),
            ReportCommands::Service { status, query } => commands::report::cmd_report(
                &api,
                commands::report::ReportSide::Service,
                &status,
                &query,
                cli.output,
                cli.quiet,
            ),
        },
        Commands::Masters { command } => match command {
            MasterCommands::Add { kind, name } => {
                commands::masters::cmd_add(&api, kind, &name, cli.output, cli.quiet)
            }
            MasterCommands::List { kind } => {
                commands::masters::cmd_list(&api, kind, cli.output, cli.quiet)
            }
        },
    };

    if let Err(msg) = result {
        report_error(&msg, cli.output, cli.quiet);
        process::exit(1);
    }
}

fn run_server(port: u16, token: Option<String>) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: could not start async runtime: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(serve::start_server(port, token)) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Print an error in the selected output format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}
