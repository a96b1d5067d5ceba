use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use clap::{Parser, Subcommand};
use regdesk_api::RegdeskClient;
use regdesk_engine::{
    CheckoutError, CheckoutRequest, CheckoutWidget, FormState, PAYMENT_CONFIRMATION_PROMPT, PaymentId, PollOutcome,
    ResumeAction, ReturnParams, SubmissionError, SubmissionOutcome, Submitter, TicketView, Wizard, WizardConfig,
    assemble_draft, confirm_recovered_payment, decline_recovered_payment, plan_resume, poll_payment_status,
};
use regdesk_types::{PaymentMode, PaymentStatus, RegistrationDraft};
use regdesk_util::{JsonAttemptStore, RegdeskConfig, path_from_env_or_config_dir};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding where the TUI writes its log file.
const LOG_PATH_ENV: &str = "REGDESK_LOG_PATH";
const LOG_FILE_NAME: &str = "regdesk.log";

#[derive(Debug, Parser)]
#[command(name = "regdesk", version, about = "Event registration desk")]
struct Cli {
    /// Configuration file (defaults to ~/.config/regdesk/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit a registration from a YAML or JSON draft file
    Register {
        #[arg(long)]
        draft: PathBuf,
        /// Override the draft's payment mode (online or offline)
        #[arg(long)]
        mode: Option<PaymentMode>,
    },
    /// Finish or discard a payment attempt after visiting the checkout
    Resume {
        /// The URL the checkout returned to
        #[arg(long)]
        return_url: Option<String>,
        /// Register the stored attempt as paid without asking
        #[arg(long, conflicts_with = "decline")]
        assume_paid: bool,
        /// Discard the stored attempt
        #[arg(long)]
        decline: bool,
    },
    /// Show a ticket with its QR code
    Ticket {
        ticket_id: String,
        /// Also write the QR code as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Show the payment status of a registration
    Status {
        registration_id: String,
        /// Keep polling until the registration is paid
        #[arg(long)]
        watch: bool,
        #[arg(long, default_value_t = 3)]
        interval_secs: u64,
        #[arg(long, default_value_t = 20)]
        attempts: u32,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // The TUI owns the terminal, so its logs go to a file.
    init_tracing(cli.command.is_none())?;

    let config = Arc::new(load_config(cli.config.as_deref())?);
    let submitter = build_submitter(Arc::clone(&config))?;

    match cli.command {
        None => run_tui(submitter).await,
        Some(Command::Register { draft, mode }) => register(&submitter, &draft, mode).await,
        Some(Command::Resume {
            return_url,
            assume_paid,
            decline,
        }) => resume(&submitter, return_url.as_deref(), assume_paid, decline).await,
        Some(Command::Ticket { ticket_id, svg }) => ticket(&submitter, &ticket_id, svg.as_deref()).await,
        Some(Command::Status {
            registration_id,
            watch,
            interval_secs,
            attempts,
        }) => status(&submitter, &registration_id, watch, interval_secs, attempts).await,
        Some(Command::Config) => {
            println!("{}", serde_json::to_string_pretty(config.as_ref())?);
            Ok(())
        }
    }
}

fn init_tracing(to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if to_file {
        let path = path_from_env_or_config_dir(LOG_PATH_ENV, LOG_FILE_NAME);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating log directory {}", parent.display()))?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<RegdeskConfig> {
    let config = match path {
        Some(path) => {
            let mut config = RegdeskConfig::from_path(path)?;
            config.apply_env_overrides();
            config.validate()?;
            config
        }
        None => RegdeskConfig::load()?,
    };
    debug!(api = %config.api_base_url, strategy = ?config.online_strategy, "configuration loaded");
    Ok(config)
}

fn build_submitter(config: Arc<RegdeskConfig>) -> Result<Submitter> {
    let client = RegdeskClient::new(&config.api_base_url)?;
    Ok(Submitter::new(
        Arc::new(client),
        Arc::new(JsonAttemptStore::with_defaults()),
        config,
    ))
}

async fn run_tui(submitter: Submitter) -> Result<()> {
    let config = submitter.config();
    let startup = plan_resume(
        submitter.store(),
        &ReturnParams::default(),
        Utc::now(),
        config.staleness_window(),
    )
    .map_err(|error| anyhow::anyhow!(error.user_message()))?;
    info!(startup = ?startup, "launching wizard");
    regdesk_tui::run(submitter, startup).await
}

/// Reads the payment identifier from stdin after the user paid elsewhere.
struct StdinCheckout;

#[async_trait]
impl CheckoutWidget for StdinCheckout {
    async fn collect(&self, request: CheckoutRequest) -> Result<PaymentId, CheckoutError> {
        println!(
            "{}: {} for order {}",
            request.display_name,
            request.display_amount(),
            request.order_id
        );
        println!("Enter the payment ID once paid (leave empty to cancel):");
        let line = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| line)
        })
        .await
        .map_err(|error| CheckoutError::Failed(error.to_string()))?
        .map_err(|error| CheckoutError::Failed(error.to_string()))?;
        match line.trim() {
            "" => Err(CheckoutError::Cancelled),
            payment_id => Ok(PaymentId::new(payment_id)),
        }
    }
}

fn read_draft(path: &Path) -> Result<RegistrationDraft> {
    let content = fs::read_to_string(path).with_context(|| format!("reading draft {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("parsing draft {}", path.display()))
}

async fn register(submitter: &Submitter, draft_path: &Path, mode: Option<PaymentMode>) -> Result<()> {
    let mut draft = read_draft(draft_path)?;
    if let Some(mode) = mode {
        draft.payment_mode = mode;
    }
    let draft = match assemble_draft(&FormState::from_draft(&draft)) {
        Ok(draft) => draft,
        Err(errors) => {
            for error in &errors {
                eprintln!("{error}");
            }
            bail!("the draft has {} invalid field(s)", errors.len());
        }
    };

    let wizard = Wizard::new(WizardConfig::from(submitter.config()));
    let strategy = wizard.strategy_for(draft.payment_mode);
    match submitter.submit(draft, strategy, Some(&StdinCheckout)).await {
        Ok(SubmissionOutcome::Registered(confirmation)) => {
            println!("{}\n", confirmation.message);
            print_ticket(&confirmation.ticket);
            Ok(())
        }
        Ok(SubmissionOutcome::CheckoutStarted { checkout_url }) => {
            println!("Complete the payment at:\n  {checkout_url}");
            println!("Then run `regdesk resume --return-url <url>` with the address the checkout returned to.");
            Ok(())
        }
        Err(error) => Err(submission_failure(error)),
    }
}

async fn resume(submitter: &Submitter, return_url: Option<&str>, assume_paid: bool, decline: bool) -> Result<()> {
    let params = match return_url {
        Some(url) => ReturnParams::parse(url).with_context(|| format!("parsing return URL {url}"))?,
        None => ReturnParams::default(),
    };
    let action = plan_resume(
        submitter.store(),
        &params,
        Utc::now(),
        submitter.config().staleness_window(),
    )
    .map_err(submission_failure)?;

    let confirmation = match action {
        ResumeAction::CompletePayment(payment_id) => submitter.complete_redirect(payment_id).await,
        ResumeAction::PromptPaymentConfirmation if decline => {
            let mut wizard = Wizard::new(WizardConfig::from(submitter.config()));
            let mut form = FormState::default();
            decline_recovered_payment(submitter.store(), &mut wizard, &mut form).map_err(submission_failure)?;
            println!("Payment attempt discarded. Please register again.");
            return Ok(());
        }
        ResumeAction::PromptPaymentConfirmation if assume_paid => confirm_recovered_payment(submitter).await,
        ResumeAction::PromptPaymentConfirmation => {
            println!("{PAYMENT_CONFIRMATION_PROMPT}");
            println!("Re-run with --assume-paid or --decline.");
            return Ok(());
        }
        ResumeAction::SessionExpired => Err(SubmissionError::PaymentDataMissing),
        ResumeAction::Fresh => {
            println!("No pending payment attempt.");
            return Ok(());
        }
    }
    .map_err(submission_failure)?;

    println!("{}\n", confirmation.message);
    print_ticket(&confirmation.ticket);
    Ok(())
}

async fn ticket(submitter: &Submitter, ticket_id: &str, svg: Option<&Path>) -> Result<()> {
    let participant = submitter
        .backend()
        .participant(ticket_id)
        .await
        .map_err(|error| anyhow::anyhow!(error.user_message()))?;
    let view = TicketView::from_participant(&participant, submitter.config())?;
    print_ticket(&view);
    if let Some(path) = svg {
        fs::write(path, view.code.to_svg()).with_context(|| format!("writing {}", path.display()))?;
        println!("QR code written to {}", path.display());
    }
    Ok(())
}

async fn status(submitter: &Submitter, registration_id: &str, watch: bool, interval_secs: u64, attempts: u32) -> Result<()> {
    let backend = submitter.backend();
    if !watch {
        let status = backend
            .registration_status(registration_id)
            .await
            .map_err(|error| anyhow::anyhow!(error.user_message()))?;
        println!("Status:  {}", status.payment_status.label());
        if let Some(ticket_id) = status.ticket_id {
            println!("Ticket:  {ticket_id}");
        }
        return Ok(());
    }

    let outcome = poll_payment_status(backend, registration_id, Duration::from_secs(interval_secs), attempts.max(1))
        .await
        .map_err(|error| anyhow::anyhow!(error.user_message()))?;
    match outcome {
        PollOutcome::Paid { ticket_id } => {
            println!("Status:  {}", PaymentStatus::Paid.label());
            if let Some(ticket_id) = ticket_id {
                println!("Ticket:  {ticket_id}");
            }
        }
        PollOutcome::StillPending { attempts } => {
            println!("Payment still pending after {attempts} checks.");
        }
    }
    Ok(())
}

/// `render_text` already ends with the scannable code.
fn print_ticket(view: &TicketView) {
    println!("{}", view.render_text());
}

fn submission_failure(error: SubmissionError) -> anyhow::Error {
    debug!(error = ?error, "submission failed");
    if let Some(saved) = error.saved_confirmation() {
        println!("{}", saved.message);
        print_ticket(&saved.ticket);
    }
    anyhow::anyhow!(error.user_message())
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
    fn parses_register_with_mode() {
        let cli = Cli::try_parse_from(["regdesk", "register", "--draft", "me.yaml", "--mode", "offline"]).unwrap();
        match cli.command {
            Some(Command::Register { draft, mode }) => {
                assert_eq!(draft, PathBuf::from("me.yaml"));
                assert_eq!(mode, Some(PaymentMode::Offline));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn resume_flags_conflict() {
        assert!(Cli::try_parse_from(["regdesk", "resume", "--assume-paid", "--decline"]).is_err());
    }

    #[test]
    fn reads_yaml_draft() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.yaml");
        fs::write(
            &path,
            "name: Asha Rao\nemail: asha@example.com\nphone: '9876543210'\nwhatsapp: '9123456780'\n\
             college: City College\nyear: '2'\ndepartment: IT\nevents: [gaming]\npayment_mode: offline\n",
        )
        .unwrap();
        let draft = read_draft(&path).unwrap();
        assert_eq!(draft.payment_mode, PaymentMode::Offline);
        assert!(draft.events.contains("gaming"));
    }
}
