use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use expense_forms::generators::common::file_component;
use expense_forms::merge::bundle_with_receipts;
use expense_forms::model::Application;
use expense_forms::untis::{UntisClient, UntisSession};
use expense_forms::{Assembler, DocumentKind, FormsConfig, SynthesisOptions, Timetable};

/// Synthesizes the forms of one travel-expense application.
#[derive(Parser)]
#[command(name = "expense-forms", version, long_about = None)]
struct Cli {
    /// Application record as JSON
    application: PathBuf,

    /// Document kind, e.g. `class-absence` or `travel-invoice-sheet`
    kind: DocumentKind,

    /// Short id of the teacher for the per-teacher kinds
    teacher: Option<String>,

    /// Append the teacher's receipt scans to the travel invoice
    #[arg(long)]
    with_receipts: bool,
}

async fn open_session(config: &FormsConfig) -> Result<UntisSession> {
    let url = config
        .untis_url
        .as_deref()
        .context("UNTIS_URL must be set for timetable-backed forms")?;
    let user = std::env::var("UNTIS_USER").context("UNTIS_USER must be set")?;
    let password = std::env::var("UNTIS_PASSWORD").context("UNTIS_PASSWORD must be set")?;

    let client = UntisClient::new(url, &config.untis_client_name)?;
    Ok(client.authenticate(&user, &password).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = FormsConfig::from_env().context("invalid configuration")?;

    let raw = std::fs::read_to_string(&cli.application)
        .with_context(|| format!("failed to read {}", cli.application.display()))?;
    let app: Application = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid application", cli.application.display()))?;

    let session = match cli.kind {
        DocumentKind::ClassAbsence | DocumentKind::TeacherAbsence => {
            Some(open_session(&config).await?)
        }
        _ => None,
    };

    let assembler = Assembler::with_typst(config);
    let options = SynthesisOptions {
        teacher: cli.teacher.as_deref(),
        timetable: session.as_ref().map(|session| session as &dyn Timetable),
    };
    let result = assembler.synthesize(&app, cli.kind, options).await;

    if let Some(session) = session {
        if let Err(e) = session.logout().await {
            log::warn!("Timetable logout failed: {}", e);
        }
    }
    let mut paths = result?;

    if cli.with_receipts && cli.kind == DocumentKind::TravelInvoicePdf {
        let short = cli.teacher.as_deref().unwrap_or_default();
        let env = assembler.environment(&app)?;
        let bundle = format!(
            "travel_invoice_{}_with_receipts.pdf",
            file_component(short, "teacher")
        );
        if let Some(form) = paths.first().cloned() {
            paths.push(bundle_with_receipts(&env, &form, short, &bundle)?);
        }
    }

    for path in &paths {
        println!("{}", path.display());
    }
    Ok(())
}
