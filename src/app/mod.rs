//! Service wiring and startup.

use crate::api::{ApiServer, AppState};
use crate::config::{Config, SummarizerConfig, TranscriptionConfig};
use crate::db::Database;
use crate::notify::{Dispatcher, SmtpMailer};
use crate::pipeline::Pipeline;
use crate::summarizer::{DeepSeekClient, Summarizer};
use crate::transcription::{Language, ScribeProvider, Transcriber};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub async fn run_service() -> Result<()> {
    info!("Starting minuted service");

    let config = Config::load()?;

    // The persistence handle is opened exactly once here and injected
    // everywhere; it lives until process exit.
    let db_path = match &config.database.path {
        Some(path) => path.clone(),
        None => crate::global::db_file()?,
    };
    let db = Database::open(&db_path)?;

    let transcriber = Arc::new(build_transcriber(&config.transcription)?);
    let summarizer = Arc::new(build_summarizer(&config.summarizer)?);

    let dispatcher = if config.email.enabled {
        let mailer = SmtpMailer::from_config(&config.email)?;
        Some(Arc::new(Dispatcher::new(Arc::new(mailer), db.clone())))
    } else {
        info!("Email notifications disabled");
        None
    };

    let language = Language::parse_lossy(
        config
            .transcription
            .language
            .as_deref()
            .unwrap_or("hinglish"),
    );

    let pipeline = Arc::new(Pipeline::new(
        db.clone(),
        Arc::clone(&transcriber),
        summarizer,
        dispatcher,
        language,
        config.server.dashboard_base_url.clone(),
    ));

    let state = AppState {
        db,
        pipeline,
        transcriber,
        deployment: config.server.deployment,
        default_language: language,
    };

    info!("Minuted is ready!");

    ApiServer::new(state, config.server.port).start().await
}

fn build_transcriber(config: &TranscriptionConfig) -> Result<Transcriber> {
    let provider = ScribeProvider::new(
        config.api_key.clone(),
        config.api_endpoint.clone(),
        config.model.clone(),
    )?;

    Ok(Transcriber::new(
        Box::new(provider),
        config.fallback_confidence,
    ))
}

fn build_summarizer(config: &SummarizerConfig) -> Result<Summarizer> {
    let model = DeepSeekClient::new(
        config.api_key.clone(),
        config.api_endpoint.clone(),
        config.model.clone(),
    )?;

    Summarizer::new(Box::new(model))
}
