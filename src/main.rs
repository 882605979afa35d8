use std::sync::Arc;
use std::time::Duration;

use lead_assist::bus::ChatBus;
use lead_assist::cli::CliSurface;
use lead_assist::config::AssistantConfig;
use lead_assist::flow::engine::Conversation;
use lead_assist::flow::script::Script;
use lead_assist::lookup::CityIndex;
use lead_assist::session::{ChatSession, ChatSurface, SessionConfig};
use lead_assist::submit::WebhookSink;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = match AssistantConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("  export LEAD_ASSIST_WEBHOOK_URL=https://hooks.example.com/lead");
            std::process::exit(1);
        }
    };

    eprintln!("🤖 Lead Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Webhook: {}", config.webhook_url);
    eprintln!("   Origem: {}", config.origin);
    eprintln!(
        "   Fluxo: serviço={}, documento={}, cidade={}",
        config.flow.collect_service, config.flow.collect_document, config.flow.check_city
    );
    eprintln!("   Comandos: /reiniciar para recomeçar, /sair para encerrar.\n");

    let client = reqwest::Client::new();

    // City reference list. Unreachable just means permissive validation.
    let cities = if config.flow.check_city {
        match CityIndex::fetch(&client, &config.city_url).await {
            Ok(index) => {
                eprintln!("   Cidades: {} municípios carregados", index.len());
                Some(Arc::new(index))
            }
            Err(e) => {
                tracing::warn!(error = %e, "City reference unavailable, accepting any city");
                None
            }
        }
    } else {
        None
    };

    let bus = ChatBus::new();
    // Subscribe before anything can publish, or the signal is lost.
    let mut signals = bus.subscribe();

    if config.nudge_after_secs > 0 && !config.auto_open {
        let nudge_bus = bus.clone();
        let wait = Duration::from_secs(config.nudge_after_secs);
        tokio::spawn(async move {
            // The nudge only suggests; opening stays with the visitor.
            if !nudge_bus.opened_within(wait).await {
                eprintln!("\n💬 Posso te ajudar a encontrar a solução ideal para sua empresa?");
            }
        });
    }

    let mut surface = CliSurface::new();

    if config.auto_open {
        bus.open();
        let _ = signals.recv().await;
    } else {
        eprintln!("   Pressione Enter para falar com o assistente.");
        tokio::select! {
            _ = signals.recv() => {}
            line = surface.read_line() => {
                if line.is_none() {
                    tracing::debug!("Input closed before the chat opened");
                    return Ok(());
                }
                bus.open();
            }
        }
    }

    let conversation = Conversation::new(Script::new(config.flow), cities);
    let sink = WebhookSink::with_client(client, config.webhook_url.clone());
    let session_config = SessionConfig {
        origin: config.origin.clone(),
        typing_delays: config.typing_delays,
    };

    let finished = ChatSession::with_config(conversation, surface, sink, session_config)
        .run()
        .await;

    tracing::info!(step = %finished.step(), "Conversation ended");
    eprintln!("\n👋 Até a próxima!");

    Ok(())
}
