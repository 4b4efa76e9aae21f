use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use whatsblast::campaign::Campaign;
use whatsblast::config::Config;
use whatsblast::links::LoggingOpener;
use whatsblast::models::Prospect;
use whatsblast::sources::{JsonFileSource, ProspectSource};
use whatsblast::state::JsonFileStore;
use whatsblast::store::ViewMode;

/// Main entry point for the WhatsBlast CLI.
///
/// Initializes logging and configuration, loads and adapts the prospect
/// list, restores the persisted session (template + sent set) and
/// dispatches a single command:
///
/// - `stats` (default): totals, progress and filter options
/// - `list [pending|sent] [column=value]...`: visible prospects
/// - `preview <id>`: rendered message for one prospect
/// - `send <id>`: build the wa.me link, mark the prospect sent
/// - `template <text>`: save a new message template
fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "whatsblast=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Load and adapt the prospect list
    let source = JsonFileSource::new(&config.prospects_path);
    let prospects: Vec<Prospect> = source.fetch()?.iter().map(Prospect::from_source).collect();
    tracing::info!("Adapted {} prospects", prospects.len());

    // Restore the persisted session
    let store = JsonFileStore::new(&config.state_path);
    let mut campaign = Campaign::new(
        prospects,
        config.filter_columns.clone(),
        config.default_template.clone(),
        store,
        LoggingOpener,
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let now = chrono::Utc::now();

    match args.first().map(String::as_str) {
        None | Some("stats") => {
            let stats = campaign.stats();
            println!("Prospectos: {}", stats.total);
            println!("Pendientes: {}", stats.pending);
            println!("Enviados esta sesión: {}", stats.sent_this_session);
            println!("Progreso: {}%", stats.progress_pct);
            for (column, values) in campaign.filter_options() {
                println!("Filtro {}: {}", column, values.join(" | "));
            }
        }
        Some("list") => {
            let mode = match args.get(1).map(String::as_str) {
                Some("sent") => ViewMode::Sent,
                _ => ViewMode::Pending,
            };
            for arg in args.iter().skip(1) {
                if let Some((column, value)) = arg.split_once('=') {
                    campaign.set_filter(column, value)?;
                }
            }
            for prospect in campaign.visible(mode) {
                let phone = if prospect.phone.is_empty() {
                    "sin teléfono"
                } else {
                    prospect.phone.as_str()
                };
                println!("{}  {}  {}", prospect.id, prospect.display_name(), phone);
            }
        }
        Some("preview") => {
            let id = args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("usage: whatsblast preview <id>"))?;
            println!("{}", campaign.preview(id)?);
        }
        Some("send") => {
            let id = args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("usage: whatsblast send <id>"))?;
            match campaign.send(id, now) {
                Ok(outcome) => {
                    if !outcome.newly_sent {
                        tracing::info!("Prospect {} was already in the sent set", id);
                    }
                }
                Err(e) => tracing::error!("Send failed: {}", e),
            }
            for notification in campaign.notifications() {
                println!("[{:?}] {}", notification.severity, notification.message);
            }
        }
        Some("template") => {
            let text = args[1..].join(" ");
            if text.trim().is_empty() {
                anyhow::bail!("usage: whatsblast template <text>");
            }
            campaign.save_template(&text, now)?;
            println!("Plantilla guardada");
        }
        Some(other) => {
            anyhow::bail!(
                "unknown command '{}' (expected stats, list, preview, send or template)",
                other
            );
        }
    }

    Ok(())
}
