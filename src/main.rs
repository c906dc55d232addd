use std::sync::Arc;

use branch_report_bot::bot::{self, ReportBot};
use branch_report_bot::channels::{Channel, CliChannel, TelegramChannel};
use branch_report_bot::config::{BotConfig, ChannelKind};
use branch_report_bot::report::ReportService;
use branch_report_bot::scheduler::{self, DailySchedule};

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

    let config = BotConfig::from_env()?;
    let schedule = DailySchedule::new(&config.schedule)?;

    eprintln!("📋 Branch report bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Publish: daily at {} (UTC{})",
        config.schedule.display_time(),
        config.schedule.utc_offset
    );
    eprintln!("   Group chat: {}", config.group_chat_id);

    let channel: Arc<dyn Channel> = match config.channel {
        ChannelKind::Telegram => Arc::new(TelegramChannel::new(
            config.bot_token,
            config.skip_pending_updates,
        )),
        ChannelKind::Cli => Arc::new(CliChannel::new()),
    };

    if let Err(e) = channel.health_check().await {
        tracing::error!(channel = channel.name(), "Health check failed: {}", e);
        return Err(e.into());
    }
    eprintln!("   Channel: {}", channel.name());

    let service = Arc::new(ReportService::new(
        Arc::clone(&channel),
        config.group_chat_id,
    ));
    let _publisher = scheduler::spawn_daily_publisher(schedule, Arc::clone(&service));

    let bot = Arc::new(ReportBot::new(service, config.schedule.display_time()));

    tracing::info!("Bot started");
    let result = bot::run(Arc::clone(&channel), bot).await;
    channel.shutdown().await?;
    result?;

    Ok(())
}
