use std::time::Duration;

use at_app::cli;
use at_app::config_loader;
use at_app::shutdown_handler::ShutdownFlag;
use at_strategy::AiotradeStrategy;
use at_strategy::ParamStore;
use at_strategy::Strategy;
use at_strategy::loader::load_candles_csv;
use tracing::info;
use tracing::warn;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let _guard = at_app::tracing_setup::init_from_env("at_strategy", tracing::Level::INFO);

    let config_path = cli::config_path("config/strategy.toml");
    let config = config_loader::load_runner_config_or_default(&config_path);
    let poll_interval = Duration::from_secs(config.poll_interval_secs.max(1));

    let shutdown = ShutdownFlag::install()?;

    let mut strategy = AiotradeStrategy::new(ParamStore::in_dir(&config.user_data_dir));
    if config.timeframe != strategy.timeframe() {
        warn!(configured = %config.timeframe, strategy = strategy.timeframe(), "Timeframe mismatch, candles are evaluated as given");
    }
    info!(
        strategy = strategy.name(),
        version = AiotradeStrategy::VERSION,
        params = %strategy.store().path().display(),
        candles = %config.candles_path.display(),
        "Strategy runner started"
    );

    while shutdown.is_running() {
        strategy.bot_loop_start();

        match load_candles_csv(&config.candles_path) {
            Ok(candles) => {
                let signals = strategy.analyze(&candles);
                if let (Some(candle), Some(signal)) = (candles.last(), signals.last()) {
                    let risk = strategy.risk();
                    info!(
                        timestamp_ms = candle.timestamp_ms,
                        close = candle.close,
                        ?signal,
                        stoploss = risk.stoploss,
                        trailing_stop = risk.trailing_stop,
                        "Latest signal"
                    );
                }
            }
            Err(err) => warn!("Failed to load candles from {}: {err}", config.candles_path.display()),
        }

        shutdown.sleep(poll_interval);
    }

    info!("Strategy runner stopped");
    Ok(())
}
