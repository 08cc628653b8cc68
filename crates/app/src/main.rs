mod logging;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use radar_core::common::time::RealTimeProvider;
use radar_core::config::AppConfig;
use radar_feed::http::build_client;
use radar_feed::wikipedia::WikipediaConstituents;
use radar_feed::yahoo::YahooProvider;
use radar_scanner::history::HistoryFetcher;
use radar_scanner::indicator::IndicatorEngine;
use radar_scanner::scan::Scanner;
use radar_scanner::signal::SignalEvaluator;
use radar_scanner::universe::UniverseResolver;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

// 工作目录下的可选配置文件 (radar.toml / radar.json / ...)
const CONFIG_FILE: &str = "radar";
// 环境变量覆盖，例如 RADAR__SCAN__CONCURRENCY=8
const ENV_PREFIX: &str = "RADAR";

/// # Summary
/// 在给定的文件来源之上叠加环境变量，并反序列化为 `AppConfig`。
///
/// 未出现的字段取 `AppConfig` 的默认值。
fn load_config(base: ConfigBuilder<DefaultState>) -> Result<AppConfig, ConfigError> {
    base.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
    .build()?
    .try_deserialize()
}

/// # Summary
/// 应用启动入口，纯粹的装配层。
///
/// # Logic
/// 1. 安装 rustls 加密后端，加载配置，初始化日志。
/// 2. 实例化基础设施层（HTTP 客户端、Yahoo、Wikipedia）。
/// 3. 解析标的池并按 `max_symbols` 截断。
/// 4. 组装流水线并执行扫描。
/// 5. 以 JSON 数组输出排序后的机会列表到 stdout。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        return Err("Failed to install rustls crypto provider".into());
    }

    let config = load_config(
        Config::builder().add_source(File::with_name(CONFIG_FILE).required(false)),
    )?;
    let _guard = logging::init(&config.log)?;
    info!("Radar scanner starting...");

    // 基础设施层
    let client = build_client(Duration::from_secs(config.feed.request_timeout_secs))?;
    let provider = Arc::new(YahooProvider::new(client.clone()));
    let constituents = Arc::new(WikipediaConstituents::new(
        client,
        config.universe.constituents_url.clone(),
    ));

    // 标的池
    let resolver = UniverseResolver::new(constituents, config.universe.seed_symbols.clone());
    let universe = resolver.resolve().await;
    let limit = config.scan.max_symbols.unwrap_or(universe.len());
    info!(
        "Scanning {} of {} symbols with {} workers",
        limit.min(universe.len()),
        universe.len(),
        config.scan.concurrency
    );

    // 流水线
    let fetcher = HistoryFetcher::new(
        provider,
        Arc::new(RealTimeProvider),
        config.scan.timeframe,
        config.scan.lookback_months,
        config.history.clone(),
    );
    let scanner = Scanner::new(
        fetcher,
        IndicatorEngine::new(config.indicators.clone()),
        SignalEvaluator::new(config.signals.clone()),
    );

    let opportunities = scanner
        .scan(universe.into_iter().take(limit), config.scan.concurrency)
        .await;

    println!("{}", serde_json::to_string_pretty(&opportunities)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use radar_core::common::TimeFrame;

    #[test]
    fn test_load_config_from_toml() {
        let toml = r#"
            [scan]
            concurrency = 12
            timeframe = "1wk"
            max_symbols = 40

            [signals]
            min_score = 3

            [signals.weights]
            oversold = 4

            [log]
            directory = "logs"
        "#;
        let config = load_config(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
        .unwrap();

        assert_eq!(config.scan.concurrency, 12);
        assert_eq!(config.scan.timeframe, TimeFrame::Week1);
        assert_eq!(config.scan.max_symbols, Some(40));
        assert_eq!(config.scan.lookback_months, 3);
        assert_eq!(config.signals.min_score, 3);
        assert_eq!(config.signals.weights.oversold, 4);
        assert_eq!(config.signals.weights.macd_cross, 2);
        assert_eq!(config.log.directory.as_deref(), Some("logs"));
        assert_eq!(config.history.min_bars, 20);
    }

    #[test]
    fn test_load_config_without_sources_uses_defaults() {
        let config = load_config(Config::builder()).unwrap();

        assert_eq!(config.scan.concurrency, 5);
        assert_eq!(config.feed.request_timeout_secs, 10);
        assert_eq!(config.universe.seed_symbols.len(), 18);
    }
}
