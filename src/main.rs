use std::sync::Arc;
use tokenpnl::config::{Config, RunMode};
use tokenpnl::{report, Analyzer, AppError, LedgerSource, SolanaRpcSource};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Configuration errors are fatal before any request is made
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            let e = AppError::from(e);
            eprintln!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = run(config).await {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(config: Config) -> Result<(), AppError> {
    let source: Arc<dyn LedgerSource> = Arc::new(SolanaRpcSource::new(config.rpc_url.clone()));
    let analyzer = Analyzer::from_config(source, &config);
    let account = config.history_account().clone();

    tracing::info!(
        account = %account,
        mint = %config.token_mint,
        mode = ?config.run_mode,
        "Starting analysis"
    );

    match config.run_mode {
        RunMode::Pnl => {
            let wallet = config
                .wallet
                .clone()
                .ok_or_else(|| AppError::Config("WALLET_ADDRESS is required".to_string()))?;
            let result = analyzer
                .analyze_wallet(&account, &wallet, &config.token_mint, config.base_decimals)
                .await;

            if let Some(path) = &config.trades_csv_path {
                report::write_trades_csv(path, &result.trades)?;
                tracing::info!(path = %path.display(), "Trade ledger written");
            }
            println!("{}", report::render_summary(&result)?);
        }
        RunMode::Holders => {
            let result = analyzer
                .discover_holders(&account, &config.token_mint)
                .await;
            report::write_holders(&config.output_path, &result.holders)?;
            tracing::info!(
                path = %config.output_path.display(),
                holders = result.holders.len(),
                "Holder list written"
            );
        }
    }

    Ok(())
}
