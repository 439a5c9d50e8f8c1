//! Output rendering: JSON summary, holder list, trade ledger CSV.

use crate::domain::{Address, Trade};
use crate::pipeline::WalletReport;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// The summary printed at the end of a pnl run. Detail lists are left out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryView<'a> {
    wallet: &'a Address,
    mint: &'a Address,
    total_bought_quote: String,
    total_sold_quote: String,
    realized_pnl: String,
    remaining_token_quantity: String,
    unmatched_sell_quantity: String,
    trade_count: usize,
    open_lots: usize,
    partial_history: bool,
    failed_fetches: usize,
}

pub fn render_summary(report: &WalletReport) -> Result<String, ReportError> {
    let pnl = &report.pnl;
    let view = SummaryView {
        wallet: &report.wallet,
        mint: &report.mint,
        total_bought_quote: pnl.total_bought_quote.to_canonical_string(),
        total_sold_quote: pnl.total_sold_quote.to_canonical_string(),
        realized_pnl: pnl.realized_pnl.to_canonical_string(),
        remaining_token_quantity: pnl.remaining_token_quantity.to_canonical_string(),
        unmatched_sell_quantity: pnl.unmatched_sell_quantity.to_canonical_string(),
        trade_count: pnl.trade_count,
        open_lots: pnl.open_lots,
        partial_history: report.stats.partial_history,
        failed_fetches: report.stats.failed_fetches,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

/// One address per line.
pub fn write_holders(path: &Path, holders: &[Address]) -> Result<(), ReportError> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    for holder in holders {
        writeln!(file, "{}", holder)?;
    }
    file.flush()?;
    Ok(())
}

pub fn write_trades_csv(path: &Path, trades: &[Trade]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "signature",
        "time",
        "side",
        "token_amount",
        "quote_amount",
        "unit_price",
    ])?;
    for trade in trades {
        let time = trade
            .block_time
            .to_utc()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| trade.block_time.as_secs().to_string());
        writer.write_record([
            trade.signature.to_string(),
            time,
            trade.side.to_string(),
            trade.token_amount.to_canonical_string(),
            trade.quote_amount.to_canonical_string(),
            trade.unit_price.to_canonical_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
