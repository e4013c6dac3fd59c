// Swap commands

use anyhow::{Context, Result};
use clap::Args;
use soda_sdk::soda_core::validation::SwapForm;
use soda_sdk::{QuoteOutcome, QuoteRequest, SodaClient};

use super::utils::{info, parse_addr, print_outcome, report, success, warn, with_progress};

#[derive(Args)]
pub struct QuoteCmd {
    /// Token to sell
    #[arg(long)]
    sell: String,

    /// Token to buy
    #[arg(long)]
    buy: String,

    /// Amount to sell (decimal)
    #[arg(long)]
    amount: String,
}

#[derive(Args)]
pub struct SwapCmd {
    #[arg(long)]
    sell: String,

    #[arg(long)]
    buy: String,

    #[arg(long)]
    amount: String,

    /// Slippage tolerance in percent (defaults to the configured value)
    #[arg(long)]
    slippage: Option<String>,
}

#[derive(Args)]
pub struct RevokeCmd {
    /// Token whose allowance is reset
    #[arg(long)]
    token: String,

    /// Spender (defaults to the swap router)
    #[arg(long)]
    spender: Option<String>,
}

pub async fn quote(cmd: QuoteCmd, client: &SodaClient) -> Result<()> {
    let sell = client.tokens.resolve(parse_addr(&cmd.sell)?);
    let buy = client.tokens.resolve(parse_addr(&cmd.buy)?);
    let route = client
        .pools
        .find_route(sell, buy)
        .await
        .context("No pool available for this pair")?;
    info(&format!("Route: {}", route.summary()));

    let request = QuoteRequest {
        token_in: client.tokens.metadata(sell).await,
        token_out: client.tokens.metadata(buy).await,
        route: route.index_path(),
        amount_in: cmd.amount.clone(),
    };
    match client.quotes.quote_latest(&request).await {
        QuoteOutcome::Fresh(Some(quote)) => success(&format!(
            "{} {} -> {} {}",
            cmd.amount, request.token_in.symbol, quote.formatted_out, request.token_out.symbol
        )),
        QuoteOutcome::Fresh(None) => warn("No quote available"),
        QuoteOutcome::Superseded => warn("Quote superseded by a newer request"),
    }
    Ok(())
}

pub async fn swap(cmd: SwapCmd, client: SodaClient) -> Result<()> {
    let slippage = cmd
        .slippage
        .unwrap_or_else(|| client.config.defaults.slippage_percent.to_string());
    let form = SwapForm {
        sell_token: cmd.sell,
        buy_token: cmd.buy,
        sell_amount: cmd.amount,
        slippage,
    };

    let client = with_progress(client);
    let (prepared, outcome) = client.swap(&form).await.map_err(report)?;
    success(&format!(
        "Sold {} {} for an estimated {} {}",
        form.sell_amount, prepared.token_in.symbol, prepared.quote.formatted_out, prepared.token_out.symbol
    ));
    print_outcome(&client, &outcome);
    Ok(())
}

pub async fn revoke(cmd: RevokeCmd, client: SodaClient) -> Result<()> {
    let token = parse_addr(&cmd.token)?;
    let spender = match cmd.spender {
        Some(spender) => parse_addr(&spender)?,
        None => client.swap.swap_router(),
    };
    info(&format!("Revoking allowance of {spender} on {token}..."));
    let client = with_progress(client);
    let outcome = client.revoke(token, spender).await.map_err(report)?;
    print_outcome(&client, &outcome);
    Ok(())
}
