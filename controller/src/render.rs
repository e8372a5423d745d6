use banking::model::account::LiveBalances;
use banking::model::deposit::DepositReceipt;
use banking::model::portfolio::Portfolio;
use banking::model::trader::Trader;
use banking::Address;
use banking_core::account::{shorten_address, AccountOverview};
use banking_core::copy_trading::CopyTradeTicket;
use banking_core::units::format_units;

pub fn print_overview(overview: &AccountOverview, account: Option<Address>) {
    println!("Mode: {}", overview.mode);
    if let Some(account) = account {
        println!("Account: {}", shorten_address(&account));
    }
    println!();
    println!("{:<18} {}", "Current", overview.current_balance);
    println!("{:<18} {}", "Savings", overview.savings_balance);
    println!("{:<18} {}", "Total deposits", overview.total_deposits);
    println!("{:<18} {}", "Credit limit", overview.credit_limit);
    println!("{:<18} {}", "Credit used", overview.credit_used);
    println!("{:<18} {}", "Available credit", overview.available_credit);

    if !overview.transactions.is_empty() {
        println!();
        println!("{:<12} | {:<12} | {:>10}", "DATE", "MERCHANT", "AMOUNT");
        println!("{:-<12}-+-{:-<12}-+-{:->10}", "", "", "");
        for tx in &overview.transactions {
            println!("{:<12} | {:<12} | {:>10.2}", tx.date, tx.merchant, tx.amount);
        }
    }
}

pub fn print_balances(balances: &LiveBalances, account: Address) {
    println!("Account: {}", shorten_address(&account));
    println!("{:<16} {:>14.2}", "USDC", balances.stable);
    println!("{:<16} {:>14.2}", "aUSDC (earning)", balances.yield_bearing);
    println!("{:<16} {:>14.2}", "Total", balances.total());
}

pub fn print_receipt(receipt: &DepositReceipt, explorer_url: &str) {
    let amount = format_units(receipt.amount, receipt.decimals)
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|_| receipt.amount.to_string());
    println!("Deposited {} from {}", amount, shorten_address(&receipt.depositor));
    println!("  approve: {}/tx/{}", explorer_url, receipt.approval.tx_hash);
    println!("  supply:  {}/tx/{}", explorer_url, receipt.supply.tx_hash);
}

pub fn print_portfolio(portfolio: &Portfolio) {
    println!(
        "{:<28} | {:>7} | {:>6} | {:>12}",
        "STRATEGY", "APY", "SHARE", "AMOUNT"
    );
    println!("{:-<28}-+-{:->7}-+-{:->6}-+-{:->12}", "", "", "", "");
    for entry in portfolio.entries() {
        println!(
            "{:<28} | {:>7} | {:>5.1}% | {:>12.2}",
            entry.strategy().name(),
            entry.strategy().apy(),
            entry.display_allocation(),
            entry.display_amount()
        );
    }
    println!();
    println!("Total value:        {:.2}", portfolio.total_value());
    println!("Weighted APY:       {:.2}%", portfolio.weighted_apy());
    println!("Projected (1 year): {:.2}", portfolio.projected_annual_yield());
}

pub fn print_traders(traders: &[Trader]) {
    println!(
        "{:>3} | {:<16} | {:<24} | {:>14} | {:>6} | {:>4} | {:<9}",
        "ID", "NAME", "STRATEGY", "MONTHLY PNL", "SHARPE", "WIN", "RISK"
    );
    println!(
        "{:->3}-+-{:-<16}-+-{:-<24}-+-{:->14}-+-{:->6}-+-{:->4}-+-{:-<9}",
        "", "", "", "", "", "", ""
    );
    for t in traders {
        let status = match (t.is_verified, t.is_active) {
            (_, false) => " (paused)",
            (true, true) => " (verified)",
            (false, true) => "",
        };
        println!(
            "{:>3} | {:<16} | {:<24} | {:>14.2} | {:>6.2} | {:>3}% | {:<9}{}",
            t.id, t.name, t.strategy, t.monthly_pnl, t.sharpe_ratio, t.win_rate, t.risk_level, status
        );
    }
}

pub fn print_ticket(ticket: &CopyTradeTicket) {
    println!("Ticket {}", ticket.id);
    println!("  trader:   {} (#{})", ticket.trader_name, ticket.trader_id);
    println!("  amount:   {:.2}", ticket.amount);
    println!("  expected: {:.2} / month", ticket.expected_monthly_return);
    println!("  opened:   {}", ticket.opened_at.to_rfc3339());
}
