use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tally_ingest::ParsedStatement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

pub fn write_statement<W: Write>(out: W, stmt: &ParsedStatement, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(out, stmt),
        OutputFormat::Json => write_json(out, stmt),
        OutputFormat::Csv => write_csv(out, stmt),
    }
}

fn write_table<W: Write>(mut out: W, stmt: &ParsedStatement) -> Result<()> {
    let info = stmt.info();
    if let Some(account) = &info.account_number {
        writeln!(out, "Account: {account}")?;
    }
    if let Some(period) = &info.period {
        writeln!(out, "Period:  {} to {}", period.start, period.end)?;
    }

    writeln!(
        out,
        "{:<10}  {:<6}  {:>12}  {:>12}  {:<20}  {}",
        "DATE", "DIR", "AMOUNT", "BALANCE", "CATEGORY", "DESCRIPTION"
    )?;
    for t in stmt {
        let balance = t.balance.map(|b| b.to_string()).unwrap_or_default();
        writeln!(
            out,
            "{:<10}  {:<6}  {:>12}  {:>12}  {:<20}  {}",
            t.date.format("%Y-%m-%d").to_string(),
            t.direction.as_str(),
            t.amount.to_string(),
            balance,
            t.category.as_deref().unwrap_or("-"),
            t.description
        )?;
    }

    let credits = stmt.iter().filter(|t| t.is_credit()).count();
    writeln!(
        out,
        "\n{} transactions ({} credits, {} debits)",
        stmt.len(),
        credits,
        stmt.len() - credits
    )?;
    for d in stmt.diagnostics() {
        writeln!(out, "skipped {d}")?;
    }
    Ok(())
}

fn write_json<W: Write>(mut out: W, stmt: &ParsedStatement) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, stmt).context("serialize statement")?;
    writeln!(out)?;
    Ok(())
}

fn write_csv<W: Write>(out: W, stmt: &ParsedStatement) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record([
        "date",
        "description",
        "direction",
        "amount",
        "fee",
        "balance",
        "category",
        "reference",
    ])?;
    for t in stmt {
        w.write_record([
            t.date.format("%Y-%m-%d").to_string(),
            t.description.clone(),
            t.direction.as_str().to_string(),
            t.amount.to_string(),
            t.fee.to_string(),
            t.balance.map(|b| b.to_string()).unwrap_or_default(),
            t.category.clone().unwrap_or_default(),
            t.reference.clone(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
