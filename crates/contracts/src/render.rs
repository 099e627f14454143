//! Text projections of contracts (Markdown report, listing table).
//!
//! Pure functions: no I/O and no error path. Every field may be empty; empty
//! optional fields simply drop their line.

use core::fmt::Write;

use crate::contract::Contract;

/// Render a contract as a Markdown report.
///
/// ```text
/// # Contract Details
///
/// ## Contract TEST-001
/// Title: Test Contract
/// Status: active
///
/// ### Parties
/// * A (Client)
///   - Email: a@x.com
///
/// ### Terms
/// * Period: 2024-01-01 to 2024-12-31
/// * Value: 1000.00 USD
/// ```
pub fn render_markdown(contract: &Contract) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_markdown(&mut out, contract);
    out
}

fn write_markdown(out: &mut String, contract: &Contract) -> core::fmt::Result {
    out.push_str("# Contract Details\n\n");
    writeln!(out, "## Contract {}", contract.id)?;
    if !contract.title.is_empty() {
        writeln!(out, "Title: {}", contract.title)?;
    }
    write!(out, "Status: {}\n\n", contract.status)?;

    if !contract.parties.is_empty() {
        out.push_str("### Parties\n");
        for party in &contract.parties {
            writeln!(out, "* {} ({})", party.name, party.role)?;
            if !party.email.is_empty() {
                writeln!(out, "  - Email: {}", party.email)?;
            }
        }
        out.push('\n');
    }

    let terms = &contract.terms;
    out.push_str("### Terms\n");
    if terms.has_period() {
        writeln!(out, "* Period: {} to {}", terms.start_date, terms.end_date)?;
    }
    if terms.value > 0.0 {
        writeln!(out, "* Value: {:.2} {}", terms.value, terms.currency)?;
    }
    Ok(())
}

const ID_WIDTH: usize = 15;
const TITLE_WIDTH: usize = 20;
const STATUS_WIDTH: usize = 10;

/// Render stored contracts as a fixed-width `ID / Title / Status` table.
pub fn render_listing(contracts: &[Contract]) -> String {
    let mut out = String::from("Contracts in database:\n");
    write_row(&mut out, "ID", "Title", "Status");
    out.push_str(&"-".repeat(ID_WIDTH + TITLE_WIDTH + STATUS_WIDTH));
    out.push('\n');
    for contract in contracts {
        write_row(&mut out, contract.id.as_str(), &contract.title, &contract.status);
    }
    out
}

fn write_row(out: &mut String, id: &str, title: &str, status: &str) {
    let _ = writeln!(
        out,
        "{id:<w_id$} {title:<w_title$} {status:<w_status$}",
        w_id = ID_WIDTH,
        w_title = TITLE_WIDTH,
        w_status = STATUS_WIDTH,
    );
}
