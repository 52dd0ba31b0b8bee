//! Shipping and installment quotes.
//!
//! These run the same [`PricingPolicy`] code the storefront uses, so a quote
//! printed here matches what checkout charges.

use std::io::Write;

use mercado_core::{Cents, InstallmentQuote, PricingPolicy};

use super::CommandError;

/// Print the shipping fee and order total for a subtotal.
pub fn shipping(
    policy: &PricingPolicy,
    subtotal: Cents,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let shipping = policy.shipping_for(subtotal);
    writeln!(out, "Subtotal: {subtotal}")?;
    if shipping.is_zero() {
        writeln!(out, "Frete:    grátis")?;
    } else {
        writeln!(out, "Frete:    {shipping}")?;
    }
    writeln!(out, "Total:    {}", subtotal + shipping)?;
    Ok(())
}

/// Print one installment quote, or the full table when `installments` is
/// `None`.
pub fn installments(
    policy: &PricingPolicy,
    total: Cents,
    installments: Option<u32>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let quotes = match installments {
        Some(n) => vec![policy.quote_installments(total, n)?],
        None => policy.installment_options(total)?,
    };

    writeln!(out, "Total: {total}")?;
    for quote in &quotes {
        write_quote(quote, out)?;
    }
    Ok(())
}

fn write_quote(quote: &InstallmentQuote, out: &mut impl Write) -> Result<(), CommandError> {
    let interest = if quote.interest_cents.is_zero() {
        "sem juros".to_string()
    } else {
        format!("juros {}", quote.interest_cents)
    };
    writeln!(
        out,
        "{:>2}x {:>12}  total {:>12}  ({interest})",
        quote.installments,
        quote.per_installment_cents.to_string(),
        quote.total_with_interest_cents.to_string(),
    )?;
    Ok(())
}
