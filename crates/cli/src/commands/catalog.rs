//! Catalog listing.

use std::io::Write;

use mercado_core::Catalog;

use super::CommandError;

/// Print every product as an aligned table.
pub fn list(catalog: &Catalog, out: &mut impl Write) -> Result<(), CommandError> {
    writeln!(out, "{:>3}  {:<20} {:>12} {:>6}", "ID", "PRODUTO", "PREÇO", "ESTOQUE")?;
    for product in catalog.products() {
        writeln!(
            out,
            "{:>3}  {:<20} {:>12} {:>6}",
            product.id.as_u32(),
            product.name,
            product.unit_price_cents.to_string(),
            product.stock
        )?;
    }
    tracing::debug!(count = catalog.products().len(), "Listed catalog");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_seeded_catalog() {
        let mut out = Vec::new();
        list(&Catalog::seeded(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 21);
        assert!(text.contains("Arroz"));
        assert!(text.contains("R$ 8,50"));
        assert!(text.lines().last().unwrap().contains("Arroz Integral"));
    }
}
