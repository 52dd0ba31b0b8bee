//! Read-only product catalog.
//!
//! The catalog is seeded once at startup and never changes for the lifetime
//! of the process. Stock is informational: nothing in the cart or checkout
//! path decrements it.

use serde::{Deserialize, Serialize};

use crate::types::{Cents, ProductId};

/// A product offered by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub unit_price_cents: Cents,
    pub stock: u32,
    /// Path of the product image, relative to the static root.
    pub image_ref: String,
}

impl Product {
    /// Create a product.
    #[must_use]
    pub fn new(
        id: u32,
        name: impl Into<String>,
        unit_price_cents: i64,
        stock: u32,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            unit_price_cents: Cents::new(unit_price_cents),
            stock,
            image_ref: image_ref.into(),
        }
    }
}

/// The fixed set of products, ordered by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from arbitrary products.
    ///
    /// Products are sorted by id; later duplicates of an id are dropped.
    #[must_use]
    pub fn new(mut products: Vec<Product>) -> Self {
        products.sort_by_key(|p| p.id);
        products.dedup_by_key(|p| p.id);
        Self { products }
    }

    /// The grocery catalog the store ships with.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(vec![
            Product::new(1, "Arroz", 850, 50, "images/arroz.png"),
            Product::new(2, "Feijão", 650, 30, "images/feijao.png"),
            Product::new(3, "Açúcar", 450, 25, "images/açucar.png"),
            Product::new(4, "Café", 1200, 40, "images/cafe.png"),
            Product::new(5, "Leite", 380, 60, "images/leite.png"),
            Product::new(6, "Óleo", 750, 35, "images/oleo.png"),
            Product::new(7, "Sal", 250, 80, "images/sal.png"),
            Product::new(8, "Macarrão", 320, 45, "images/macarrao.png"),
            Product::new(9, "Farinha de Trigo", 480, 20, "images/farinha de trigo.png"),
            Product::new(10, "Biscoito", 550, 55, "images/biscoito.png"),
            Product::new(11, "Chocolate", 890, 15, "images/chocolate.png"),
            Product::new(12, "Cereal", 1150, 25, "images/cereal.png"),
            Product::new(13, "Molho de Tomate", 280, 40, "images/molho de tomate.png"),
            Product::new(14, "Manteiga", 680, 30, "images/manteiga.png"),
            Product::new(15, "Queijo Mussarela", 1250, 20, "images/queijo mussarela.png"),
            Product::new(16, "Presunto", 1580, 18, "images/presunto.png"),
            Product::new(17, "Água", 180, 100, "images/agua.png"),
            Product::new(18, "Refrigerante", 450, 35, "images/refrigerante.png"),
            Product::new(19, "Suco", 380, 40, "images/suco.png"),
            Product::new(20, "Arroz Integral", 950, 22, "images/arroz integral.png"),
        ])
    }

    /// All products, ordered by id.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .and_then(|idx| self.products.get(idx))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalog() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.products().len(), 20);

        let rice = catalog.find(ProductId::new(1)).unwrap();
        assert_eq!(rice.name, "Arroz");
        assert_eq!(rice.unit_price_cents, Cents::new(850));
    }

    #[test]
    fn test_find_unknown() {
        let catalog = Catalog::seeded();
        assert!(catalog.find(ProductId::new(0)).is_none());
        assert!(catalog.find(ProductId::new(999)).is_none());
    }

    #[test]
    fn test_new_sorts_and_dedups() {
        let catalog = Catalog::new(vec![
            Product::new(3, "C", 300, 1, "c.png"),
            Product::new(1, "A", 100, 1, "a.png"),
            Product::new(3, "C2", 999, 1, "c2.png"),
        ]);
        let ids: Vec<u32> = catalog.products().iter().map(|p| p.id.as_u32()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(catalog.find(ProductId::new(3)).is_some());
    }

    #[test]
    fn test_product_json_shape() {
        let json = serde_json::to_value(Product::new(1, "Arroz", 850, 50, "images/arroz.png"))
            .unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["unit_price_cents"], 850);
        assert_eq!(json["stock"], 50);
        assert_eq!(json["image_ref"], "images/arroz.png");
    }
}
