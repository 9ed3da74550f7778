use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::ledger::{Ledger, Product, ProductDraft, ProductPatch};
use crate::money;

/// Registry operations over the product set. All stock changes anywhere in
/// the crate go through [`ProductService::adjust_stock`], which owns the
/// floor-at-zero rule.
pub struct ProductService;

impl ProductService {
    pub fn add(ledger: &mut Ledger, draft: ProductDraft) -> Result<Uuid> {
        Self::validate(&draft.name, draft.cost_price, draft.sale_price)?;
        let product = Product::new(ProductDraft {
            name: draft.name.trim().to_string(),
            ..draft
        });
        let id = product.id;
        ledger.products.push(product);
        ledger.touch();
        Ok(id)
    }

    /// Applies a partial update. The merged result is validated before any
    /// field is written, so a bad patch leaves the product untouched.
    pub fn update(ledger: &mut Ledger, id: Uuid, patch: ProductPatch) -> Result<()> {
        let merged = {
            let current = ledger
                .product(id)
                .ok_or_else(|| LedgerError::ProductNotFound(id.to_string()))?;
            ProductDraft {
                name: patch.name.unwrap_or_else(|| current.name.clone()),
                initial_stock: patch.initial_stock.unwrap_or(current.initial_stock),
                current_stock: patch.current_stock.unwrap_or(current.current_stock),
                cost_price: patch.cost_price.unwrap_or(current.cost_price),
                sale_price: patch.sale_price.unwrap_or(current.sale_price),
                min_stock: Some(patch.min_stock.unwrap_or(current.min_stock)),
            }
        };
        Self::validate(&merged.name, merged.cost_price, merged.sale_price)?;

        let product = ledger
            .product_mut(id)
            .ok_or_else(|| LedgerError::ProductNotFound(id.to_string()))?;
        product.name = merged.name.trim().to_string();
        product.initial_stock = merged.initial_stock;
        product.current_stock = merged.current_stock;
        product.cost_price = merged.cost_price;
        product.sale_price = merged.sale_price;
        product.min_stock = merged.min_stock.unwrap_or(product.min_stock);
        product.margin_percent = money::margin_percent(merged.cost_price, merged.sale_price);
        ledger.touch();
        Ok(())
    }

    /// Removes a product. Refused while non-voided sales or purchases still
    /// reference it; voided history keeps the snapshotted name and does not
    /// block.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> Result<()> {
        if ledger.has_active_records_for(id) {
            return Err(LedgerError::InvalidInput(
                "product has active sales or purchases; void them first".into(),
            ));
        }
        let before = ledger.products.len();
        ledger.products.retain(|product| product.id != id);
        if ledger.products.len() == before {
            return Err(LedgerError::ProductNotFound(id.to_string()));
        }
        ledger.touch();
        Ok(())
    }

    pub fn find(ledger: &Ledger, id: Uuid) -> Option<&Product> {
        ledger.product(id)
    }

    /// Case-insensitive substring match over names, in registry order.
    pub fn search<'a>(ledger: &'a Ledger, needle: &str) -> Vec<&'a Product> {
        let needle = needle.trim().to_lowercase();
        ledger
            .products
            .iter()
            .filter(|product| product.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Applies a signed stock delta, clamping the result at zero. Returns
    /// the new stock level.
    pub fn adjust_stock(ledger: &mut Ledger, id: Uuid, delta: i64) -> Result<u32> {
        let product = ledger
            .product_mut(id)
            .ok_or_else(|| LedgerError::ProductNotFound(id.to_string()))?;
        let next = (product.current_stock as i64 + delta).max(0);
        product.current_stock = next as u32;
        let level = product.current_stock;
        ledger.touch();
        Ok(level)
    }

    fn validate(name: &str, cost_price: f64, sale_price: f64) -> Result<()> {
        if name.trim().is_empty() {
            return Err(LedgerError::InvalidInput("product name is required".into()));
        }
        if cost_price <= 0.0 {
            return Err(LedgerError::InvalidInput(
                "cost price must be positive".into(),
            ));
        }
        if sale_price <= 0.0 {
            return Err(LedgerError::InvalidInput(
                "sale price must be positive".into(),
            ));
        }
        Ok(())
    }
}
