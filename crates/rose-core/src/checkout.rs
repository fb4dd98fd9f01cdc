//! # Checkout
//!
//! Topping selection, the "first topping free" discount and the sale draft
//! that gets written to the database.
//!
//! ## Discount Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Fresas con crema  $5.000   (first topping discounted)                  │
//! │  + Fresas          $1.000                                               │
//! │  + Helado            $800                                               │
//! │                                                                         │
//! │  1. toppings total           = 1.000 + 800            = 1.800           │
//! │  2. eligible (not "helado")  = [Fresas 1.000]                           │
//! │  3. discount = max(eligible) = 1.000   (product eligible, set non-empty)│
//! │  4. total    = 5.000 + 1.800 − 1.000                  = 5.800           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Which products get the discount is a policy choice: the per-product flag
//! by default, or a product-name match for shops that key it off the menu
//! name instead. See [`DiscountEligibility`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PaymentMethod, Product, Topping};

// =============================================================================
// Policy
// =============================================================================

/// Decides whether a product takes the "first topping free" discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DiscountEligibility {
    /// The product's `first_topping_discounted` flag decides.
    ProductFlag,
    /// The product name (case-insensitive) contains `pattern`.
    NameContains { pattern: String },
}

impl Default for DiscountEligibility {
    fn default() -> Self {
        DiscountEligibility::ProductFlag
    }
}

/// A topping hidden from one product's picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferExclusion {
    pub product: String,
    pub topping: String,
}

/// Shop rules applied at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountPolicy {
    #[serde(default)]
    pub eligibility: DiscountEligibility,

    /// Topping names that never count towards the discount (lowercase match).
    #[serde(default = "default_excluded_toppings")]
    pub excluded_toppings: Vec<String>,

    /// Product/topping pairs that are never offered together.
    #[serde(default = "default_offer_exclusions")]
    pub offer_exclusions: Vec<OfferExclusion>,
}

fn default_excluded_toppings() -> Vec<String> {
    vec!["helado".to_string()]
}

fn default_offer_exclusions() -> Vec<OfferExclusion> {
    vec![OfferExclusion {
        product: "Malteadas".to_string(),
        topping: "Helado".to_string(),
    }]
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        DiscountPolicy {
            eligibility: DiscountEligibility::default(),
            excluded_toppings: default_excluded_toppings(),
            offer_exclusions: default_offer_exclusions(),
        }
    }
}

/// Catalog names compare case-insensitively, accents included ("MANÍ" == "maní").
fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl DiscountPolicy {
    /// Whether the product takes the "first topping free" discount.
    pub fn product_is_eligible(&self, product: &Product) -> bool {
        match &self.eligibility {
            DiscountEligibility::ProductFlag => product.first_topping_discounted,
            DiscountEligibility::NameContains { pattern } => product
                .name
                .to_lowercase()
                .contains(&pattern.to_lowercase()),
        }
    }

    /// Whether the topping may be the one made free.
    pub fn topping_is_eligible(&self, topping: &Topping) -> bool {
        !self
            .excluded_toppings
            .iter()
            .any(|excluded| same_name(excluded, &topping.name))
    }

    /// Whether the topping appears in this product's picker.
    pub fn is_offered(&self, product: &Product, topping: &Topping) -> bool {
        if !product.has_toppings {
            return false;
        }
        !self.offer_exclusions.iter().any(|ex| {
            same_name(&ex.product, &product.name) && same_name(&ex.topping, &topping.name)
        })
    }
}

/// Toppings from `catalog` shown in `product`'s picker (catalog order kept).
pub fn offered_toppings<'a>(product: &Product, catalog: &'a [Topping], policy: &DiscountPolicy) -> Vec<&'a Topping> {
    catalog
        .iter()
        .filter(|t| t.active.is_active() && policy.is_offered(product, t))
        .collect()
}

// =============================================================================
// Quote
// =============================================================================

/// Breakdown of a checkout total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutQuote {
    pub product_price: Money,
    pub toppings_total: Money,
    pub discount: Money,
    pub total: Money,
}

/// Computes the total for a product and its selected toppings.
///
/// Pure arithmetic with no failure cases; selection rules are checked
/// separately by [`prepare_sale`].
pub fn quote(product: &Product, toppings: &[Topping], policy: &DiscountPolicy) -> CheckoutQuote {
    let product_price = product.price();
    let toppings_total: Money = toppings.iter().map(Topping::price).sum();

    let most_expensive_eligible = toppings
        .iter()
        .filter(|t| policy.topping_is_eligible(t))
        .map(Topping::price)
        .max();

    let discount = match most_expensive_eligible {
        Some(price) if policy.product_is_eligible(product) => price,
        _ => Money::zero(),
    };

    CheckoutQuote {
        product_price,
        toppings_total,
        discount,
        total: product_price + toppings_total - discount,
    }
}

// =============================================================================
// Selection
// =============================================================================

/// The toppings picked for the product being sold, by id.
///
/// Behaves like the picker: tapping a topping adds it, tapping it again
/// removes it. Order of first selection is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToppingSelection {
    ids: Vec<i64>,
}

impl ToppingSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from a list of ids, dropping repeats.
    pub fn from_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        let mut selection = Self::new();
        for id in ids {
            if !selection.contains(id) {
                selection.ids.push(id);
            }
        }
        selection
    }

    /// Adds the topping if absent, removes it if present.
    pub fn toggle(&mut self, id: i64) {
        if let Some(pos) = self.ids.iter().position(|&t| t == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// =============================================================================
// Sale Draft
// =============================================================================

/// A topping line to insert alongside a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleLineDraft {
    pub topping_id: i64,
    pub price_at_sale: i64,
}

/// Everything needed to insert a sale, already priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDraft {
    pub product_id: i64,
    pub payment_method: PaymentMethod,
    pub quote: CheckoutQuote,
    pub lines: Vec<SaleLineDraft>,
}

/// Validates a selection against the product and prices it.
///
/// `toppings` are the resolved rows for the selection, in selection order.
///
/// ## Errors
/// - [`CoreError::ProductInactive`] / [`CoreError::ToppingInactive`]
/// - [`CoreError::ToppingsNotAllowed`] when the product takes no toppings
/// - [`CoreError::ToppingNotOffered`] for an excluded pair
pub fn prepare_sale(
    product: &Product,
    toppings: &[Topping],
    payment_method: Option<PaymentMethod>,
    policy: &DiscountPolicy,
) -> CoreResult<SaleDraft> {
    if !product.active.is_active() {
        return Err(CoreError::ProductInactive {
            name: product.name.clone(),
        });
    }
    if !toppings.is_empty() && !product.has_toppings {
        return Err(CoreError::ToppingsNotAllowed {
            product: product.name.clone(),
        });
    }
    for topping in toppings {
        if !topping.active.is_active() {
            return Err(CoreError::ToppingInactive {
                name: topping.name.clone(),
            });
        }
        if !policy.is_offered(product, topping) {
            return Err(CoreError::ToppingNotOffered {
                product: product.name.clone(),
                topping: topping.name.clone(),
            });
        }
    }

    Ok(SaleDraft {
        product_id: product.id,
        payment_method: payment_method.unwrap_or_default(),
        quote: quote(product, toppings, policy),
        lines: toppings
            .iter()
            .map(|t| SaleLineDraft {
                topping_id: t.id,
                price_at_sale: t.price,
            })
            .collect(),
    })
}

// =============================================================================
// Void
// =============================================================================

/// Prompt shown before a sale is voided.
pub const VOID_SALE_PROMPT: &str = "¿Estás seguro de eliminar esta venta?";

/// Voiding deletes the sale for good, so it needs an explicit yes.
pub fn confirm_void(confirmed: bool) -> CoreResult<()> {
    if confirmed {
        Ok(())
    } else {
        Err(CoreError::ConfirmationRequired {
            prompt: VOID_SALE_PROMPT.to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActiveFlag;

    fn product(price: i64, discounted: bool) -> Product {
        Product {
            id: 1,
            name: "Fresas con crema".to_string(),
            price,
            stock: 100,
            has_toppings: true,
            first_topping_discounted: discounted,
            active: ActiveFlag::Si,
        }
    }

    fn topping(id: i64, name: &str, price: i64) -> Topping {
        Topping {
            id,
            name: name.to_string(),
            price,
            active: ActiveFlag::Si,
        }
    }

    #[test]
    fn test_name_rules_fold_accented_case() {
        let policy = DiscountPolicy {
            eligibility: DiscountEligibility::ProductFlag,
            excluded_toppings: vec!["MANÍ".to_string()],
            offer_exclusions: vec![OfferExclusion {
                product: "AÇAÍ BOWL".to_string(),
                topping: "MANÍ".to_string(),
            }],
        };
        let mani = topping(1, "maní", 900);
        let oreo = topping(2, "Oreo", 800);
        let mut bowl = product(9000, true);
        bowl.name = "Açaí bowl".to_string();

        assert!(!policy.topping_is_eligible(&mani));
        assert!(policy.topping_is_eligible(&oreo));
        assert!(!policy.is_offered(&bowl, &mani));
        assert!(policy.is_offered(&bowl, &oreo));
        assert!(policy.is_offered(&product(5000, true), &mani));
    }

    #[test]
    fn test_helado_is_not_discount_eligible() {
        let q = quote(
            &product(5000, true),
            &[topping(1, "Fresas", 1000), topping(2, "Helado", 800)],
            &DiscountPolicy::default(),
        );
        assert_eq!(q.toppings_total, Money::from_units(1800));
        assert_eq!(q.discount, Money::from_units(1000));
        assert_eq!(q.total, Money::from_units(5800));
    }

    #[test]
    fn test_only_helado_selected_gets_no_discount() {
        let q = quote(&product(5000, true), &[topping(2, "HELADO", 800)], &DiscountPolicy::default());
        assert_eq!(q.discount, Money::zero());
        assert_eq!(q.total, Money::from_units(5800));
    }

    #[test]
    fn test_no_toppings_is_product_price() {
        let q = quote(&product(5000, true), &[], &DiscountPolicy::default());
        assert_eq!(q.discount, Money::zero());
        assert_eq!(q.total, Money::from_units(5000));
    }

    #[test]
    fn test_flag_off_means_no_discount() {
        let q = quote(
            &product(5000, false),
            &[topping(1, "Fresas", 1000), topping(3, "Oreo", 1500)],
            &DiscountPolicy::default(),
        );
        assert_eq!(q.discount, Money::zero());
        assert_eq!(q.total, Money::from_units(7500));
    }

    #[test]
    fn test_most_expensive_eligible_is_free() {
        let toppings = [
            topping(1, "Fresas", 1000),
            topping(3, "Oreo", 1500),
            topping(4, "Arequipe", 1500),
            topping(2, "Helado", 3000),
        ];
        let q = quote(&product(5000, true), &toppings, &DiscountPolicy::default());
        assert_eq!(q.discount, Money::from_units(1500));
        assert_eq!(q.total, Money::from_units(5000 + 7000 - 1500));
    }

    #[test]
    fn test_discount_bounds_hold_for_many_selections() {
        let catalog = [
            topping(1, "Fresas", 1000),
            topping(2, "Helado", 800),
            topping(3, "Oreo", 1500),
            topping(4, "Chips", 0),
        ];
        let policy = DiscountPolicy::default();
        for mask in 0u32..16 {
            let selected: Vec<Topping> = catalog
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, t)| t.clone())
                .collect();
            let q = quote(&product(5000, true), &selected, &policy);
            let max_eligible = selected
                .iter()
                .filter(|t| t.name != "Helado")
                .map(|t| t.price)
                .max()
                .unwrap_or(0);

            assert!(!q.discount.is_negative());
            assert_eq!(q.discount.units(), max_eligible);
            let sum: i64 = selected.iter().map(|t| t.price).sum();
            assert_eq!(q.total.units(), 5000 + sum - max_eligible);
        }
    }

    #[test]
    fn test_name_contains_eligibility() {
        let policy = DiscountPolicy {
            eligibility: DiscountEligibility::NameContains {
                pattern: "fresas".to_string(),
            },
            ..DiscountPolicy::default()
        };
        let q = quote(&product(5000, false), &[topping(3, "Oreo", 1500)], &policy);
        assert_eq!(q.discount, Money::from_units(1500));

        let mut other = product(5000, true);
        other.name = "Malteadas".to_string();
        let q = quote(&other, &[topping(3, "Oreo", 1500)], &policy);
        assert_eq!(q.discount, Money::zero());
    }

    #[test]
    fn test_malteadas_do_not_offer_helado() {
        let mut malteada = product(9000, false);
        malteada.name = "Malteadas".to_string();
        let catalog = vec![
            topping(1, "Fresas", 1000),
            topping(2, "Helado", 800),
            Topping {
                active: ActiveFlag::No,
                ..topping(5, "Mani", 500)
            },
        ];
        let policy = DiscountPolicy::default();

        let names: Vec<&str> = offered_toppings(&malteada, &catalog, &policy)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["Fresas"]);

        let offered_for_fresas = offered_toppings(&product(5000, true), &catalog, &policy);
        assert_eq!(offered_for_fresas.len(), 2);
    }

    #[test]
    fn test_selection_toggle_and_dedupe() {
        let mut sel = ToppingSelection::from_ids([3, 1, 3, 2]);
        assert_eq!(sel.ids(), &[3, 1, 2]);
        sel.toggle(1);
        assert_eq!(sel.ids(), &[3, 2]);
        sel.toggle(7);
        assert!(sel.contains(7));
        assert!(!ToppingSelection::new().contains(7));
    }

    #[test]
    fn test_prepare_sale_snapshots_prices_and_defaults_payment() {
        let draft = prepare_sale(
            &product(5000, true),
            &[topping(1, "Fresas", 1000), topping(2, "Helado", 800)],
            None,
            &DiscountPolicy::default(),
        )
        .unwrap();
        assert_eq!(draft.payment_method, PaymentMethod::Efectivo);
        assert_eq!(draft.quote.total, Money::from_units(5800));
        assert_eq!(
            draft.lines,
            vec![
                SaleLineDraft { topping_id: 1, price_at_sale: 1000 },
                SaleLineDraft { topping_id: 2, price_at_sale: 800 },
            ]
        );
    }

    #[test]
    fn test_prepare_sale_rejects_bad_selections() {
        let policy = DiscountPolicy::default();

        let mut inactive = product(5000, true);
        inactive.active = ActiveFlag::No;
        assert!(matches!(
            prepare_sale(&inactive, &[], None, &policy),
            Err(CoreError::ProductInactive { .. })
        ));

        let mut plain = product(3000, false);
        plain.has_toppings = false;
        assert!(prepare_sale(&plain, &[], Some(PaymentMethod::Transferencia), &policy).is_ok());
        assert!(matches!(
            prepare_sale(&plain, &[topping(1, "Fresas", 1000)], None, &policy),
            Err(CoreError::ToppingsNotAllowed { .. })
        ));

        let mut malteada = product(9000, false);
        malteada.name = "Malteadas".to_string();
        assert!(matches!(
            prepare_sale(&malteada, &[topping(2, "Helado", 800)], None, &policy),
            Err(CoreError::ToppingNotOffered { .. })
        ));
    }

    #[test]
    fn test_void_needs_confirmation() {
        assert!(confirm_void(true).is_ok());
        let err = confirm_void(false).unwrap_err();
        assert_eq!(err.to_string(), VOID_SALE_PROMPT);
    }
}
