//! Submission validation and normalization
//!
//! One pass over the raw submission collecting *every* failing check,
//! so a client can correct all issues at once. Any single failure
//! aborts the whole submission; there are no partial orders.
//!
//! Check order (per field error list):
//! 1. line items reference existing, available items of this restaurant
//! 2. quantities are positive integers
//! 3. modifiers are legal for their parent item
//! 4. declared subtotal/tax/tip/total reconcile exactly (reject on
//!    mismatch, never silently recompute)
//! 5. channel-specific required fields are present

use crate::catalog::CatalogService;
use crate::tenant::TenantContext;
use crate::utils::validation::{MAX_CUSTOMER_NAME_LEN, MAX_NOTE_LEN, MAX_TABLE_LEN, sanitize_text};
use shared::error::{ErrorCode, FieldError};
use shared::order::{
    Cents, LineItem, ModifierSnapshot, NormalizedOrder, OrderSubmission,
};
use shared::util::new_id;

use super::money::{checked_line_total, checked_sum};

/// Validate a raw submission against the resolved tenant's catalog
///
/// Returns the normalized order with price snapshots, or the complete
/// set of field errors.
pub fn validate_submission(
    ctx: &TenantContext,
    catalog: &CatalogService,
    submission: &OrderSubmission,
) -> Result<NormalizedOrder, Vec<FieldError>> {
    let mut errors: Vec<FieldError> = Vec::new();
    let restaurant_id = ctx.restaurant_id();

    if submission.items.is_empty() {
        errors.push(FieldError::new(
            "items",
            ErrorCode::OrderEmpty,
            "order must contain at least one line item",
        ));
    }

    // ── Line items ──────────────────────────────────────────────────
    let mut items: Vec<LineItem> = Vec::with_capacity(submission.items.len());
    let mut items_resolved = true;

    for (idx, input) in submission.items.iter().enumerate() {
        let field = |name: &str| format!("items[{idx}].{name}");

        if input.quantity <= 0 {
            errors.push(FieldError::new(
                field("quantity"),
                ErrorCode::ValueOutOfRange,
                "quantity must be a positive integer",
            ));
            items_resolved = false;
        }

        let Some(menu_item) = catalog.find_item(restaurant_id, &input.menu_item_id) else {
            // Missing and foreign items are indistinguishable by design
            errors.push(FieldError::new(
                field("menu_item_id"),
                ErrorCode::MenuItemNotFound,
                format!("menu item {} not found", input.menu_item_id),
            ));
            items_resolved = false;
            continue;
        };

        if !menu_item.available {
            errors.push(FieldError::new(
                field("menu_item_id"),
                ErrorCode::MenuItemUnavailable,
                format!("menu item {} is not available", menu_item.name),
            ));
            items_resolved = false;
        }

        let mut modifiers: Vec<ModifierSnapshot> = Vec::with_capacity(input.modifier_ids.len());
        for (m_idx, modifier_id) in input.modifier_ids.iter().enumerate() {
            match menu_item.modifier(modifier_id) {
                Some(modifier) => modifiers.push(ModifierSnapshot {
                    modifier_id: modifier.id.clone(),
                    name: modifier.name.clone(),
                    price_delta: modifier.price_delta,
                }),
                None => {
                    errors.push(FieldError::new(
                        format!("items[{idx}].modifier_ids[{m_idx}]"),
                        ErrorCode::ModifierNotAllowed,
                        format!("modifier {} is not allowed for {}", modifier_id, menu_item.name),
                    ));
                    items_resolved = false;
                }
            }
        }

        let special_instructions = match &input.special_instructions {
            Some(text) => {
                if text.len() > MAX_NOTE_LEN {
                    errors.push(FieldError::new(
                        field("special_instructions"),
                        ErrorCode::ValidationFailed,
                        format!("special instructions exceed {MAX_NOTE_LEN} characters"),
                    ));
                    items_resolved = false;
                    None
                } else {
                    sanitize_text(text)
                }
            }
            None => None,
        };

        if !items_resolved {
            continue;
        }

        let deltas: Vec<Cents> = modifiers.iter().map(|m| m.price_delta).collect();
        match checked_line_total(menu_item.unit_price, input.quantity, &deltas) {
            Some(line_total) => items.push(LineItem {
                id: new_id(),
                menu_item_id: menu_item.id.clone(),
                name: menu_item.name.clone(),
                quantity: input.quantity,
                unit_price: menu_item.unit_price,
                modifiers,
                special_instructions,
                line_total,
            }),
            None => {
                errors.push(FieldError::new(
                    field("quantity"),
                    ErrorCode::ValueOutOfRange,
                    "line total is not computable",
                ));
                items_resolved = false;
            }
        }
    }

    // ── Totals reconciliation ───────────────────────────────────────
    // Only meaningful when every line resolved; otherwise the item
    // errors above already explain the rejection.
    if items_resolved && !submission.items.is_empty() {
        let computed_subtotal = checked_sum(items.iter().map(|i| i.line_total));
        match computed_subtotal {
            Some(computed) if computed == submission.subtotal => {}
            Some(computed) => {
                errors.push(FieldError::new(
                    "subtotal",
                    ErrorCode::TotalMismatch,
                    format!("declared subtotal {} != computed {}", submission.subtotal, computed),
                ));
            }
            None => {
                errors.push(FieldError::new(
                    "subtotal",
                    ErrorCode::ValueOutOfRange,
                    "subtotal is not computable",
                ));
            }
        }
    }

    if submission.tax < 0 {
        errors.push(FieldError::new(
            "tax",
            ErrorCode::ValueOutOfRange,
            "tax must be non-negative",
        ));
    }
    if submission.tip < 0 {
        errors.push(FieldError::new(
            "tip",
            ErrorCode::ValueOutOfRange,
            "tip must be non-negative",
        ));
    }

    match checked_sum([submission.subtotal, submission.tax, submission.tip]) {
        Some(expected_total) if expected_total == submission.total => {}
        Some(expected_total) => {
            errors.push(FieldError::new(
                "total",
                ErrorCode::TotalMismatch,
                format!(
                    "declared total {} != subtotal + tax + tip = {}",
                    submission.total, expected_total
                ),
            ));
        }
        None => {
            errors.push(FieldError::new(
                "total",
                ErrorCode::ValueOutOfRange,
                "total is not computable",
            ));
        }
    }

    // ── Channel-specific required fields ────────────────────────────
    let table = submission.table.as_deref().and_then(sanitize_text);
    let customer_name = submission.customer_name.as_deref().and_then(sanitize_text);

    if submission.channel.requires_table() && table.is_none() {
        errors.push(FieldError::new(
            "table",
            ErrorCode::RequiredField,
            format!("table is required for {} orders", submission.channel),
        ));
    }
    if submission.channel.requires_customer_name() && customer_name.is_none() {
        errors.push(FieldError::new(
            "customer_name",
            ErrorCode::RequiredField,
            format!("customer name is required for {} orders", submission.channel),
        ));
    }
    if let Some(t) = &table
        && t.len() > MAX_TABLE_LEN
    {
        errors.push(FieldError::new(
            "table",
            ErrorCode::ValidationFailed,
            format!("table exceeds {MAX_TABLE_LEN} characters"),
        ));
    }
    if let Some(n) = &customer_name
        && n.len() > MAX_CUSTOMER_NAME_LEN
    {
        errors.push(FieldError::new(
            "customer_name",
            ErrorCode::ValidationFailed,
            format!("customer name exceeds {MAX_CUSTOMER_NAME_LEN} characters"),
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NormalizedOrder {
        restaurant_id: restaurant_id.to_string(),
        channel: submission.channel,
        table,
        customer_name,
        items,
        subtotal: submission.subtotal,
        tax: submission.tax,
        tip: submission.tip,
        total: submission.total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CurrentActor;
    use crate::tenant::resolve_tenant;
    use shared::models::{MenuItem, Modifier};
    use shared::order::{Channel, LineItemInput};

    fn ctx(restaurant_id: &str) -> TenantContext {
        let actor = CurrentActor {
            id: "actor-1".to_string(),
            name: "Ana".to_string(),
            role: "staff".to_string(),
            scopes: vec!["orders:*".to_string()],
            restaurants: vec![restaurant_id.to_string()],
        };
        resolve_tenant(actor, Some(restaurant_id)).unwrap()
    }

    fn catalog_with_burger() -> CatalogService {
        let catalog = CatalogService::new();
        catalog.replace_menu(
            "rest-1",
            vec![
                MenuItem {
                    id: "burger".to_string(),
                    restaurant_id: "rest-1".to_string(),
                    name: "Burger".to_string(),
                    unit_price: 500,
                    available: true,
                    modifiers: vec![Modifier {
                        id: "cheese".to_string(),
                        name: "Extra cheese".to_string(),
                        price_delta: 100,
                    }],
                },
                MenuItem {
                    id: "soup".to_string(),
                    restaurant_id: "rest-1".to_string(),
                    name: "Soup of the day".to_string(),
                    unit_price: 300,
                    available: false,
                    modifiers: vec![],
                },
            ],
        );
        catalog
    }

    fn burger_submission() -> OrderSubmission {
        OrderSubmission {
            channel: Channel::Pos,
            table: Some("T7".to_string()),
            customer_name: None,
            items: vec![LineItemInput {
                menu_item_id: "burger".to_string(),
                quantity: 2,
                modifier_ids: vec!["cheese".to_string()],
                special_instructions: None,
            }],
            subtotal: 1100,
            tax: 88,
            tip: 0,
            total: 1188,
        }
    }

    #[test]
    fn test_valid_submission_normalizes() {
        let order =
            validate_submission(&ctx("rest-1"), &catalog_with_burger(), &burger_submission())
                .unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].line_total, 1100);
        assert_eq!(order.items[0].unit_price, 500);
        assert_eq!(order.subtotal, 1100);
        assert_eq!(order.total, 1188);
    }

    #[test]
    fn test_total_mismatch_rejected() {
        // subtotal 1000, tax 80, tip 0, but declared total 1200
        let catalog = catalog_with_burger();
        let mut submission = burger_submission();
        submission.items[0].modifier_ids.clear();
        submission.subtotal = 1000;
        submission.tax = 80;
        submission.total = 1200;

        let errors = validate_submission(&ctx("rest-1"), &catalog, &submission).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "total" && e.code == ErrorCode::TotalMismatch));
    }

    #[test]
    fn test_declared_subtotal_never_recomputed() {
        let mut submission = burger_submission();
        submission.subtotal = 1050; // wrong, but total is consistent with it
        submission.total = 1138;

        let errors =
            validate_submission(&ctx("rest-1"), &catalog_with_burger(), &submission).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "subtotal"));
    }

    #[test]
    fn test_all_errors_collected_in_one_pass() {
        let mut submission = burger_submission();
        submission.table = None; // missing required table
        submission.tax = -5; // negative tax
        submission.items.push(LineItemInput {
            menu_item_id: "ghost".to_string(), // unknown item
            quantity: 0,                       // bad quantity
            modifier_ids: vec![],
            special_instructions: None,
        });

        let errors =
            validate_submission(&ctx("rest-1"), &catalog_with_burger(), &submission).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"table"));
        assert!(fields.contains(&"tax"));
        assert!(fields.contains(&"items[1].menu_item_id"));
        assert!(fields.contains(&"items[1].quantity"));
    }

    #[test]
    fn test_unavailable_item_rejected() {
        let mut submission = burger_submission();
        submission.items[0].menu_item_id = "soup".to_string();
        submission.items[0].modifier_ids.clear();

        let errors =
            validate_submission(&ctx("rest-1"), &catalog_with_burger(), &submission).unwrap_err();
        assert!(errors.iter().any(|e| e.code == ErrorCode::MenuItemUnavailable));
    }

    #[test]
    fn test_illegal_modifier_rejected() {
        let mut submission = burger_submission();
        submission.items[0].modifier_ids = vec!["bacon".to_string()];

        let errors =
            validate_submission(&ctx("rest-1"), &catalog_with_burger(), &submission).unwrap_err();
        assert!(errors.iter().any(|e| e.code == ErrorCode::ModifierNotAllowed));
    }

    #[test]
    fn test_foreign_tenant_item_looks_missing() {
        let catalog = catalog_with_burger();
        catalog.replace_menu(
            "rest-2",
            vec![MenuItem {
                id: "sushi".to_string(),
                restaurant_id: "rest-2".to_string(),
                name: "Sushi".to_string(),
                unit_price: 900,
                available: true,
                modifiers: vec![],
            }],
        );
        let mut submission = burger_submission();
        submission.items[0].menu_item_id = "sushi".to_string();
        submission.items[0].modifier_ids.clear();

        let errors = validate_submission(&ctx("rest-1"), &catalog, &submission).unwrap_err();
        assert!(errors.iter().any(|e| e.code == ErrorCode::MenuItemNotFound));
    }

    #[test]
    fn test_kiosk_requires_customer_name() {
        let mut submission = burger_submission();
        submission.channel = Channel::Kiosk;
        submission.table = None;

        let errors =
            validate_submission(&ctx("rest-1"), &catalog_with_burger(), &submission).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "customer_name" && e.code == ErrorCode::RequiredField)
        );
    }

    #[test]
    fn test_empty_order_rejected() {
        let mut submission = burger_submission();
        submission.items.clear();
        submission.subtotal = 0;
        submission.tax = 0;
        submission.total = 0;

        let errors =
            validate_submission(&ctx("rest-1"), &catalog_with_burger(), &submission).unwrap_err();
        assert!(errors.iter().any(|e| e.code == ErrorCode::OrderEmpty));
    }

    #[test]
    fn test_instructions_sanitized() {
        let mut submission = burger_submission();
        submission.items[0].special_instructions =
            Some("no onions\u{0000} please\r\n".to_string());

        let order =
            validate_submission(&ctx("rest-1"), &catalog_with_burger(), &submission).unwrap();
        assert_eq!(
            order.items[0].special_instructions.as_deref(),
            Some("no onions please")
        );
    }
}
