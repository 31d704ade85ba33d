//! Integration tests for the shared cart store.

use capshop_core::{CartLineItem, Money};
use capshop_store::CartStore;

fn snapback(id: &str, cents: i64, quantity: u32) -> CartLineItem {
    CartLineItem::new(id, "Classic Snapback", Money::from_cents(cents), quantity)
        .with_color("Navy")
        .with_size("L")
}

#[test]
fn repeated_ids_are_separate_entries() {
    let store = CartStore::new();
    store.add_item(snapback("1", 1000, 1));
    store.add_item(snapback("1", 1000, 1));

    assert_eq!(store.items().len(), 2);
    assert_eq!(store.item_count(), 2);
    assert_eq!(store.subtotal(), Money::from_cents(2000));

    // Quantity updates and removals hit every entry with the id.
    assert_eq!(store.update_quantity("1", 3), 2);
    assert_eq!(store.item_count(), 6);
    assert_eq!(store.remove_item("1"), 2);
    assert!(store.items().is_empty());
}

#[test]
fn customized_cap_goes_in_as_its_own_line() {
    let store = CartStore::new();
    let custom = CartLineItem::custom("My Cap", Money::from_cents(3499)).with_color("Red");
    let id = custom.id.clone();
    store.add_item(custom);
    store.add_item(snapback("snap-1", 2999, 1));

    assert!(id.starts_with("custom-"));
    assert_eq!(store.items()[0].id, id);
    assert_eq!(store.totals().line_count, 2);
}

#[test]
fn totals_match_the_cart_preview() {
    let store = CartStore::new();
    store.add_item(snapback("snap-1", 2999, 2));
    store.add_item(snapback("dad-1", 2499, 1));

    let totals = store.totals();
    assert_eq!(totals.subtotal, Money::from_cents(8497));
    // 8% of $84.97 = $6.7976, rounded to $6.80.
    assert_eq!(totals.tax, Money::from_cents(680));
    assert_eq!(totals.total, Money::from_cents(9177));
    assert_eq!(totals.item_count, 3);
}

#[tokio::test]
async fn watchers_are_woken_on_change() {
    let store = CartStore::new();
    let mut rx = store.subscribe();

    let writer = store.clone();
    let handle = tokio::spawn(async move {
        writer.add_item(snapback("snap-1", 1500, 2));
    });

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().item_count, 2);
    handle.await.unwrap();
}

#[test]
fn unknown_ids_are_ignored() {
    let store = CartStore::new();
    store.add_item(snapback("snap-1", 1000, 1));

    assert_eq!(store.update_quantity("nope", 5), 0);
    assert_eq!(store.remove_item("nope"), 0);
    assert_eq!(store.item_count(), 1);
}

#[test]
fn extreme_quantity_update_still_publishes_totals() {
    let store = CartStore::new();
    let rx = store.subscribe();
    store.add_item(snapback("x", 10_000_000_000, 1));

    assert_eq!(store.update_quantity("x", i64::MAX), 1);
    assert_eq!(store.totals().subtotal, Money::from_cents(i64::MAX));
    assert_eq!(*rx.borrow(), store.totals());
}
