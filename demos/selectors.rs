//! Selector derivation: projections, equality gating, chaining.

use modelcell::Store;

#[derive(Clone, Debug)]
struct Cart {
    items: Vec<(String, u32)>,
    coupon: Option<String>,
}

fn main() {
    println!("=== Selectors ===\n");

    let cart = Store::new(Cart {
        items: vec![("book".to_string(), 1200)],
        coupon: None,
    });

    // Re-emits only when the total actually changes.
    let total = cart.select(|cart| cart.items.iter().map(|(_, price)| price).sum::<u32>());
    total
        .subscribe(|total| println!("total is now {total}"))
        .detach();

    // Chained derivation: free shipping depends on the total.
    let free_shipping = total.select(|total| *total >= 2000);
    free_shipping
        .subscribe(|eligible| println!("free shipping: {eligible}"))
        .detach();

    println!("\nSetting a coupon (total unchanged, nothing re-emits)...");
    cart.update(|cart| cart.coupon = Some("WELCOME".to_string()));

    println!("\nAdding a pen...");
    cart.update(|cart| cart.items.push(("pen".to_string(), 300)));

    println!("\nAdding headphones...");
    cart.update(|cart| cart.items.push(("headphones".to_string(), 900)));

    // A custom predicate: only care about order-of-magnitude changes.
    let magnitude = cart.select_with(
        |cart| cart.items.iter().map(|(_, price)| price).sum::<u32>(),
        |a, b| a.checked_ilog10() == b.checked_ilog10(),
    );
    magnitude
        .subscribe(|total| println!("magnitude bucket changed at {total}"))
        .detach();

    println!("\nAdding a laptop...");
    cart.update(|cart| cart.items.push(("laptop".to_string(), 80000)));

    println!("\nFinal cart: {:#?}", cart.get());
}
