//! Basic observable example

use beacon::Observable;

fn main() {
    println!("=== Basic Observable Example ===\n");

    // Create an observable with initial value
    let count = Observable::new(0);

    // Subscribe to every write
    let logger = count.subscribe(|value: &i32| {
        println!("Count changed to: {value}");
    });

    // The same callback can be registered more than once
    let doubled = |value: &i32| println!("Doubled: {}", value * 2);
    let first = count.subscribe(doubled);
    let _second = count.subscribe(doubled);

    println!("Setting count to 5...");
    count.set(5).unwrap();

    println!("\nRemoving one of the doubling subscriptions...");
    first.unsubscribe();
    first.unsubscribe(); // no-op

    println!("Updating count by adding 3...");
    count.update(|n| *n += 3).unwrap();

    println!("\nStopping the logger...");
    logger.unsubscribe();
    count.set(10).unwrap();

    println!("\nFinal count: {}", count.get());
}
