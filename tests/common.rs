use std::sync::{Arc, Mutex};

/// Returns a recording callback and a function that drains what it recorded.
#[allow(unused)]
pub fn change_watcher<T: Clone + Send + Sync + 'static>() -> (impl Fn(&T) + Clone + Send + Sync + 'static, impl Fn() -> Vec<T>) {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let watcher = {
        let changes = changes.clone();
        move |value: &T| {
            changes.lock().unwrap().push(value.clone());
        }
    };

    let check = move || {
        let changes: Vec<T> = changes.lock().unwrap().drain(..).collect();
        changes
    };

    (watcher, check)
}

/// Routes the crate's trace events to the test output.
#[allow(unused)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .try_init();
}
