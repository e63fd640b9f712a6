//! Form state with a validating subscriber

use beacon::{Observable, SubscriberError};

#[derive(Clone, Debug, Default)]
struct SignupForm {
    email: String,
    age: u32,
}

#[derive(Debug, thiserror::Error)]
enum ValidationError {
    #[error("email must contain '@'")]
    Email,
    #[error("age {0} is below the minimum of 13")]
    Age(u32),
}

fn validate(form: &SignupForm) -> Result<(), SubscriberError> {
    if !form.email.contains('@') {
        return Err(ValidationError::Email.into());
    }
    if form.age < 13 {
        return Err(ValidationError::Age(form.age).into());
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing_subscriber::filter::LevelFilter::TRACE).init();

    println!("=== Form State Example ===\n");

    let form = Observable::<SignupForm>::default();

    form.subscribe(|form| println!("Rendering form: {form:?}"));
    form.try_subscribe(validate);
    form.subscribe(|form| println!("Submit enabled for {}", form.email));

    println!("Typing an email...");
    if let Err(err) = form.update(|form| form.email = "buffy@sunnydale.edu".to_string()) {
        println!("Invalid: {err} ({} subscriber(s) skipped)", err.skipped());
    }

    println!("\nEntering an age...");
    if let Err(err) = form.update(|form| form.age = 29) {
        println!("Invalid: {err} ({} subscriber(s) skipped)", err.skipped());
    }

    println!("\nFinal form: {:#?}", form.get());
}
