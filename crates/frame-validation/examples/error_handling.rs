//! Error Handling Example
//!
//! This example validates a small submitted table and prints the error body
//! a web layer would return.
//!
//! Run with:
//! ```bash
//! cargo run -p frame-validation --example error_handling
//! ```

use frame_validation::{
    validate_table, Column, Constraint, FieldError, FieldErrors, FieldKind, FieldSpec,
    FrameData, Limit, Table, ValidationConfig, Value,
};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Error Handling Example");
    println!("======================\n");

    demonstrate_single_field();
    demonstrate_full_table();
    demonstrate_dispatch_failure();
}

fn demonstrate_single_field() {
    println!("1. Single Field");
    println!("---------------");

    let ages = Column::with_index(["alice", "bob", "carol"], ["34", "abc", "-3"])
        .expect("index and values have the same length");

    let mut errors = FieldErrors::for_field("age");
    for error in [FieldError::NonNumericValue, FieldError::min_value(0)] {
        if let Err(err) = errors.record(&error, Some(FrameData::from(&ages))) {
            println!("  Structural error: {}", err);
        }
    }

    for report in errors.reports() {
        println!("  {} -> {:?}", report.reason, report.indexes);
    }
    println!();
}

fn demonstrate_full_table() {
    println!("2. Full Table");
    println!("-------------");

    let table = Table::from_records(
        ["title", "pages", "published"],
        vec![
            vec![Value::from("Dune"), Value::from("412"), Value::from("1965-08-01")],
            vec![Value::from(""), Value::from("many"), Value::from("August 1965")],
            vec![Value::from("Dune"), Value::Null, Value::from("1965-08-01")],
        ],
    )
    .expect("rows have the same width");

    let specs = vec![
        FieldSpec::new("title", FieldKind::Text).constraint(Constraint::MaxLength(100)),
        FieldSpec::new("pages", FieldKind::Integer)
            .constraint(Constraint::MinValue(Limit::from(1))),
        FieldSpec::new("published", FieldKind::Date { format: "%Y-%m-%d".into() }),
    ];
    let unique = vec![vec!["title".to_string(), "published".to_string()]];

    match validate_table(&specs, &table, &unique, &ValidationConfig::default()) {
        Ok(body) if body.is_empty() => println!("  No errors"),
        Ok(body) => {
            println!("  HTTP {}", body.status_code());
            match serde_json::to_string_pretty(&body) {
                Ok(text) => println!("{}", text),
                Err(err) => println!("  Could not serialize body: {}", err),
            }
        }
        Err(err) => println!("  HTTP {}: {}", err.status_code(), err),
    }
    println!();
}

fn demonstrate_dispatch_failure() {
    println!("3. Unsupported Constraint");
    println!("-------------------------");

    let column = Column::new(["someone@example.com"]);
    let mut errors = FieldErrors::for_field("email");
    match errors.record_from_constraint(&Constraint::Email, Some(FrameData::from(&column))) {
        Ok(()) => println!("  Unexpected success"),
        Err(err) => println!("  HTTP {}: {}", err.status_code(), err),
    }
    println!();
}
