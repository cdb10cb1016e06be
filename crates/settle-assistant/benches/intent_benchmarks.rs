//! Benchmarks for the local rule table.
//!
//! The classifier and template renderer run on every fallback turn, so they
//! should stay far below the remote call's latency. The p95 check asserts a
//! 100us ceiling per classify-and-render.

use std::time::Duration;

use chrono::Utc;
use criterion::{criterion_group, criterion_main, Criterion};
use settle_assistant::intent::{contains_hedge, is_affirmative, IntentClassifier};
use settle_assistant::templates::render;
use settle_core::types::{Listing, ListingStatus, PropertyType, TransactionType};

const MESSAGES: [&str; 8] = [
    "hello there",
    "I want to buy a 3BHK",
    "any rentals in Koramangala?",
    "show me something in Bandra",
    "what do flats cost these days",
    "tell me about home loans and stamp duty for first time buyers",
    "is there parking near Connaught Place",
    "yes please connect me",
];

fn catalogue() -> Vec<Listing> {
    let locations = [
        "Bandra West, Mumbai",
        "Koramangala, Bangalore",
        "Sector 45, Gurgaon",
        "Connaught Place, Delhi",
        "Whitefield, Bangalore",
    ];
    (0..200)
        .map(|i| Listing {
            id: format!("prop-{}", i),
            title: format!("Listing {}", i),
            description: String::new(),
            property_type: PropertyType::Apartment,
            transaction_type: if i % 3 == 0 {
                TransactionType::Rent
            } else {
                TransactionType::Sale
            },
            price: 1_000_000 + i as u64 * 250_000,
            area: 900,
            bedrooms: Some(2),
            bathrooms: Some(2),
            location: locations[i % locations.len()].to_string(),
            owner_id: "seller-1".to_string(),
            status: ListingStatus::Approved,
            featured: false,
            submitted_at: Utc::now(),
            approved_at: None,
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let classifier = IntentClassifier::new();

    let mut group = c.benchmark_group("intent");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("classify", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let intent = classifier.classify(MESSAGES[idx % MESSAGES.len()]);
            idx += 1;
            intent
        });
    });

    group.bench_function("affirmative_and_hedge", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let msg = MESSAGES[idx % MESSAGES.len()];
            idx += 1;
            (is_affirmative(msg), contains_hedge(msg))
        });
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let classifier = IntentClassifier::new();
    let listings = catalogue();

    let mut group = c.benchmark_group("rule_table");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("classify_and_render_200_listings", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let intent = classifier.classify(MESSAGES[idx % MESSAGES.len()]);
            idx += 1;
            render(&intent, "Demo Buyer", &listings)
        });
    });

    group.finish();

    let target = Duration::from_micros(100);
    let mut times = Vec::with_capacity(1000);
    for i in 0..1000 {
        let start = std::time::Instant::now();
        let intent = classifier.classify(MESSAGES[i % MESSAGES.len()]);
        let _ = render(&intent, "Demo Buyer", &listings);
        times.push(start.elapsed());
    }
    times.sort();
    let p95 = times[949];

    eprintln!("\n=== Rule table latency (1000 turns, 200 listings) ===");
    eprintln!("Median:  {:?}", times[499]);
    eprintln!("p95:     {:?} (target: {:?})", p95, target);

    assert!(
        p95 < target,
        "Rule table p95 {:?} exceeds target {:?}",
        p95,
        target
    );
}

criterion_group!(benches, bench_classify, bench_render);
criterion_main!(benches);
