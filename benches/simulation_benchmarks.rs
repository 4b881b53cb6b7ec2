//! Performance benchmarks for the portage simulation engine.
//!
//! This benchmark suite verifies that the engine meets performance targets:
//! - Single salary solve: < 200μs mean
//! - Contribution table evaluation: < 20μs mean
//! - Single `/simulate` request: < 1ms mean
//! - Batch of 100 simulations: < 100ms mean
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use portage_engine::api::{AppState, create_router};
use portage_engine::calculation::{evaluate_contributions, solve_salary};
use portage_engine::config::{ConfigLoader, SalaryConfiguration};
use portage_engine::models::SimulationInput;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

/// Creates a test state with loaded configuration.
fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/portage").expect("Failed to load config");
    AppState::new(config)
}

fn latest_configuration() -> SalaryConfiguration {
    ConfigLoader::load("./config/portage")
        .expect("Failed to load config")
        .latest_configuration()
}

/// Creates a simulation request body for a daily rate and a day count.
fn simulation_body(daily_rate: u32, days: u32) -> String {
    serde_json::json!({
        "effective_date": "2026-03-01",
        "input": {
            "daily_rate": daily_rate.to_string(),
            "days_per_month": days.to_string(),
            "telework_days": 4,
            "meal_vouchers": 8
        }
    })
    .to_string()
}

fn simulate_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/simulate")
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// Benchmark: Salary solve without the HTTP layer.
///
/// Target: < 200μs mean
fn bench_solve_salary(c: &mut Criterion) {
    let config = latest_configuration();
    let input = SimulationInput::new(Decimal::from(500), Decimal::from(19));

    c.bench_function("solve_salary", |b| {
        b.iter(|| black_box(solve_salary(black_box(&input), &config)))
    });
}

/// Benchmark: Contribution table above the ceiling.
///
/// Target: < 20μs mean
fn bench_evaluate_contributions(c: &mut Criterion) {
    let config = latest_configuration();
    let gross = Decimal::from(6000);

    c.bench_function("evaluate_contributions", |b| {
        b.iter(|| {
            black_box(evaluate_contributions(
                black_box(gross),
                config.pmss,
                config.workplace_accident_rate,
                config.housing_fund.small_employer,
                Decimal::ZERO,
            ))
        })
    });
}

/// Benchmark: Single simulation through the router.
///
/// Target: < 1ms mean
fn bench_single_simulation(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = simulation_body(500, 19);

    c.bench_function("single_simulation", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router.oneshot(simulate_request(body.clone())).await.unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: Batch of 100 simulations over a spread of daily rates.
///
/// Target: < 100ms mean
fn bench_batch_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();

    let requests: Vec<String> = (0..100)
        .map(|i| simulation_body(200 + i * 10, 15 + i % 8))
        .collect();

    let mut group = c.benchmark_group("batch_processing");
    group.throughput(Throughput::Elements(100));

    group.bench_function("batch_100", |b| {
        b.to_async(&rt).iter(|| async {
            let mut results = Vec::with_capacity(100);
            for body in &requests {
                let router = create_router(state.clone());
                let response = router.oneshot(simulate_request(body.clone())).await.unwrap();
                results.push(response);
            }
            black_box(results)
        })
    });

    group.finish();
}

/// Benchmark: Solve time across daily rates, from shortfall to high earners.
fn bench_scaling(c: &mut Criterion) {
    let config = latest_configuration();

    let mut group = c.benchmark_group("scaling");

    for daily_rate in [100u32, 250, 500, 800, 1500].iter() {
        let input = SimulationInput::new(Decimal::from(*daily_rate), Decimal::from(20));

        group.bench_with_input(
            BenchmarkId::new("daily_rate", daily_rate),
            daily_rate,
            |b, _| b.iter(|| black_box(solve_salary(&input, &config))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_solve_salary,
    bench_evaluate_contributions,
    bench_single_simulation,
    bench_batch_100,
    bench_scaling,
);
criterion_main!(benches);
