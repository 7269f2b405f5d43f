use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use govcon_finance::{
    BudgetInputs, CashFlowProjector, ContractType, CostStackCalculator, EngineConfig,
    FinanceEngine, ProjectRequest, ProjectStatus, ProjectTimeline, ProjectionParams,
};

fn sample_inputs() -> BudgetInputs {
    BudgetInputs {
        direct_labor_hours: 12_000.0,
        direct_labor_rate: 115.0,
        indirect_labor_cost: 40_000.0,
        fringe_rate: 30.0,
        overhead_rate: 100.0,
        ga_rate: 15.0,
        fee_rate: 10.0,
        materials_cost: 25_000.0,
        travel_cost: 8_000.0,
        subcontractor_cost: 150_000.0,
        ..Default::default()
    }
}

fn sample_requests(count: usize) -> Vec<ProjectRequest> {
    (0..count)
        .map(|i| ProjectRequest {
            project_id: format!("proj-{}", i),
            name: format!("Task order {}", i),
            status: if i % 3 == 0 {
                ProjectStatus::Bidding
            } else {
                ProjectStatus::Active
            },
            contract_type: ContractType::CostPlusFixedFee,
            estimated_value: 2_000_000.0,
            contract_value: None,
            inputs: sample_inputs(),
            timeline: ProjectTimeline::new(
                NaiveDate::from_ymd_opt(2025, 1 + (i % 12) as u32, 1).unwrap(),
                12 + (i % 36) as u32,
            ),
            risk_factor: None,
            annual_discount_rate: None,
        })
        .collect()
}

fn bench_cost_stack(c: &mut Criterion) {
    let calculator = CostStackCalculator::new();
    let inputs = sample_inputs();

    c.bench_function("cost_stack_calculate", |b| {
        b.iter(|| black_box(calculator.calculate(black_box(&inputs))))
    });
}

fn bench_projection(c: &mut Criterion) {
    let projector = CashFlowProjector::default();
    let mut group = c.benchmark_group("cash_flow_projection");

    for months in [12u32, 24, 60] {
        group.bench_with_input(BenchmarkId::from_parameter(months), &months, |b, &months| {
            let params = ProjectionParams::new(2_500_000.0, months);
            b.iter(|| black_box(projector.project(black_box(&params))))
        });
    }
    group.finish();
}

fn bench_portfolio(c: &mut Criterion) {
    let engine = FinanceEngine::new(EngineConfig::default()).unwrap();
    let mut group = c.benchmark_group("portfolio_evaluation");

    for count in [10usize, 100] {
        let requests = sample_requests(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &requests, |b, requests| {
            b.iter(|| black_box(engine.evaluate_portfolio(black_box(requests))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cost_stack, bench_projection, bench_portfolio);
criterion_main!(benches);
