use govcon_finance::{
    BudgetInputs, CashFlowProjector, CostStackCalculator, DistributionProfile, ProjectionParams,
};
use proptest::prelude::*;

fn budget_inputs() -> impl Strategy<Value = BudgetInputs> {
    (
        (0.0f64..20_000.0, 0.0f64..400.0, 0.0f64..500_000.0),
        (0.0f64..500.0, 0.0f64..500.0, 0.0f64..500.0, 0.0f64..500.0),
        (0.0f64..1e6, 0.0f64..1e6, 0.0f64..1e5, 0.0f64..2e6, 0.0f64..1e5),
    )
        .prop_map(
            |(
                (hours, rate, indirect),
                (fringe, overhead, ga, fee),
                (materials, equipment, travel, subcontractor, other),
            )| BudgetInputs {
                direct_labor_hours: hours,
                direct_labor_rate: rate,
                indirect_labor_cost: indirect,
                fringe_rate: fringe,
                overhead_rate: overhead,
                ga_rate: ga,
                fee_rate: fee,
                materials_cost: materials,
                equipment_cost: equipment,
                travel_cost: travel,
                subcontractor_cost: subcontractor,
                other_direct_costs: other,
            },
        )
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #[test]
    fn test_cost_stack_identities(inputs in budget_inputs()) {
        let stack = CostStackCalculator::new().calculate(&inputs).unwrap();

        prop_assert!(close(stack.total_price(), stack.total_cost() + stack.fee_amount()));
        prop_assert!(close(
            stack.total_cost(),
            stack.total_direct_cost() + stack.total_indirect_cost()
        ));
        prop_assert!(close(
            stack.total_indirect_cost(),
            stack.overhead_cost() + stack.ga_cost()
        ));
        prop_assert!(stack.total_price() >= stack.total_cost());
        prop_assert!(stack.total_cost() >= 0.0);
    }

    #[test]
    fn test_cost_stack_is_idempotent(inputs in budget_inputs()) {
        let calculator = CostStackCalculator::new();
        let first = calculator.calculate(&inputs).unwrap();
        let second = calculator.calculate(&inputs).unwrap();
        prop_assert_eq!(first.total_price().to_bits(), second.total_price().to_bits());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_fee_rate_monotonicity(
        inputs in budget_inputs(),
        hours in 1.0f64..10_000.0,
        rate in 1.0f64..300.0,
        bump in 0.5f64..50.0,
    ) {
        let calculator = CostStackCalculator::new();
        let base = BudgetInputs { direct_labor_hours: hours, direct_labor_rate: rate, ..inputs };
        let higher = BudgetInputs { fee_rate: base.fee_rate + bump, ..base };

        let low = calculator.calculate(&base).unwrap();
        let high = calculator.calculate(&higher).unwrap();
        prop_assert!(high.total_price() > low.total_price());
        prop_assert!(high.gross_margin() >= low.gross_margin());
    }

    #[test]
    fn test_shares_sum_to_total(
        total in 1.0f64..1e8,
        months in 1u32..=24,
        uniform: bool,
    ) {
        let profile = if uniform {
            DistributionProfile::Uniform
        } else {
            DistributionProfile::SCurve
        };
        let shares = CashFlowProjector::new(profile).distribute(total, months).unwrap();

        prop_assert_eq!(shares.len(), months as usize);
        let sum: f64 = shares.iter().sum();
        prop_assert!((sum - total).abs() / total <= 0.001);
        prop_assert!(shares.iter().all(|s| *s >= 0.0));
    }

    #[test]
    fn test_cumulative_steps_match_net(
        total in 0.0f64..1e7,
        months in 1u32..=60,
        markup in 0.0f64..0.3,
        lag in 0u32..6,
    ) {
        let params = ProjectionParams::new(total, months)
            .with_markup(markup)
            .with_invoice_lag(lag);
        let series = CashFlowProjector::default().project(&params).unwrap();
        let flows = series.months();

        let mut previous = 0.0;
        for flow in flows {
            prop_assert!(close(flow.cumulative - previous, flow.inflow - flow.outflow));
            prop_assert!(close(flow.net, flow.inflow - flow.outflow));
            previous = flow.cumulative;
        }
        prop_assert!(close(series.total_outflow(), total));
        prop_assert_eq!(series.period_months(), months);
    }
}

#[test]
fn test_single_month_boundary() {
    let shares = CashFlowProjector::default().distribute(299_000.0, 1).unwrap();
    assert_eq!(shares, vec![299_000.0]);

    let stack = CostStackCalculator::new()
        .calculate(&BudgetInputs {
            direct_labor_rate: 150.0,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(stack.direct_labor_cost(), 0.0);
}
