//! # 巧克力工廠排程範例
//!
//! - 產品：黑/牛奶/白巧克力，各有含堅果版本
//! - 機台：5 台 Machine A（只做無堅果）、5 台 Machine B（全部都能做）
//! - 訂單：150 張無堅果 + 50 張含堅果，以固定種子隨機產生
//!
//! 執行：`cargo run --release --example chocolate_plant -- [種子]`
//! 設定 `RUST_LOG=debug` 可看到每次插入與每輪搜尋的紀錄。

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use prodsched::prelude::*;

const DARK: ProductId = ProductId(1);
const MILK: ProductId = ProductId(2);
const WHITE: ProductId = ProductId(3);
const DARK_NUTS: ProductId = ProductId(4);
const MILK_NUTS: ProductId = ProductId(5);
const WHITE_NUTS: ProductId = ProductId(6);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse().with_context(|| format!("無效的種子: {}", arg))?,
        None => 42,
    };

    println!("🍫 ===== 巧克力工廠排程範例（種子 {}） =====", seed);
    println!();

    let problem = build_plant(seed)?;
    println!(
        "   ✓ 產品 {} 種、機台 {} 台、訂單 {} 張",
        problem.products().len(),
        problem.machines().len(),
        problem.orders().len()
    );
    println!();

    let config = EngineConfig::default()
        .with_optimizer(OptimizerConfig::default().with_parallel_sweep(true));
    let mut session = PlanningSession::new(problem, config)?;

    // ========== 1. 建構 ==========
    println!("🔧 步驟 1: 建構初始排程");
    session.run_construction();
    print_score("建構完成", &current_score(&session)?);
    println!();

    // ========== 2. 局部搜尋 ==========
    println!("🔍 步驟 2: 局部搜尋");
    let improvements = session.run_to_local_optimum();
    println!("   改善 {} 輪", improvements);
    print_score("局部最佳解", &current_score(&session)?);
    println!();

    // ========== 3. 產線摘要 ==========
    println!("📋 步驟 3: 產線摘要");
    let last = session.ledger().len() - 1;
    let timeline = session.timeline(last).context("找不到最後一筆快照")?;
    for machine_timeline in timeline.iter() {
        let machine = session.problem().resolve_machine(machine_timeline.machine);
        let orders = machine_timeline.order_ends().count();
        let costly = machine_timeline
            .entries
            .iter()
            .filter(|entry| entry.is_costly_switchover())
            .count();
        println!(
            "   {} {:<10} 訂單 {:>3} 張，完工 {:>5}，高成本換線 {}",
            machine.id,
            machine.name,
            orders,
            machine_timeline.completion(),
            costly
        );
    }
    println!();

    // ========== 4. 歷史 ==========
    let ledger = session.ledger();
    let mut cursor = HistoryCursor::at_last(ledger);
    cursor.pre_optimization(ledger);
    if let Some(before) = cursor.current(ledger) {
        print_score("改善前", &before.score);
    }
    println!("   快照共 {} 筆", ledger.len());

    Ok(())
}

fn build_plant(seed: u64) -> Result<Problem> {
    let products = vec![
        Product::new(DARK, Color::Dark),
        Product::new(MILK, Color::Milk),
        Product::new(WHITE, Color::White),
        Product::new(DARK_NUTS, Color::Dark).with_allergen(true),
        Product::new(MILK_NUTS, Color::Milk).with_allergen(true),
        Product::new(WHITE_NUTS, Color::White).with_allergen(true),
    ];

    let mut machines = Vec::new();
    for i in 1..=5 {
        machines.push(
            Machine::new(MachineId(i), "Machine A")
                .with_capability(DARK, 5)
                .with_capability(MILK, 4)
                .with_capability(WHITE, 3),
        );
    }
    for i in 6..=10 {
        machines.push(
            Machine::new(MachineId(i), "Machine B")
                .with_capability(DARK, 4)
                .with_capability(MILK, 3)
                .with_capability(WHITE, 2)
                .with_capability(DARK_NUTS, 8)
                .with_capability(MILK_NUTS, 6)
                .with_capability(WHITE_NUTS, 4),
        );
    }

    let plain = [DARK, MILK, WHITE];
    let with_nuts = [DARK_NUTS, MILK_NUTS, WHITE_NUTS];
    let mut rng = StdRng::seed_from_u64(seed);

    let orders = (1..=200)
        .map(|i| {
            let product = if i <= 150 {
                plain[rng.gen_range(0..3)]
            } else {
                with_nuts[rng.gen_range(0..3)]
            };
            Order::new(
                OrderId(i),
                product,
                rng.gen_range(1..=10),
                rng.gen_range(1..=1000),
            )
            .with_name(format!("SO-{:03}", i))
        })
        .collect();

    Ok(Problem::new(products, machines, orders)?)
}

fn current_score(session: &PlanningSession) -> Result<Score> {
    session
        .current()
        .map(|snapshot| snapshot.score.clone())
        .context("工作階段尚未初始化")
}

fn print_score(label: &str, score: &Score) {
    println!(
        "   {}：總延遲 {}，makespan {}，高成本換線 {}，makespan 機台 {}",
        label,
        score.total_tardiness,
        score.makespan,
        score.costly_switchovers,
        score.machines_at_makespan
    );
}
