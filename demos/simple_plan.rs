//! 簡單排程示例：從 JSON 載入問題並逐步執行

use anyhow::Result;

use prodsched::prelude::*;

const PROBLEM: &str = r#"{
    "products": [
        { "id": 1, "color": "Dark", "has_allergen": false },
        { "id": 2, "color": "White", "has_allergen": false },
        { "id": 3, "color": "Milk", "has_allergen": true }
    ],
    "machines": [
        { "id": 1, "name": "Line 1", "time_per_unit": { "1": 5, "2": 3 } },
        { "id": 2, "name": "Line 2", "time_per_unit": { "1": 4, "2": 2, "3": 6 } }
    ],
    "orders": [
        { "id": 1, "product": 1, "quantity": 3, "due": 15, "name": "SO-001" },
        { "id": 2, "product": 2, "quantity": 5, "due": 15 },
        { "id": 3, "product": 3, "quantity": 2, "due": 20 },
        { "id": 4, "product": 1, "quantity": 4, "due": 40 },
        { "id": 5, "product": 2, "quantity": 1, "due": 5 }
    ]
}"#;

fn main() -> Result<()> {
    println!("=== 簡單排程示例 ===\n");

    let problem = Problem::from_json_str(PROBLEM)?;
    let config = EngineConfig::from_json_str(r#"{ "switchover": { "costly_duration": 20 } }"#)?;
    let mut session = PlanningSession::new(problem, config)?;

    loop {
        let outcome = session.step();
        println!("[{}] {:?}", session.phase().as_str(), outcome);

        if outcome == StepOutcome::LocalOptimum {
            break;
        }
    }

    let ledger = session.ledger();
    println!("\n快照:");
    for (index, snapshot) in ledger.iter().enumerate() {
        let marker = match ledger.optimization_iteration(index) {
            Some(iteration) => format!("改善 #{}", iteration),
            None if ledger.construction_end() == Some(index) => "建構完成".to_string(),
            None => "建構中".to_string(),
        };
        println!("  {:>2} {:<8} {:?}", index, marker, snapshot.score.objective());
    }

    Ok(())
}
