//! 測試用工廠資料

use sched_core::{Color, Machine, MachineId, Order, Problem, Product, ProductId};

pub const DARK: ProductId = ProductId(1);
pub const WHITE: ProductId = ProductId(2);
pub const MILK_NUTS: ProductId = ProductId(3);
/// 沒有任何機台能生產
pub const ORPHAN: ProductId = ProductId(4);

pub const A: MachineId = MachineId(1);
pub const B: MachineId = MachineId(2);

/// 兩台機台：A 做黑/白，B 做黑/白/含堅果牛奶
pub fn plant(orders: Vec<Order>) -> Problem {
    let products = vec![
        Product::new(DARK, Color::Dark),
        Product::new(WHITE, Color::White),
        Product::new(MILK_NUTS, Color::Milk).with_allergen(true),
        Product::new(ORPHAN, Color::Milk),
    ];
    let machines = vec![
        Machine::new(A, "Machine A")
            .with_capability(DARK, 5)
            .with_capability(WHITE, 3),
        Machine::new(B, "Machine B")
            .with_capability(DARK, 4)
            .with_capability(WHITE, 2)
            .with_capability(MILK_NUTS, 6),
    ];

    Problem::new(products, machines, orders).unwrap()
}
