//! 排程問題
//!
//! 以穩定的識別碼查詢產品、機台、訂單。機台保留登錄順序，
//! 所有平手規則都依此順序列舉。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    InfeasibleOrder, Machine, MachineId, Order, OrderId, Product, ProductId, Result, SchedError,
    Schedule, SwitchoverConfig, Time,
};

/// 排程問題的原始資料（序列化格式）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemData {
    pub products: Vec<Product>,
    pub machines: Vec<Machine>,
    pub orders: Vec<Order>,
}

/// 已驗證的排程問題
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ProblemData", into = "ProblemData")]
pub struct Problem {
    products: Vec<Product>,
    machines: Vec<Machine>,
    orders: Vec<Order>,
    product_index: HashMap<ProductId, usize>,
    machine_index: HashMap<MachineId, usize>,
    order_index: HashMap<OrderId, usize>,
    /// 產品 → 可生產的機台（登錄順序）
    eligible: HashMap<ProductId, Vec<MachineId>>,
    /// 每張訂單最長加工時間的總和
    work_bound: Time,
}

impl Problem {
    /// 創建並驗證排程問題
    pub fn new(products: Vec<Product>, machines: Vec<Machine>, orders: Vec<Order>) -> Result<Self> {
        if machines.is_empty() {
            return Err(SchedError::NoMachines);
        }

        let mut product_index = HashMap::with_capacity(products.len());
        for (idx, product) in products.iter().enumerate() {
            if product_index.insert(product.id, idx).is_some() {
                return Err(SchedError::DuplicateProduct(product.id));
            }
        }

        let mut machine_index = HashMap::with_capacity(machines.len());
        for (idx, machine) in machines.iter().enumerate() {
            if machine_index.insert(machine.id, idx).is_some() {
                return Err(SchedError::DuplicateMachine(machine.id));
            }

            for (&product, &time) in &machine.time_per_unit {
                if !product_index.contains_key(&product) {
                    return Err(SchedError::UnknownProduct(product));
                }
                if time == 0 {
                    return Err(SchedError::InvalidProcessingTime {
                        machine: machine.id,
                        product,
                    });
                }
            }
        }

        let mut order_index = HashMap::with_capacity(orders.len());
        for (idx, order) in orders.iter().enumerate() {
            if order_index.insert(order.id, idx).is_some() {
                return Err(SchedError::DuplicateOrder(order.id));
            }
            if !product_index.contains_key(&order.product) {
                return Err(SchedError::UnknownProduct(order.product));
            }
            if order.quantity == 0 {
                return Err(SchedError::InvalidQuantity(order.id));
            }
        }

        // 任何排法的加工時間總和都不超過各訂單最長加工時間之和
        let mut work_bound: Time = 0;
        for order in &orders {
            let mut longest: Time = 0;
            for machine in &machines {
                let Some(&unit) = machine.time_per_unit.get(&order.product) else {
                    continue;
                };
                let duration = unit.checked_mul(Time::from(order.quantity)).ok_or(
                    SchedError::ProcessingTimeOverflow {
                        machine: machine.id,
                        order: order.id,
                    },
                )?;
                longest = longest.max(duration);
            }
            work_bound = work_bound
                .checked_add(longest)
                .ok_or(SchedError::HorizonOverflow)?;
        }

        let eligible = products
            .iter()
            .map(|product| {
                let machine_ids = machines
                    .iter()
                    .filter(|m| m.can_process(product.id))
                    .map(|m| m.id)
                    .collect();
                (product.id, machine_ids)
            })
            .collect();

        Ok(Self {
            products,
            machines,
            orders,
            product_index,
            machine_index,
            order_index,
            eligible,
            work_bound,
        })
    }

    /// 確認在給定換線參數下，任何排程的完工時間與總延遲都不會溢位
    ///
    /// 返回最壞情況下的完工時間上限。
    pub fn check_horizon(&self, switchover: &SwitchoverConfig) -> Result<Time> {
        let gaps = self.orders.len().saturating_sub(1) as Time;
        let longest_switchover = switchover.normal_duration.max(switchover.costly_duration);

        let horizon = gaps
            .checked_mul(longest_switchover)
            .and_then(|switching| self.work_bound.checked_add(switching))
            .ok_or(SchedError::HorizonOverflow)?;

        // 總延遲不超過 訂單數 × 完工上限
        horizon
            .checked_mul(self.orders.len().max(1) as Time)
            .ok_or(SchedError::HorizonOverflow)?;

        Ok(horizon)
    }

    /// 從 JSON 載入排程問題
    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: ProblemData = serde_json::from_str(json)?;
        Self::try_from(data)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// 所有機台（登錄順序）
    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    /// 所有訂單（輸入順序）
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.product_index.get(&id).map(|&idx| &self.products[idx])
    }

    pub fn machine(&self, id: MachineId) -> Option<&Machine> {
        self.machine_index.get(&id).map(|&idx| &self.machines[idx])
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.order_index.get(&id).map(|&idx| &self.orders[idx])
    }

    /// 查詢排程中引用的訂單
    ///
    /// # Panics
    /// 訂單不屬於此問題時（排程與問題不相符，屬呼叫端錯誤）
    pub fn resolve_order(&self, id: OrderId) -> &Order {
        match self.order(id) {
            Some(order) => order,
            None => panic!("訂單 {} 不屬於此排程問題", id),
        }
    }

    /// 查詢訂單的產品
    ///
    /// # Panics
    /// 產品不屬於此問題時
    pub fn resolve_product(&self, id: ProductId) -> &Product {
        match self.product(id) {
            Some(product) => product,
            None => panic!("產品 {} 不屬於此排程問題", id),
        }
    }

    /// 查詢機台
    ///
    /// # Panics
    /// 機台不屬於此問題時
    pub fn resolve_machine(&self, id: MachineId) -> &Machine {
        match self.machine(id) {
            Some(machine) => machine,
            None => panic!("機台 {} 不屬於此排程問題", id),
        }
    }

    /// 可生產該產品的機台（登錄順序）
    pub fn eligible_machines(&self, product: ProductId) -> &[MachineId] {
        self.eligible
            .get(&product)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 機台是否能生產該訂單
    pub fn is_eligible(&self, machine: MachineId, order: OrderId) -> bool {
        match (self.machine(machine), self.order(order)) {
            (Some(m), Some(o)) => m.can_process(o.product),
            _ => false,
        }
    }

    /// 訂單在機台上的加工時間
    pub fn processing_time(&self, machine: MachineId, order: OrderId) -> Option<Time> {
        let order = self.order(order)?;
        self.machine(machine)?.processing_time(order)
    }

    /// 找出沒有任何可用機台的訂單
    pub fn infeasible_orders(&self) -> Vec<InfeasibleOrder> {
        self.orders
            .iter()
            .filter(|o| self.eligible_machines(o.product).is_empty())
            .map(|o| InfeasibleOrder {
                order: o.id,
                product: o.product,
            })
            .collect()
    }

    /// 每台機台都沒有訂單的排程
    pub fn empty_schedule(&self) -> Schedule {
        Schedule::empty(self.machines.iter().map(|m| m.id))
    }
}

impl TryFrom<ProblemData> for Problem {
    type Error = SchedError;

    fn try_from(data: ProblemData) -> Result<Self> {
        Problem::new(data.products, data.machines, data.orders)
    }
}

impl From<Problem> for ProblemData {
    fn from(problem: Problem) -> Self {
        ProblemData {
            products: problem.products,
            machines: problem.machines,
            orders: problem.orders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn products() -> Vec<Product> {
        vec![
            Product::new(ProductId(1), Color::Dark),
            Product::new(ProductId(2), Color::White),
            Product::new(ProductId(3), Color::Milk).with_allergen(true),
        ]
    }

    fn machines() -> Vec<Machine> {
        vec![
            Machine::new(MachineId(1), "Machine A")
                .with_capability(ProductId(1), 5)
                .with_capability(ProductId(2), 3),
            Machine::new(MachineId(2), "Machine B")
                .with_capability(ProductId(1), 4)
                .with_capability(ProductId(2), 2)
                .with_capability(ProductId(3), 6),
        ]
    }

    #[test]
    fn test_create_problem() {
        let orders = vec![
            Order::new(OrderId(1), ProductId(1), 3, 10),
            Order::new(OrderId(2), ProductId(3), 2, 20),
        ];
        let problem = Problem::new(products(), machines(), orders).unwrap();

        assert_eq!(problem.machines().len(), 2);
        assert_eq!(
            problem.eligible_machines(ProductId(1)),
            &[MachineId(1), MachineId(2)]
        );
        assert_eq!(problem.eligible_machines(ProductId(3)), &[MachineId(2)]);
        assert_eq!(problem.processing_time(MachineId(1), OrderId(1)), Some(15));
        assert_eq!(problem.processing_time(MachineId(1), OrderId(2)), None);
        assert!(problem.is_eligible(MachineId(2), OrderId(2)));
        assert!(!problem.is_eligible(MachineId(1), OrderId(2)));
        assert!(problem.infeasible_orders().is_empty());
    }

    #[test]
    fn test_infeasible_orders() {
        let mut all_products = products();
        all_products.push(Product::new(ProductId(9), Color::Milk));
        let orders = vec![
            Order::new(OrderId(1), ProductId(1), 3, 10),
            Order::new(OrderId(2), ProductId(9), 1, 5),
        ];
        let problem = Problem::new(all_products, machines(), orders).unwrap();

        let infeasible = problem.infeasible_orders();
        assert_eq!(infeasible.len(), 1);
        assert_eq!(infeasible[0].order, OrderId(2));
        assert_eq!(infeasible[0].product, ProductId(9));
    }

    #[test]
    fn test_validation_errors() {
        let result = Problem::new(products(), vec![], vec![]);
        assert!(matches!(result, Err(SchedError::NoMachines)));

        let orders = vec![
            Order::new(OrderId(1), ProductId(1), 3, 10),
            Order::new(OrderId(1), ProductId(2), 3, 10),
        ];
        let result = Problem::new(products(), machines(), orders);
        assert!(matches!(result, Err(SchedError::DuplicateOrder(OrderId(1)))));

        let orders = vec![Order::new(OrderId(1), ProductId(42), 3, 10)];
        let result = Problem::new(products(), machines(), orders);
        assert!(matches!(result, Err(SchedError::UnknownProduct(ProductId(42)))));

        let orders = vec![Order::new(OrderId(1), ProductId(1), 0, 10)];
        let result = Problem::new(products(), machines(), orders);
        assert!(matches!(result, Err(SchedError::InvalidQuantity(OrderId(1)))));

        let bad_machine = vec![Machine::new(MachineId(1), "Broken").with_capability(ProductId(1), 0)];
        let result = Problem::new(products(), bad_machine, vec![]);
        assert!(matches!(
            result,
            Err(SchedError::InvalidProcessingTime { .. })
        ));
    }

    #[test]
    fn test_processing_time_overflow_rejected() {
        let huge = vec![Machine::new(MachineId(1), "Huge").with_capability(ProductId(1), u64::MAX / 2)];
        let orders = vec![Order::new(OrderId(7), ProductId(1), 3, 10)];

        let result = Problem::new(products(), huge, orders);

        assert!(matches!(
            result,
            Err(SchedError::ProcessingTimeOverflow {
                machine: MachineId(1),
                order: OrderId(7),
            })
        ));
    }

    #[test]
    fn test_total_work_overflow_rejected() {
        let huge = vec![Machine::new(MachineId(1), "Huge").with_capability(ProductId(1), u64::MAX / 2)];
        let orders = vec![
            Order::new(OrderId(1), ProductId(1), 1, 10),
            Order::new(OrderId(2), ProductId(1), 1, 10),
            Order::new(OrderId(3), ProductId(1), 1, 10),
        ];

        let result = Problem::new(products(), huge, orders);

        assert!(matches!(result, Err(SchedError::HorizonOverflow)));
    }

    #[test]
    fn test_check_horizon() {
        let orders = vec![
            Order::new(OrderId(1), ProductId(1), 3, 10),
            Order::new(OrderId(2), ProductId(3), 2, 20),
        ];
        let problem = Problem::new(products(), machines(), orders).unwrap();

        // 最長加工 15 + 12，加上一次高成本換線 25
        let horizon = problem.check_horizon(&SwitchoverConfig::default()).unwrap();
        assert_eq!(horizon, 15 + 12 + 25);

        // 單張訂單加工時間可表示，但加上換線後溢位
        let edge = vec![Machine::new(MachineId(1), "Edge").with_capability(ProductId(1), u64::MAX / 2)];
        let orders = vec![
            Order::new(OrderId(1), ProductId(1), 1, 10),
            Order::new(OrderId(2), ProductId(1), 1, 10),
        ];
        let problem = Problem::new(products(), edge, orders).unwrap();
        assert!(matches!(
            problem.check_horizon(&SwitchoverConfig::default()),
            Err(SchedError::HorizonOverflow)
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let orders = vec![Order::new(OrderId(1), ProductId(1), 3, 10).with_name("SO-1")];
        let problem = Problem::new(products(), machines(), orders).unwrap();

        let json = serde_json::to_string(&problem).unwrap();
        let loaded = Problem::from_json_str(&json).unwrap();

        assert_eq!(loaded.orders(), problem.orders());
        assert_eq!(loaded.machines(), problem.machines());
        assert_eq!(
            loaded.eligible_machines(ProductId(2)),
            problem.eligible_machines(ProductId(2))
        );
    }

    #[test]
    fn test_json_rejects_invalid_problem() {
        let json = r#"{ "products": [], "machines": [], "orders": [] }"#;
        assert!(matches!(
            Problem::from_json_str(json),
            Err(SchedError::NoMachines)
        ));
    }
}
