// src/model/market.rs

use crate::model::stock::Stock;
use rand::Rng;
use rand_distr::{Distribution, Poisson};

/// Customer-facing side of the workshop: periodic demand, sales clearing and
/// the nightly theft event.
///
/// The market holds no mutable state of its own (backlogs live on the
/// engine); every stochastic draw goes through the rng handed in by the
/// caller so episodes replay exactly under a fixed seed.
#[derive(Debug, Clone)]
pub struct Market {
    demand_p1: Poisson<f64>,
    demand_p2: Poisson<f64>,
}

/// Theft removes a uniform fraction of each finished-goods buffer, drawn once
/// per nightly event.
const THEFT_FRACTION_MIN: f32 = 0.2;
const THEFT_FRACTION_MAX: f32 = 0.5;

impl Market {
    /// `lambda_p1` / `lambda_p2` are the mean demand per sales interval for
    /// the two finished goods.
    pub fn new(lambda_p1: f64, lambda_p2: f64) -> Self {
        Self {
            demand_p1: Poisson::new(lambda_p1).unwrap(),
            demand_p2: Poisson::new(lambda_p2).unwrap(),
        }
    }

    /// Draws the demand increments for one sales interval.
    pub fn sample_demand(&self, rng: &mut impl Rng) -> (u32, u32) {
        let d1 = self.demand_p1.sample(rng) as u32;
        let d2 = self.demand_p2.sample(rng) as u32;
        (d1, d2)
    }

    /// Sells `min(backlog, stock)` of each finished good, decrements the
    /// stock accordingly and returns the sold quantities.
    pub fn compute_sales(
        &self,
        stock: &mut Stock,
        backlog_p1: u32,
        backlog_p2: u32,
    ) -> (u32, u32) {
        let sold_p1 = backlog_p1.min(stock.p1);
        let sold_p2 = backlog_p2.min(stock.p2);

        stock.p1 -= sold_p1;
        stock.p2 -= sold_p2;

        (sold_p1, sold_p2)
    }

    /// Nightly shrinkage: removes a random fraction of each finished-goods
    /// buffer. Returns the lost quantities; stock never goes negative.
    pub fn apply_theft(&self, stock: &mut Stock, rng: &mut impl Rng) -> (u32, u32) {
        let fraction: f32 = rng.gen_range(THEFT_FRACTION_MIN..THEFT_FRACTION_MAX);

        let lost_p1 = (stock.p1 as f32 * fraction) as u32;
        let lost_p2 = (stock.p2 as f32 * fraction) as u32;

        stock.p1 -= lost_p1;
        stock.p2 -= lost_p2;

        (lost_p1, lost_p2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sales_never_exceed_stock_or_backlog() {
        let market = Market::new(1.0, 10.0);
        let mut stock = Stock::new(50);
        stock.add_p1(3);
        stock.add_p2(40);

        let (sold_p1, sold_p2) = market.compute_sales(&mut stock, 10, 25);

        // P1 is stock-limited, P2 is backlog-limited.
        assert_eq!(sold_p1, 3);
        assert_eq!(sold_p2, 25);
        assert_eq!(stock.p1, 0);
        assert_eq!(stock.p2, 15);
    }

    #[test]
    fn sales_with_empty_stock_sell_nothing() {
        let market = Market::new(1.0, 10.0);
        let mut stock = Stock::new(50);

        let (sold_p1, sold_p2) = market.compute_sales(&mut stock, 100, 100);
        assert_eq!((sold_p1, sold_p2), (0, 0));
    }

    #[test]
    fn demand_is_deterministic_under_a_fixed_seed() {
        let market = Market::new(1.0, 10.0);

        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);

        for _ in 0..50 {
            assert_eq!(
                market.sample_demand(&mut rng_a),
                market.sample_demand(&mut rng_b)
            );
        }
    }

    #[test]
    fn theft_never_drives_stock_negative() {
        let market = Market::new(1.0, 10.0);
        let mut rng = StdRng::seed_from_u64(7);

        let mut stock = Stock::new(50);
        stock.add_p1(20);
        stock.add_p2(1);

        for _ in 0..100 {
            let (lost_p1, lost_p2) = market.apply_theft(&mut stock, &mut rng);
            assert!(lost_p1 <= 20);
            assert!(lost_p2 <= 1);
            stock.add_p1(lost_p1);
            stock.add_p2(lost_p2);
        }
    }

    #[test]
    fn theft_on_empty_stock_is_a_noop() {
        let market = Market::new(1.0, 10.0);
        let mut rng = StdRng::seed_from_u64(7);
        let mut stock = Stock::new(50);

        let (lost_p1, lost_p2) = market.apply_theft(&mut stock, &mut rng);
        assert_eq!((lost_p1, lost_p2), (0, 0));
        assert_eq!(stock.p1, 0);
        assert_eq!(stock.p2, 0);
    }
}
