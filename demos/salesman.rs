//! Travelling salesman over 20 US cities.
//!
//! Estimates a schedule for roughly the requested number of minutes
//! (default 0.2), anneals, and prints the best round trip starting from
//! New York City.
//!
//! ```text
//! cargo run --release --example salesman -- 0.5
//! RUST_LOG=debug cargo run --example salesman
//! ```
//!
//! With `RUST_LOG` set, progress is logged as structured events instead of
//! the status line.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing_subscriber::EnvFilter;
use u_anneal::anneal::{AnnealState, Annealer, TracingReporter};

const CITIES: [(&str, (f64, f64)); 20] = [
    ("New York City", (40.72, 74.00)),
    ("Los Angeles", (34.05, 118.25)),
    ("Chicago", (41.88, 87.63)),
    ("Houston", (29.77, 95.38)),
    ("Phoenix", (33.45, 112.07)),
    ("Philadelphia", (39.95, 75.17)),
    ("San Antonio", (29.53, 98.47)),
    ("Dallas", (32.78, 96.80)),
    ("San Diego", (32.78, 117.15)),
    ("San Jose", (37.30, 121.87)),
    ("Detroit", (42.33, 83.05)),
    ("San Francisco", (37.78, 122.42)),
    ("Jacksonville", (30.32, 81.70)),
    ("Indianapolis", (39.78, 86.15)),
    ("Austin", (30.27, 97.77)),
    ("Columbus", (39.98, 82.98)),
    ("Fort Worth", (32.75, 97.33)),
    ("Charlotte", (35.23, 80.85)),
    ("Memphis", (35.12, 89.97)),
    ("Baltimore", (39.28, 76.62)),
];

/// Great-circle distance in miles between two (lat, lon) pairs in degrees.
fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    const EARTH_RADIUS_MILES: f64 = 3963.0;
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let cos = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos();
    cos.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_MILES
}

#[derive(Clone)]
struct Route {
    order: Vec<usize>,
    distances: Arc<Vec<Vec<f64>>>,
}

impl Route {
    fn shuffled() -> Self {
        let distances = CITIES
            .iter()
            .map(|(_, a)| CITIES.iter().map(|(_, b)| distance(*a, *b)).collect())
            .collect();
        let mut order: Vec<usize> = (0..CITIES.len()).collect();
        order.shuffle(&mut rand::rng());
        Self {
            order,
            distances: Arc::new(distances),
        }
    }
}

impl AnnealState for Route {
    /// Swaps two cities in the route.
    fn make_move(&mut self) {
        let mut rng = rand::rng();
        let a = rng.random_range(0..self.order.len());
        let b = rng.random_range(0..self.order.len());
        self.order.swap(a, b);
    }

    /// Length of the closed route.
    fn energy(&self) -> f64 {
        let n = self.order.len();
        (0..n)
            .map(|i| self.distances[self.order[(i + n - 1) % n]][self.order[i]])
            .sum()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let minutes: f64 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 0.2,
    };

    let mut annealer = Annealer::new(Route::shuffled());
    if std::env::var_os("RUST_LOG").is_some() {
        annealer = annealer.with_reporter(TracingReporter);
    }
    let schedule = annealer.auto(minutes, 2000)?;
    annealer.set_schedule(schedule);
    println!(
        "t_max = {}, t_min = {}, steps = {}, updates = {}",
        schedule.t_max, schedule.t_min, schedule.steps, schedule.updates
    );

    let (mut route, miles) = annealer.anneal()?;
    if let Some(start) = route.order.iter().position(|&c| c == 0) {
        route.order.rotate_left(start);
    }

    println!("{} mile route:", miles.round() as i64);
    for &city in &route.order {
        println!("\t{}", CITIES[city].0);
    }
    Ok(())
}
