//! Delivery scenario: the depot and the randomly generated orders around it.

use crate::config::Config;
use crate::error::{DemoError, Result};
use crate::geo::{Bounds, City, LatLng};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Route index reserved for the depot.
pub const DEPOT_INDEX: usize = 0;

pub const CUSTOMER_NAMES: [&str; 20] = [
    "Emma Johnson",
    "Liam Smith",
    "Olivia Brown",
    "Noah Garcia",
    "Ava Martinez",
    "Ethan Davis",
    "Sophia Wilson",
    "Mason Taylor",
    "Isabella Anderson",
    "Logan Thomas",
    "Mia Rodriguez",
    "Jacob Martinez",
    "Charlotte Lewis",
    "Elijah Lee",
    "Amelia Walker",
    "Benjamin Hall",
    "Abigail Allen",
    "James Young",
    "Emily King",
    "Alexander Wright",
];

pub const FOOD_ITEMS: [&str; 23] = [
    "Margherita Pizza",
    "Chicken Biryani",
    "Butter Chicken",
    "Vegetable Fried Rice",
    "Hakka Noodles",
    "Paneer Tikka",
    "Veg Burger",
    "Chicken Burger",
    "French Fries",
    "Ice Cream",
    "Cold Coffee",
    "Masala Dosa",
    "Idli Sambhar",
    "Chole Bhature",
    "Pav Bhaji",
    "Veg Pulao",
    "Tandoori Chicken",
    "Palak Paneer",
    "Dal Makhani",
    "Malai Kofta",
    "Veg Thali",
    "Non-Veg Thali",
    "Masala Chai",
];

/// The distribution center every route starts and ends at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    pub city: City,
    pub location: LatLng,
}

impl Depot {
    pub fn new(city: City) -> Self {
        Depot {
            city,
            location: city.center(),
        }
    }

    /// Popup lines shown on the depot marker.
    pub fn popup(&self) -> Vec<String> {
        vec![
            "Distribution Center".to_string(),
            format!("Location: {}", self.city.display_name()),
            format!("Coordinates: {}", self.location),
        ]
    }
}

/// A customer order at a delivery location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// 1-based order number, equal to the route index of the location
    pub id: usize,
    pub customer: String,
    pub item: String,
    pub order_time: String,
    pub location: LatLng,
}

/// Detail card for a single order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub id: usize,
    pub status: String,
    pub customer: String,
    pub item: String,
    pub order_time: String,
    pub latitude: String,
    pub longitude: String,
}

/// A generated delivery scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub depot: Depot,
    pub orders: Vec<Order>,
}

impl Scenario {
    /// Build a scenario from explicit orders.
    pub fn new(depot: Depot, orders: Vec<Order>) -> Self {
        Scenario { depot, orders }
    }

    /// Scatter `config.num_locations` orders around the city center.
    ///
    /// Locations are drawn uniformly from the central `spread_ratio` share of
    /// the area visible at the city's zoom level.
    pub fn generate<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Self {
        let depot = Depot::new(config.city);
        let center = depot.location;
        let bounds = Bounds::viewport(
            center,
            config.city.zoom(),
            config.viewport_width,
            config.viewport_height,
        );
        let lat_spread = bounds.lat_span() * config.spread_ratio;
        let lng_spread = bounds.lng_span() * config.spread_ratio;

        let orders = (0..config.num_locations)
            .map(|i| {
                let lat = center.lat + (rng.gen::<f64>() * lat_spread - lat_spread / 2.0);
                let lng = center.lng + (rng.gen::<f64>() * lng_spread - lng_spread / 2.0);
                Order {
                    id: i + 1,
                    customer: pick(&CUSTOMER_NAMES, rng),
                    item: pick(&FOOD_ITEMS, rng),
                    order_time: random_order_time(rng),
                    location: LatLng::new(lat, lng),
                }
            })
            .collect();

        Scenario { depot, orders }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Order locations in marker order.
    pub fn locations(&self) -> Vec<LatLng> {
        self.orders.iter().map(|o| o.location).collect()
    }

    /// Resolve a route index: `0` is the depot, `i` is order `i - 1`.
    pub fn point(&self, index: usize) -> Option<LatLng> {
        if index == DEPOT_INDEX {
            Some(self.depot.location)
        } else {
            self.orders.get(index - 1).map(|o| o.location)
        }
    }

    /// Orders each agent would get if split evenly (rounded down).
    pub fn locations_per_agent(&self, num_agents: usize) -> usize {
        if num_agents == 0 {
            0
        } else {
            self.orders.len() / num_agents
        }
    }

    /// Map area containing the depot and every order, padded by `padding`.
    pub fn fit_bounds(&self, padding: f64) -> Bounds {
        let points: Vec<LatLng> = std::iter::once(self.depot.location)
            .chain(self.orders.iter().map(|o| o.location))
            .collect();
        // The depot is always present so the bounds are never empty.
        Bounds::from_points(&points)
            .map(|b| b.pad(padding))
            .unwrap_or_else(|| Bounds::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Detail card for the order at 0-based `index`.
    pub fn order_details(&self, index: usize) -> Result<OrderDetails> {
        let order = self
            .orders
            .get(index)
            .ok_or(DemoError::UnknownOrder(index + 1))?;
        Ok(OrderDetails {
            id: order.id,
            status: "In Delivery".to_string(),
            customer: order.customer.clone(),
            item: order.item.clone(),
            order_time: order.order_time.clone(),
            latitude: format!("{:.4}", order.location.lat),
            longitude: format!("{:.4}", order.location.lng),
        })
    }
}

/// Random clock time such as `7:05 PM`.
pub fn random_order_time<R: Rng + ?Sized>(rng: &mut R) -> String {
    let hour = rng.gen_range(1..=12);
    let minute = rng.gen_range(0..60);
    let ampm = if rng.gen_bool(0.5) { "AM" } else { "PM" };
    format!("{}:{:02} {}", hour, minute, ampm)
}

fn pick<R: Rng + ?Sized>(items: &[&str], rng: &mut R) -> String {
    items.choose(rng).copied().unwrap_or_default().to_string()
}
