//! Built-in demo data, served when no store is configured and used to seed one.

use crate::models::{MenuItem, Restaurant, SpiceLevel};

pub const DEMO_RESTAURANT_ID: &str = "demo-1";
/// Order id returned for every order accepted in demo mode
pub const DEMO_ORDER_ID: &str = "demo-order-1";

pub fn demo_restaurant() -> Restaurant {
    Restaurant {
        id: DEMO_RESTAURANT_ID.to_string(),
        name: "SnackSprint Diner".to_string(),
        description: Some("Burgers, bowls and bites delivered fast".to_string()),
        image: Some(
            "https://images.unsplash.com/photo-1550547660-d9450f859349?w=1200".to_string(),
        ),
        cuisine: Some("American".to_string()),
        rating: Some(4.7),
    }
}

pub fn demo_menu() -> Vec<MenuItem> {
    vec![
        menu_item(
            "m1",
            "Classic Burger",
            "Juicy beef patty, cheddar, pickles",
            9.99,
            "https://images.unsplash.com/photo-1550547660-2f9b63f1f7b0?w=1200",
            false,
            SpiceLevel::Mild,
        ),
        menu_item(
            "m2",
            "Veggie Bowl",
            "Roasted veggies, quinoa, tahini",
            8.49,
            "https://images.unsplash.com/photo-1512621776951-a57141f2eefd?w=1200",
            true,
            SpiceLevel::Medium,
        ),
        menu_item(
            "m3",
            "Spicy Chicken Wrap",
            "Crispy chicken, chipotle mayo",
            10.49,
            "https://images.unsplash.com/photo-1604908177076-9f2bf5f7955f?w=1200",
            false,
            SpiceLevel::Hot,
        ),
    ]
}

/// Demo menu entries whose restaurant id equals `restaurant_id` exactly.
pub fn demo_menu_for(restaurant_id: &str) -> Vec<MenuItem> {
    demo_menu()
        .into_iter()
        .filter(|item| item.restaurant_id == restaurant_id)
        .collect()
}

fn menu_item(
    id: &str,
    name: &str,
    description: &str,
    price: f64,
    image: &str,
    is_veg: bool,
    spice_level: SpiceLevel,
) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        restaurant_id: DEMO_RESTAURANT_ID.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        price,
        image: Some(image.to_string()),
        is_veg,
        spice_level: Some(spice_level),
        category: None,
    }
}
