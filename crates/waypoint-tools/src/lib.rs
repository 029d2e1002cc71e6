//! Built-in tool handlers for the travel companion.
//!
//! Each tool lives in its own module and implements
//! [`waypoint_dispatch::ToolHandler`].

pub mod datetime;
pub mod location;
pub mod restaurant;

pub use datetime::CurrentDateTool;
pub use location::{CurrentLocationTool, FixedLocation, LocationSource, Position};
pub use restaurant::{
    RestaurantSelection, SelectionSlot, SetRestaurantLocationTool, selection_slot,
};
