pub mod ids;
pub mod item;

pub use ids::ItemId;
pub use item::Item;
