mod handler;
mod model;

pub use handler::{create_warrior, delete_warrior, get_warrior, list_warriors, update_warrior};
pub use model::{CreateWarriorRequest, UpdateWarriorRequest, Warrior};
