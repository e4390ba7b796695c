mod handler;
mod model;

pub use handler::{create_battle, delete_battle, get_battle, list_battles, update_battle};
pub use model::{Battle, CreateBattleRequest, UpdateBattleRequest};
