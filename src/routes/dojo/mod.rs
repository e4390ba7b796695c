mod handler;
mod model;

pub use handler::{create_dojo, delete_dojo, get_dojo, list_dojos, update_dojo};
pub use model::{CreateDojoRequest, Dojo, UpdateDojoRequest};
