mod handler;
mod model;

pub use handler::{
    create_tournament, delete_tournament, get_tournament, list_tournaments, update_tournament,
};
pub use model::{CreateTournamentRequest, Tournament, UpdateTournamentRequest};
