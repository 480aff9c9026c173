pub mod team_handler;

pub use team_handler::{__path_list_teams, list_teams};
