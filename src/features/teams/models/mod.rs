mod team;

pub use team::{Team, TeamAvailability};
