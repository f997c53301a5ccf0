mod enemy;
mod player;
mod pokemon;

pub use enemy::*;
pub use player::*;
pub use pokemon::*;
