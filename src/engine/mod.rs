mod movement;

pub use movement::{Placement, can_step, coordinates, place, placement, step};
