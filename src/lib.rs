mod engine;
mod midi_io;
mod model;
mod util;

pub use engine::*;
pub use midi_io::*;
pub use model::config::*;
pub use model::song::*;
pub use util::*;
