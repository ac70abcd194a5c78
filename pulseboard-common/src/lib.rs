pub mod dashboard;
pub mod derive;
pub mod image;
pub mod model;
pub mod util;
