pub mod bootcamp;

pub use bootcamp::{Bootcamp, CreateBootcamp, UpdateBootcamp, PLACEHOLDER_PHOTO};
