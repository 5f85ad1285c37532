//! Domain entity definitions.

mod breed;
mod feed;
mod image;
mod photo;

pub use breed::{Breed, BreedId};
pub use feed::FeedCollection;
pub use image::{ImageKey, ImageOrigin, LoadPhase, LoadedImage};
pub use photo::{Photo, PhotoId, PhotoSource, dedup_by_id};
