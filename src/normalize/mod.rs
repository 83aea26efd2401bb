//! Response normalization: upstream JSON shapes to stable tool records.
//!
//! Everything here is pure: no I/O, no clocks, same payload in, same record
//! out.

pub mod apod;
pub mod planet;

pub use apod::{daily_image_record, ApodPayload, DailyImageRecord, EmbeddedImage, MediaKind, UNTITLED};
pub use planet::{planet_record, MoonRef, PlanetPayload, PlanetRecord};
