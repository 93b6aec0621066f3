// Service exports
pub mod appwrite;
pub mod places;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use places::{PlacePhotoData, PlacesClient, PlacesError};
