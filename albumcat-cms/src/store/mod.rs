//! On-disk state owned by the CMS: the catalog file and the covers directory

mod assets;
mod catalog;

pub use assets::AssetStore;
pub use catalog::CatalogStore;
