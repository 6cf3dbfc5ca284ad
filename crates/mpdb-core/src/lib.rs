pub mod brands;
pub mod purchase;

pub use brands::{load_brand_table, BrandMatch, BrandRule, BrandTable, ModelRule};
pub use purchase::{LineItem, Purchase};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read brand rules file {path}: {source}")]
    BrandsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse brand rules file: {0}")]
    BrandsFileParse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
