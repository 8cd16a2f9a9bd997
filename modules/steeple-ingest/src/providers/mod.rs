pub mod csv;
pub mod google;

pub use csv::CsvProvider;
pub use google::GooglePlacesProvider;
