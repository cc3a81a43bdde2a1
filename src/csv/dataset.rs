//! Catalog of the exported CSV datasets and where they live.

use std::fmt;
use std::str::FromStr;

use super::cache::CsvError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsvDataset {
    Laundromats,
    Machines,
    Drivers,
    Users,
    Bookings,
    SupplyOrders,
    OrderItems,
    ServiceTypes,
    ServiceCategories,
    Products,
    ParticipatingLaundromats,
}

impl CsvDataset {
    pub const ALL: [Self; 11] = [
        Self::Laundromats,
        Self::Machines,
        Self::Drivers,
        Self::Users,
        Self::Bookings,
        Self::SupplyOrders,
        Self::OrderItems,
        Self::ServiceTypes,
        Self::ServiceCategories,
        Self::Products,
        Self::ParticipatingLaundromats,
    ];

    /// URL path segment used by the datasets API.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Laundromats => "laundromats",
            Self::Machines => "machines",
            Self::Drivers => "drivers",
            Self::Users => "users",
            Self::Bookings => "bookings",
            Self::SupplyOrders => "supply-orders",
            Self::OrderItems => "order-items",
            Self::ServiceTypes => "service-types",
            Self::ServiceCategories => "service-categories",
            Self::Products => "products",
            Self::ParticipatingLaundromats => "participating-laundromats",
        }
    }

    /// Object name (already percent-encoded) inside the storage bucket.
    ///
    /// There is no standalone machine export; machine views read the
    /// participating-laundromats sheet.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Laundromats => {
                "Auro%20Backend%20Data%20-%20All_NYC_Laundromats%20%282%29-yyEal8I5JygvTmtU5hCS9aL4bR1Z0h.csv"
            }
            Self::Machines | Self::ParticipatingLaundromats => {
                "Auro%20Backend%20Data%20-%20Participating_Laundromats-abD7V3gcgW0p1TzupcxwgdaOuH19m5.csv"
            }
            Self::Drivers => "Auro%20Backend%20Data%20-%20Drivers_List-IVdkjFvFzAgfbz7NyvoKBU36wuYSOI.csv",
            Self::Users => "Auro%20Backend%20Data%20-%20Users_List-ZKAMEZ8j1l97urF4kGTES84v9nr92F.csv",
            Self::Bookings => "Auro%20Backend%20Data%20-%20Bookings_List-aVO427jA0B0MjcqVmenVK2FOOJJP7K.csv",
            Self::SupplyOrders => "Auro%20Backend%20Data%20-%20Supply_Orders-qk6AVHChqNIj3VKuVV0Tr7y1nYsUR7.csv",
            Self::OrderItems => "Auro%20Backend%20Data%20-%20Order_Items-zZudmf6ZVNERKgDRmTKIZpo3aJZOia.csv",
            Self::ServiceTypes => "Auro%20Backend%20Data%20-%20Service_Types-7hgYccwESuior1szcQi63iZAcKppAX.csv",
            Self::ServiceCategories => {
                "Auro%20Backend%20Data%20-%20Service_Categories%20%281%29-TQM8x73GpjcbFHQSwhqoPQ82I6v36O.csv"
            }
            Self::Products => {
                "Auro%20Backend%20Data%20-%20Laundry_Care_Products%20%281%29-56tqXD5b4jirG6Lytv7yJMGGM7K3tM.csv"
            }
        }
    }

    #[must_use]
    pub fn url(self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.file_name())
    }
}

impl fmt::Display for CsvDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for CsvDataset {
    type Err = CsvError;

    /// Accepts the slug plus `snake_case` / `camelCase` spellings.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|dataset| dataset.slug().replace('-', "") == normalized)
            .ok_or_else(|| CsvError::UnknownDataset(raw.to_string()))
    }
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;
