//! Beer catalogue used by the list-layout strategies.

use serde::{Deserialize, Serialize};

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeerListing {
    pub name: String,
    pub country: String,
    pub info: String,
    /// Image location without scheme
    pub img: String,
}

impl BeerListing {
    fn new(name: &str, country: &str, info: &str, img: &str) -> Self {
        Self {
            name: name.to_string(),
            country: country.to_string(),
            info: info.to_string(),
            img: img.to_string(),
        }
    }
}

/// Returns the demonstration catalogue.
pub fn catalog() -> Vec<BeerListing> {
    vec![
        BeerListing::new(
            "Erdinger Pikantus",
            "Germany",
            "A weizenbock brewed in the Bavarian town of Erding.",
            "dxjcdxuv6chk2.cloudfront.net/assets/biere/flascheglas/pikantus-2020-v2.png",
        ),
        BeerListing::new(
            "Corona",
            "Mexico",
            "A worldwide brand distributed in more than 159 countries.",
            "upload.wikimedia.org/wikipedia/commons/0/0c/Corona-6Pack.JPG",
        ),
        BeerListing::new(
            "Delirium Tremens",
            "Belgium",
            "A pale ale with fine effervescence and a dry, bitter finish.",
            "www.delirium.be/themes/custom/delirium/assets/img/beers/beer_delirium_tremens_bottle.png",
        ),
    ]
}
