//! Stable placeholder images for users and posts.
//!
//! The image for an entity only depends on its id and kind, so it stays the same across
//! refreshes and renders.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const USER_IMAGE_CATEGORIES: [&str; 3] = ["people", "face", "portrait"];
pub const POST_IMAGE_CATEGORIES: [&str; 10] = [
    "social",
    "technology",
    "business",
    "nature",
    "travel",
    "food",
    "architecture",
    "art",
    "fashion",
    "sports",
];

const SEED_MULTIPLIER: u64 = 13;
const SEED_MODULUS: u64 = 1000;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    User,
    Post,
}

impl ImageKind {
    #[must_use]
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            ImageKind::User => &USER_IMAGE_CATEGORIES,
            ImageKind::Post => &POST_IMAGE_CATEGORIES,
        }
    }

    #[must_use]
    pub fn dimensions(self) -> &'static str {
        match self {
            ImageKind::User => "200x200",
            ImageKind::Post => "800x600",
        }
    }
}

impl Display for ImageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageKind::User => f.write_str("user"),
            ImageKind::Post => f.write_str("post"),
        }
    }
}

/// `(id * 13) mod 1000`, reduced first so that no id overflows.
#[must_use]
pub fn image_seed(id: u64) -> u64 {
    (id % SEED_MODULUS) * SEED_MULTIPLIER % SEED_MODULUS
}

#[must_use]
pub fn image_category(id: u64, kind: ImageKind) -> &'static str {
    let categories = kind.categories();
    // The remainder is below the category count, so it always fits.
    #[allow(clippy::cast_possible_truncation)]
    let index = (id % categories.len() as u64) as usize;
    categories[index]
}

#[must_use]
pub fn select_image(id: impl Into<u64>, kind: ImageKind) -> String {
    let id = id.into();
    let dimensions = kind.dimensions();
    let category = image_category(id, kind);
    let seed = image_seed(id);

    format!("https://source.unsplash.com/random/{dimensions}/?{category}&sig={seed}")
}

#[cfg(test)]
mod tests {
    use crate::image::{
        ImageKind, POST_IMAGE_CATEGORIES, USER_IMAGE_CATEGORIES, image_category, image_seed,
        select_image,
    };
    use crate::model::{Id, post::PostMarker, user::UserMarker};

    #[test]
    fn same_input_gives_same_image() {
        assert_eq!(
            select_image(5_u64, ImageKind::User),
            select_image(5_u64, ImageKind::User)
        );
    }

    #[test]
    fn known_urls() {
        assert_eq!(
            select_image(5_u64, ImageKind::User),
            "https://source.unsplash.com/random/200x200/?portrait&sig=65"
        );
        assert_eq!(
            select_image(5_u64, ImageKind::Post),
            "https://source.unsplash.com/random/800x600/?food&sig=65"
        );
        assert_eq!(
            select_image(100_u64, ImageKind::Post),
            "https://source.unsplash.com/random/800x600/?social&sig=300"
        );
    }

    #[test]
    fn kinds_draw_from_different_categories() {
        for id in 0..50 {
            assert!(USER_IMAGE_CATEGORIES.contains(&image_category(id, ImageKind::User)));
            assert!(POST_IMAGE_CATEGORIES.contains(&image_category(id, ImageKind::Post)));
        }
        assert!(
            USER_IMAGE_CATEGORIES
                .iter()
                .all(|category| !POST_IMAGE_CATEGORIES.contains(category))
        );
        assert_ne!(
            select_image(5_u64, ImageKind::User),
            select_image(5_u64, ImageKind::Post)
        );
    }

    #[test]
    fn seed_matches_unreduced_formula() {
        for id in [0, 1, 76, 77, 999, 1000, 123_456] {
            assert_eq!(image_seed(id), id * 13 % 1000);
        }
        assert_eq!(image_seed(u64::MAX), 995);
    }

    #[test]
    fn accepts_typed_ids() {
        assert_eq!(
            select_image(Id::<UserMarker>::new(7), ImageKind::User),
            select_image(7_u64, ImageKind::User)
        );
        assert_eq!(
            select_image(Id::<PostMarker>::new(7), ImageKind::Post),
            select_image(7_u64, ImageKind::Post)
        );
    }

    #[test]
    fn kind_parses_from_lowercase() {
        let kind: ImageKind = serde_json::from_str("\"post\"").unwrap();
        assert_eq!(kind, ImageKind::Post);
        assert_eq!(ImageKind::User.to_string(), "user");
    }
}
