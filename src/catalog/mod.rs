//! The filter catalog: a fixed list of style descriptors built once at startup.
//!
//! A handful of curated filters is topped up with generated "adjective noun"
//! filters until the catalog reaches its target size.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

mod curated;
pub mod selector;

use curated::{ADJECTIVES, CURATED_FILTERS, NOUNS, generated_base_query};

/// Preview shown for a category with no placeholder of its own.
pub const DEFAULT_PREVIEW_IMAGE: &str =
    "https://images.unsplash.com/photo-1511367461989-f85a21fda167?w=200&h=200&fit=crop&q=80";

const PREVIEW_IMAGES: &[(Category, &str)] = &[
    (
        Category::Cinematic,
        "https://images.unsplash.com/photo-1535016120720-40c646be5580?w=200&h=200&fit=crop&q=80",
    ),
    (
        Category::Artistic,
        "https://images.unsplash.com/photo-1579783902614-a3fb3927b6a5?w=200&h=200&fit=crop&q=80",
    ),
    (
        Category::Futuristic,
        "https://images.unsplash.com/photo-1517976487-151859915579?w=200&h=200&fit=crop&q=80",
    ),
    (
        Category::Vintage,
        "https://images.unsplash.com/photo-1490718593589-ca05e990b343?w=200&h=200&fit=crop&q=80",
    ),
    (
        Category::Animation,
        "https://images.unsplash.com/photo-1620573998018-b726055b8509?w=200&h=200&fit=crop&q=80",
    ),
    (
        Category::Fantasy,
        "https://images.unsplash.com/photo-1534352824599-c5ce32213600?w=200&h=200&fit=crop&q=80",
    ),
    (
        Category::Abstract,
        "https://images.unsplash.com/photo-1509114397022-ed747cca3f65?w=200&h=200&fit=crop&q=80",
    ),
    (
        Category::Photography,
        "https://images.unsplash.com/photo-1482049016688-2d3e1b311543?w=200&h=200&fit=crop&q=80",
    ),
    (
        Category::Illustration,
        "https://images.unsplash.com/photo-1605721911519-58b382d577a4?w=200&h=200&fit=crop&q=80",
    ),
    (
        Category::Gaming,
        "https://images.unsplash.com/photo-1580234811497-9df7fd2f357e?w=200&h=200&fit=crop&q=80",
    ),
];

/// Style families a filter belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Film looks
    #[default]
    Cinematic,
    /// Painting and print techniques
    Artistic,
    /// Sci-fi looks
    Futuristic,
    /// Old photographic processes
    Vintage,
    /// Cartoon and animated looks
    Animation,
    /// Magic and myth
    Fantasy,
    /// Non-figurative styles
    Abstract,
    /// Camera and darkroom styles
    Photography,
    /// Drawn styles
    Illustration,
    /// Video game looks
    Gaming,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 10] = [
        Category::Cinematic,
        Category::Artistic,
        Category::Futuristic,
        Category::Vintage,
        Category::Animation,
        Category::Fantasy,
        Category::Abstract,
        Category::Photography,
        Category::Illustration,
        Category::Gaming,
    ];

    /// Human readable name, also the fallback label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Cinematic => "Cinematic",
            Category::Artistic => "Artistic",
            Category::Futuristic => "Futuristic",
            Category::Vintage => "Vintage",
            Category::Animation => "Animation",
            Category::Fantasy => "Fantasy",
            Category::Abstract => "Abstract",
            Category::Photography => "Photography",
            Category::Illustration => "Illustration",
            Category::Gaming => "Gaming",
        }
    }

    /// Lowercase form used in URLs and ids.
    pub fn slug(self) -> String {
        self.label().to_ascii_lowercase()
    }

    /// Localization key for the category label.
    pub fn locale_key(self) -> String {
        format!("category_{}", self.label())
    }

    /// Placeholder preview for filters in this category.
    pub fn preview_image_url(self) -> &'static str {
        PREVIEW_IMAGES
            .iter()
            .find(|(category, _)| *category == self)
            .map(|(_, url)| *url)
            .unwrap_or(DEFAULT_PREVIEW_IMAGE)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string names no category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(value.to_string()))
    }
}

/// Lowercases and drops everything outside `[a-z0-9]`.
fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Id of the filter called `name` in `category`.
pub fn filter_id(category: Category, name: &str) -> String {
    format!("{}-{}", slugify(category.label()), slugify(name))
}

/// A named style, immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    id: String,
    name: String,
    category: Category,
    base_query: String,
    preview_image_url: String,
}

impl FilterDescriptor {
    /// Builds a descriptor; an empty base query falls back to the name.
    pub fn new(name: &str, category: Category, base_query: &str) -> Self {
        let base_query = if base_query.trim().is_empty() {
            name
        } else {
            base_query
        };
        Self {
            id: filter_id(category, name),
            name: name.to_string(),
            category,
            base_query: base_query.to_string(),
            preview_image_url: category.preview_image_url().to_string(),
        }
    }

    /// Unique id, derived from category and name.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category this filter is listed under.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Short style description that seeds prompt synthesis.
    pub fn base_query(&self) -> &str {
        &self.base_query
    }

    /// Thumbnail URL.
    pub fn preview_image_url(&self) -> &str {
        &self.preview_image_url
    }
}

/// Errors from building the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The word lists cannot produce enough distinct names.
    Exhausted {
        /// generated entries required to reach the target
        needed: usize,
        /// distinct entries the word lists can still produce
        available: usize,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { needed, available } => write!(
                f,
                "Catalog needs {needed} generated filters but only {available} distinct names are possible"
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

struct Candidate {
    category: Category,
    adjective: &'static str,
    noun: &'static str,
}

impl Candidate {
    fn name(&self) -> String {
        format!("{} {}", self.adjective, self.noun)
    }

    fn into_descriptor(self) -> FilterDescriptor {
        FilterDescriptor::new(
            &self.name(),
            self.category,
            &generated_base_query(self.category, self.adjective, self.noun),
        )
    }
}

/// The ordered, read-only list of filters.
#[derive(Clone, Debug)]
pub struct Catalog {
    filters: Vec<FilterDescriptor>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog of exactly `target` filters.
    ///
    /// Curated filters come first. The remainder is drawn without replacement
    /// from every category/adjective/noun combination that does not clash
    /// with an existing name or id, shuffled with `seed`. The same seed always
    /// yields the same catalog.
    pub fn build(target: usize, seed: u64) -> Result<Self, CatalogError> {
        let mut filters: Vec<FilterDescriptor> = CURATED_FILTERS
            .iter()
            .take(target)
            .map(|curated| FilterDescriptor::new(curated.name, curated.category, curated.base_query))
            .collect();
        let needed = target - filters.len();

        let mut taken_names: HashSet<(Category, String)> = filters
            .iter()
            .map(|filter| (filter.category(), filter.name().to_string()))
            .collect();
        let mut taken_ids: HashSet<String> =
            filters.iter().map(|filter| filter.id().to_string()).collect();

        let mut candidates = Vec::new();
        if needed > 0 {
            for category in Category::ALL {
                for adjective in ADJECTIVES.iter().copied() {
                    for noun in NOUNS.iter().copied() {
                        let candidate = Candidate {
                            category,
                            adjective,
                            noun,
                        };
                        let name = candidate.name();
                        let id = filter_id(category, &name);
                        if taken_ids.contains(&id) || !taken_names.insert((category, name)) {
                            continue;
                        }
                        taken_ids.insert(id);
                        candidates.push(candidate);
                    }
                }
            }
        }

        if candidates.len() < needed {
            return Err(CatalogError::Exhausted {
                needed,
                available: candidates.len(),
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        candidates.shuffle(&mut rng);
        filters.extend(
            candidates
                .into_iter()
                .take(needed)
                .map(Candidate::into_descriptor),
        );

        debug!(
            curated = filters.len() - needed,
            generated = needed,
            "Catalog assembled"
        );
        info!("Built filter catalog with {} entries", filters.len());
        Ok(Self::from_filters(filters))
    }

    fn from_filters(filters: Vec<FilterDescriptor>) -> Self {
        let by_id = filters
            .iter()
            .enumerate()
            .map(|(index, filter)| (filter.id().to_string(), index))
            .collect();
        Self { filters, by_id }
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// True when the catalog holds nothing.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// All filters in catalog order.
    pub fn filters(&self) -> &[FilterDescriptor] {
        &self.filters
    }

    /// Looks a filter up by id.
    pub fn get(&self, id: &str) -> Option<&FilterDescriptor> {
        self.by_id.get(id).and_then(|index| self.filters.get(*index))
    }
}
