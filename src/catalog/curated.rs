//! Handcrafted filters and the word lists for generated ones.

use super::Category;

pub(crate) struct CuratedFilter {
    pub(crate) name: &'static str,
    pub(crate) category: Category,
    pub(crate) base_query: &'static str,
}

const fn curated(
    name: &'static str,
    category: Category,
    base_query: &'static str,
) -> CuratedFilter {
    CuratedFilter {
        name,
        category,
        base_query,
    }
}

pub(crate) const CURATED_FILTERS: &[CuratedFilter] = &[
    curated(
        "Neo-Noir",
        Category::Cinematic,
        "cinematic neo-noir style, high contrast, dramatic shadows, cool color palette with pops of neon",
    ),
    curated(
        "Epic Fantasy Film",
        Category::Cinematic,
        "epic fantasy movie style, grand vistas, rich colors, soft magical lighting, ethereal atmosphere",
    ),
    curated(
        "80s Action Movie",
        Category::Cinematic,
        "80s action film look, grainy film texture, vibrant saturated colors, lens flares, anamorphic style",
    ),
    curated(
        "Wes Anderson Style",
        Category::Cinematic,
        "Symmetrical composition, pastel color palette, vintage aesthetic, distinct visual storytelling reminiscent of Wes Anderson's films.",
    ),
    curated(
        "Spaghetti Western",
        Category::Cinematic,
        "Gritty, sun-drenched look of a Spaghetti Western. High contrast, warm tones, and dramatic, wide-angle shots.",
    ),
    curated(
        "Watercolor Painting",
        Category::Artistic,
        "beautiful watercolor painting style, soft edges, vibrant translucent colors, textured paper effect",
    ),
    curated(
        "Impressionism",
        Category::Artistic,
        "impressionist painting style, visible brush strokes, emphasis on light and its changing qualities",
    ),
    curated(
        "Pop Art",
        Category::Artistic,
        "pop art style, bold outlines, bright, vibrant colors, ben-day dots, graphic and iconic",
    ),
    curated(
        "Japanese Ukiyo-e",
        Category::Artistic,
        "Classic Japanese Ukiyo-e woodblock print style. Flat areas of color, bold outlines, and subjects from nature or daily life.",
    ),
    curated(
        "Art Deco",
        Category::Artistic,
        "Elegant and sophisticated Art Deco style. Strong geometric shapes, rich colors, and luxurious details.",
    ),
    curated(
        "Cyberpunk Cityscape",
        Category::Futuristic,
        "cyberpunk aesthetic, neon-drenched cityscapes, futuristic technology, gritty and dystopian mood",
    ),
    curated(
        "Solarpunk Utopia",
        Category::Futuristic,
        "solarpunk aesthetic, lush greenery integrated with futuristic architecture, optimistic and bright, renewable energy motifs",
    ),
    curated(
        "Retro-Futurism",
        Category::Futuristic,
        "A vision of the future from the 1950s. Chrome details, atomic age motifs, and a sense of optimistic technology.",
    ),
    curated(
        "Sepia Tone Memory",
        Category::Vintage,
        "vintage sepia tone photograph, aged paper texture, soft focus, nostalgic and sentimental feeling",
    ),
    curated(
        "1960s Polaroid",
        Category::Vintage,
        "1960s polaroid photo style, faded colors, light leaks, soft focus, classic white border",
    ),
    curated(
        "Victorian Daguerreotype",
        Category::Vintage,
        "Early photographic style of a Victorian daguerreotype. Muted tones, high detail, and a formal, posed quality.",
    ),
];

pub(crate) const ADJECTIVES: &[&str] = &[
    "Mystical",
    "Retro",
    "Cosmic",
    "Urban",
    "Pastel",
    "Vivid",
    "Monochrome",
    "Surreal",
    "Gothic",
    "Minimalist",
    "Ethereal",
    "Radiant",
    "Subtle",
    "Bold",
    "Dreamy",
    "Gritty",
];

pub(crate) const NOUNS: &[&str] = &[
    "Dream", "Glow", "Wash", "Chrome", "Haze", "Punk", "Wave", "Bloom", "Verse", "Core", "Shift",
    "Fade", "Echo", "Lens", "Filter", "Tone",
];

/// Seed text for a generated filter.
pub(crate) fn generated_base_query(category: Category, adjective: &str, noun: &str) -> String {
    format!(
        "An image in the style of {adjective} {noun}, capturing a {} aesthetic. Emphasize {} tones and a {} feel.",
        category.slug(),
        adjective.to_lowercase(),
        noun.to_lowercase()
    )
}
