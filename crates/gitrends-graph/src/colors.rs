//! Color palettes and the category ranker
//!
//! Categorical views (main developer, commit spread, modules) rank their
//! categories by frequency, keep the top N and fold the rest into a single
//! "Others" bucket. Colors are then assigned by rank, so the same input always
//! maps to the same colors.

use std::collections::HashMap;

use egui::Color32;

/// Name of the overflow bucket
pub const OTHERS: &str = "Others";

// =============================================================================
// PALETTES
// =============================================================================

/// Tableau 10
pub const TABLEAU10: [Color32; 10] = [
    Color32::from_rgb(0x4e, 0x79, 0xa7),
    Color32::from_rgb(0xf2, 0x8e, 0x2c),
    Color32::from_rgb(0xe1, 0x57, 0x59),
    Color32::from_rgb(0x76, 0xb7, 0xb2),
    Color32::from_rgb(0x59, 0xa1, 0x4f),
    Color32::from_rgb(0xed, 0xc9, 0x49),
    Color32::from_rgb(0xaf, 0x7a, 0xa1),
    Color32::from_rgb(0xff, 0x9d, 0xa7),
    Color32::from_rgb(0x9c, 0x75, 0x5f),
    Color32::from_rgb(0xba, 0xb0, 0xab),
];

/// Tableau 20
pub const TABLEAU20: [Color32; 20] = [
    Color32::from_rgb(0x4e, 0x79, 0xa7),
    Color32::from_rgb(0xa0, 0xcb, 0xe8),
    Color32::from_rgb(0xf2, 0x8e, 0x2b),
    Color32::from_rgb(0xff, 0xbe, 0x7d),
    Color32::from_rgb(0x59, 0xa1, 0x4f),
    Color32::from_rgb(0x8c, 0xd1, 0x7d),
    Color32::from_rgb(0xb6, 0x99, 0x2d),
    Color32::from_rgb(0xf1, 0xce, 0x63),
    Color32::from_rgb(0x49, 0x98, 0x94),
    Color32::from_rgb(0x86, 0xbc, 0xb6),
    Color32::from_rgb(0xe1, 0x57, 0x59),
    Color32::from_rgb(0xff, 0x9d, 0x9a),
    Color32::from_rgb(0x79, 0x70, 0x6e),
    Color32::from_rgb(0xba, 0xb0, 0xac),
    Color32::from_rgb(0xd3, 0x72, 0x95),
    Color32::from_rgb(0xfa, 0xbf, 0xd2),
    Color32::from_rgb(0xb0, 0x7a, 0xa1),
    Color32::from_rgb(0xd4, 0xa6, 0xc8),
    Color32::from_rgb(0x9d, 0x76, 0x60),
    Color32::from_rgb(0xd7, 0xb5, 0xa6),
];

// =============================================================================
// ENCLOSURE FILLS
// =============================================================================

const DEPTH_START: Color32 = Color32::from_rgb(163, 245, 207); // hsl(152, 80%, 80%)
const DEPTH_END: Color32 = Color32::from_rgb(71, 84, 133); // hsl(228, 30%, 40%)
const DEPTH_DOMAIN: (f32, f32) = (-1.0, 5.0);

pub const HOTSPOT_COLOR: Color32 = Color32::from_rgb(139, 0, 0); // darkred
pub const COLD_LEAF_COLOR: Color32 = Color32::from_rgb(245, 245, 245); // whitesmoke

/// Fill for internal circles, lighter near the root
pub fn depth_color(depth: usize) -> Color32 {
    let (lo, hi) = DEPTH_DOMAIN;
    let t = ((depth as f32 - lo) / (hi - lo)).clamp(0.0, 1.0);
    lerp_color(DEPTH_START, DEPTH_END, t)
}

/// Leaf fill for weight-driven views: dark red with the weight as opacity
pub fn weight_color(weight: Option<f64>) -> Color32 {
    match weight {
        Some(w) if w > 0.0 => with_opacity(HOTSPOT_COLOR, w.min(1.0) as f32),
        _ => COLD_LEAF_COLOR,
    }
}

pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let [r, g, b, a] = color.to_array();
    Color32::from_rgba_unmultiplied(r, g, b, (a as f32 * opacity.clamp(0.0, 1.0)) as u8)
}

/// Additive variant of a color, used for the screen-like edge blend
pub fn additive(color: Color32) -> Color32 {
    let [r, g, b, _] = color.to_array();
    Color32::from_rgba_premultiplied(r, g, b, 0)
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

// =============================================================================
// CATEGORY RANKING
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCategory {
    pub name: String,
    pub count: f64,
}

/// Categories ranked by descending count, capped at `max_categories`
///
/// Ties keep first-seen order. Everything past the cap is summed into
/// [`OTHERS`], which always exists even when nothing overflowed.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRanking {
    retained: Vec<RankedCategory>,
    others: f64,
}

impl CategoryRanking {
    /// Rank weighted observations
    pub fn rank<I, S>(observations: I, max_categories: usize) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut totals: Vec<RankedCategory> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut others = 0.0;

        for (category, weight) in observations {
            let category = category.as_ref();
            if category == OTHERS {
                others += weight;
                continue;
            }
            match index.get(category) {
                Some(i) => totals[*i].count += weight,
                None => {
                    index.insert(category.to_string(), totals.len());
                    totals.push(RankedCategory {
                        name: category.to_string(),
                        count: weight,
                    });
                }
            }
        }

        totals.sort_by(|a, b| b.count.total_cmp(&a.count));
        if totals.len() > max_categories {
            others += totals[max_categories..].iter().map(|c| c.count).sum::<f64>();
            totals.truncate(max_categories);
        }

        Self {
            retained: totals,
            others,
        }
    }

    /// Rank by number of occurrences
    pub fn count<I, S>(categories: I, max_categories: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::rank(categories.into_iter().map(|c| (c, 1.0)), max_categories)
    }

    pub fn retained(&self) -> &[RankedCategory] {
        &self.retained
    }

    /// Summed count of the categories past the cap
    pub fn others(&self) -> f64 {
        self.others
    }

    pub fn contains(&self, category: &str) -> bool {
        self.retained.iter().any(|c| c.name == category)
    }

    /// The bucket a category falls into: itself if retained, else "Others"
    pub fn bucket_of<'a>(&self, category: &'a str) -> &'a str {
        if self.contains(category) {
            category
        } else {
            OTHERS
        }
    }

    /// Retained categories followed by "Others"
    pub fn entries(&self) -> Vec<RankedCategory> {
        let mut out = self.retained.clone();
        out.push(RankedCategory {
            name: OTHERS.to_string(),
            count: self.others,
        });
        out
    }
}

// =============================================================================
// ORDINAL COLORS
// =============================================================================

/// Rank-ordered color assignment over a palette (cycling)
#[derive(Debug, Clone)]
pub struct CategoryColors {
    palette: &'static [Color32],
    slots: HashMap<String, usize>,
    order: Vec<String>,
}

impl CategoryColors {
    pub fn new(ranking: &CategoryRanking, palette: &'static [Color32]) -> Self {
        Self::from_names(ranking.entries().into_iter().map(|c| c.name), palette)
    }

    /// Colors in the given order, duplicates keep their first slot
    pub fn from_names<I, S>(names: I, palette: &'static [Color32]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slots = HashMap::new();
        let mut order = Vec::new();
        for name in names {
            let name = name.into();
            if !slots.contains_key(&name) {
                slots.insert(name.clone(), order.len());
                order.push(name);
            }
        }
        Self {
            palette,
            slots,
            order,
        }
    }

    /// Color for a category, unknown categories share the "Others" color
    pub fn color(&self, category: &str) -> Color32 {
        let slot = self
            .slots
            .get(category)
            .or_else(|| self.slots.get(OTHERS))
            .copied()
            .unwrap_or(self.order.len());
        self.slot_color(slot)
    }

    fn slot_color(&self, slot: usize) -> Color32 {
        if self.palette.is_empty() {
            return Color32::GRAY;
        }
        self.palette[slot % self.palette.len()]
    }

    /// Legend rows in rank order
    pub fn legend(&self, shorten: bool) -> Vec<(String, Color32)> {
        self.order
            .iter()
            .enumerate()
            .map(|(slot, name)| {
                let label = if shorten {
                    shorten_name(name)
                } else {
                    name.clone()
                };
                (label, self.slot_color(slot))
            })
            .collect()
    }
}

/// "John Smith" -> "J. Smith"; single names are kept as is
pub fn shorten_name(name: &str) -> String {
    let mut parts = name.split_whitespace();
    let (Some(first), rest) = (parts.next(), parts.collect::<Vec<_>>()) else {
        return name.to_string();
    };
    if rest.is_empty() {
        return name.to_string();
    }
    match first.chars().next() {
        Some(initial) => format!("{}. {}", initial, rest.join(" ")),
        None => name.to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
