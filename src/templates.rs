use serde::Serialize;
use tracing::warn;

pub const DEFAULT_MAX_ENTRIES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Default,
    Compact,
    Gaming,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    pub id: TemplateKind,
    pub name: &'static str,
    pub description: &'static str,
    pub max_width: &'static str,
    pub visual_style: &'static str,
    pub best_for: &'static [&'static str],
    pub features: &'static [&'static str],
    /// Whether the top three rows are also rendered as a podium.
    pub podium: bool,
}

static TEMPLATES: [TemplateConfig; 3] = [
    TemplateConfig {
        id: TemplateKind::Default,
        name: "Default",
        description: "A clean, professional leaderboard with balanced spacing",
        max_width: "max-w-2xl",
        visual_style: "clean",
        best_for: &["Business applications", "Professional websites", "General purpose"],
        features: &["Card-based rows", "Top 3 highlighting", "Responsive layout"],
        podium: false,
    },
    TemplateConfig {
        id: TemplateKind::Compact,
        name: "Compact",
        description: "A space-efficient layout that fits more entries on screen",
        max_width: "max-w-4xl",
        visual_style: "compact",
        best_for: &["High-traffic leaderboards", "Mobile-first applications"],
        features: &["Podium for the top 3", "Divided entry layout", "Optimized for many entries"],
        podium: true,
    },
    TemplateConfig {
        id: TemplateKind::Gaming,
        name: "Gaming",
        description: "A dark, gaming-themed layout with glowing accents",
        max_width: "max-w-3xl",
        visual_style: "gaming",
        best_for: &["Gaming applications", "Esports platforms"],
        features: &["Dark aesthetic", "Gradient backgrounds", "Animated hover states"],
        podium: false,
    },
];

impl TemplateKind {
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "default" => Some(TemplateKind::Default),
            "compact" => Some(TemplateKind::Compact),
            "gaming" => Some(TemplateKind::Gaming),
            _ => None,
        }
    }

    /// Unknown or missing keys fall back to [`TemplateKind::Default`].
    pub fn resolve(key: Option<&str>) -> Self {
        match key {
            None => TemplateKind::Default,
            Some(k) => TemplateKind::parse(k).unwrap_or_else(|| {
                warn!(template = k, "unknown template type, falling back to default");
                TemplateKind::Default
            }),
        }
    }

    pub fn config(self) -> &'static TemplateConfig {
        match self {
            TemplateKind::Default => &TEMPLATES[0],
            TemplateKind::Compact => &TEMPLATES[1],
            TemplateKind::Gaming => &TEMPLATES[2],
        }
    }
}

pub fn all_templates() -> &'static [TemplateConfig] {
    &TEMPLATES
}
