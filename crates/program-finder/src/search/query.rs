use serde::Deserialize;

/// Generic terms that steer results toward programme pages.
pub const PROGRAMME_TERMS: &str = "(programme OR program OR course OR study OR studies)";
/// Exclusions for brochures, PDFs and news items.
pub const NOISE_EXCLUSIONS: &str = "-filetype:pdf -brochure -inurl:news";

/// Static country table: lowercase name or alias → site restrictions.
pub static COUNTRY_SITES: &[(&str, &[&str])] = &[
    ("austria", &["site:.at"]),
    ("belgium", &["site:.be"]),
    ("denmark", &["site:.dk"]),
    ("finland", &["site:.fi"]),
    ("france", &["site:.fr"]),
    ("germany", &["site:.de"]),
    ("ireland", &["site:.ie"]),
    ("italy", &["site:.it"]),
    ("netherlands", &["site:.nl"]),
    ("nordics", &["site:.dk", "site:.fi", "site:.no", "site:.se"]),
    ("norway", &["site:.no"]),
    ("spain", &["site:.es"]),
    ("sweden", &["site:.se"]),
    ("uk", &["site:.ac.uk"]),
    ("united kingdom", &["site:.ac.uk"]),
];

/// Caller-supplied search filters. Missing values fall back to a master's,
/// English-taught, worldwide search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub english: Option<String>,
}

/// Composed provider query. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
}

impl SearchQuery {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn into_inner(self) -> String {
        self.raw
    }
}

/// Builds the provider query for `filters`. Total: unknown values just
/// contribute nothing.
pub fn build_query(filters: &SearchFilters) -> SearchQuery {
    let field = filters.field.as_deref().unwrap_or("").trim();
    let degree = normalized(filters.degree.as_deref(), "master");
    let english = normalized(filters.english.as_deref(), "yes");
    let country = normalized(filters.country.as_deref(), "all");

    let mut parts: Vec<String> = Vec::new();
    if !field.is_empty() {
        parts.push(field.to_string());
    }
    if let Some(group) = degree_group(&degree) {
        parts.push(group.to_string());
    }
    if english == "yes" {
        parts.push("english".to_string());
    }
    parts.push(PROGRAMME_TERMS.to_string());
    if let Some(clause) = site_clause(&country) {
        parts.push(clause);
    }
    parts.push(NOISE_EXCLUSIONS.to_string());

    SearchQuery {
        raw: parts.join(" "),
    }
}

fn normalized(value: Option<&str>, default: &str) -> String {
    value.unwrap_or(default).trim().to_ascii_lowercase()
}

fn degree_group(degree: &str) -> Option<&'static str> {
    match degree {
        "master" | "masters" | "msc" | "ma" => Some("(master OR MSc)"),
        "bachelor" | "bachelors" | "bsc" | "ba" => Some("(bachelor OR BSc)"),
        _ => None,
    }
}

/// Site restriction for a known country, `None` for "all" or anything unknown.
pub fn site_clause(country: &str) -> Option<String> {
    let (_, sites) = COUNTRY_SITES
        .iter()
        .find(|(name, _)| *name == country)?;
    match *sites {
        [] => None,
        [single] => Some(single.to_string()),
        many => Some(format!("({})", many.join(" OR "))),
    }
}
