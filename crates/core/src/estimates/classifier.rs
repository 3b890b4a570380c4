//! Growth-sector classification.

/// Decides whether a holding looks like a growth-sector stock.
///
/// Any closure `Fn(&str) -> bool` can be used directly.
pub trait SectorClassifier: Send + Sync {
    fn is_growth(&self, stock_name: &str) -> bool;
}

impl<F> SectorClassifier for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_growth(&self, stock_name: &str) -> bool {
        self(stock_name)
    }
}

/// Name fragments of the growth bellwethers used by default.
pub const DEFAULT_GROWTH_KEYWORDS: &[&str] = &[
    "宁德",
    "阳光",
    "药明",
    "隆基",
    "比亚迪",
    "迈瑞",
    "东方财富",
];

/// Substring match against a keyword list.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
}

impl KeywordClassifier {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(Into::into)
                .filter(|k: &String| !k.is_empty())
                .collect(),
        }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_GROWTH_KEYWORDS.iter().copied())
    }
}

impl SectorClassifier for KeywordClassifier {
    fn is_growth(&self, stock_name: &str) -> bool {
        self.keywords.iter().any(|k| stock_name.contains(k.as_str()))
    }
}
