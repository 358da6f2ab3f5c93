//! Genre keyword to model feature encoding.
//!
//! Model feature columns are compound names such as `genre_rock_subgenre`,
//! so a listener's genre keyword is matched by case-insensitive containment
//! rather than equality. Every matching column is switched on, which gives a
//! multi-hot row when one keyword spans several columns.

/// The model input derived from one genre keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreFeatures {
    /// Names of the columns the keyword matched, in model order
    pub matched: Vec<String>,
    /// One value per model feature: 1.0 for matched columns, 0.0 elsewhere
    pub vector: Vec<f64>,
}

impl GenreFeatures {
    /// Encode `keyword` against the model's `feature_names`.
    ///
    /// The keyword is used as given: surrounding whitespace is part of the
    /// needle, and an empty keyword is contained in every column name.
    pub fn from_keyword(keyword: &str, feature_names: &[String]) -> Self {
        let needle = keyword.to_lowercase();

        let mut matched = Vec::new();
        let vector = feature_names
            .iter()
            .map(|name| {
                if name.to_lowercase().contains(&needle) {
                    matched.push(name.clone());
                    1.0
                } else {
                    0.0
                }
            })
            .collect();

        Self { matched, vector }
    }

    /// Whether the keyword matched no feature column at all
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}
