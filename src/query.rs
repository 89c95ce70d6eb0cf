//! Description of which articles should be summarized

/// Separator between the components of [`Query::id_str()`]
pub(crate) const ID_SEPARATOR: char = '\t';

/// Rendering of an unset component in [`Query::id_str()`]
pub(crate) const UNSET: &str = "None";

/// Query for a set of articles to be summarized as statistics
///
/// All fields refer to entity names as they appear in the dataset. `category`
/// does not filter the population, it selects the category that the group
/// count and breakdowns are computed for. The other fields are filters, which
/// articles must all satisfy.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Query {
    /// Category for which group statistics should be computed
    category: Option<Box<str>>,

    /// Category that articles must be members of
    pre_category: Option<Box<str>>,

    /// Country that articles must be about
    country: Option<Box<str>>,

    /// Tag that articles must be members of
    tag: Option<Box<str>>,

    /// Keyword that articles must contain
    keyword: Option<Box<str>>,
}
//
impl Query {
    /// Build a query from its components
    pub fn new(
        category: Option<&str>,
        pre_category: Option<&str>,
        country: Option<&str>,
        tag: Option<&str>,
        keyword: Option<&str>,
    ) -> Self {
        Self {
            category: category.map(Into::into),
            pre_category: pre_category.map(Into::into),
            country: country.map(Into::into),
            tag: tag.map(Into::into),
            keyword: keyword.map(Into::into),
        }
    }

    /// Compute group statistics for a certain category
    pub fn with_category(self, category: impl Into<Box<str>>) -> Self {
        Self {
            category: Some(category.into()),
            ..self
        }
    }

    /// Only consider articles from a certain category
    pub fn with_pre_category(self, pre_category: impl Into<Box<str>>) -> Self {
        Self {
            pre_category: Some(pre_category.into()),
            ..self
        }
    }

    /// Only consider articles about a certain country
    pub fn with_country(self, country: impl Into<Box<str>>) -> Self {
        Self {
            country: Some(country.into()),
            ..self
        }
    }

    /// Only consider articles with a certain tag
    pub fn with_tag(self, tag: impl Into<Box<str>>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..self
        }
    }

    /// Only consider articles containing a certain keyword
    pub fn with_keyword(self, keyword: impl Into<Box<str>>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..self
        }
    }

    /// Category for which group statistics should be computed, if any
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Category that articles must be members of, if any
    pub fn pre_category(&self) -> Option<&str> {
        self.pre_category.as_deref()
    }

    /// Country that articles must be about, if any
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Tag that articles must be members of, if any
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Keyword that articles must contain, if any
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Truth that this query filters articles
    ///
    /// The group category alone does not count as a filter, since it does not
    /// change the population that statistics are drawn from.
    pub fn has_filters(&self) -> bool {
        self.pre_category.is_some()
            || self.country.is_some()
            || self.tag.is_some()
            || self.keyword.is_some()
    }

    /// Identity string of this query
    ///
    /// Two queries have the same identity string if and only if they are
    /// equal. For names without tabs, backslashes, or the literal `None`, this
    /// is the tab-separated list of components, with `None` standing for unset
    /// components.
    pub fn id_str(&self) -> String {
        let components = [
            &self.category,
            &self.pre_category,
            &self.country,
            &self.tag,
            &self.keyword,
        ];
        let mut id = String::new();
        for (index, component) in components.into_iter().enumerate() {
            if index > 0 {
                id.push(ID_SEPARATOR);
            }
            match component.as_deref() {
                Some(value) => push_escaped(&mut id, value),
                None => id.push_str(UNSET),
            }
        }
        id
    }
}

/// Append a component to an identity string so that it can't be confused with
/// a separator or with an unset component
pub(crate) fn push_escaped(id: &mut String, value: &str) {
    if value == UNSET {
        id.push('\\');
        id.push_str(UNSET);
        return;
    }
    for c in value.chars() {
        match c {
            '\\' => id.push_str("\\\\"),
            ID_SEPARATOR => id.push_str("\\t"),
            other => id.push(other),
        }
    }
}
