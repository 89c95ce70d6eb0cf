//! Integer-keyed tables of the entities that article sets refer to
//!
//! The serialized dataset refers to countries, categories, tags and keywords
//! through integer ids. Those ids only matter while loading: once an entity is
//! registered, article sets hold a [`Key`] into the matching [`Table`], which
//! stays valid even if the id gets re-registered later on.

use crate::{result::Dimension, EntityId};
use std::{
    collections::HashMap,
    fmt::{self, Debug},
    hash::{Hash, Hasher},
    marker::PhantomData,
};
use unicase::UniCase;

/// Entity which is identified by a human-readable name
pub trait Named {
    /// Name under which this entity is shown and queried
    fn name(&self) -> &str;
}

/// Country that articles are about
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Country {
    name: Box<str>,
}
//
impl Country {
    /// Record a new country
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Self { name: name.into() }
    }
}
//
impl Named for Country {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Top-level category of the topic model
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Category {
    name: Box<str>,
}
//
impl Category {
    /// Record a new category
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Self { name: name.into() }
    }
}
//
impl Named for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Tag of the topic model, which belongs to exactly one category
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Tag {
    /// Name of the tag
    name: Box<str>,

    /// Category in which this tag is a member
    category: Key<Category>,
}
//
impl Tag {
    /// Record a new tag
    pub fn new(name: impl Into<Box<str>>, category: Key<Category>) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }

    /// Category in which this tag is a member
    pub fn category(&self) -> Key<Category> {
        self.category
    }
}
//
impl Named for Tag {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Keyword of the topic model, which belongs to one category and one tag
///
/// The category is stored as it was serialized rather than derived from the
/// tag. The two are expected to agree, but nothing enforces it.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Keyword {
    /// Name of the keyword, as found in articles
    name: Box<str>,

    /// Category in which this keyword is a member
    category: Key<Category>,

    /// Tag in which this keyword is a member
    tag: Key<Tag>,
}
//
impl Keyword {
    /// Record a new keyword
    pub fn new(name: impl Into<Box<str>>, category: Key<Category>, tag: Key<Tag>) -> Self {
        Self {
            name: name.into(),
            category,
            tag,
        }
    }

    /// Category in which this keyword is a member
    pub fn category(&self) -> Key<Category> {
        self.category
    }

    /// Tag in which this keyword is a member
    pub fn tag(&self) -> Key<Tag> {
        self.tag
    }
}
//
impl Named for Keyword {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Handle to an entity stored inside of a [`Table`]
pub struct Key<E> {
    index: u32,
    entity: PhantomData<fn() -> E>,
}
//
impl<E> Key<E> {
    /// Wrap a table index
    fn new(index: usize) -> Self {
        Self {
            index: u32::try_from(index).expect("registry tables should not exceed u32::MAX entries"),
            entity: PhantomData,
        }
    }

    /// Position of the entity within its table
    fn index(self) -> usize {
        self.index as usize
    }
}
//
impl<E> Clone for Key<E> {
    fn clone(&self) -> Self {
        *self
    }
}
//
impl<E> Copy for Key<E> {}
//
impl<E> PartialEq for Key<E> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}
//
impl<E> Eq for Key<E> {}
//
impl<E> Hash for Key<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state)
    }
}
//
impl<E> Debug for Key<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.index)
    }
}

/// Table of entities of a single kind, addressable by serialized id
#[derive(Clone, Debug)]
pub struct Table<E> {
    /// Every entity ever registered, including those whose id was reused
    entries: Vec<E>,

    /// Latest entity registered under each serialized id
    by_id: HashMap<EntityId, Key<E>>,
}
//
impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_id: HashMap::new(),
        }
    }
}
//
impl<E: Named> Table<E> {
    /// Register an entity under a serialized id
    ///
    /// If the id was already in use, the former entity stays reachable through
    /// the keys that were handed out for it, but further lookups of the id
    /// will resolve to the new entity. The former key is returned in this
    /// case.
    pub fn register(&mut self, id: EntityId, entity: E) -> (Key<E>, Option<Key<E>>) {
        let key = Key::new(self.entries.len());
        self.entries.push(entity);
        (key, self.by_id.insert(id, key))
    }

    /// Find the entity currently registered under a serialized id
    pub fn resolve(&self, id: EntityId) -> Option<Key<E>> {
        self.by_id.get(&id).copied()
    }

    /// Access an entity
    pub fn get(&self, key: Key<E>) -> &E {
        &self.entries[key.index()]
    }

    /// Name of an entity
    pub fn name(&self, key: Key<E>) -> &str {
        self.get(key).name()
    }

    /// Number of entities that were registered
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Truth that no entity was registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entities along with their keys
    pub fn iter(&self) -> impl Iterator<Item = (Key<E>, &E)> + '_ {
        (self.entries.iter().enumerate()).map(|(index, entity)| (Key::new(index), entity))
    }

    /// Keys of all entities that go by a certain name
    ///
    /// Names are matched exactly. An empty list means that the name does not
    /// appear in the dataset.
    pub fn keys_named(&self, name: &str) -> Vec<Key<E>> {
        self.iter()
            .filter(|(_key, entity)| entity.name() == name)
            .map(|(key, _entity)| key)
            .collect()
    }

    /// Spelling used by the dataset for a name, ignoring case differences
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        let wanted = UniCase::new(name);
        (self.entries.iter())
            .map(Named::name)
            .find(|candidate| UniCase::new(*candidate) == wanted)
    }
}

/// Every entity known to the dataset
#[derive(Clone, Debug, Default)]
pub struct Registry {
    pub countries: Table<Country>,
    pub categories: Table<Category>,
    pub tags: Table<Tag>,
    pub keywords: Table<Keyword>,
}
//
impl Registry {
    /// Set up an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the category that a tag belongs to
    pub fn tag_category_name(&self, tag: Key<Tag>) -> &str {
        self.categories.name(self.tags.get(tag).category())
    }

    /// Name of the category that a keyword's tag belongs to
    pub fn keyword_tag_category_name(&self, keyword: Key<Keyword>) -> &str {
        self.tag_category_name(self.keywords.get(keyword).tag())
    }

    /// Spelling used by the dataset for a name along some dimension, ignoring
    /// case differences
    pub fn canonical_name(&self, dimension: Dimension, name: &str) -> Option<&str> {
        match dimension {
            Dimension::Categories => self.categories.canonical_name(name),
            Dimension::Countries => self.countries.canonical_name(name),
            Dimension::Tags => self.tags.canonical_name(name),
            Dimension::Keywords => self.keywords.canonical_name(name),
        }
    }
}
