use std::borrow::Borrow;
use std::collections::{hash_map, HashMap};
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::mem;

const TYPE_MEMBERSHIP: &str = "m.room.member";

/// Lets the map be probed with borrowed `(&str, &str)` pairs while storing
/// owned keys.
pub trait StateKey {
    fn pair(&self) -> (&str, &str);
}

impl StateKey for (String, String) {
    fn pair(&self) -> (&str, &str) {
        (&self.0, &self.1)
    }
}

impl StateKey for (&str, &str) {
    fn pair(&self) -> (&str, &str) {
        (self.0, self.1)
    }
}

impl<'a> Borrow<dyn StateKey + 'a> for (String, String) {
    fn borrow(&self) -> &(dyn StateKey + 'a) {
        self
    }
}

// Must agree with the `Hash` of `(String, String)`.
impl Hash for dyn StateKey + '_ {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pair().hash(state)
    }
}

impl PartialEq for dyn StateKey + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.pair() == other.pair()
    }
}

impl Eq for dyn StateKey + '_ {}

/// A mapping from `(event_type, state_key)` to some value, holding at most
/// one value per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMap<E: Debug + Clone> {
    map: HashMap<(String, String), E>,
}

impl<E> Default for StateMap<E>
where
    E: Debug + Clone,
{
    fn default() -> Self {
        StateMap::new()
    }
}

impl<E> StateMap<E>
where
    E: Debug + Clone,
{
    pub fn new() -> StateMap<E> {
        StateMap {
            map: HashMap::new(),
        }
    }

    pub fn get(&self, t: &str, s: &str) -> Option<&E> {
        self.map.get(&(t, s) as &dyn StateKey)
    }

    pub fn get_mut(&mut self, t: &str, s: &str) -> Option<&mut E> {
        self.map.get_mut(&(t, s) as &dyn StateKey)
    }

    pub fn get_membership(&self, user: &str) -> Option<&E> {
        self.get(TYPE_MEMBERSHIP, user)
    }

    /// Inserts `value`, returning whatever was stored for the pair before.
    pub fn insert(&mut self, t: &str, s: &str, value: E) -> Option<E> {
        if let Some(existing) = self.get_mut(t, s) {
            return Some(mem::replace(existing, value));
        }

        self.map.insert((t.to_string(), s.to_string()), value)
    }

    pub fn remove(&mut self, t: &str, s: &str) -> Option<E> {
        self.map.remove(&(t, s) as &dyn StateKey)
    }

    pub fn contains_key(&self, t: &str, s: &str) -> bool {
        self.map.contains_key(&(t, s) as &dyn StateKey)
    }

    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.keys().map(|(t, s)| (t as &str, s as &str))
    }

    pub fn iter(&self) -> impl Iterator<Item = ((&str, &str), &E)> {
        self.map.iter().map(|((t, s), e)| ((t as &str, s as &str), e))
    }

    pub fn values(&self) -> impl Iterator<Item = &E> {
        self.map.values()
    }

    /// Iterates over the entries of the given type, keyed by state key.
    pub fn iter_type<'a>(
        &'a self,
        event_type: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a E)> + 'a {
        self.map
            .iter()
            .filter(move |((t, _), _)| t == event_type)
            .map(|((_, s), e)| (s as &str, e))
    }

    pub fn iter_members(&self) -> impl Iterator<Item = (&str, &E)> {
        self.iter_type(TYPE_MEMBERSHIP)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<E> FromIterator<((String, String), E)> for StateMap<E>
where
    E: Debug + Clone,
{
    fn from_iter<T: IntoIterator<Item = ((String, String), E)>>(
        iter: T,
    ) -> StateMap<E> {
        StateMap {
            map: iter.into_iter().collect(),
        }
    }
}

impl<'a, E> FromIterator<((&'a str, &'a str), E)> for StateMap<E>
where
    E: Debug + Clone,
{
    fn from_iter<T: IntoIterator<Item = ((&'a str, &'a str), E)>>(
        iter: T,
    ) -> StateMap<E> {
        let mut state_map = StateMap::new();
        state_map.extend(iter);
        state_map
    }
}

impl<E> Extend<((String, String), E)> for StateMap<E>
where
    E: Debug + Clone,
{
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = ((String, String), E)>,
    {
        self.map.extend(iter);
    }
}

impl<'a, E> Extend<((&'a str, &'a str), E)> for StateMap<E>
where
    E: Debug + Clone,
{
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = ((&'a str, &'a str), E)>,
    {
        for ((t, s), e) in iter {
            self.insert(t, s, e);
        }
    }
}

impl<E> IntoIterator for StateMap<E>
where
    E: Debug + Clone,
{
    type Item = ((String, String), E);
    type IntoIter = hash_map::IntoIter<(String, String), E>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}
