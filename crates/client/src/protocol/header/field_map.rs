/// An ordered multi-map of header fields.
///
/// Names are stored lower-cased and compared case-insensitively. The order in which
/// names are first inserted is kept, as is the order of the values under each name,
/// so the map serializes back in the order it was filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, Vec<String>)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|index| self.entries[index].1.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Appends `value` to the values of `name`, creating the entry if needed.
    pub fn append<V: Into<String>>(&mut self, name: &str, value: V) {
        match self.position(name) {
            Some(index) => self.entries[index].1.push(value.into()),
            None => self.entries.push((name.to_ascii_lowercase(), vec![value.into()])),
        }
    }

    /// Removes the first occurrence of `value` under `name`.
    ///
    /// The entry itself is dropped once its last value is gone. Returns whether
    /// anything was removed.
    pub fn remove(&mut self, name: &str, value: &str) -> bool {
        let Some(index) = self.position(name) else {
            return false;
        };

        let values = &mut self.entries[index].1;
        let Some(value_index) = values.iter().position(|v| v == value) else {
            return false;
        };

        values.remove(value_index);
        if values.is_empty() {
            self.entries.remove(index);
        }
        true
    }

    pub fn remove_all(&mut self, name: &str) -> Option<Vec<String>> {
        self.position(name).map(|index| self.entries.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of distinct names in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}
