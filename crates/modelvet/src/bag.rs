use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};
use std::fmt;

///
/// ErrorBag
///
/// Insertion-ordered multi-map from field-path key to human-readable
/// messages. Keys keep the order in which they were first added; messages
/// within a key keep append order. Merging never drops existing messages.
///
/// The representation is a probed `Vec` rather than a sorted map: key order
/// must survive merges, and bags stay small.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorBag {
    entries: Vec<(String, Vec<String>)>,
}

impl ErrorBag {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Replace internal state with an empty bag. Idempotent.
    pub fn flush(&mut self) {
        self.entries.clear();
    }

    /// Append one message to a key, creating the key if absent.
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.add_all(key, [message.into()]);
    }

    /// Append a batch of messages to a key. An empty batch is a no-op and
    /// never creates the key.
    pub fn add_all(
        &mut self,
        key: impl Into<String>,
        messages: impl IntoIterator<Item = impl Into<String>>,
    ) {
        let incoming: Vec<String> = messages.into_iter().map(Into::into).collect();
        if incoming.is_empty() {
            return;
        }

        let key = key.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            existing.extend(incoming);
        } else {
            self.entries.push((key, incoming));
        }
    }

    /// Append every entry of `incoming`, preserving its key order at the end
    /// for keys this bag does not hold yet.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = (String, Vec<String>)>) {
        for (key, messages) in incoming {
            self.add_all(key, messages);
        }
    }

    /// Re-key every entry of `child` as `prefix.field` and append it here.
    pub fn merge_under(&mut self, prefix: &str, child: &Self) {
        for (field, messages) in &child.entries {
            self.add_all(format!("{prefix}.{field}"), messages.iter().cloned());
        }
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.entries
            .iter()
            .any(|(k, messages)| k == key && !messages.is_empty())
    }

    /// Messages for a key; empty when absent, never fails.
    #[must_use]
    pub fn get(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map_or(&[], |(_, messages)| messages.as_slice())
    }

    /// Delete a key and all its messages; a no-op when absent.
    ///
    /// Rebuilds without empty message lists so a filtered-out key cannot
    /// resurrect as a phantom entry later.
    pub fn remove_all(&mut self, key: &str) {
        self.entries
            .retain(|(k, messages)| k != key && !messages.is_empty());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, messages)| messages.is_empty())
    }

    /// Total message count across all keys.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.iter().map(|(_, messages)| messages.len()).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, messages)| (k.as_str(), messages.as_slice()))
    }

    /// Every message in key order, flattened.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|(_, messages)| messages.iter().map(String::as_str))
    }
}

impl IntoIterator for ErrorBag {
    type Item = (String, Vec<String>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, Vec<String>)> for ErrorBag {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut bag = Self::new();
        bag.merge(iter);
        bag
    }
}

impl Serialize for ErrorBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, messages) in &self.entries {
            map.serialize_entry(key, messages)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ErrorBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BagVisitor;

        impl<'de> Visitor<'de> for BagVisitor {
            type Value = ErrorBag;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field paths to message lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut bag = ErrorBag::new();
                while let Some((key, messages)) = access.next_entry::<String, Vec<String>>()? {
                    bag.add_all(key, messages);
                }
                Ok(bag)
            }
        }

        deserializer.deserialize_map(BagVisitor)
    }
}
