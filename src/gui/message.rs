/// A message tagged with the key of the request it was produced for
///
/// Tasks started by a view may complete after the view moved on, started
/// another request or was closed. Tagging their messages lets the receiver recognize and
/// drop such stale results instead of updating itself with wrong data.
#[derive(Debug, Clone)]
pub struct KeyedMessage<K, T> {
    key: K,
    message: T,
}

impl<K, T> KeyedMessage<K, T> {
    pub fn new(key: K, message: T) -> Self {
        Self { key, message }
    }

    /// Get the key of the request the message belongs to
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn message(self) -> T {
        self.message
    }
}

impl<K: PartialEq, T> KeyedMessage<K, T> {
    pub fn matches(&self, key: &K) -> bool {
        &self.key == key
    }
}
