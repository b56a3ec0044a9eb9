use serde::{Deserialize, Serialize};

const PERSIST_PREFIX: &str = "persist:";

/// Storage partition that isolates a tab's cookies, cache and storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Partition {
    name: String,
    is_temporary: bool,
}

impl Partition {
    /// An in-memory partition, dropped with the process (off the record)
    pub fn temporary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_temporary: true,
        }
    }

    /// A partition whose storage persists across sessions
    pub fn persistent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_temporary: false,
        }
    }

    /// Parse a prefixed partition string (`persist:default`, `incognito`)
    pub fn parse(value: &str) -> Self {
        match value.strip_prefix(PERSIST_PREFIX) {
            Some(name) => Self::persistent(name),
            None => Self::temporary(value),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_off_the_record(&self) -> bool {
        self.is_temporary
    }

    /// The partition string handed to the guest host
    pub fn with_prefix(&self) -> String {
        if self.is_temporary {
            self.name.clone()
        } else {
            format!("{}{}", PERSIST_PREFIX, self.name)
        }
    }
}

impl Default for Partition {
    fn default() -> Self {
        Self::persistent("default")
    }
}

/// The storage scope a tab is created in.
///
/// Off-the-record contexts derived from a regular one carry that regular
/// partition as `parent`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserContext {
    pub partition: Partition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Partition>,
}

impl BrowserContext {
    pub fn new(partition: Partition) -> Self {
        Self {
            partition,
            parent: None,
        }
    }

    /// An off-the-record context layered over `self`
    pub fn off_the_record(&self, name: impl Into<String>) -> Self {
        Self {
            partition: Partition::temporary(name),
            parent: Some(self.partition.clone()),
        }
    }

    pub fn has_parent_context(&self) -> bool {
        self.parent.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistent_partition_is_prefixed() {
        let partition = Partition::persistent("default");
        assert_eq!(partition.with_prefix(), "persist:default");
        assert!(!partition.is_off_the_record());
    }

    #[test]
    fn test_temporary_partition_is_not_prefixed() {
        let partition = Partition::temporary("incognito");
        assert_eq!(partition.with_prefix(), "incognito");
        assert!(partition.is_off_the_record());
    }

    #[test]
    fn test_parse_round_trips_prefix() {
        assert_eq!(Partition::parse("persist:work"), Partition::persistent("work"));
        assert_eq!(Partition::parse("scratch"), Partition::temporary("scratch"));
    }

    #[test]
    fn test_off_the_record_context_keeps_parent() {
        let regular = BrowserContext::default();
        let private = regular.off_the_record("incognito");

        assert!(private.has_parent_context());
        assert_eq!(private.parent.as_ref().unwrap().with_prefix(), "persist:default");
        assert!(!regular.has_parent_context());
    }
}
