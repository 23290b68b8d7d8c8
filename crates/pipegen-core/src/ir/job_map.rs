//! Insertion-ordered job maps
//!
//! Output must be byte-identical across runs, so job maps keep declaration
//! order instead of relying on hash ordering.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered map from job id to job
#[derive(Debug, Clone, PartialEq)]
pub struct JobMap<J> {
    entries: Vec<(String, J)>,
}

impl<J> Default for JobMap<J> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<J> JobMap<J> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a job; returns the job back if the id is already taken
    pub fn insert(&mut self, id: impl Into<String>, job: J) -> Result<(), J> {
        let id = id.into();
        if self.contains(&id) {
            return Err(job);
        }
        self.entries.push((id, job));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&J> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, job)| job)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == id)
    }

    /// Job ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &J)> {
        self.entries.iter().map(|(key, job)| (key.as_str(), job))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<J: Serialize> Serialize for JobMap<J> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, job) in &self.entries {
            map.serialize_entry(id, job)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut jobs = JobMap::new();
        assert!(jobs.insert("synth", 1).is_ok());
        assert_eq!(jobs.insert("synth", 2), Err(2));
        assert_eq!(jobs.get("synth"), Some(&1));
    }

    #[test]
    fn test_serialization_keeps_insertion_order() {
        let mut jobs = JobMap::new();
        jobs.insert("zeta", 1).unwrap();
        jobs.insert("alpha", 2).unwrap();
        let json = serde_json::to_string(&jobs).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":2}"#);
    }
}
