use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Written when the profiles directory holds no `.json` file yet.
const SAMPLE_PROFILE_NAME: &str = "personal.json";

/// An ordered mapping from human-readable field name to the value to fill.
///
/// Keys are non-empty and unique; insertion order is kept so that ties in
/// matching resolve to the earliest key.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    entries: Vec<(String, String)>,
}

impl Profile {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        if entries.is_empty() {
            return Err(Error::Profile("profile has no entries".into()));
        }
        let mut seen = HashSet::new();
        for (key, _) in &entries {
            if key.trim().is_empty() {
                return Err(Error::Profile("profile keys must not be empty".into()));
            }
            if !seen.insert(key.as_str()) {
                return Err(Error::Profile(format!("duplicate key: {key}")));
            }
        }
        Ok(Self { entries })
    }

    /// Parse a JSON object. Scalars are stringified; nested values are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let RawEntries(raw) = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(Error::Profile(format!(
                        "value for {key:?} must be a string, number or bool, got {other}"
                    )))
                }
            };
            entries.push((key, value));
        }
        Self::new(entries)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Ok(serde_json::to_string_pretty(&object)?)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn entry(&self, index: usize) -> Option<(&str, &str)> {
        self.entries
            .get(index)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The profile written when a fresh profiles directory is opened.
    pub fn sample() -> Self {
        Self {
            entries: [
                ("Full Name", "Tanish Bafna"),
                ("Email", "tanishbafna@gmail.com"),
                ("Phone Number", "9876543210"),
                ("Address", "Pune, Maharashtra"),
                ("Occupation", "Computer Engineer"),
                ("Age", "22"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        }
    }
}

/// A JSON object's members in file order, repeated keys included, so
/// that [`Profile::new`] sees and rejects them.
struct RawEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object of profile fields")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<RawEntries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Value>()? {
                    entries.push(entry);
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// A directory of `*.json` profile files.
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Open `dir`, creating it and seeding a sample profile when it has none.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { dir: dir.into() };
        fs::create_dir_all(&store.dir)?;
        if store.list()?.is_empty() {
            let path = store.dir.join(SAMPLE_PROFILE_NAME);
            fs::write(&path, Profile::sample().to_json_pretty()?)?;
            tracing::info!(path = %path.display(), "created sample profile");
        }
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Profile file names, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".json") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn load(&self, name: &str) -> Result<Profile> {
        let path = self.dir.join(name);
        let text = fs::read_to_string(&path)?;
        Profile::from_json(&text)
            .map_err(|e| Error::Profile(format!("{}: {e}", path.display())))
    }
}
