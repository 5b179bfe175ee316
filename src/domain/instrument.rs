//! Tradable instruments and the configured catalog.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstrumentId(String);

impl InstrumentId {
    pub fn new(id: impl Into<String>) -> Self {
        InstrumentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstrumentId {
    fn from(id: &str) -> Self {
        InstrumentId(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    pub id: InstrumentId,
    pub name: String,
}

impl Instrument {
    pub fn new(id: &str, name: &str) -> Self {
        Instrument {
            id: InstrumentId::new(id),
            name: name.to_string(),
        }
    }
}

/// Ordered set of instruments the simulation may select from.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentCatalog {
    instruments: Vec<Instrument>,
}

impl InstrumentCatalog {
    /// Builds a catalog, dropping later duplicates of an id. Falls back to the
    /// default catalog when `instruments` is empty.
    pub fn new(instruments: Vec<Instrument>) -> Self {
        let mut unique: Vec<Instrument> = Vec::with_capacity(instruments.len());
        for inst in instruments {
            if !unique.iter().any(|u| u.id == inst.id) {
                unique.push(inst);
            }
        }
        if unique.is_empty() {
            return Self::default();
        }
        InstrumentCatalog { instruments: unique }
    }

    pub fn get(&self, id: &InstrumentId) -> Option<&Instrument> {
        self.instruments.iter().find(|i| &i.id == id)
    }

    pub fn first(&self) -> &Instrument {
        // never empty: `new` and `default` both guarantee one entry
        &self.instruments[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        InstrumentCatalog {
            instruments: vec![
                Instrument::new("GEM", "Gemini Technologies"),
                Instrument::new("TITAN", "Titan Industries"),
                Instrument::new("NOVA", "Nova Financial"),
            ],
        }
    }
}
