use std::collections::HashMap;

/// Weight returned for any skill that is not listed in the table
pub const DEFAULT_WEIGHT: u32 = 1;

/// Seeded importance weights, keyed by lowercase skill token
const SEEDED_WEIGHTS: &[(&str, u32)] = &[
    // Languages, platforms and core engineering disciplines
    ("java", 3),
    ("python", 3),
    ("react", 3),
    ("c++", 3),
    ("sql", 3),
    ("aws", 3),
    ("ai", 3),
    ("ml", 3),
    ("tensorflow", 3),
    ("nodejs", 3),
    ("swift", 3),
    ("ios", 3),
    ("cybersecurity", 3),
    ("devops", 3),
    ("docker", 3),
    ("go", 3),
    ("microservices", 3),
    ("qa", 3),
    ("selenium", 3),
    ("data science", 3),
    ("vhdl", 3),
    ("verilog", 3),
    ("embedded c", 3),
    ("rtos", 3),
    ("vlsi", 3),
    ("cad", 3),
    ("solidworks", 3),
    ("robotics", 3),
    ("staadpro", 3),
    // Supporting skills
    ("html", 2),
    ("css", 2),
    ("javascript", 2),
    ("ui/ux", 2),
    ("figma", 2),
    ("autocad", 2),
    ("thermodynamics", 2),
    ("manufacturing", 2),
    ("signal processing", 2),
    ("analog design", 2),
];

/// Immutable mapping from skill token to importance weight
///
/// Built once at startup and shared read-only across requests.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    weights: HashMap<String, u32>,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::seeded()
    }
}

impl WeightTable {
    /// Creates the table from the built-in seeded weights
    pub fn seeded() -> Self {
        let weights = SEEDED_WEIGHTS
            .iter()
            .map(|(skill, weight)| (skill.to_string(), *weight))
            .collect();

        Self { weights }
    }

    /// Returns the weight for a skill token, `DEFAULT_WEIGHT` when unlisted
    pub fn weight(&self, skill: &str) -> u32 {
        self.weights.get(skill).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.weights.len()
    }
}
