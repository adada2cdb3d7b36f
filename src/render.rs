//! Plain-text rendering of a stored creature

use std::fmt;

use crate::parser::{display_name, Gender};
use crate::store::{CreatureView, EvolutionView};

const SEPARATOR_WIDTH: usize = 40;

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Genderless => write!(f, "Genderless"),
            Gender::Ratio { male, female } => {
                write!(f, "Male {:.1}%, Female {:.1}%", male, female)
            }
        }
    }
}

impl fmt::Display for EvolutionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut details = Vec::new();
        if let Some(level) = self.min_level {
            details.push(format!("Level {}", level));
        }
        if let Some(trigger) = &self.trigger {
            details.push(format!("Trigger: {}", trigger));
        }
        if let Some(item) = &self.item {
            details.push(format!("Item: {}", item));
        }
        write!(f, "-> {} ({})", self.target, details.join(", "))
    }
}

impl fmt::Display for CreatureView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ID: {}, Name: {}, Height: {}, Weight: {}",
            self.id,
            display_name(&self.name),
            self.height,
            self.weight
        )?;
        writeln!(f, "Types: {}", join_or_none(&self.types))?;
        writeln!(f, "Abilities: {}", join_or_none(&self.abilities))?;

        if self.stats.is_empty() {
            writeln!(f, "Stats: None")?;
        } else {
            writeln!(f, "Stats:")?;
            for stat in &self.stats {
                writeln!(f, "  {}: {}", stat.name, stat.value)?;
            }
        }

        writeln!(f, "Gender: {}", self.gender)?;
        writeln!(f, "Held items: {}", join_or_none(&self.held_items))?;

        if self.evolutions.is_empty() {
            writeln!(f, "Evolves to: None")?;
        } else {
            writeln!(f, "Evolves to:")?;
            for evolution in &self.evolutions {
                writeln!(f, "  {}", evolution)?;
            }
        }

        write!(f, "{}", "-".repeat(SEPARATOR_WIDTH))
    }
}
